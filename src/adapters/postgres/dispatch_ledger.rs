//! PostgreSQL implementation of DispatchLedger.
//!
//! A claim is an `INSERT ... ON CONFLICT DO NOTHING` on the
//! `(subscription_id, reminder_date)` primary key, so concurrent runners
//! (even across processes) cannot both claim the same reminder.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::reminder::{LedgerError, ReminderKey};
use crate::ports::DispatchLedger;

pub struct PostgresDispatchLedger {
    pool: PgPool,
}

impl PostgresDispatchLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatchLedger for PostgresDispatchLedger {
    async fn claim(&self, key: &ReminderKey) -> Result<bool, LedgerError> {
        let result = sqlx::query(
            r#"
            INSERT INTO reminder_dispatches (subscription_id, reminder_date, claimed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (subscription_id, reminder_date) DO NOTHING
            "#,
        )
        .bind(key.subscription_id.as_uuid())
        .bind(key.reminder_date)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("Failed to claim {}: {}", key, e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, key: &ReminderKey) -> Result<(), LedgerError> {
        sqlx::query(
            "DELETE FROM reminder_dispatches WHERE subscription_id = $1 AND reminder_date = $2",
        )
        .bind(key.subscription_id.as_uuid())
        .bind(key.reminder_date)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("Failed to release {}: {}", key, e)))?;

        Ok(())
    }
}
