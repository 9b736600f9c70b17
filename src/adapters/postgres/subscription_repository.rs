//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Rows that fail to decode (unknown billing cycle, negative lead time, blank
//! owner) are logged and left out of the result instead of failing the query.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{SubscriptionId, UserId};
use crate::domain::reminder::RepositoryError;
use crate::domain::subscription::{BillingCycle, Subscription};
use crate::ports::SubscriptionRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, owner_id, name, amount, currency, billing_cycle, category, website_url,
           next_renewal_date, is_active, reminder_enabled, reminder_days_before
    FROM subscriptions
"#;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        owner_id: Option<&UserId>,
        renewal_from: NaiveDate,
        renewal_until: NaiveDate,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let sql = format!(
            r#"{SELECT_COLUMNS}
            WHERE is_active
              AND reminder_enabled
              AND next_renewal_date >= $1
              AND next_renewal_date <= $2
              AND ($3::TEXT IS NULL OR owner_id = $3)
            ORDER BY next_renewal_date ASC, name ASC
            "#
        );

        let rows: Vec<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(renewal_from)
            .bind(renewal_until)
            .bind(owner_id.map(UserId::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(decode_rows(rows))
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    owner_id: String,
    name: String,
    amount: f64,
    currency: String,
    billing_cycle: String,
    category: Option<String>,
    website_url: Option<String>,
    next_renewal_date: NaiveDate,
    is_active: bool,
    reminder_enabled: bool,
    reminder_days_before: i32,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = String;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let billing_cycle: BillingCycle = row.billing_cycle.parse().map_err(|e| format!("{}", e))?;
        let owner_id = UserId::new(row.owner_id).map_err(|e| format!("{}", e))?;
        let reminder_days_before = u32::try_from(row.reminder_days_before)
            .map_err(|_| format!("negative reminder_days_before: {}", row.reminder_days_before))?;

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            owner_id,
            name: row.name,
            amount: row.amount,
            currency: row.currency,
            billing_cycle,
            category: row.category,
            website_url: row.website_url,
            next_renewal_date: row.next_renewal_date,
            is_active: row.is_active,
            reminder_enabled: row.reminder_enabled,
            reminder_days_before,
        })
    }
}

fn decode_rows(rows: Vec<SubscriptionRow>) -> Vec<Subscription> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Subscription::try_from(row) {
                Ok(subscription) => Some(subscription),
                Err(reason) => {
                    tracing::warn!(subscription_id = %id, reason = %reason, "Skipping malformed subscription row");
                    None
                }
            }
        })
        .collect()
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RepositoryError::Connection(e.to_string()),
        other => RepositoryError::Query(other.to_string()),
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_remindable(
        &self,
        today: NaiveDate,
        lookahead_days: u32,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let until = today
            .checked_add_days(Days::new(u64::from(lookahead_days)))
            .unwrap_or(NaiveDate::MAX);
        self.fetch(None, today, until).await
    }

    async fn find_remindable_for_owner(
        &self,
        owner_id: &UserId,
        renewal_from: NaiveDate,
        renewal_until: NaiveDate,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        self.fetch(Some(owner_id), renewal_from, renewal_until).await
    }
}
