//! PostgreSQL implementation of UserLookup.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::UserId;
use crate::domain::reminder::LookupError;
use crate::ports::{Recipient, UserLookup};

/// Resolves owners from the `users` table.
pub struct PostgresUserLookup {
    pool: PgPool,
}

impl PostgresUserLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    email: Option<String>,
    full_name: Option<String>,
}

fn into_recipient(owner_id: &UserId, row: Option<UserRow>) -> Result<Recipient, LookupError> {
    let row = row.ok_or_else(|| LookupError::NotFound(owner_id.clone()))?;
    let email = row
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| LookupError::MissingEmail(owner_id.clone()))?;
    Ok(Recipient::new(email, row.full_name))
}

#[async_trait]
impl UserLookup for PostgresUserLookup {
    async fn resolve(&self, owner_id: &UserId) -> Result<Recipient, LookupError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT email, full_name FROM users WHERE id = $1")
                .bind(owner_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        into_recipient(owner_id, row)
    }
}
