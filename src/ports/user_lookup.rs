//! User lookup port - resolves subscription owners to email recipients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::reminder::LookupError;

/// Where a reminder goes and how to greet the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub display_name: String,
}

impl Recipient {
    /// Builds a recipient, falling back to the email's local part when no
    /// display name is known.
    pub fn new(email: impl Into<String>, display_name: Option<String>) -> Self {
        let email = email.into();
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
        Self {
            email,
            display_name,
        }
    }
}

/// Resolves an owner identifier to a recipient.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// # Errors
    ///
    /// - `LookupError::NotFound` if no such owner exists
    /// - `LookupError::MissingEmail` if the owner has no address on file
    /// - `LookupError::Unavailable` on backend failure
    async fn resolve(&self, owner_id: &UserId) -> Result<Recipient, LookupError>;
}
