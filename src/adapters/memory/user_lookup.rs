//! In-memory UserLookup.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::UserId;
use crate::domain::reminder::LookupError;
use crate::ports::{Recipient, UserLookup};

#[derive(Default)]
pub struct InMemoryUserLookup {
    users: RwLock<HashMap<UserId, Option<Recipient>>>,
}

impl InMemoryUserLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, owner_id: UserId, email: &str, display_name: Option<&str>) {
        let recipient = Recipient::new(email, display_name.map(str::to_string));
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(owner_id, Some(recipient));
    }

    /// Register an owner with no email address on file.
    pub fn add_user_without_email(&self, owner_id: UserId) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(owner_id, None);
    }
}

#[async_trait]
impl UserLookup for InMemoryUserLookup {
    async fn resolve(&self, owner_id: &UserId) -> Result<Recipient, LookupError> {
        match self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(owner_id)
        {
            Some(Some(recipient)) => Ok(recipient.clone()),
            Some(None) => Err(LookupError::MissingEmail(owner_id.clone())),
            None => Err(LookupError::NotFound(owner_id.clone())),
        }
    }
}
