//! In-memory DispatchLedger.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::domain::reminder::{LedgerError, ReminderKey};
use crate::ports::DispatchLedger;

/// Process-local ledger. Claims do not survive a restart.
#[derive(Default)]
pub struct InMemoryDispatchLedger {
    claimed: RwLock<HashSet<ReminderKey>>,
}

impl InMemoryDispatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &ReminderKey) -> bool {
        self.claimed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    pub fn len(&self) -> usize {
        self.claimed.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DispatchLedger for InMemoryDispatchLedger {
    async fn claim(&self, key: &ReminderKey) -> Result<bool, LedgerError> {
        Ok(self
            .claimed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*key))
    }

    async fn release(&self, key: &ReminderKey) -> Result<(), LedgerError> {
        self.claimed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SubscriptionId;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn claim_is_exclusive_until_released() {
        let ledger = InMemoryDispatchLedger::new();
        let key = ReminderKey::new(
            SubscriptionId::new(),
            NaiveDate::from_ymd_opt(2025, 2, 26).unwrap(),
        );

        assert!(ledger.claim(&key).await.unwrap());
        assert!(!ledger.claim(&key).await.unwrap());
        assert!(ledger.contains(&key));

        ledger.release(&key).await.unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.claim(&key).await.unwrap());
    }
}
