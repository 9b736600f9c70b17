//! DispatchLedger port - per-day idempotency record for reminders.
//!
//! Without a ledger, a manual run and the scheduled run on the same day can
//! both deliver the same reminder. With one, the runner claims
//! `(subscription_id, reminder_date)` before dispatching and skips keys that
//! are already claimed.
//!
//! ## Protocol
//!
//! 1. `claim(key)` - returns `false` if the key was already claimed
//! 2. dispatch
//! 3. on failure, `release(key)` so a later run the same day can retry

use async_trait::async_trait;

use crate::domain::reminder::{LedgerError, ReminderKey};

/// Records which reminders have been delivered.
#[async_trait]
pub trait DispatchLedger: Send + Sync {
    /// Atomically claim a key. Returns `true` if this call claimed it.
    async fn claim(&self, key: &ReminderKey) -> Result<bool, LedgerError>;

    /// Drop a claim after a failed dispatch.
    async fn release(&self, key: &ReminderKey) -> Result<(), LedgerError>;
}
