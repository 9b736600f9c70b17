//! In-memory adapters.
//!
//! Used by tests and for running the service without a database. State lives
//! behind `RwLock`s; a poisoned lock is recovered.

mod dispatch_ledger;
mod notifier;
mod subscription_repository;
mod user_lookup;

pub use dispatch_ledger::InMemoryDispatchLedger;
pub use notifier::{DeliveredReminder, RecordingNotifier};
pub use subscription_repository::InMemorySubscriptionRepository;
pub use user_lookup::InMemoryUserLookup;
