//! PostgreSQL adapters - Database implementations for reminder ports.
//!
//! - `PostgresSubscriptionRepository` - Candidate queries with the eligibility filter pushed into SQL
//! - `PostgresUserLookup` - Owner to recipient resolution from the `users` table
//! - `PostgresDispatchLedger` - Per-day idempotency record in `reminder_dispatches`

mod dispatch_ledger;
mod subscription_repository;
mod user_lookup;

pub use dispatch_ledger::PostgresDispatchLedger;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use user_lookup::PostgresUserLookup;
