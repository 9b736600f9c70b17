//! Reminder module - matching and result types for renewal reminders.
//!
//! # Module Organization
//!
//! - `evaluator` - Pure matching of a subscription against "today"
//! - `outcome` - Per-subscription dispatch outcome
//! - `stats` - Immutable run summary and its accumulator
//! - `errors` - Fatal and per-subscription error taxonomy
//! - `key` - Idempotency key for one reminder

mod errors;
mod evaluator;
mod key;
mod outcome;
mod stats;

pub use errors::{
    DispatchError, LedgerError, LookupError, RenderError, ReminderRunError, RepositoryError,
    TransportError,
};
pub use evaluator::{ReminderDecision, ReminderEvaluator, DEFAULT_LOOKAHEAD_DAYS};
pub use key::ReminderKey;
pub use outcome::ReminderOutcome;
pub use stats::{ReminderStats, StatsAccumulator};
