//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the reminder core to external systems:
//! - `clock` - System and fixed clocks
//! - `memory` - In-memory repository, lookup, ledger and notifier
//! - `postgres` - PostgreSQL repository, lookup and ledger
//! - `email` - Minijinja renderer and SMTP notifier
//! - `scheduler` - Daily run trigger
//! - `http` - Axum routes

pub mod clock;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod scheduler;

pub use clock::{FixedClock, SystemClock};
pub use email::{MiniJinjaReminderRenderer, SmtpNotificationPort};
pub use memory::{
    InMemoryDispatchLedger, InMemorySubscriptionRepository, InMemoryUserLookup,
    RecordingNotifier,
};
pub use postgres::{PostgresDispatchLedger, PostgresSubscriptionRepository, PostgresUserLookup};
pub use scheduler::{DailyReminderScheduler, DailySchedule};
