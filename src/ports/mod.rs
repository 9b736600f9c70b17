//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the reminder core and the outside world. Adapters implement these ports.
//!
//! ## Inputs
//!
//! - `Clock` - Supplies "today" in the configured time zone
//! - `SubscriptionRepository` - Yields reminder candidates
//! - `UserLookup` - Resolves an owner to a recipient address
//!
//! ## Outputs
//!
//! - `ReminderRenderer` - Turns a matched subscription into email content
//! - `NotificationPort` - Delivers rendered content
//! - `DispatchLedger` - Optional per-day idempotency record

mod clock;
mod dispatch_ledger;
mod notification_port;
mod reminder_renderer;
mod subscription_repository;
mod user_lookup;

pub use clock::Clock;
pub use dispatch_ledger::DispatchLedger;
pub use notification_port::NotificationPort;
pub use reminder_renderer::{ReminderContext, ReminderRenderer, RenderedReminder};
pub use subscription_repository::SubscriptionRepository;
pub use user_lookup::{Recipient, UserLookup};
