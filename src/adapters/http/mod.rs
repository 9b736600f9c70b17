//! HTTP adapters - REST API implementations.

pub mod reminders;

pub use reminders::{reminder_router, ReminderAppState};
