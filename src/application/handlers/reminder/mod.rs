//! Reminder handlers.
//!
//! ## Commands
//! - Run the daily reminder pass ("run now" and the scheduled trigger)
//!
//! ## Queries
//! - Preview an owner's upcoming reminders

mod preview_upcoming;
mod run_reminders;

// Commands
pub use run_reminders::{ReminderRunner, ReminderRunnerConfig};

// Queries
pub use preview_upcoming::{
    PreviewUpcomingRemindersHandler, PreviewUpcomingRemindersQuery, UpcomingReminder,
    DEFAULT_PREVIEW_WINDOW_DAYS, MAX_PREVIEW_WINDOW_DAYS,
};
