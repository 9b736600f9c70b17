//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain rules and coordinates between ports.
//! The reminder run is the only command; the upcoming-reminder preview is a
//! side-effect free query.

pub mod handlers;

pub use handlers::reminder::{
    PreviewUpcomingRemindersHandler, PreviewUpcomingRemindersQuery, ReminderRunner,
    ReminderRunnerConfig, UpcomingReminder,
};
