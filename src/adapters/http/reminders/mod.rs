//! HTTP adapter for reminder endpoints.
//!
//! Exposes a manual "run now" trigger and a per-owner preview of upcoming
//! reminders.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, RunRemindersResponse, UpcomingReminderResponse, UpcomingRemindersParams,
    UpcomingRemindersResponse,
};
pub use handlers::{AuthenticatedUser, ReminderApiError, ReminderAppState};
pub use routes::{health_routes, reminder_router, reminder_routes};
