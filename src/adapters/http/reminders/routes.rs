//! Axum router configuration for reminder endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, run_reminders, upcoming_reminders, ReminderAppState};

/// Reminder API routes.
///
/// # Routes (require `X-User-Id`)
/// - `POST /run` - Run today's reminder pass now
/// - `GET /upcoming?days=N` - Preview the caller's upcoming reminders
pub fn reminder_routes() -> Router<ReminderAppState> {
    Router::new()
        .route("/run", post(run_reminders))
        .route("/upcoming", get(upcoming_reminders))
}

/// Liveness route, independent of application state.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}

/// Complete router: reminder routes under `/api/reminders` plus `/health`.
///
/// ```ignore
/// let app = reminder_router().with_state(state);
/// ```
pub fn reminder_router() -> Router<ReminderAppState> {
    Router::new()
        .nest("/api/reminders", reminder_routes())
        .merge(health_routes())
}
