//! HTTP handlers for reminder endpoints.
//!
//! These handlers connect Axum routes to the reminder runner and the preview
//! query handler.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{
    PreviewUpcomingRemindersHandler, PreviewUpcomingRemindersQuery, ReminderRunner,
};
use crate::domain::foundation::UserId;
use crate::domain::reminder::{RepositoryError, ReminderEvaluator, ReminderRunError};
use crate::ports::{Clock, SubscriptionRepository};

use super::dto::{
    ErrorResponse, RunRemindersResponse, UpcomingRemindersParams, UpcomingRemindersResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for reminder routes. Cloned per request.
#[derive(Clone)]
pub struct ReminderAppState {
    pub runner: Arc<ReminderRunner>,
    pub clock: Arc<dyn Clock>,
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
}

impl ReminderAppState {
    pub fn new(
        runner: Arc<ReminderRunner>,
        clock: Arc<dyn Clock>,
        subscription_repository: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            runner,
            clock,
            subscription_repository,
        }
    }

    /// Preview handler sharing the runner's look-ahead window.
    pub fn preview_handler(&self) -> PreviewUpcomingRemindersHandler {
        PreviewUpcomingRemindersHandler::new(
            self.clock.clone(),
            self.subscription_repository.clone(),
            ReminderEvaluator::new(self.runner.config().lookahead_days),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Caller identity taken from the `X-User-Id` header.
///
/// Authentication happens upstream; this service trusts the header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/reminders/run - Run today's reminder pass now
///
/// Returns 200 with stats even when some dispatches failed; only a failed
/// candidate fetch is a 500.
pub async fn run_reminders(
    State(state): State<ReminderAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ReminderApiError> {
    tracing::info!(requested_by = %user.user_id, "Manual reminder run requested");

    let stats = state.runner.run().await?;
    Ok(Json(RunRemindersResponse::from(stats)))
}

/// GET /api/reminders/upcoming?days=N - Preview the caller's upcoming reminders
pub async fn upcoming_reminders(
    State(state): State<ReminderAppState>,
    user: AuthenticatedUser,
    Query(params): Query<UpcomingRemindersParams>,
) -> Result<impl IntoResponse, ReminderApiError> {
    let query = PreviewUpcomingRemindersQuery::new(user.user_id, params.days);
    let upcoming = state.preview_handler().handle(query).await?;
    Ok(Json(UpcomingRemindersResponse::from(upcoming)))
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper mapping reminder errors to HTTP responses.
#[derive(Debug)]
pub enum ReminderApiError {
    Run(ReminderRunError),
    Repository(RepositoryError),
}

impl From<ReminderRunError> for ReminderApiError {
    fn from(err: ReminderRunError) -> Self {
        Self::Run(err)
    }
}

impl From<RepositoryError> for ReminderApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl IntoResponse for ReminderApiError {
    fn into_response(self) -> axum::response::Response {
        let (error_code, message) = match &self {
            ReminderApiError::Run(e) => ("REMINDER_RUN_FAILED", format!("Error checking reminders: {}", e)),
            ReminderApiError::Repository(e) => (
                "REPOSITORY_UNAVAILABLE",
                format!("Error fetching upcoming reminders: {}", e),
            ),
        };
        tracing::error!(error_code, message = %message, "Reminder request failed");

        let body = ErrorResponse::new(error_code, message);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
