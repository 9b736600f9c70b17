//! HTTP DTOs (Data Transfer Objects) for reminder endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::UpcomingReminder;
use crate::domain::reminder::ReminderStats;
use crate::domain::subscription::BillingCycle;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string for `GET /upcoming`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingRemindersParams {
    /// Window in days; defaults to 7, capped at 365.
    pub days: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a manual reminder run.
#[derive(Debug, Clone, Serialize)]
pub struct RunRemindersResponse {
    pub success: bool,
    pub message: String,
    pub stats: ReminderStats,
}

impl From<ReminderStats> for RunRemindersResponse {
    fn from(stats: ReminderStats) -> Self {
        let message = if stats.interrupted() {
            "Reminder check interrupted"
        } else {
            "Reminder check completed"
        };
        Self {
            success: true,
            message: message.to_string(),
            stats,
        }
    }
}

/// One upcoming reminder.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingReminderResponse {
    pub subscription_id: String,
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub category: Option<String>,
    pub next_renewal_date: NaiveDate,
    pub reminder_date: NaiveDate,
    pub reminder_days_before: u32,
    pub days_until_reminder: i64,
    pub days_until_renewal: i64,
}

impl From<UpcomingReminder> for UpcomingReminderResponse {
    fn from(upcoming: UpcomingReminder) -> Self {
        let subscription = upcoming.subscription;
        Self {
            subscription_id: subscription.id.to_string(),
            name: subscription.name,
            amount: subscription.amount,
            currency: subscription.currency,
            billing_cycle: subscription.billing_cycle,
            category: subscription.category,
            next_renewal_date: subscription.next_renewal_date,
            reminder_date: upcoming.reminder_date,
            reminder_days_before: subscription.reminder_days_before,
            days_until_reminder: upcoming.days_until_reminder,
            days_until_renewal: upcoming.days_until_renewal,
        }
    }
}

/// Response for the upcoming reminders preview.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingRemindersResponse {
    pub success: bool,
    pub reminders: Vec<UpcomingReminderResponse>,
    pub count: usize,
}

impl From<Vec<UpcomingReminder>> for UpcomingRemindersResponse {
    fn from(upcoming: Vec<UpcomingReminder>) -> Self {
        let reminders: Vec<UpcomingReminderResponse> =
            upcoming.into_iter().map(UpcomingReminderResponse::from).collect();
        Self {
            success: true,
            count: reminders.len(),
            reminders,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
