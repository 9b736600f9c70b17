//! Reminder renderer port - produces the email content for one reminder.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::reminder::{RenderError, ReminderDecision};
use crate::domain::subscription::BillingCycle;

use super::Recipient;

/// Everything a template may show about one reminder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderContext {
    pub recipient_name: String,
    pub subscription_name: String,
    pub renewal_date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub days_until_renewal: i64,
    pub category: Option<String>,
    pub website_url: Option<String>,
}

impl ReminderContext {
    pub fn new(decision: &ReminderDecision, recipient: &Recipient) -> Self {
        let subscription = &decision.subscription;
        Self {
            recipient_name: recipient.display_name.clone(),
            subscription_name: subscription.name.clone(),
            renewal_date: subscription.next_renewal_date,
            amount: subscription.amount,
            currency: subscription.currency.clone(),
            billing_cycle: subscription.billing_cycle,
            days_until_renewal: decision.days_until_renewal,
            category: subscription.category.clone(),
            website_url: subscription.website_url.clone(),
        }
    }
}

/// Rendered reminder in both rich and plain representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReminder {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Renders reminder content. Pure; no I/O.
pub trait ReminderRenderer: Send + Sync {
    /// # Errors
    ///
    /// `RenderError` when required fields are missing or a template fails.
    fn render(&self, context: &ReminderContext) -> Result<RenderedReminder, RenderError>;
}
