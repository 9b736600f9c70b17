//! Subscription record as seen by the reminder core.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BillingCycle;
use crate::domain::foundation::{SubscriptionId, UserId};

/// A recurring charge tracked on behalf of its owner.
///
/// Display attributes are immutable for the duration of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub owner_id: UserId,
    pub name: String,
    /// Charge amount in major currency units.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub category: Option<String>,
    pub website_url: Option<String>,
    /// Calendar date of the next charge (no time of day).
    pub next_renewal_date: NaiveDate,
    pub is_active: bool,
    pub reminder_enabled: bool,
    /// Lead time in days between the reminder and the renewal.
    pub reminder_days_before: u32,
}

impl Subscription {
    /// Whether both eligibility flags are set.
    pub fn is_remindable(&self) -> bool {
        self.is_active && self.reminder_enabled
    }
}
