//! Idempotency key for a single reminder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::SubscriptionId;

/// Identifies one reminder: a subscription on its reminder date.
///
/// At most one notification should ever be delivered per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderKey {
    pub subscription_id: SubscriptionId,
    pub reminder_date: NaiveDate,
}

impl ReminderKey {
    pub fn new(subscription_id: SubscriptionId, reminder_date: NaiveDate) -> Self {
        Self {
            subscription_id,
            reminder_date,
        }
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.subscription_id, self.reminder_date)
    }
}
