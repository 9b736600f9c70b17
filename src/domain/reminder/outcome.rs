//! Per-subscription result of a dispatch attempt.

use serde::Serialize;

use super::DispatchError;
use crate::domain::foundation::SubscriptionId;

/// Result of dispatching one matched subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderOutcome {
    pub subscription_id: SubscriptionId,
    pub sent: bool,
    /// The ledger already held this reminder; nothing was sent.
    pub skipped: bool,
    /// Operator-facing description, present iff the dispatch failed.
    pub error: Option<String>,
}

impl ReminderOutcome {
    pub fn sent(subscription_id: SubscriptionId) -> Self {
        Self {
            subscription_id,
            sent: true,
            skipped: false,
            error: None,
        }
    }

    pub fn already_sent(subscription_id: SubscriptionId) -> Self {
        Self {
            subscription_id,
            sent: false,
            skipped: true,
            error: None,
        }
    }

    /// Failure outcome with an error line of the form `<id> (<name>): <error>`.
    pub fn failed(subscription_id: SubscriptionId, name: &str, error: &DispatchError) -> Self {
        Self {
            subscription_id,
            sent: false,
            skipped: false,
            error: Some(format!("{} ({}): {}", subscription_id, name, error)),
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.sent && !self.skipped
    }
}
