//! RecordingNotifier - NotificationPort that keeps what it was asked to send.
//!
//! Stands in for SMTP in tests and in local runs without a mail relay.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::domain::reminder::TransportError;
use crate::ports::{NotificationPort, Recipient, RenderedReminder};

/// One captured delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredReminder {
    pub recipient: Recipient,
    pub reminder: RenderedReminder,
}

#[derive(Default)]
pub struct RecordingNotifier {
    delivered: RwLock<Vec<DeliveredReminder>>,
    rejected_addresses: RwLock<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every delivery to `email` with a transport error.
    pub fn reject_address(&self, email: &str) {
        self.rejected_addresses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(email.to_string());
    }

    pub fn delivered(&self) -> Vec<DeliveredReminder> {
        self.delivered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn send(
        &self,
        recipient: &Recipient,
        reminder: &RenderedReminder,
    ) -> Result<(), TransportError> {
        if self
            .rejected_addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&recipient.email)
        {
            return Err(TransportError::Delivery(format!(
                "550 mailbox unavailable: {}",
                recipient.email
            )));
        }

        tracing::debug!(to = %recipient.email, subject = %reminder.subject, "Recorded reminder");
        self.delivered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DeliveredReminder {
                recipient: recipient.clone(),
                reminder: reminder.clone(),
            });
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}
