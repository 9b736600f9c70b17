//! Notification port - delivers rendered reminders.

use async_trait::async_trait;

use crate::domain::reminder::TransportError;

use super::{Recipient, RenderedReminder};

/// Outbound delivery channel for reminders.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Deliver `reminder` to `recipient`.
    ///
    /// # Errors
    ///
    /// `TransportError` when the message cannot be built or delivered.
    async fn send(
        &self,
        recipient: &Recipient,
        reminder: &RenderedReminder,
    ) -> Result<(), TransportError>;

    /// Human-readable channel name for logs (e.g. "smtp").
    fn channel_name(&self) -> &str;
}
