//! SMTP notification port via `lettre`.
//!
//! Sends each reminder as a multipart/alternative message (plain text first,
//! HTML second) through an async SMTP transport.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::config::{EmailConfig, SmtpTls};
use crate::domain::reminder::TransportError;
use crate::ports::{NotificationPort, Recipient, RenderedReminder};

/// Delivers reminders through an SMTP relay.
pub struct SmtpNotificationPort {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationPort {
    /// Build the transport from email configuration.
    ///
    /// Does not connect; the first send opens the connection.
    ///
    /// # Errors
    ///
    /// `TransportError::InvalidAddress` for a malformed sender and
    /// `TransportError::Message` if the relay cannot be configured.
    pub fn from_config(config: &EmailConfig) -> Result<Self, TransportError> {
        let from = parse_mailbox(&config.from_header())?;

        let mut builder = match config.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| TransportError::Message(e.to_string()))?,
            SmtpTls::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| TransportError::Message(e.to_string()))?
            }
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host),
        }
        .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(
        &self,
        recipient: &Recipient,
        reminder: &RenderedReminder,
    ) -> Result<Message, TransportError> {
        let to = Mailbox::new(
            Some(recipient.display_name.clone()),
            recipient
                .email
                .parse()
                .map_err(|_| TransportError::InvalidAddress(recipient.email.clone()))?,
        );

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&reminder.subject)
            .multipart(MultiPart::alternative_plain_html(
                reminder.text_body.clone(),
                reminder.html_body.clone(),
            ))
            .map_err(|e| TransportError::Message(e.to_string()))
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, TransportError> {
    raw.parse()
        .map_err(|_| TransportError::InvalidAddress(raw.to_string()))
}

#[async_trait]
impl NotificationPort for SmtpNotificationPort {
    async fn send(
        &self,
        recipient: &Recipient,
        reminder: &RenderedReminder,
    ) -> Result<(), TransportError> {
        let message = self.build_message(recipient, reminder)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        tracing::debug!(channel = "smtp", to = %recipient.email, subject = %reminder.subject, "Email delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "smtp"
    }
}
