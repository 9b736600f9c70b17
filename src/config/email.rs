//! Email configuration (SMTP)

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS
    #[default]
    Starttls,
    /// TLS from the first byte (usually port 465)
    Implicit,
    /// No TLS; local relays and test servers only
    None,
}

/// SMTP relay and sender identity
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    pub smtp_username: Option<String>,

    pub smtp_password: Option<SecretString>,

    #[serde(default)]
    pub tls: SmtpTls,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.smtp_host.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__SMTP_HOST"));
        }
        if self.smtp_port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.smtp_username.is_some() != self.smtp_password.is_some() {
            return Err(ValidationError::IncompleteSmtpCredentials);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            tls: SmtpTls::default(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_email() -> String {
    "reminders@localhost".to_string()
}

fn default_from_name() -> String {
    "Subscription Reminders".to_string()
}
