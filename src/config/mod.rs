//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `RENEWAL_REMINDERS`
//! prefix and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use renewal_reminders::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod reminders;
mod server;

pub use database::DatabaseConfig;
pub use email::{EmailConfig, SmtpTls};
pub use error::{ConfigError, ValidationError};
pub use reminders::RemindersConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, log level)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Email configuration (SMTP relay)
    pub email: EmailConfig,

    /// Reminder schedule and run tuning
    #[serde(default)]
    pub reminders: RemindersConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RENEWAL_REMINDERS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `RENEWAL_REMINDERS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RENEWAL_REMINDERS__EMAIL__SMTP_HOST=...` -> `email.smtp_host = ...`
    /// - `RENEWAL_REMINDERS__REMINDERS__TIMEZONE=Europe/Berlin`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RENEWAL_REMINDERS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.email.validate()?;
        self.reminders.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
