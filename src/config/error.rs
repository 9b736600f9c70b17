//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("SMTP username and password must be set together")]
    IncompleteSmtpCredentials,

    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),

    #[error("Schedule time must be within 00:00-23:59")]
    InvalidScheduleTime,

    #[error("Look-ahead window must be between 1 and 365 days")]
    InvalidLookahead,

    #[error("max_concurrent_dispatches must be between 1 and 1024")]
    InvalidConcurrency,
}
