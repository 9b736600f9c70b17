//! Reminder run and schedule configuration

use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_LOOKAHEAD_DAYS: u32 = 365;
const MAX_CONCURRENT_DISPATCHES: usize = 1024;

/// When the daily run fires and how a run behaves
#[derive(Debug, Clone, Deserialize)]
pub struct RemindersConfig {
    /// IANA time zone that defines "today" and the schedule
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_schedule_hour")]
    pub schedule_hour: u32,

    #[serde(default)]
    pub schedule_minute: u32,

    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,

    #[serde(default = "default_max_concurrent_dispatches")]
    pub max_concurrent_dispatches: usize,

    /// Abort a run after this many seconds; 0 disables the limit
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub scheduler_enabled: bool,

    /// Claim reminders in `reminder_dispatches` before sending
    #[serde(default)]
    pub ledger_enabled: bool,
}

impl RemindersConfig {
    /// Parsed time zone
    pub fn tz(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .parse()
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }

    /// Validate reminder configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tz()?;
        if self.schedule_hour > 23 || self.schedule_minute > 59 {
            return Err(ValidationError::InvalidScheduleTime);
        }
        if self.lookahead_days == 0 || self.lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(ValidationError::InvalidLookahead);
        }
        if self.max_concurrent_dispatches == 0
            || self.max_concurrent_dispatches > MAX_CONCURRENT_DISPATCHES
        {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            schedule_hour: default_schedule_hour(),
            schedule_minute: 0,
            lookahead_days: default_lookahead_days(),
            max_concurrent_dispatches: default_max_concurrent_dispatches(),
            run_timeout_secs: default_run_timeout(),
            scheduler_enabled: true,
            ledger_enabled: false,
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_schedule_hour() -> u32 {
    9
}

fn default_lookahead_days() -> u32 {
    30
}

fn default_max_concurrent_dispatches() -> usize {
    8
}

fn default_run_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
