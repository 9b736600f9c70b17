//! ReminderStats - the auditable summary of one reminder run.
//!
//! Stats are built by a single owner ([`StatsAccumulator`]) while outcomes
//! arrive, then frozen into a [`ReminderStats`] value that exposes no
//! mutators.

use chrono::NaiveDate;
use serde::Serialize;

use super::ReminderOutcome;

/// Immutable result of one reminder run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderStats {
    run_date: NaiveDate,
    checked: u32,
    sent: u32,
    failed: u32,
    skipped: u32,
    interrupted: bool,
    errors: Vec<String>,
}

impl ReminderStats {
    /// The "today" the run evaluated against.
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// Candidates returned by the repository, matched or not.
    pub fn checked(&self) -> u32 {
        self.checked
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    /// Matched reminders the ledger reported as already delivered.
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// The run was cut short by a timeout or shutdown.
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// One line per failed subscription, in arrival order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of candidates that matched today.
    pub fn matched(&self) -> u32 {
        self.sent + self.failed + self.skipped
    }

    /// No failures and not interrupted.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }
}

/// Single-owner builder for [`ReminderStats`].
#[derive(Debug)]
pub struct StatsAccumulator {
    stats: ReminderStats,
}

impl StatsAccumulator {
    pub fn new(run_date: NaiveDate, checked: u32) -> Self {
        Self {
            stats: ReminderStats {
                run_date,
                checked,
                sent: 0,
                failed: 0,
                skipped: 0,
                interrupted: false,
                errors: Vec::new(),
            },
        }
    }

    pub fn record(&mut self, outcome: ReminderOutcome) {
        if outcome.is_failure() {
            self.stats.failed += 1;
            self.stats.errors.push(
                outcome
                    .error
                    .unwrap_or_else(|| format!("{}: unknown failure", outcome.subscription_id)),
            );
        } else if outcome.sent {
            self.stats.sent += 1;
        } else {
            self.stats.skipped += 1;
        }
    }

    pub fn mark_interrupted(&mut self) {
        self.stats.interrupted = true;
    }

    pub fn finish(self) -> ReminderStats {
        self.stats
    }
}
