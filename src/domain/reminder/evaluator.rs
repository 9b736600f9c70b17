//! ReminderEvaluator - decides whether a subscription is due a reminder today.
//!
//! The evaluator is a pure function of the subscription and a calendar date.
//! Time zone resolution happens before it is called.
//!
//! A subscription matches iff all of:
//! - it is active and has reminders enabled
//! - its renewal date is not in the past
//! - its renewal date is at most `lookahead_days` away
//! - `next_renewal_date - reminder_days_before == today`
//!
//! The look-ahead bound is also pushed down into the repository query; it is
//! re-checked here so stale or skewed candidates never match.

use chrono::{Days, NaiveDate};

use crate::domain::subscription::Subscription;

/// Default look-ahead window in days.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 30;

/// Verdict for one subscription on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDecision {
    pub subscription: Subscription,
    pub should_send: bool,
    /// `next_renewal_date - reminder_days_before`.
    ///
    /// `NaiveDate::MIN` when the subtraction leaves the calendar range; such
    /// decisions never match.
    pub reminder_date: NaiveDate,
    /// Signed whole days from `today` to the renewal.
    pub days_until_renewal: i64,
}

/// Matches subscriptions against a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderEvaluator {
    lookahead_days: u32,
}

impl Default for ReminderEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD_DAYS)
    }
}

impl ReminderEvaluator {
    pub fn new(lookahead_days: u32) -> Self {
        Self { lookahead_days }
    }

    pub fn lookahead_days(&self) -> u32 {
        self.lookahead_days
    }

    /// The single day on which a reminder for `subscription` is due.
    pub fn reminder_date(subscription: &Subscription) -> Option<NaiveDate> {
        subscription
            .next_renewal_date
            .checked_sub_days(Days::new(u64::from(subscription.reminder_days_before)))
    }

    /// Evaluate a subscription against `today`.
    pub fn evaluate(&self, subscription: Subscription, today: NaiveDate) -> ReminderDecision {
        let should_send = self.matches(&subscription, today);
        let reminder_date = Self::reminder_date(&subscription).unwrap_or(NaiveDate::MIN);
        let days_until_renewal = (subscription.next_renewal_date - today).num_days();

        ReminderDecision {
            subscription,
            should_send,
            reminder_date,
            days_until_renewal,
        }
    }

    /// Borrowing form of [`evaluate`](Self::evaluate) returning only the verdict.
    pub fn matches(&self, subscription: &Subscription, today: NaiveDate) -> bool {
        if !subscription.is_remindable() {
            return false;
        }

        let days_until = (subscription.next_renewal_date - today).num_days();
        if days_until < 0 || days_until > i64::from(self.lookahead_days) {
            return false;
        }

        Self::reminder_date(subscription) == Some(today)
    }
}
