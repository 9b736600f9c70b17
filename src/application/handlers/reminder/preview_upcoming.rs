//! PreviewUpcomingRemindersHandler - Query handler for an owner's upcoming reminders.
//!
//! Read-only: nothing is dispatched and the ledger is not consulted. Each
//! candidate is run through the same [`ReminderEvaluator`] the runner uses,
//! evaluated as of its own reminder date, so a previewed reminder is exactly
//! one the runner would send on that day.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::foundation::UserId;
use crate::domain::reminder::{RepositoryError, ReminderEvaluator};
use crate::domain::subscription::Subscription;
use crate::ports::{Clock, SubscriptionRepository};

/// Window used when the caller does not give one.
pub const DEFAULT_PREVIEW_WINDOW_DAYS: u32 = 7;

/// Largest accepted window; larger requests are clamped.
pub const MAX_PREVIEW_WINDOW_DAYS: u32 = 365;

/// Query for one owner's reminders due within the next `window_days`.
#[derive(Debug, Clone)]
pub struct PreviewUpcomingRemindersQuery {
    pub owner_id: UserId,
    pub window_days: u32,
}

impl PreviewUpcomingRemindersQuery {
    pub fn new(owner_id: UserId, window_days: Option<u32>) -> Self {
        Self {
            owner_id,
            window_days: window_days
                .unwrap_or(DEFAULT_PREVIEW_WINDOW_DAYS)
                .min(MAX_PREVIEW_WINDOW_DAYS),
        }
    }
}

/// A reminder that will be sent on `reminder_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingReminder {
    pub subscription: Subscription,
    pub reminder_date: NaiveDate,
    /// 0 when the reminder goes out today.
    pub days_until_reminder: i64,
    pub days_until_renewal: i64,
}

/// Handler for previewing upcoming reminders.
pub struct PreviewUpcomingRemindersHandler {
    clock: Arc<dyn Clock>,
    repository: Arc<dyn SubscriptionRepository>,
    evaluator: ReminderEvaluator,
}

impl PreviewUpcomingRemindersHandler {
    pub fn new(
        clock: Arc<dyn Clock>,
        repository: Arc<dyn SubscriptionRepository>,
        evaluator: ReminderEvaluator,
    ) -> Self {
        Self {
            clock,
            repository,
            evaluator,
        }
    }

    pub async fn handle(
        &self,
        query: PreviewUpcomingRemindersQuery,
    ) -> Result<Vec<UpcomingReminder>, RepositoryError> {
        let today = self.clock.today();
        let window = query.window_days.min(MAX_PREVIEW_WINDOW_DAYS);
        let window_end = today
            .checked_add_days(Days::new(u64::from(window)))
            .unwrap_or(NaiveDate::MAX);
        // A renewal can sit at most `lookahead_days` past its reminder date.
        let renewal_until = window_end
            .checked_add_days(Days::new(u64::from(self.evaluator.lookahead_days())))
            .unwrap_or(NaiveDate::MAX);

        let candidates = self
            .repository
            .find_remindable_for_owner(&query.owner_id, today, renewal_until)
            .await?;

        let mut upcoming: Vec<UpcomingReminder> = candidates
            .into_iter()
            .filter_map(|subscription| self.upcoming(subscription, today, window_end))
            .collect();

        upcoming.sort_by(|a, b| {
            a.reminder_date
                .cmp(&b.reminder_date)
                .then_with(|| a.subscription.name.cmp(&b.subscription.name))
        });

        tracing::debug!(
            owner_id = %query.owner_id,
            window_days = window,
            count = upcoming.len(),
            "Previewed upcoming reminders"
        );

        Ok(upcoming)
    }

    fn upcoming(
        &self,
        subscription: Subscription,
        today: NaiveDate,
        window_end: NaiveDate,
    ) -> Option<UpcomingReminder> {
        let reminder_date = ReminderEvaluator::reminder_date(&subscription)?;
        if reminder_date < today || reminder_date > window_end {
            return None;
        }

        let decision = self.evaluator.evaluate(subscription, reminder_date);
        if !decision.should_send {
            return None;
        }

        Some(UpcomingReminder {
            days_until_reminder: (reminder_date - today).num_days(),
            days_until_renewal: (decision.subscription.next_renewal_date - today).num_days(),
            reminder_date,
            subscription: decision.subscription,
        })
    }
}
