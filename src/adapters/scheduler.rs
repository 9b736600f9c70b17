//! DailyReminderScheduler - fires one reminder run per calendar day.
//!
//! The scheduler only decides *when* to run. Matching, dispatch and stats all
//! belong to [`ReminderRunner`]; the scheduler just logs what a run returns.
//!
//! ## Timing
//!
//! Each iteration computes the delay to the next `hour:minute` in the
//! configured time zone and sleeps for it. Recomputing every day keeps the run
//! on local wall-clock time across DST changes. A local time that does not
//! exist (spring-forward gap) runs at the first instant after the gap; an
//! ambiguous one (fall-back) runs at the earlier instant.
//!
//! ## Shutdown
//!
//! The loop exits when the watch channel flips to `true` or its sender is
//! dropped. A run in progress receives the same channel and is interrupted.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;

use crate::application::ReminderRunner;
use crate::domain::reminder::ReminderStats;

/// Local wall-clock time of the daily run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub timezone: Tz,
    pub at: NaiveTime,
}

impl DailySchedule {
    /// Returns `None` for an hour or minute out of range.
    pub fn new(timezone: Tz, hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|at| Self { timezone, at })
    }

    /// The first scheduled instant strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_today = now.with_timezone(&self.timezone).date_naive();

        let mut date = local_today;
        loop {
            let candidate = self.instant_on(date);
            if candidate > now {
                return candidate;
            }
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => return candidate,
            };
        }
    }

    /// Like [`next_run_after`](Self::next_run_after), but never on or before
    /// the local date `last_run`, so a wall clock stepping backwards cannot
    /// repeat a day.
    pub fn next_run(&self, now: DateTime<Utc>, last_run: Option<NaiveDate>) -> DateTime<Utc> {
        let mut candidate = self.next_run_after(now);
        if let Some(last_run) = last_run {
            while self.local_date(candidate) <= last_run {
                let next = self.next_run_after(candidate);
                if next <= candidate {
                    break;
                }
                candidate = next;
            }
        }
        candidate
    }

    /// Local calendar date of `instant` in the schedule's time zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    fn instant_on(&self, date: NaiveDate) -> DateTime<Utc> {
        let mut local = date.and_time(self.at);
        // DST gaps are at most a few hours; step past them a minute at a time.
        for _ in 0..=(24 * 60) {
            match self.timezone.from_local_datetime(&local) {
                LocalResult::Single(t) => return t.with_timezone(&Utc),
                LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
                LocalResult::None => local += chrono::Duration::minutes(1),
            }
        }
        Utc.from_utc_datetime(&date.and_time(self.at))
    }
}

/// Runs the reminder runner once a day until shutdown.
pub struct DailyReminderScheduler {
    runner: Arc<ReminderRunner>,
    schedule: DailySchedule,
}

impl DailyReminderScheduler {
    pub fn new(runner: Arc<ReminderRunner>, schedule: DailySchedule) -> Self {
        Self { runner, schedule }
    }

    /// Loop until `shutdown` becomes `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            timezone = %self.schedule.timezone,
            at = %self.schedule.at,
            "Daily reminder scheduler started"
        );

        let mut last_run: Option<NaiveDate> = None;
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let now = Utc::now();
            let next_run = self.schedule.next_run(now, last_run);
            let delay = (next_run - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(next_run = %next_run, delay_secs = delay.as_secs(), "Next reminder run scheduled");

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    // Re-check the value at the top of the loop.
                }
                _ = tokio::time::sleep(delay) => {
                    last_run = Some(self.schedule.local_date(next_run));
                    self.run_once(shutdown.clone()).await;
                }
            }
        }

        tracing::info!("Daily reminder scheduler stopped");
    }

    /// Execute one run and log its outcome.
    pub async fn run_once(&self, shutdown: watch::Receiver<bool>) -> Option<ReminderStats> {
        match self.runner.run_with_shutdown(shutdown).await {
            Ok(stats) => {
                for error in stats.errors() {
                    tracing::error!(run_date = %stats.run_date(), error = %error, "Reminder dispatch failed");
                }
                tracing::info!(
                    run_date = %stats.run_date(),
                    checked = stats.checked(),
                    sent = stats.sent(),
                    failed = stats.failed(),
                    skipped = stats.skipped(),
                    interrupted = stats.interrupted(),
                    "Scheduled reminder run finished"
                );
                Some(stats)
            }
            Err(e) => {
                tracing::error!(error = %e, "Scheduled reminder run failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory::{
        InMemorySubscriptionRepository, InMemoryUserLookup, RecordingNotifier,
    };
    use crate::adapters::email::MiniJinjaReminderRenderer;
    use chrono_tz::{America, Europe};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn nine_am(tz: Tz) -> DailySchedule {
        DailySchedule::new(tz, 9, 0).unwrap()
    }

    #[test]
    fn rejects_out_of_range_time() {
        assert!(DailySchedule::new(Tz::UTC, 24, 0).is_none());
        assert!(DailySchedule::new(Tz::UTC, 9, 60).is_none());
    }

    #[test]
    fn runs_later_today_when_time_not_reached() {
        let schedule = nine_am(Tz::UTC);
        let now = utc(2025, 3, 1, 8, 30);

        assert_eq!(schedule.next_run_after(now), utc(2025, 3, 1, 9, 0));
        assert_eq!(schedule.next_run(now, None), utc(2025, 3, 1, 9, 0));
    }

    #[test]
    fn runs_tomorrow_once_time_has_passed() {
        let schedule = nine_am(Tz::UTC);

        assert_eq!(schedule.next_run_after(utc(2025, 3, 1, 9, 0)), utc(2025, 3, 2, 9, 0));
        assert_eq!(schedule.next_run_after(utc(2025, 12, 31, 23, 0)), utc(2026, 1, 1, 9, 0));
    }

    #[test]
    fn clock_stepping_back_does_not_repeat_a_day() {
        let schedule = nine_am(Tz::UTC);
        let ran_on = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        // The 09:00 run already happened, then the wall clock jumped back to 08:30.
        let now = utc(2025, 3, 1, 8, 30);
        assert_eq!(schedule.next_run(now, Some(ran_on)), utc(2025, 3, 2, 9, 0));

        // A clock that jumped back across midnight skips to the day after the last run.
        let now = utc(2025, 2, 28, 23, 0);
        assert_eq!(schedule.next_run(now, Some(ran_on)), utc(2025, 3, 2, 9, 0));
    }

    #[test]
    fn earlier_last_run_does_not_delay_schedule() {
        let schedule = nine_am(Europe::Berlin);
        let ran_on = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();

        assert_eq!(
            schedule.next_run(utc(2025, 1, 15, 7, 0), Some(ran_on)),
            utc(2025, 1, 15, 8, 0)
        );
        assert_eq!(schedule.local_date(utc(2025, 1, 15, 23, 30)), NaiveDate::from_ymd_opt(2025, 1, 16).unwrap());
    }

    #[test]
    fn respects_time_zone() {
        // 09:00 in Berlin during winter is 08:00 UTC.
        let schedule = nine_am(Europe::Berlin);
        assert_eq!(schedule.next_run_after(utc(2025, 1, 15, 7, 0)), utc(2025, 1, 15, 8, 0));

        // 23:30 UTC is already the next local day in Berlin.
        assert_eq!(schedule.next_run_after(utc(2025, 1, 15, 23, 30)), utc(2025, 1, 16, 8, 0));
    }

    #[test]
    fn follows_local_time_across_dst() {
        let schedule = nine_am(America::New_York);

        // EST (UTC-5) before the 2025-03-09 switch, EDT (UTC-4) after.
        assert_eq!(schedule.next_run_after(utc(2025, 3, 8, 15, 0)), utc(2025, 3, 9, 13, 0));
        assert_eq!(schedule.next_run_after(utc(2025, 3, 7, 15, 0)), utc(2025, 3, 8, 14, 0));
    }

    #[test]
    fn nonexistent_local_time_runs_after_gap() {
        // 02:30 does not exist in New York on 2025-03-09; clocks jump to 03:00 EDT.
        let schedule = DailySchedule::new(America::New_York, 2, 30).unwrap();
        assert_eq!(schedule.next_run_after(utc(2025, 3, 9, 5, 0)), utc(2025, 3, 9, 7, 0));
    }

    #[test]
    fn ambiguous_local_time_runs_at_earlier_instant() {
        // 01:30 happens twice in New York on 2025-11-02; the first is EDT (UTC-4).
        let schedule = DailySchedule::new(America::New_York, 1, 30).unwrap();
        assert_eq!(schedule.next_run_after(utc(2025, 11, 2, 4, 0)), utc(2025, 11, 2, 5, 30));
    }

    fn scheduler() -> DailyReminderScheduler {
        let runner = ReminderRunner::new(
            Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 2, 26).unwrap())),
            Arc::new(InMemorySubscriptionRepository::new()),
            Arc::new(InMemoryUserLookup::new()),
            Arc::new(MiniJinjaReminderRenderer::new().unwrap()),
            Arc::new(RecordingNotifier::new()),
        );
        DailyReminderScheduler::new(Arc::new(runner), nine_am(Tz::UTC))
    }

    #[tokio::test]
    async fn run_once_returns_stats() {
        let (_tx, rx) = watch::channel(false);

        let stats = scheduler().run_once(rx).await.unwrap();

        assert_eq!(stats.checked(), 0);
        assert!(stats.is_complete_success());
    }

    #[tokio::test]
    async fn stops_on_shutdown_signal() {
        let scheduler = scheduler();
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(rx).await });
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn stops_when_sender_dropped() {
        let scheduler = scheduler();
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(rx).await });
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
