//! ReminderRunner - Command handler for one reminder pass.
//!
//! A run:
//! 1. Reads "today" from the [`Clock`]
//! 2. Fetches candidates from the [`SubscriptionRepository`] (fatal on failure)
//! 3. Evaluates each candidate with the [`ReminderEvaluator`]
//! 4. Fans out one task per matched subscription: lookup, render, send
//! 5. Fans outcomes back in to a single [`StatsAccumulator`]
//!
//! Dispatches are isolated from each other. A failing, panicking or
//! cancelled dispatch is recorded against its own subscription and never
//! affects a sibling. In-flight dispatches are bounded by a semaphore.
//!
//! ## Cancellation
//!
//! When the configured timeout elapses or the shutdown channel flips to
//! `true`, in-flight tasks are aborted. Each matched subscription whose
//! dispatch did not finish is counted as failed with a cancellation error and
//! the stats are marked interrupted, so `sent + failed + skipped` always
//! equals the number of matched candidates.
//!
//! ## Idempotency
//!
//! Without a [`DispatchLedger`] the runner relies on the caller triggering at
//! most one run per calendar day. With a ledger, each reminder is claimed
//! before dispatch and already-claimed reminders are skipped.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinError;
use tokio::time::Instant;

use crate::domain::foundation::SubscriptionId;
use crate::domain::reminder::{
    DispatchError, ReminderDecision, ReminderEvaluator, ReminderKey, ReminderOutcome,
    ReminderRunError, ReminderStats, StatsAccumulator, DEFAULT_LOOKAHEAD_DAYS,
};
use crate::ports::{
    Clock, DispatchLedger, NotificationPort, ReminderContext, ReminderRenderer,
    SubscriptionRepository, UserLookup,
};

/// Tuning for a reminder run.
#[derive(Debug, Clone)]
pub struct ReminderRunnerConfig {
    /// Look-ahead window for candidates and matching.
    pub lookahead_days: u32,

    /// Upper bound on concurrently running dispatches.
    pub max_concurrent_dispatches: usize,

    /// Abort the dispatch phase after this long.
    pub run_timeout: Option<Duration>,
}

impl Default for ReminderRunnerConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            max_concurrent_dispatches: 8,
            run_timeout: None,
        }
    }
}

impl ReminderRunnerConfig {
    pub fn with_lookahead_days(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }

    pub fn with_max_concurrent_dispatches(mut self, max: usize) -> Self {
        self.max_concurrent_dispatches = max;
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }
}

/// Matches today's reminders and dispatches them.
///
/// Holds no state between runs; every collaborator is injected.
pub struct ReminderRunner {
    clock: Arc<dyn Clock>,
    repository: Arc<dyn SubscriptionRepository>,
    dispatcher: ReminderDispatcher,
    config: ReminderRunnerConfig,
}

impl ReminderRunner {
    pub fn new(
        clock: Arc<dyn Clock>,
        repository: Arc<dyn SubscriptionRepository>,
        user_lookup: Arc<dyn UserLookup>,
        renderer: Arc<dyn ReminderRenderer>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            clock,
            repository,
            dispatcher: ReminderDispatcher {
                user_lookup,
                renderer,
                notifier,
                ledger: None,
            },
            config: ReminderRunnerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReminderRunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Claim each reminder in `ledger` before dispatching it.
    pub fn with_ledger(mut self, ledger: Arc<dyn DispatchLedger>) -> Self {
        self.dispatcher.ledger = Some(ledger);
        self
    }

    pub fn config(&self) -> &ReminderRunnerConfig {
        &self.config
    }

    /// Run once, bounded only by the configured timeout.
    pub async fn run(&self) -> Result<ReminderStats, ReminderRunError> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.run_with_shutdown(shutdown_rx).await
    }

    /// Run once, stopping early if `shutdown` becomes `true`.
    ///
    /// The timeout and the shutdown signal cover the candidate fetch as well
    /// as the dispatch phase. Stopped during the fetch, the run returns
    /// interrupted stats with nothing checked.
    ///
    /// # Errors
    ///
    /// `ReminderRunError::Fetch` if the candidate query fails. Per-subscription
    /// failures are reported in the returned stats instead.
    pub async fn run_with_shutdown(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<ReminderStats, ReminderRunError> {
        let today = self.clock.today();
        let evaluator = ReminderEvaluator::new(self.config.lookahead_days);

        let deadline = tokio::time::sleep_until(match self.config.run_timeout {
            Some(timeout) => Instant::now() + timeout,
            None => far_future(),
        });
        tokio::pin!(deadline);

        let shutdown_requested = wait_for_shutdown(&mut shutdown);
        tokio::pin!(shutdown_requested);

        let fetched = tokio::select! {
            result = self.repository.find_remindable(today, evaluator.lookahead_days()) => result,
            _ = &mut deadline => {
                tracing::warn!(run_date = %today, "Reminder run timed out while fetching candidates");
                return Ok(interrupted_before_dispatch(today));
            }
            _ = &mut shutdown_requested => {
                tracing::warn!(run_date = %today, "Shutdown requested while fetching candidates");
                return Ok(interrupted_before_dispatch(today));
            }
        };
        let candidates = fetched.map_err(|e| {
            tracing::error!(run_date = %today, error = %e, "Failed to fetch reminder candidates");
            ReminderRunError::Fetch(e)
        })?;

        let checked = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        let matched: Vec<ReminderDecision> = candidates
            .into_iter()
            .map(|subscription| evaluator.evaluate(subscription, today))
            .filter(|decision| decision.should_send)
            .collect();

        tracing::info!(
            run_date = %today,
            checked,
            matched = matched.len(),
            "Starting reminder dispatch"
        );

        let mut stats = StatsAccumulator::new(today, checked);
        if matched.is_empty() {
            return Ok(stats.finish());
        }

        let permits = Arc::new(Semaphore::new(
            self.config
                .max_concurrent_dispatches
                .clamp(1, Semaphore::MAX_PERMITS),
        ));
        let mut pending = FuturesUnordered::new();
        let mut abort_handles = Vec::with_capacity(matched.len());

        for decision in matched {
            let subscription_id = decision.subscription.id;
            let name = decision.subscription.name.clone();
            let dispatcher = self.dispatcher.clone();
            let permits = Arc::clone(&permits);

            let handle = tokio::spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await.ok();
                dispatcher.dispatch(decision).await
            });
            abort_handles.push(handle.abort_handle());
            pending.push(async move { (subscription_id, name, handle.await) });
        }

        let mut interrupted = false;
        loop {
            tokio::select! {
                next = pending.next() => match next {
                    Some((subscription_id, name, joined)) => {
                        stats.record(into_outcome(subscription_id, &name, joined));
                    }
                    None => break,
                },
                _ = &mut deadline => {
                    tracing::warn!(run_date = %today, "Reminder run timed out; aborting in-flight dispatches");
                    interrupted = true;
                    break;
                }
                _ = &mut shutdown_requested => {
                    tracing::warn!(run_date = %today, "Shutdown requested; aborting in-flight dispatches");
                    interrupted = true;
                    break;
                }
            }
        }

        if interrupted {
            for handle in &abort_handles {
                handle.abort();
            }
            // Tasks that finished before the abort keep their real outcome.
            while let Some((subscription_id, name, joined)) = pending.next().await {
                stats.record(into_outcome(subscription_id, &name, joined));
            }
            stats.mark_interrupted();
        }

        let stats = stats.finish();
        tracing::info!(
            run_date = %today,
            checked = stats.checked(),
            sent = stats.sent(),
            failed = stats.failed(),
            skipped = stats.skipped(),
            interrupted = stats.interrupted(),
            "Reminder run completed"
        );

        Ok(stats)
    }
}

/// Collaborators needed to dispatch one reminder. Cheap to clone.
#[derive(Clone)]
struct ReminderDispatcher {
    user_lookup: Arc<dyn UserLookup>,
    renderer: Arc<dyn ReminderRenderer>,
    notifier: Arc<dyn NotificationPort>,
    ledger: Option<Arc<dyn DispatchLedger>>,
}

impl ReminderDispatcher {
    async fn dispatch(self, decision: ReminderDecision) -> ReminderOutcome {
        let subscription_id = decision.subscription.id;
        let key = ReminderKey::new(subscription_id, decision.reminder_date);

        if let Some(ledger) = &self.ledger {
            match ledger.claim(&key).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(reminder = %key, "Reminder already dispatched; skipping");
                    return ReminderOutcome::already_sent(subscription_id);
                }
                Err(e) => {
                    let error = DispatchError::from(e);
                    tracing::warn!(reminder = %key, error = %error, "Reminder dispatch failed");
                    return ReminderOutcome::failed(subscription_id, &decision.subscription.name, &error);
                }
            }
        }

        match self.deliver(&decision).await {
            Ok(()) => {
                tracing::info!(
                    subscription_id = %subscription_id,
                    channel = self.notifier.channel_name(),
                    days_until_renewal = decision.days_until_renewal,
                    "Reminder sent"
                );
                ReminderOutcome::sent(subscription_id)
            }
            Err(error) => {
                if let Some(ledger) = &self.ledger {
                    if let Err(e) = ledger.release(&key).await {
                        tracing::warn!(reminder = %key, error = %e, "Failed to release reminder claim");
                    }
                }
                tracing::warn!(
                    subscription_id = %subscription_id,
                    error = %error,
                    transient = error.is_transient(),
                    "Reminder dispatch failed"
                );
                ReminderOutcome::failed(subscription_id, &decision.subscription.name, &error)
            }
        }
    }

    async fn deliver(&self, decision: &ReminderDecision) -> Result<(), DispatchError> {
        let recipient = self
            .user_lookup
            .resolve(&decision.subscription.owner_id)
            .await?;
        let content = self
            .renderer
            .render(&ReminderContext::new(decision, &recipient))?;
        self.notifier.send(&recipient, &content).await?;
        Ok(())
    }
}

/// Stats for a run stopped before any candidate was fetched.
fn interrupted_before_dispatch(run_date: NaiveDate) -> ReminderStats {
    let mut stats = StatsAccumulator::new(run_date, 0);
    stats.mark_interrupted();
    stats.finish()
}

fn into_outcome(
    subscription_id: SubscriptionId,
    name: &str,
    joined: Result<ReminderOutcome, JoinError>,
) -> ReminderOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_cancelled() => {
            ReminderOutcome::failed(subscription_id, name, &DispatchError::Cancelled)
        }
        Err(e) => {
            tracing::error!(subscription_id = %subscription_id, error = %e, "Reminder dispatch task panicked");
            ReminderOutcome::failed(subscription_id, name, &DispatchError::Panicked)
        }
    }
}

/// Resolves once `shutdown` holds `true`. Never resolves if the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn far_future() -> Instant {
    // Roughly 30 years; `Instant` has no MAX.
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}
