//! Integration tests for a full reminder run over the in-memory adapters.
//!
//! These tests drive the runner end to end:
//! 1. Candidates come from the repository and are matched against "today"
//! 2. Matched reminders are rendered with the real templates
//! 3. Delivery failures stay isolated to their subscription
//! 4. The dispatch ledger prevents a second send on the same day

use chrono::NaiveDate;
use std::sync::Arc;

use renewal_reminders::adapters::{
    FixedClock, InMemoryDispatchLedger, InMemorySubscriptionRepository, InMemoryUserLookup,
    MiniJinjaReminderRenderer, RecordingNotifier,
};
use renewal_reminders::application::{ReminderRunner, ReminderRunnerConfig};
use renewal_reminders::domain::foundation::{SubscriptionId, UserId};
use renewal_reminders::domain::reminder::ReminderKey;
use renewal_reminders::domain::subscription::{BillingCycle, Subscription};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 2, 26)
}

fn subscription(owner: &str, name: &str, renewal: NaiveDate, days_before: u32) -> Subscription {
    Subscription {
        id: SubscriptionId::new(),
        owner_id: UserId::new(owner).unwrap(),
        name: name.to_string(),
        amount: 9.99,
        currency: "EUR".to_string(),
        billing_cycle: BillingCycle::Yearly,
        category: Some("Software".to_string()),
        website_url: Some("https://example.com/billing".to_string()),
        next_renewal_date: renewal,
        is_active: true,
        reminder_enabled: true,
        reminder_days_before: days_before,
    }
}

struct Fixture {
    repository: Arc<InMemorySubscriptionRepository>,
    users: Arc<InMemoryUserLookup>,
    notifier: Arc<RecordingNotifier>,
    ledger: Arc<InMemoryDispatchLedger>,
}

impl Fixture {
    fn new(subscriptions: Vec<Subscription>) -> Self {
        let users = InMemoryUserLookup::new();
        users.add_user(UserId::new("ada").unwrap(), "ada@example.com", Some("Ada"));
        users.add_user(UserId::new("grace").unwrap(), "grace@example.com", Some("Grace"));

        Self {
            repository: Arc::new(InMemorySubscriptionRepository::with_subscriptions(
                subscriptions,
            )),
            users: Arc::new(users),
            notifier: Arc::new(RecordingNotifier::new()),
            ledger: Arc::new(InMemoryDispatchLedger::new()),
        }
    }

    fn runner(&self) -> ReminderRunner {
        ReminderRunner::new(
            Arc::new(FixedClock::new(today())),
            self.repository.clone(),
            self.users.clone(),
            Arc::new(MiniJinjaReminderRenderer::new().unwrap()),
            self.notifier.clone(),
        )
        .with_config(ReminderRunnerConfig::default().with_max_concurrent_dispatches(4))
    }

    fn runner_with_ledger(&self) -> ReminderRunner {
        self.runner().with_ledger(self.ledger.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn sends_rendered_email_to_owner() {
    let sub = subscription("ada", "Spotify", date(2025, 3, 3), 5);
    let fixture = Fixture::new(vec![sub]);

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.checked(), 1);
    assert_eq!(stats.sent(), 1);
    assert!(stats.is_complete_success());

    let delivered = fixture.notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].recipient.email, "ada@example.com");
    assert_eq!(delivered[0].reminder.subject, "Reminder: Spotify renews in 5 days");
    assert!(delivered[0].reminder.text_body.contains("Hello Ada,"));
    assert!(delivered[0].reminder.text_body.contains("EUR 9.99"));
    assert!(delivered[0].reminder.text_body.contains("March 03, 2025"));
}

#[tokio::test]
async fn ignores_ineligible_and_unmatched_subscriptions() {
    let inactive = Subscription {
        is_active: false,
        ..subscription("ada", "Old", date(2025, 3, 3), 5)
    };
    let muted = Subscription {
        reminder_enabled: false,
        ..subscription("ada", "Muted", date(2025, 3, 3), 5)
    };
    let later = subscription("ada", "Later", date(2025, 3, 4), 5);
    let due = subscription("grace", "Due", date(2025, 2, 27), 1);
    let fixture = Fixture::new(vec![inactive, muted, later, due]);

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.sent(), 1);
    assert_eq!(stats.failed(), 0);
    let delivered = fixture.notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].recipient.email, "grace@example.com");
    assert_eq!(delivered[0].reminder.subject, "Reminder: Due renews in 1 day");
}

#[tokio::test]
async fn zero_lead_time_reminds_on_renewal_day() {
    let fixture = Fixture::new(vec![subscription("ada", "Today", today(), 0)]);

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.sent(), 1);
    assert_eq!(
        fixture.notifier.delivered()[0].reminder.subject,
        "Reminder: Today renews today"
    );
}

#[tokio::test]
async fn rejected_address_does_not_block_other_owners() {
    let fixture = Fixture::new(vec![
        subscription("ada", "Spotify", date(2025, 3, 3), 5),
        subscription("grace", "Netflix", date(2025, 3, 3), 5),
    ]);
    fixture.notifier.reject_address("ada@example.com");

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.sent(), 1);
    assert_eq!(stats.failed(), 1);
    assert_eq!(stats.errors().len(), 1);
    assert!(stats.errors()[0].contains("Spotify"));
    assert!(!stats.is_complete_success());
}

#[tokio::test]
async fn unknown_owner_is_a_per_subscription_failure() {
    let fixture = Fixture::new(vec![
        subscription("nobody", "Orphan", date(2025, 3, 3), 5),
        subscription("ada", "Spotify", date(2025, 3, 3), 5),
    ]);

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.sent(), 1);
    assert_eq!(stats.failed(), 1);
    assert!(stats.errors()[0].contains("Orphan"));
}

#[tokio::test]
async fn owner_without_email_is_a_per_subscription_failure() {
    let fixture = Fixture::new(vec![subscription("hidden", "Spotify", date(2025, 3, 3), 5)]);
    fixture.users.add_user_without_email(UserId::new("hidden").unwrap());

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.sent(), 0);
    assert_eq!(stats.failed(), 1);
    assert!(fixture.notifier.delivered().is_empty());
}

#[tokio::test]
async fn unavailable_repository_fails_the_run() {
    let fixture = Fixture::new(vec![]);
    fixture.repository.set_unavailable(Some("connection refused"));

    let result = fixture.runner().run().await;

    assert!(result.is_err());
    assert!(fixture.notifier.delivered().is_empty());
}

#[tokio::test]
async fn ledger_prevents_second_send_on_same_day() {
    let sub = subscription("ada", "Spotify", date(2025, 3, 3), 5);
    let key = ReminderKey::new(sub.id, date(2025, 2, 26));
    let fixture = Fixture::new(vec![sub]);

    let first = fixture.runner_with_ledger().run().await.unwrap();
    let second = fixture.runner_with_ledger().run().await.unwrap();

    assert_eq!(first.sent(), 1);
    assert_eq!(second.sent(), 0);
    assert_eq!(second.skipped(), 1);
    assert!(second.is_complete_success());
    assert!(fixture.ledger.contains(&key));
    assert_eq!(fixture.notifier.delivered().len(), 1);
}

#[tokio::test]
async fn failed_delivery_is_retried_on_next_run() {
    let fixture = Fixture::new(vec![subscription("ada", "Spotify", date(2025, 3, 3), 5)]);
    fixture.notifier.reject_address("ada@example.com");

    let first = fixture.runner_with_ledger().run().await.unwrap();
    assert_eq!(first.failed(), 1);
    assert!(fixture.ledger.is_empty());

    let retry_notifier = Arc::new(RecordingNotifier::new());
    let retry = ReminderRunner::new(
        Arc::new(FixedClock::new(today())),
        fixture.repository.clone(),
        fixture.users.clone(),
        Arc::new(MiniJinjaReminderRenderer::new().unwrap()),
        retry_notifier.clone(),
    )
    .with_ledger(fixture.ledger.clone());

    let second = retry.run().await.unwrap();

    assert_eq!(second.sent(), 1);
    assert_eq!(retry_notifier.delivered().len(), 1);
    assert_eq!(fixture.ledger.len(), 1);
}

#[tokio::test]
async fn many_matches_each_sent_once() {
    let subscriptions: Vec<_> = (0..25)
        .map(|i| subscription("ada", &format!("Service {i}"), date(2025, 3, 3), 5))
        .collect();
    let fixture = Fixture::new(subscriptions);

    let stats = fixture.runner().run().await.unwrap();

    assert_eq!(stats.checked(), 25);
    assert_eq!(stats.sent(), 25);

    let mut subjects: Vec<_> = fixture
        .notifier
        .delivered()
        .into_iter()
        .map(|d| d.reminder.subject)
        .collect();
    subjects.sort();
    subjects.dedup();
    assert_eq!(subjects.len(), 25);
}
