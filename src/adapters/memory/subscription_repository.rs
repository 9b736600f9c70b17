//! In-memory SubscriptionRepository.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::UserId;
use crate::domain::reminder::RepositoryError;
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

/// Vec-backed repository applying the same filter as the SQL adapter.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<Vec<Subscription>>,
    unavailable: RwLock<Option<String>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: RwLock::new(subscriptions),
            unavailable: RwLock::new(None),
        }
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscription);
    }

    /// Make every query fail with a connection error until cleared.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        *self.unavailable.write().unwrap_or_else(PoisonError::into_inner) =
            reason.map(str::to_string);
    }

    fn select(
        &self,
        owner_id: Option<&UserId>,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        if let Some(reason) = self
            .unavailable
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Err(RepositoryError::Connection(reason.clone()));
        }

        let mut selected: Vec<Subscription> = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.is_remindable())
            .filter(|s| s.next_renewal_date >= from && s.next_renewal_date <= until)
            .filter(|s| owner_id.map_or(true, |owner| &s.owner_id == owner))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            a.next_renewal_date
                .cmp(&b.next_renewal_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(selected)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_remindable(
        &self,
        today: NaiveDate,
        lookahead_days: u32,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        let until = today
            .checked_add_days(Days::new(u64::from(lookahead_days)))
            .unwrap_or(NaiveDate::MAX);
        self.select(None, today, until)
    }

    async fn find_remindable_for_owner(
        &self,
        owner_id: &UserId,
        renewal_from: NaiveDate,
        renewal_until: NaiveDate,
    ) -> Result<Vec<Subscription>, RepositoryError> {
        self.select(Some(owner_id), renewal_from, renewal_until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SubscriptionId;
    use crate::domain::subscription::BillingCycle;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription(owner: &str, renewal: NaiveDate) -> Subscription {
        Subscription {
            id: SubscriptionId::new(),
            owner_id: UserId::new(owner).unwrap(),
            name: "Gym".to_string(),
            amount: 30.0,
            currency: "USD".to_string(),
            billing_cycle: BillingCycle::Monthly,
            category: None,
            website_url: None,
            next_renewal_date: renewal,
            is_active: true,
            reminder_enabled: true,
            reminder_days_before: 3,
        }
    }

    #[tokio::test]
    async fn filters_by_flags_and_window() {
        let repo = InMemorySubscriptionRepository::new();
        repo.insert(subscription("a", date(2025, 1, 10)));
        repo.insert(subscription("a", date(2025, 3, 10)));
        repo.insert(subscription("a", date(2024, 12, 31)));
        let mut inactive = subscription("a", date(2025, 1, 5));
        inactive.is_active = false;
        repo.insert(inactive);

        let found = repo.find_remindable(date(2025, 1, 1), 30).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].next_renewal_date, date(2025, 1, 10));
    }

    #[tokio::test]
    async fn owner_query_scopes_to_owner() {
        let repo = InMemorySubscriptionRepository::with_subscriptions(vec![
            subscription("a", date(2025, 1, 10)),
            subscription("b", date(2025, 1, 10)),
        ]);

        let found = repo
            .find_remindable_for_owner(&UserId::new("b").unwrap(), date(2025, 1, 1), date(2025, 2, 1))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].owner_id.as_str(), "b");
    }

    #[tokio::test]
    async fn unavailable_repository_fails_queries() {
        let repo = InMemorySubscriptionRepository::new();
        repo.set_unavailable(Some("down for maintenance"));

        let result = repo.find_remindable(date(2025, 1, 1), 30).await;

        assert!(matches!(result, Err(RepositoryError::Connection(_))));
    }
}
