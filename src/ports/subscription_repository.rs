//! Subscription repository port (read side).
//!
//! The reminder core never writes subscriptions; it only asks for candidates.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::UserId;
use crate::domain::reminder::RepositoryError;
use crate::domain::subscription::Subscription;

/// Read-only access to reminder candidates.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Subscriptions that are active, have reminders enabled, and renew in
    /// `[today, today + lookahead_days]`.
    ///
    /// Implementations should push this filter down into storage. Records
    /// that cannot be decoded are excluded and logged, not returned.
    ///
    /// # Errors
    ///
    /// `RepositoryError` on connectivity or query failure. This is fatal to
    /// a reminder run.
    async fn find_remindable(
        &self,
        today: NaiveDate,
        lookahead_days: u32,
    ) -> Result<Vec<Subscription>, RepositoryError>;

    /// Same filter as [`find_remindable`](Self::find_remindable), restricted
    /// to one owner and an explicit renewal range (inclusive).
    async fn find_remindable_for_owner(
        &self,
        owner_id: &UserId,
        renewal_from: NaiveDate,
        renewal_until: NaiveDate,
    ) -> Result<Vec<Subscription>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
