//! Subscription module - the read-only view of a tracked recurring charge.
//!
//! Subscriptions are owned by the repository; the reminder core only reads them.

mod billing_cycle;
mod subscription;

pub use billing_cycle::BillingCycle;
pub use subscription::Subscription;
