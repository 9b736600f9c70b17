//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers and validation errors that form the
//! vocabulary of the reminder domain.

mod errors;
mod ids;

pub use errors::ValidationError;
pub use ids::{SubscriptionId, UserId};
