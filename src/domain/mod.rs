//! Domain layer containing the reminder business rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, validation errors)
//! - `subscription` - Read-only subscription record
//! - `reminder` - Matching, outcomes, stats and the error taxonomy

pub mod foundation;
pub mod reminder;
pub mod subscription;
