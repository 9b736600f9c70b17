//! Renewal Reminders - subscription renewal reminder matching and dispatch
//!
//! Once a day, every active, reminder-enabled subscription whose reminder date
//! is today gets one email. The crate is laid out hexagonally:
//!
//! - `domain` - matching rule, outcomes, stats and errors
//! - `ports` - traits for the clock, storage, lookup, rendering and delivery
//! - `application` - the reminder runner and the upcoming-reminders preview
//! - `adapters` - PostgreSQL, SMTP, minijinja, scheduler and HTTP implementations
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
