//! Clock port - the only source of "today" for the reminder core.

use chrono::NaiveDate;

/// Supplies the current calendar date.
///
/// Implementations resolve the time zone; callers only ever see a date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
