//! Reminder error taxonomy.
//!
//! | Error | Scope | Effect on the run |
//! |-------|-------|-------------------|
//! | `ReminderRunError::Fetch` | whole run | fatal, no stats |
//! | `DispatchError::Lookup` | one subscription | recorded in stats |
//! | `DispatchError::Render` | one subscription | recorded in stats |
//! | `DispatchError::Transport` | one subscription | recorded in stats |
//! | `DispatchError::Ledger` | one subscription | recorded in stats |
//! | `DispatchError::Cancelled` | one subscription | recorded in stats |
//! | `DispatchError::Panicked` | one subscription | recorded in stats |

use thiserror::Error;

use crate::domain::foundation::UserId;

/// Failure of the subscription store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Failure to resolve an owner to a recipient address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("owner {0} not found")]
    NotFound(UserId),

    #[error("owner {0} has no email address")]
    MissingEmail(UserId),

    #[error("user lookup unavailable: {0}")]
    Unavailable(String),
}

/// Failure to render reminder content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("template failed: {0}")]
    Template(String),
}

/// Failure to hand a rendered reminder to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("message could not be built: {0}")]
    Message(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl TransportError {
    /// Whether retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Delivery(_))
    }
}

/// Failure of the dispatch ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger storage failed: {0}")]
    Storage(String),
}

/// Per-subscription failure. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("dispatch cancelled before completion")]
    Cancelled,

    #[error("dispatch task panicked")]
    Panicked,
}

impl DispatchError {
    /// Whether a later run may succeed where this one failed.
    pub fn is_transient(&self) -> bool {
        match self {
            DispatchError::Transport(e) => e.is_transient(),
            DispatchError::Lookup(LookupError::Unavailable(_))
            | DispatchError::Ledger(_)
            | DispatchError::Cancelled => true,
            _ => false,
        }
    }
}

/// Fatal failure of a reminder run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderRunError {
    #[error("failed to fetch reminder candidates: {0}")]
    Fetch(#[from] RepositoryError),
}
