//! Error taxonomy for monitoring operations.
//!
//! Validation and not-found problems are surfaced to callers; transient
//! probe/notify failures never show up here (they fold into status codes
//! and booleans); persistence failures wrap [`StoreError`].

use std::fmt;

use crate::storage::StoreError;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug)]
pub enum MonitorError {
    /// Bad or duplicate input, reported to the caller verbatim
    Validation(String),

    /// Referenced target does not exist
    NotFound(String),

    /// Persistence layer failure
    Store(StoreError),

    /// The scheduler is no longer accepting commands (shutting down)
    Unavailable(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Validation(msg) => write!(f, "{}", msg),
            MonitorError::NotFound(msg) => write!(f, "{}", msg),
            MonitorError::Store(err) => write!(f, "storage error: {}", err),
            MonitorError::Unavailable(msg) => write!(f, "scheduler unavailable: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for MonitorError {
    fn from(err: StoreError) -> Self {
        match err {
            // Unique-constraint hits are caller mistakes, not backend faults
            StoreError::Duplicate(msg) => {
                MonitorError::Validation(format!("target already exists: {}", msg))
            }
            other => MonitorError::Store(other),
        }
    }
}
