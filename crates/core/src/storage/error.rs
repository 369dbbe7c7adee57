use thiserror::Error;

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start must be before or equal to end")]
    InvalidRange,
}

/// Errors reported by a calendar store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Store rejected the write: {reason}")]
    Rejected { reason: String },
    #[error("Source does not allow new calendars: {0}")]
    ReadOnlySource(String),
    #[error("Commit failed: {0}")]
    CommitFailed(String),
    #[error("Calendar store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
