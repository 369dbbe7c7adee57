use thiserror::Error;

use crate::storage::StoreError;

/// Error domain reported with [`ManagerError::AccessDenied`].
pub const ACCESS_DENIED_DOMAIN: &str = "CalendarAuthorization";
/// Numeric code reported with [`ManagerError::AccessDenied`].
pub const ACCESS_DENIED_CODE: i32 = 987;
/// Error domain reported with [`ManagerError::OperationFailed`].
pub const OPERATION_FAILED_DOMAIN: &str = "CalendarError";
/// Numeric code reported with [`ManagerError::OperationFailed`].
pub const OPERATION_FAILED_CODE: i32 = 999;

/// Errors surfaced by the calendar facade.
///
/// Only two kinds exist. Lookups that find nothing are `Ok(None)`, not
/// errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// The user (or device policy) has not granted calendar access.
    #[error("Calendar access was denied")]
    AccessDenied,
    /// A store-level operation failed. The store error, when there was one,
    /// is kept as the error source.
    #[error("Unknown Error")]
    OperationFailed {
        #[source]
        source: Option<StoreError>,
    },
}

impl ManagerError {
    /// An operation failure with no underlying store error.
    pub fn unknown() -> Self {
        ManagerError::OperationFailed { source: None }
    }

    /// An operation failure caused by the given store error.
    pub fn operation_failed(source: StoreError) -> Self {
        ManagerError::OperationFailed {
            source: Some(source),
        }
    }

    /// Fixed numeric code for this error kind.
    pub fn code(&self) -> i32 {
        match self {
            ManagerError::AccessDenied => ACCESS_DENIED_CODE,
            ManagerError::OperationFailed { .. } => OPERATION_FAILED_CODE,
        }
    }

    /// Fixed error domain for this error kind.
    pub fn domain(&self) -> &'static str {
        match self {
            ManagerError::AccessDenied => ACCESS_DENIED_DOMAIN,
            ManagerError::OperationFailed { .. } => OPERATION_FAILED_DOMAIN,
        }
    }

    /// Human-readable explanation suitable for showing to the user.
    pub fn failure_reason(&self) -> &'static str {
        match self {
            ManagerError::AccessDenied => {
                "To continue syncing your calendars re-enable Calendar access in Settings->Privacy->Calendars."
            }
            ManagerError::OperationFailed { .. } => {
                "An unknown error occurred while trying to sync your calendar. Syncing will be turned off."
            }
        }
    }

    /// Returns the store error behind an operation failure, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            ManagerError::OperationFailed { source } => source.as_ref(),
            ManagerError::AccessDenied => None,
        }
    }

    /// Returns true if this is an access denial.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ManagerError::AccessDenied)
    }
}

impl From<StoreError> for ManagerError {
    fn from(err: StoreError) -> Self {
        Self::operation_failed(err)
    }
}

/// Result type for facade operations.
pub type ManagerResult<T> = std::result::Result<T, ManagerError>;
