use std::env;

use chrono::{DateTime, Duration, Utc};

use calmanager_core::storage::{years, DateRange, DateRangeError};

/// Default reach of wide event queries into the past, in years.
pub const DEFAULT_LOOKBEHIND_YEARS: u32 = 100;
/// Default reach of wide event queries into the future, in years.
pub const DEFAULT_LOOKAHEAD_YEARS: u32 = 200;
/// Default length of a single range query window, in years.
pub const DEFAULT_WINDOW_YEARS: u32 = 4;

/// Upper bound accepted for any of the year settings.
const MAX_YEARS: u32 = 10_000;

/// Calendar manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// How far back `all_events` looks (default: 100)
    pub lookbehind_years: u32,
    /// How far ahead `all_events` looks (default: 200)
    pub lookahead_years: u32,
    /// Span of each store query issued by `all_events` (default: 4)
    pub window_years: u32,
}

impl ManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CALMANAGER_LOOKBEHIND_YEARS` - Years before now to search (default: 100)
    /// - `CALMANAGER_LOOKAHEAD_YEARS` - Years after now to search (default: 200)
    /// - `CALMANAGER_WINDOW_YEARS` - Years per store query (default: 4)
    ///
    /// Unparseable, zero or absurdly large values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: u32| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| (1..=MAX_YEARS).contains(v))
                .unwrap_or(default)
        };

        Self {
            lookbehind_years: read("CALMANAGER_LOOKBEHIND_YEARS", DEFAULT_LOOKBEHIND_YEARS),
            lookahead_years: read("CALMANAGER_LOOKAHEAD_YEARS", DEFAULT_LOOKAHEAD_YEARS),
            window_years: read("CALMANAGER_WINDOW_YEARS", DEFAULT_WINDOW_YEARS),
        }
    }

    /// The overall range searched by `all_events` when invoked at `anchor`.
    pub fn query_range(&self, anchor: DateTime<Utc>) -> Result<DateRange, DateRangeError> {
        let before = years(self.lookbehind_years.into()).ok_or(DateRangeError::InvalidRange)?;
        let after = years(self.lookahead_years.into()).ok_or(DateRangeError::InvalidRange)?;
        DateRange::around(anchor, before, after)
    }

    /// Get the query window length as a Duration.
    pub fn window(&self) -> Duration {
        years(self.window_years.into()).unwrap_or_else(Duration::zero)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            lookbehind_years: DEFAULT_LOOKBEHIND_YEARS,
            lookahead_years: DEFAULT_LOOKAHEAD_YEARS,
            window_years: DEFAULT_WINDOW_YEARS,
        }
    }
}
