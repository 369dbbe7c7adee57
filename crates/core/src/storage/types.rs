use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarId, Event};

use super::DateRangeError;

/// Length of the fixed "year" used for wide range queries (365 days).
pub const SECONDS_PER_YEAR: i64 = 31_536_000;

/// Returns `n` fixed-length years as a duration, or `None` on overflow.
pub fn years(n: i64) -> Option<Duration> {
    n.checked_mul(SECONDS_PER_YEAR)
        .and_then(Duration::try_seconds)
}

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates the range reaching `before` into the past and `after` into the
    /// future from `anchor`.
    pub fn around(
        anchor: DateTime<Utc>,
        before: Duration,
        after: Duration,
    ) -> Result<Self, DateRangeError> {
        let start = anchor
            .checked_sub_signed(before)
            .ok_or(DateRangeError::InvalidRange)?;
        let end = anchor
            .checked_add_signed(after)
            .ok_or(DateRangeError::InvalidRange)?;
        Self::new(start, end)
    }

    /// Returns true if `instant` falls inside the range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Splits the range into consecutive windows of at most `step`.
    ///
    /// Each window starts where the previous one ended and the last window is
    /// clamped to `end`. A non-positive `step` yields the whole range as one
    /// window. An empty range yields nothing.
    pub fn windows(&self, step: Duration) -> Windows {
        Windows {
            cursor: self.start,
            end: self.end,
            step,
        }
    }
}

/// Iterator over consecutive sub-ranges. See [`DateRange::windows`].
#[derive(Debug, Clone)]
pub struct Windows {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for Windows {
    type Item = DateRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let window_end = if self.step <= Duration::zero() {
            self.end
        } else {
            self.cursor
                .checked_add_signed(self.step)
                .map_or(self.end, |t| t.min(self.end))
        };

        let window = DateRange {
            start: self.cursor,
            end: window_end,
        };
        self.cursor = window_end;
        Some(window)
    }
}

/// A range query against a calendar store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPredicate {
    pub range: DateRange,
    /// Calendars to search; `None` searches every event calendar.
    pub calendars: Option<Vec<CalendarId>>,
}

impl EventPredicate {
    /// A query over every event calendar.
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            calendars: None,
        }
    }

    /// A query restricted to the given calendars.
    pub fn for_calendars(range: DateRange, calendars: Vec<CalendarId>) -> Self {
        Self {
            range,
            calendars: Some(calendars),
        }
    }

    /// Returns true if the event satisfies this query.
    pub fn matches(&self, event: &Event) -> bool {
        let in_calendar = self
            .calendars
            .as_ref()
            .is_none_or(|ids| ids.contains(&event.calendar.identifier));
        in_calendar && event.overlaps(&self.range)
    }
}
