use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::DateRange;

/// Opaque calendar identifier assigned by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CalendarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque event identifier assigned by the host platform when an event is
/// first saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The kind of entity a calendar holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Event,
    Reminder,
}

/// The kind of account backing a set of calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Local,
    Exchange,
    CalDav,
    MobileMe,
    Subscribed,
    /// Generated from contacts; never accepts new calendars.
    Birthdays,
}

/// An account-like grouping that owns calendars on the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub identifier: String,
    pub title: String,
    pub kind: SourceKind,
}

impl Source {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            kind,
        }
    }

    /// Returns true if this is the contacts birthday source.
    pub fn is_birthdays(&self) -> bool {
        matches!(self.kind, SourceKind::Birthdays)
    }
}

/// A calendar owned by the host platform.
///
/// Titles are not unique; the identifier is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub identifier: CalendarId,
    pub title: String,
    pub source: Source,
    pub entity_type: EntityType,
    pub allows_modifications: bool,
}

impl Calendar {
    /// Creates a new, writable event calendar under the given source.
    pub fn new(title: impl Into<String>, source: Source) -> Self {
        Self {
            identifier: CalendarId::generate(),
            title: title.into(),
            source,
            entity_type: EntityType::Event,
            allows_modifications: true,
        }
    }

    /// Sets a specific identifier for this calendar (useful for testing).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = CalendarId::new(identifier);
        self
    }

    /// Sets the entity type this calendar holds.
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = entity_type;
        self
    }

    /// Marks the calendar as read-only.
    pub fn read_only(mut self) -> Self {
        self.allows_modifications = false;
        self
    }

    /// Returns a copy of this calendar moved under another source.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }
}

/// Scope of an edit or deletion on a recurring event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    /// Only this occurrence.
    #[default]
    ThisEvent,
    /// This occurrence and every later one in the series.
    FutureEvents,
}

/// A calendar event.
///
/// `identifier` is `None` until the event has been saved through a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub identifier: Option<EventId>,
    pub calendar: Calendar,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Event {
    /// Creates an unsaved, untitled event in the given calendar, starting and
    /// ending now.
    pub fn new(calendar: Calendar) -> Self {
        let now = Utc::now();
        Self {
            identifier: None,
            calendar,
            title: String::new(),
            start: now,
            end: now,
            all_day: false,
            location: None,
            notes: None,
        }
    }

    /// Sets the title for this event.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the start and end of this event.
    pub fn with_times(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Marks this event as an all-day event.
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Sets the location for this event.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets free-form notes for this event.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets a specific identifier for this event (useful for testing).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(EventId::new(identifier));
        self
    }

    /// Returns true once a store has assigned an identifier.
    pub fn is_saved(&self) -> bool {
        self.identifier.is_some()
    }

    /// Returns true if the event intersects the range.
    ///
    /// Zero-length events count when they sit on the range start.
    pub fn overlaps(&self, range: &DateRange) -> bool {
        if self.start == self.end {
            return range.contains(self.start);
        }
        self.start < range.end && self.end > range.start
    }
}
