mod error;
mod operations;
mod types;

pub use error::{
    ManagerError, ManagerResult, ACCESS_DENIED_CODE, ACCESS_DENIED_DOMAIN, OPERATION_FAILED_CODE,
    OPERATION_FAILED_DOMAIN,
};
pub use operations::{
    calendar_titles, dedupe_occurrences, fallback_sources, filter_calendars_by_entity_type,
    find_calendar_by_title,
};
pub use types::{Calendar, CalendarId, EntityType, Event, EventId, Source, SourceKind, Span};
