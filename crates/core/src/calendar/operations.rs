use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::types::{Calendar, EntityType, Event, EventId, Source};

/// Returns the first calendar whose title matches exactly.
pub fn find_calendar_by_title<'a>(calendars: &'a [Calendar], title: &str) -> Option<&'a Calendar> {
    calendars.iter().find(|calendar| calendar.title == title)
}

/// Returns the titles of the given calendars, preserving order.
pub fn calendar_titles(calendars: &[Calendar]) -> Vec<String> {
    calendars
        .iter()
        .map(|calendar| calendar.title.clone())
        .collect()
}

/// Filters calendars by the kind of entity they hold.
pub fn filter_calendars_by_entity_type(
    calendars: &[Calendar],
    entity_type: EntityType,
) -> Vec<&Calendar> {
    calendars
        .iter()
        .filter(|calendar| calendar.entity_type == entity_type)
        .collect()
}

/// Orders the sources to try when saving a new calendar under `attempted`
/// failed.
///
/// Keeps store order, drops birthday sources and the source already tried.
pub fn fallback_sources<'a>(sources: &'a [Source], attempted: Option<&Source>) -> Vec<&'a Source> {
    sources
        .iter()
        .filter(|source| !source.is_birthdays())
        .filter(|source| attempted.is_none_or(|tried| tried.identifier != source.identifier))
        .collect()
}

/// Drops repeated occurrences, keeping the first one seen.
///
/// Two events are the same occurrence when they share identifier and start.
/// Unsaved events are always kept.
pub fn dedupe_occurrences(events: Vec<Event>) -> Vec<Event> {
    let mut seen: HashSet<(EventId, DateTime<Utc>)> = HashSet::new();
    events
        .into_iter()
        .filter(|event| match &event.identifier {
            Some(id) => seen.insert((id.clone(), event.start)),
            None => true,
        })
        .collect()
}
