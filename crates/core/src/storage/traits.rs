use async_trait::async_trait;

use crate::authorization::AuthorizationStatus;
use crate::calendar::{Calendar, EntityType, Event, EventId, Source, Span};

use super::{EventPredicate, Result};

/// The host platform's calendar subsystem.
///
/// Implementations own storage, recurrence, sync and permission policy. The
/// facade only forwards to them. Implementations must be safe to call from
/// several tasks at once; the facade adds no locking of its own.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Current permission state for event access. Never prompts.
    async fn authorization_status(&self) -> AuthorizationStatus;

    /// Shows the platform permission prompt and waits for the user's answer.
    async fn request_access(&self) -> Result<bool>;

    /// All calendars holding the given entity type, in store order.
    async fn calendars(&self, entity_type: EntityType) -> Result<Vec<Calendar>>;

    /// All backing sources, in store order.
    async fn sources(&self) -> Result<Vec<Source>>;

    /// The calendar new events go to by default, if one is configured.
    async fn default_calendar_for_new_events(&self) -> Result<Option<Calendar>>;

    /// Creates or updates a calendar.
    async fn save_calendar(&self, calendar: &Calendar, commit: bool) -> Result<()>;

    /// Deletes a calendar and its events.
    async fn remove_calendar(&self, calendar: &Calendar, commit: bool) -> Result<()>;

    /// Creates or updates an event, returning its (possibly new) identifier.
    async fn save_event(&self, event: &Event, span: Span, commit: bool) -> Result<EventId>;

    /// Deletes an event with the given scope.
    async fn remove_event(&self, event: &Event, span: Span, commit: bool) -> Result<()>;

    /// Looks an event up by identifier.
    async fn event_with_identifier(&self, id: &EventId) -> Result<Option<Event>>;

    /// Runs a range query.
    async fn events_matching(&self, predicate: &EventPredicate) -> Result<Vec<Event>>;

    /// Flushes changes saved with `commit = false`.
    async fn commit(&self) -> Result<()>;

    /// Drops cached state and unsaved changes so later reads refetch.
    async fn reset(&self);
}
