//! Event CRUD and range queries.

use chrono::{DateTime, Utc};

use calmanager_core::calendar::{
    dedupe_occurrences, Calendar, Event, EventId, ManagerError, ManagerResult, Span,
};
use calmanager_core::storage::{CalendarStore, DateRange, EventPredicate, StoreError};

use super::CalendarManager;

impl<S> CalendarManager<S>
where
    S: CalendarStore + 'static,
{
    /// Builds an unsaved event in `calendar`, or in the default calendar for
    /// new events when none is given.
    pub async fn create_event(&self, calendar: Option<&Calendar>) -> ManagerResult<Event> {
        self.ensure_authorized().await?;
        let calendar = match calendar {
            Some(calendar) => calendar.clone(),
            None => self.default_calendar().await?,
        };
        Ok(Event::new(calendar))
    }

    /// Creates or updates an event.
    ///
    /// On success the store's identifier is written back into `event`. `span`
    /// decides whether an edit to a recurring event touches only this
    /// occurrence or this and all later ones.
    pub async fn save_event(
        &self,
        event: &mut Event,
        span: Span,
        commit: bool,
    ) -> ManagerResult<()> {
        self.ensure_authorized().await?;

        match self.store().save_event(event, span, commit).await {
            Ok(id) => {
                tracing::debug!(event_id = %id, ?span, "Event saved");
                event.identifier = Some(id);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to save event");
                Err(err.into())
            }
        }
    }

    /// Deletes the event with the given identifier and all later occurrences.
    pub async fn remove_event(&self, event_id: &EventId, commit: bool) -> ManagerResult<()> {
        self.ensure_authorized().await?;

        let Some(event) = self.store().event_with_identifier(event_id).await? else {
            tracing::debug!(event_id = %event_id, "Event to remove not found");
            return Err(ManagerError::operation_failed(StoreError::NotFound {
                entity_type: "Event",
                id: event_id.to_string(),
            }));
        };

        match self
            .store()
            .remove_event(&event, Span::FutureEvents, commit)
            .await
        {
            Ok(()) => {
                tracing::debug!(event_id = %event_id, "Event removed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(event_id = %event_id, error = %err, "Failed to remove event");
                Err(err.into())
            }
        }
    }

    /// Events in every calendar between `start` and `end`, in one query.
    ///
    /// A valid range goes to the store unmodified. A range that ends before
    /// it starts matches nothing, so it is answered with an empty list
    /// without querying the store.
    pub async fn events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ManagerResult<Vec<Event>> {
        self.ensure_authorized().await?;

        let Ok(range) = DateRange::new(start, end) else {
            tracing::debug!(%start, %end, "Reversed event range, nothing to query");
            return Ok(Vec::new());
        };
        Ok(self
            .store()
            .events_matching(&EventPredicate::new(range))
            .await?)
    }

    /// Every event of `calendar` (or the default calendar for new events)
    /// from 100 years ago to 200 years ahead.
    pub async fn all_events(&self, calendar: Option<&Calendar>) -> ManagerResult<Vec<Event>> {
        self.all_events_at(Utc::now(), calendar).await
    }

    /// Like [`all_events`](Self::all_events), with the search range anchored
    /// at `anchor` instead of now.
    ///
    /// Stores refuse or truncate very long range queries, so the range is
    /// walked in consecutive windows (4 years by default) and the results are
    /// concatenated in window order. An occurrence returned by two adjacent
    /// windows is kept once.
    pub async fn all_events_at(
        &self,
        anchor: DateTime<Utc>,
        calendar: Option<&Calendar>,
    ) -> ManagerResult<Vec<Event>> {
        self.ensure_authorized().await?;

        let calendar = match calendar {
            Some(calendar) => calendar.clone(),
            None => self.default_calendar().await?,
        };
        let range = self.config().query_range(anchor).map_err(|err| {
            tracing::warn!(error = %err, %anchor, "Wide event range out of bounds");
            ManagerError::unknown()
        })?;

        let mut events = Vec::new();
        for window in range.windows(self.config().window()) {
            let predicate =
                EventPredicate::for_calendars(window, vec![calendar.identifier.clone()]);
            let found = self.store().events_matching(&predicate).await?;
            tracing::trace!(
                start = %window.start,
                end = %window.end,
                count = found.len(),
                "Queried event window"
            );
            events.extend(found);
        }

        let events = dedupe_occurrences(events);
        tracing::debug!(
            calendar_id = %calendar.identifier,
            count = events.len(),
            "Fetched all events"
        );
        Ok(events)
    }

    /// The event with the given identifier, if it exists.
    pub async fn event(&self, event_id: &EventId) -> ManagerResult<Option<Event>> {
        self.ensure_authorized().await?;
        Ok(self.store().event_with_identifier(event_id).await?)
    }
}
