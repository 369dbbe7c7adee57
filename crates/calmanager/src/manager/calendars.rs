//! Calendar directory operations.

use calmanager_core::calendar::{
    calendar_titles, fallback_sources, find_calendar_by_title, Calendar, EntityType, ManagerError,
    ManagerResult, Source,
};
use calmanager_core::storage::{CalendarStore, StoreError};

use super::CalendarManager;

impl<S> CalendarManager<S>
where
    S: CalendarStore + 'static,
{
    /// Titles of every event calendar, in store order.
    pub async fn calendar_titles(&self) -> ManagerResult<Vec<String>> {
        self.ensure_authorized().await?;
        let calendars = self.store().calendars(EntityType::Event).await?;
        Ok(calendar_titles(&calendars))
    }

    /// The first event calendar titled exactly `title`, if any.
    pub async fn calendar_for_title(&self, title: &str) -> ManagerResult<Option<Calendar>> {
        self.ensure_authorized().await?;
        let calendars = self.store().calendars(EntityType::Event).await?;
        Ok(find_calendar_by_title(&calendars, title).cloned())
    }

    /// Every event calendar, in store order.
    pub async fn calendars(&self) -> ManagerResult<Vec<Calendar>> {
        self.ensure_authorized().await?;
        Ok(self.store().calendars(EntityType::Event).await?)
    }

    /// Creates an event calendar titled `title`.
    ///
    /// The calendar goes under the source of the default calendar for new
    /// events. If that save is rejected, every other source except birthday
    /// sources is tried once in store order. The first accepting source wins;
    /// if none accepts, the last rejection is returned.
    pub async fn add_calendar(&self, title: &str, commit: bool) -> ManagerResult<Calendar> {
        self.ensure_authorized().await?;

        let default_source = self
            .store()
            .default_calendar_for_new_events()
            .await?
            .map(|calendar| calendar.source);
        let mut last_error: Option<StoreError> = None;

        if let Some(source) = &default_source {
            match self.save_new_calendar(title, source, commit).await {
                Ok(calendar) => return Ok(calendar),
                Err(err) => last_error = Some(err),
            }
        }

        let sources = self.store().sources().await?;
        for source in fallback_sources(&sources, default_source.as_ref()) {
            match self.save_new_calendar(title, source, commit).await {
                Ok(calendar) => return Ok(calendar),
                Err(err) => last_error = Some(err),
            }
        }

        tracing::warn!(title, "No source accepted the new calendar");
        Err(ManagerError::OperationFailed { source: last_error })
    }

    async fn save_new_calendar(
        &self,
        title: &str,
        source: &Source,
        commit: bool,
    ) -> Result<Calendar, StoreError> {
        let calendar = Calendar::new(title, source.clone());

        match self.store().save_calendar(&calendar, commit).await {
            Ok(()) => {
                tracing::debug!(
                    calendar_id = %calendar.identifier,
                    source = %source.identifier,
                    title,
                    "Calendar created"
                );
                Ok(calendar)
            }
            Err(err) => {
                tracing::warn!(
                    source = %source.identifier,
                    error = %err,
                    "Source rejected new calendar"
                );
                Err(err)
            }
        }
    }

    /// Deletes a calendar.
    ///
    /// The store's authorization status is checked again right before the
    /// delete, so a revocation after the gate still refuses the call.
    pub async fn remove_calendar(&self, calendar: &Calendar, commit: bool) -> ManagerResult<()> {
        self.ensure_authorized().await?;
        if !self.store().authorization_status().await.is_authorized() {
            return Err(ManagerError::AccessDenied);
        }

        match self.store().remove_calendar(calendar, commit).await {
            Ok(()) => {
                tracing::debug!(calendar_id = %calendar.identifier, "Calendar removed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    calendar_id = %calendar.identifier,
                    error = %err,
                    "Failed to remove calendar"
                );
                Err(err.into())
            }
        }
    }
}
