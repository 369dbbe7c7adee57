//! In-memory calendar store implementation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use calmanager_core::authorization::AuthorizationStatus;
use calmanager_core::calendar::{
    filter_calendars_by_entity_type, Calendar, CalendarId, EntityType, Event, EventId, Source,
    Span,
};
use calmanager_core::storage::{CalendarStore, EventPredicate, Result, StoreError};

/// Everything the host holds: sources, calendars, events.
#[derive(Debug, Clone, Default, PartialEq)]
struct Catalog {
    sources: Vec<Source>,
    calendars: Vec<Calendar>,
    events: Vec<Event>,
    default_calendar: Option<CalendarId>,
}

impl Catalog {
    fn add_source(&mut self, source: &Source) {
        if !self
            .sources
            .iter()
            .any(|s| s.identifier == source.identifier)
        {
            self.sources.push(source.clone());
        }
    }

    fn calendar(&self, id: &CalendarId) -> Option<&Calendar> {
        self.calendars.iter().find(|c| &c.identifier == id)
    }

    fn event(&self, id: &EventId) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.identifier.as_ref() == Some(id))
    }

    fn apply(&mut self, change: &Change) {
        match change {
            Change::SaveCalendar(calendar) => {
                self.add_source(&calendar.source);
                match self
                    .calendars
                    .iter_mut()
                    .find(|c| c.identifier == calendar.identifier)
                {
                    Some(existing) => *existing = calendar.clone(),
                    None => self.calendars.push(calendar.clone()),
                }
            }
            Change::RemoveCalendar(id) => {
                self.calendars.retain(|c| &c.identifier != id);
                self.events.retain(|e| &e.calendar.identifier != id);
                if self.default_calendar.as_ref() == Some(id) {
                    self.default_calendar = None;
                }
            }
            Change::SaveEvent(event) => {
                match self
                    .events
                    .iter_mut()
                    .find(|e| e.identifier == event.identifier)
                {
                    Some(existing) => *existing = event.clone(),
                    None => self.events.push(event.clone()),
                }
            }
            Change::RemoveEvent(id) => {
                self.events.retain(|e| e.identifier.as_ref() != Some(id));
            }
        }
    }
}

/// A write waiting for `commit`.
#[derive(Debug, Clone, PartialEq)]
enum Change {
    SaveCalendar(Calendar),
    RemoveCalendar(CalendarId),
    SaveEvent(Event),
    RemoveEvent(EventId),
}

/// Injected failures.
#[derive(Debug, Default)]
struct Faults {
    rejected_sources: HashSet<String>,
    event_writes: bool,
    commits: bool,
    prompt: bool,
}

#[derive(Debug)]
struct State {
    status: AuthorizationStatus,
    prompt_answer: bool,
    /// What the host holds; only committed writes land here.
    platform: Catalog,
    /// The store's snapshot of `platform` plus uncommitted writes. `None`
    /// until first read and after `reset`.
    cache: Option<Catalog>,
    pending: Vec<Change>,
    faults: Faults,
    queries: Vec<EventPredicate>,
    save_calendar_attempts: Vec<String>,
    saved_spans: Vec<Span>,
    removed_spans: Vec<Span>,
}

impl State {
    fn new() -> Self {
        Self {
            status: AuthorizationStatus::Authorized,
            prompt_answer: true,
            platform: Catalog::default(),
            cache: None,
            pending: Vec::new(),
            faults: Faults::default(),
            queries: Vec::new(),
            save_calendar_attempts: Vec::new(),
            saved_spans: Vec::new(),
            removed_spans: Vec::new(),
        }
    }

    /// Returns the cached view, fetching it from the platform if needed.
    fn snapshot(&mut self) -> &mut Catalog {
        let platform = &self.platform;
        self.cache.get_or_insert_with(|| platform.clone())
    }

    fn write(&mut self, change: Change, commit: bool) {
        self.snapshot().apply(&change);
        if commit {
            self.platform.apply(&change);
        } else {
            self.pending.push(change);
        }
    }
}

/// In-memory calendar store for testing and development.
///
/// Models the parts of a host calendar service the facade relies on: a
/// permission state with a one-shot prompt, a platform-side catalog, a
/// cached view of it that `reset` drops, and writes that only reach the
/// platform on commit. Failures can be injected per source or per operation.
///
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug)]
pub struct InMemoryCalendarStore {
    state: RwLock<State>,
    mutations: AtomicUsize,
    prompts: AtomicUsize,
    resets: AtomicUsize,
}

impl Default for InMemoryCalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCalendarStore {
    /// Creates an empty, already authorized store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::new()),
            mutations: AtomicUsize::new(0),
            prompts: AtomicUsize::new(0),
            resets: AtomicUsize::new(0),
        }
    }

    /// Sets the initial authorization status.
    pub fn with_status(mut self, status: AuthorizationStatus) -> Self {
        self.state.get_mut().status = status;
        self
    }

    /// Sets what the user answers when the permission prompt is shown.
    pub fn with_prompt_answer(mut self, allow: bool) -> Self {
        self.state.get_mut().prompt_answer = allow;
        self
    }

    /// Adds a backing source.
    pub fn with_source(mut self, source: Source) -> Self {
        self.state.get_mut().platform.add_source(&source);
        self
    }

    /// Adds a calendar (and its source, if new).
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.state
            .get_mut()
            .platform
            .apply(&Change::SaveCalendar(calendar));
        self
    }

    /// Adds a calendar and makes it the default for new events.
    pub fn with_default_calendar(mut self, calendar: Calendar) -> Self {
        let platform = &mut self.state.get_mut().platform;
        platform.default_calendar = Some(calendar.identifier.clone());
        platform.apply(&Change::SaveCalendar(calendar));
        self
    }

    /// Adds an event. Events without an identifier get a fresh one.
    pub fn with_event(mut self, mut event: Event) -> Self {
        event.identifier.get_or_insert_with(EventId::generate);
        self.state
            .get_mut()
            .platform
            .apply(&Change::SaveEvent(event));
        self
    }

    /// Makes every calendar save against the given source fail.
    pub fn reject_source(mut self, source_id: impl Into<String>) -> Self {
        self.state
            .get_mut()
            .faults
            .rejected_sources
            .insert(source_id.into());
        self
    }

    /// Makes every event save and removal fail.
    pub fn fail_event_writes(mut self) -> Self {
        self.state.get_mut().faults.event_writes = true;
        self
    }

    /// Makes every commit fail.
    pub fn fail_commits(mut self) -> Self {
        self.state.get_mut().faults.commits = true;
        self
    }

    /// Makes the permission prompt itself fail.
    pub fn fail_prompt(mut self) -> Self {
        self.state.get_mut().faults.prompt = true;
        self
    }

    /// Simulates a host-side status change (e.g. revoked in settings).
    pub async fn set_status(&self, status: AuthorizationStatus) {
        self.state.write().await.status = status;
    }

    /// Turns the commit fault on or off after construction.
    pub async fn set_commit_failure(&self, fail: bool) {
        self.state.write().await.faults.commits = fail;
    }

    /// Simulates a calendar created on the host by another application.
    /// Cached reads do not see it until `reset`.
    pub async fn platform_insert_calendar(&self, calendar: Calendar) {
        self.state
            .write()
            .await
            .platform
            .apply(&Change::SaveCalendar(calendar));
    }

    /// Simulates an event created on the host by another application.
    /// Cached reads do not see it until `reset`.
    pub async fn platform_insert_event(&self, event: Event) {
        self.state
            .write()
            .await
            .platform
            .apply(&Change::SaveEvent(event));
    }

    /// Calendars the host holds, committed writes only.
    pub async fn platform_calendars(&self) -> Vec<Calendar> {
        self.state.read().await.platform.calendars.clone()
    }

    /// Events the host holds, committed writes only.
    pub async fn platform_events(&self) -> Vec<Event> {
        self.state.read().await.platform.events.clone()
    }

    /// Every range query received, in order.
    pub async fn recorded_queries(&self) -> Vec<EventPredicate> {
        self.state.read().await.queries.clone()
    }

    /// Source identifiers of every calendar save attempted, in order.
    pub async fn save_calendar_attempts(&self) -> Vec<String> {
        self.state.read().await.save_calendar_attempts.clone()
    }

    /// Spans of every event save received, in order.
    pub async fn saved_spans(&self) -> Vec<Span> {
        self.state.read().await.saved_spans.clone()
    }

    /// Spans of every event removal received, in order.
    pub async fn removed_spans(&self) -> Vec<Span> {
        self.state.read().await.removed_spans.clone()
    }

    /// Number of write calls received (saves, removals, commits).
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Number of times the permission prompt was shown.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Number of resets received.
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    fn count_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CalendarStore for InMemoryCalendarStore {
    async fn authorization_status(&self) -> AuthorizationStatus {
        self.state.read().await.status
    }

    async fn request_access(&self) -> Result<bool> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;

        if state.faults.prompt {
            return Err(StoreError::Unavailable(
                "permission prompt could not be shown".to_string(),
            ));
        }
        if state.status == AuthorizationStatus::NotDetermined {
            state.status = if state.prompt_answer {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
        }
        Ok(state.status.is_authorized())
    }

    async fn calendars(&self, entity_type: EntityType) -> Result<Vec<Calendar>> {
        let mut state = self.state.write().await;
        let snapshot = state.snapshot();
        Ok(filter_calendars_by_entity_type(&snapshot.calendars, entity_type)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn sources(&self) -> Result<Vec<Source>> {
        let mut state = self.state.write().await;
        Ok(state.snapshot().sources.clone())
    }

    async fn default_calendar_for_new_events(&self) -> Result<Option<Calendar>> {
        let mut state = self.state.write().await;
        let snapshot = state.snapshot();
        Ok(snapshot
            .default_calendar
            .as_ref()
            .and_then(|id| snapshot.calendar(id))
            .cloned())
    }

    async fn save_calendar(&self, calendar: &Calendar, commit: bool) -> Result<()> {
        self.count_mutation();
        let mut state = self.state.write().await;
        let source = &calendar.source;
        state
            .save_calendar_attempts
            .push(source.identifier.clone());

        if source.is_birthdays() {
            return Err(StoreError::ReadOnlySource(source.identifier.clone()));
        }
        if state.faults.rejected_sources.contains(&source.identifier) {
            return Err(StoreError::Rejected {
                reason: format!("source {} refuses new calendars", source.identifier),
            });
        }
        if !state
            .snapshot()
            .sources
            .iter()
            .any(|s| s.identifier == source.identifier)
        {
            return Err(StoreError::NotFound {
                entity_type: "Source",
                id: source.identifier.clone(),
            });
        }

        state.write(Change::SaveCalendar(calendar.clone()), commit);
        Ok(())
    }

    async fn remove_calendar(&self, calendar: &Calendar, commit: bool) -> Result<()> {
        self.count_mutation();
        let mut state = self.state.write().await;

        let Some(existing) = state.snapshot().calendar(&calendar.identifier) else {
            return Err(StoreError::NotFound {
                entity_type: "Calendar",
                id: calendar.identifier.to_string(),
            });
        };
        if !existing.allows_modifications {
            return Err(StoreError::Rejected {
                reason: format!("calendar {} is read-only", calendar.identifier),
            });
        }

        state.write(Change::RemoveCalendar(calendar.identifier.clone()), commit);
        Ok(())
    }

    async fn save_event(&self, event: &Event, span: Span, commit: bool) -> Result<EventId> {
        self.count_mutation();
        let mut state = self.state.write().await;
        state.saved_spans.push(span);

        if state.faults.event_writes {
            return Err(StoreError::Rejected {
                reason: "event writes are disabled".to_string(),
            });
        }
        match state.snapshot().calendar(&event.calendar.identifier) {
            None => {
                return Err(StoreError::NotFound {
                    entity_type: "Calendar",
                    id: event.calendar.identifier.to_string(),
                })
            }
            Some(calendar) if !calendar.allows_modifications => {
                return Err(StoreError::Rejected {
                    reason: format!("calendar {} is read-only", calendar.identifier),
                })
            }
            Some(_) => {}
        }

        let mut stored = event.clone();
        let id = stored
            .identifier
            .get_or_insert_with(EventId::generate)
            .clone();
        state.write(Change::SaveEvent(stored), commit);
        Ok(id)
    }

    async fn remove_event(&self, event: &Event, span: Span, commit: bool) -> Result<()> {
        self.count_mutation();
        let mut state = self.state.write().await;
        state.removed_spans.push(span);

        if state.faults.event_writes {
            return Err(StoreError::Rejected {
                reason: "event writes are disabled".to_string(),
            });
        }
        let Some(id) = event.identifier.clone() else {
            return Err(StoreError::NotFound {
                entity_type: "Event",
                id: String::new(),
            });
        };
        if state.snapshot().event(&id).is_none() {
            return Err(StoreError::NotFound {
                entity_type: "Event",
                id: id.to_string(),
            });
        }

        state.write(Change::RemoveEvent(id), commit);
        Ok(())
    }

    async fn event_with_identifier(&self, id: &EventId) -> Result<Option<Event>> {
        let mut state = self.state.write().await;
        Ok(state.snapshot().event(id).cloned())
    }

    async fn events_matching(&self, predicate: &EventPredicate) -> Result<Vec<Event>> {
        let mut state = self.state.write().await;
        state.queries.push(predicate.clone());
        Ok(state
            .snapshot()
            .events
            .iter()
            .filter(|e| predicate.matches(e))
            .cloned()
            .collect())
    }

    async fn commit(&self) -> Result<()> {
        self.count_mutation();
        let mut state = self.state.write().await;

        if state.faults.commits {
            return Err(StoreError::CommitFailed("commits are disabled".to_string()));
        }
        let pending = std::mem::take(&mut state.pending);
        for change in &pending {
            state.platform.apply(change);
        }
        Ok(())
    }

    async fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        state.cache = None;
        state.pending.clear();
    }
}
