//! The authorization gate every facade operation passes through.

use calmanager_core::authorization::GateDecision;
use calmanager_core::storage::CalendarStore;

/// Resolves whether calendar access is available, prompting if needed.
///
/// Returns immediately when access was already granted or refused. When the
/// status is undetermined, shows the platform prompt once and waits for the
/// answer; a grant resets the store so it picks up entities that existed
/// before permission did. A failing prompt counts as a refusal.
pub async fn request_authorization<S>(store: &S) -> bool
where
    S: CalendarStore + ?Sized,
{
    let status = store.authorization_status().await;

    match status.decision() {
        GateDecision::Allow => true,
        GateDecision::Deny => {
            tracing::debug!(%status, "Calendar access denied");
            false
        }
        GateDecision::Prompt => match store.request_access().await {
            Ok(true) => {
                tracing::info!("Calendar access granted, resetting store");
                store.reset().await;
                true
            }
            Ok(false) => {
                tracing::debug!("Calendar access refused at prompt");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "Calendar permission prompt failed");
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use calmanager_core::authorization::AuthorizationStatus;
    use calmanager_core::calendar::{Calendar, EntityType, Event, EventId, Source, Span};
    use calmanager_core::storage::{EventPredicate, Result, StoreError};

    // Mock store that only models the permission flow and counts calls
    struct MockPermissionStore {
        status: RwLock<AuthorizationStatus>,
        answer: Result<bool>,
        prompts: AtomicUsize,
        resets: AtomicUsize,
    }

    impl MockPermissionStore {
        fn new(status: AuthorizationStatus, answer: Result<bool>) -> Self {
            Self {
                status: RwLock::new(status),
                answer,
                prompts: AtomicUsize::new(0),
                resets: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CalendarStore for MockPermissionStore {
        async fn authorization_status(&self) -> AuthorizationStatus {
            *self.status.read().await
        }

        async fn request_access(&self) -> Result<bool> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            if let Ok(granted) = self.answer {
                *self.status.write().await = if granted {
                    AuthorizationStatus::Authorized
                } else {
                    AuthorizationStatus::Denied
                };
            }
            self.answer.clone()
        }

        async fn calendars(&self, _entity_type: EntityType) -> Result<Vec<Calendar>> {
            Ok(Vec::new())
        }

        async fn sources(&self) -> Result<Vec<Source>> {
            Ok(Vec::new())
        }

        async fn default_calendar_for_new_events(&self) -> Result<Option<Calendar>> {
            Ok(None)
        }

        async fn save_calendar(&self, _calendar: &Calendar, _commit: bool) -> Result<()> {
            unreachable!("gate never writes")
        }

        async fn remove_calendar(&self, _calendar: &Calendar, _commit: bool) -> Result<()> {
            unreachable!("gate never writes")
        }

        async fn save_event(&self, _event: &Event, _span: Span, _commit: bool) -> Result<EventId> {
            unreachable!("gate never writes")
        }

        async fn remove_event(&self, _event: &Event, _span: Span, _commit: bool) -> Result<()> {
            unreachable!("gate never writes")
        }

        async fn event_with_identifier(&self, _id: &EventId) -> Result<Option<Event>> {
            Ok(None)
        }

        async fn events_matching(&self, _predicate: &EventPredicate) -> Result<Vec<Event>> {
            Ok(Vec::new())
        }

        async fn commit(&self) -> Result<()> {
            Ok(())
        }

        async fn reset(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_authorized_allows_without_prompt() {
        let store = MockPermissionStore::new(AuthorizationStatus::Authorized, Ok(true));

        assert!(request_authorization(&store).await);
        assert_eq!(store.prompts.load(Ordering::SeqCst), 0);
        assert_eq!(store.resets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_denied_and_restricted_refuse_without_prompt() {
        for status in [AuthorizationStatus::Denied, AuthorizationStatus::Restricted] {
            let store = MockPermissionStore::new(status, Ok(true));

            assert!(!request_authorization(&store).await);
            assert_eq!(store.prompts.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_grant_at_prompt_resets_store() {
        let store = MockPermissionStore::new(AuthorizationStatus::NotDetermined, Ok(true));

        assert!(request_authorization(&store).await);
        assert_eq!(store.prompts.load(Ordering::SeqCst), 1);
        assert_eq!(store.resets.load(Ordering::SeqCst), 1);

        // Later calls take the fast path.
        assert!(request_authorization(&store).await);
        assert_eq!(store.prompts.load(Ordering::SeqCst), 1);
        assert_eq!(store.resets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refusal_at_prompt_is_final() {
        let store = MockPermissionStore::new(AuthorizationStatus::NotDetermined, Ok(false));

        assert!(!request_authorization(&store).await);
        assert!(!request_authorization(&store).await);
        assert_eq!(store.prompts.load(Ordering::SeqCst), 1);
        assert_eq!(store.resets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_prompt_counts_as_refusal() {
        let store = MockPermissionStore::new(
            AuthorizationStatus::NotDetermined,
            Err(StoreError::Unavailable("no window server".to_string())),
        );

        assert!(!request_authorization(&store).await);
        assert_eq!(store.resets.load(Ordering::SeqCst), 0);
    }
}
