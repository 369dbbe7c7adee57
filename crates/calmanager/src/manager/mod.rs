//! The calendar manager facade.
//!
//! [`CalendarManager`] wraps one [`CalendarStore`] and exposes permission
//! handling, the calendar directory, event CRUD and wide range queries. Every
//! operation passes the authorization gate first and reports failures as a
//! [`ManagerError`]; nothing store-level escapes untranslated.
//!
//! # Example
//!
//! ```rust,ignore
//! use calmanager::{CalendarManager, InMemoryCalendarStore};
//!
//! let manager = CalendarManager::new(InMemoryCalendarStore::new());
//! let titles = manager.calendar_titles().await?;
//! ```

mod calendars;
mod events;

use std::future::Future;
use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;

use calmanager_core::authorization::AuthorizationStatus;
use calmanager_core::calendar::{Calendar, ManagerError, ManagerResult};
use calmanager_core::storage::CalendarStore;

use crate::authorization::request_authorization;
use crate::config::ManagerConfig;

struct Inner<S> {
    store: Arc<S>,
    config: ManagerConfig,
}

/// Facade over a platform calendar store.
///
/// Cloning is cheap and every clone drives the same store.
pub struct CalendarManager<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for CalendarManager<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for CalendarManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarManager")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// A handle that does not keep the manager alive.
pub struct WeakCalendarManager<S> {
    inner: Weak<Inner<S>>,
}

impl<S> Clone for WeakCalendarManager<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> WeakCalendarManager<S> {
    /// Returns the manager if any strong handle still exists.
    pub fn upgrade(&self) -> Option<CalendarManager<S>> {
        self.inner.upgrade().map(|inner| CalendarManager { inner })
    }

    /// Returns true while some strong handle exists.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<S> CalendarManager<S>
where
    S: CalendarStore + 'static,
{
    /// Creates a manager with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ManagerConfig::default())
    }

    /// Creates a manager with the given configuration.
    pub fn with_config(store: S, config: ManagerConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Creates a manager over a store that is shared with other code.
    pub fn from_shared(store: Arc<S>, config: ManagerConfig) -> Self {
        Self {
            inner: Arc::new(Inner { store, config }),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    /// Returns a handle that does not extend the manager's lifetime.
    pub fn downgrade(&self) -> WeakCalendarManager<S> {
        WeakCalendarManager {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current permission state. Never prompts.
    pub async fn authorization_status(&self) -> AuthorizationStatus {
        self.store().authorization_status().await
    }

    /// Resolves calendar access, prompting the user if it is undetermined.
    pub async fn request_authorization(&self) -> bool {
        request_authorization(self.store()).await
    }

    /// Passes the gate or fails with [`ManagerError::AccessDenied`].
    async fn ensure_authorized(&self) -> ManagerResult<()> {
        if self.request_authorization().await {
            Ok(())
        } else {
            Err(ManagerError::AccessDenied)
        }
    }

    /// The calendar new events go to, or an operation failure if the host
    /// has none configured.
    async fn default_calendar(&self) -> ManagerResult<Calendar> {
        self.store()
            .default_calendar_for_new_events()
            .await?
            .ok_or_else(|| {
                tracing::warn!("No default calendar for new events");
                ManagerError::unknown()
            })
    }

    /// Flushes changes saved with `commit = false`.
    ///
    /// Returns false when access is denied or the store fails; the failure is
    /// logged but not returned.
    pub async fn commit(&self) -> bool {
        if !self.request_authorization().await {
            return false;
        }
        match self.store().commit().await {
            Ok(()) => {
                tracing::debug!("Calendar store committed");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Calendar store commit failed");
                false
            }
        }
    }

    /// Drops the store's cached state so later reads refetch from the host.
    pub async fn reset(&self) {
        self.store().reset().await;
        tracing::debug!("Calendar store reset");
    }

    /// Runs `op` on the tokio runtime and hands its result to `completion`.
    ///
    /// Only a weak handle is held while the permission prompt is pending. If
    /// every strong handle is gone when the prompt resolves, or when `op`
    /// finishes, `completion` is never called.
    pub fn spawn<T, F, Fut, C>(&self, op: F, completion: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: FnOnce(CalendarManager<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ManagerResult<T>> + Send + 'static,
        C: FnOnce(ManagerResult<T>) + Send + 'static,
    {
        let store = Arc::clone(&self.inner.store);
        let weak = self.downgrade();

        tokio::spawn(async move {
            let allowed = request_authorization(store.as_ref()).await;
            drop(store);

            let Some(manager) = weak.upgrade() else {
                tracing::trace!("Calendar manager dropped during authorization, discarding");
                return;
            };

            let result = if allowed {
                op(manager).await
            } else {
                drop(manager);
                Err(ManagerError::AccessDenied)
            };

            if weak.is_alive() {
                completion(result);
            } else {
                tracing::trace!("Calendar manager dropped during operation, discarding");
            }
        })
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use calmanager_core::calendar::{Source, SourceKind};

    use crate::storage::inmemory::InMemoryCalendarStore;

    fn local() -> Source {
        Source::new("local", "On My Mac", SourceKind::Local)
    }

    #[tokio::test]
    async fn test_commit_flushes_pending_changes() {
        let store = InMemoryCalendarStore::new().with_source(local());
        let manager = CalendarManager::new(store);

        let calendar = manager.add_calendar("Work", false).await.unwrap();
        assert!(manager.store().platform_calendars().await.is_empty());

        assert!(manager.commit().await);
        let committed = manager.store().platform_calendars().await;
        assert_eq!(committed, vec![calendar]);
    }

    #[tokio::test]
    async fn test_commit_failure_returns_false() {
        let store = InMemoryCalendarStore::new()
            .with_source(local())
            .fail_commits();
        let manager = CalendarManager::new(store);

        assert!(!manager.commit().await);
    }

    #[tokio::test]
    async fn test_commit_when_denied_returns_false() {
        let store = InMemoryCalendarStore::new().with_status(AuthorizationStatus::Denied);
        let manager = CalendarManager::new(store);

        assert!(!manager.commit().await);
        assert_eq!(manager.store().mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_reset_discards_uncommitted_changes() {
        let store = InMemoryCalendarStore::new().with_source(local());
        let manager = CalendarManager::new(store);

        manager.add_calendar("Draft", false).await.unwrap();
        assert_eq!(manager.calendar_titles().await.unwrap(), vec!["Draft"]);

        manager.reset().await;
        assert!(manager.calendar_titles().await.unwrap().is_empty());
        assert!(manager.commit().await);
        assert!(manager.store().platform_calendars().await.is_empty());
    }

    #[tokio::test]
    async fn test_revoked_access_denies_later_calls() {
        let store =
            InMemoryCalendarStore::new().with_default_calendar(Calendar::new("Home", local()));
        let manager = CalendarManager::new(store);

        assert!(manager.calendars().await.is_ok());
        manager
            .store()
            .set_status(AuthorizationStatus::Denied)
            .await;
        assert_eq!(manager.calendars().await, Err(ManagerError::AccessDenied));
        assert_eq!(manager.store().prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_prompt_is_access_denied() {
        let store = InMemoryCalendarStore::new()
            .with_status(AuthorizationStatus::NotDetermined)
            .fail_prompt();
        let manager = CalendarManager::new(store);

        assert_eq!(manager.calendars().await, Err(ManagerError::AccessDenied));
        assert_eq!(
            manager.authorization_status().await,
            AuthorizationStatus::NotDetermined
        );
        assert_eq!(manager.store().reset_count(), 0);
    }

    #[tokio::test]
    async fn test_spawn_delivers_result() {
        let store = InMemoryCalendarStore::new()
            .with_default_calendar(Calendar::new("Home", local()).with_identifier("home"));
        let manager = CalendarManager::new(store);
        let (tx, rx) = tokio::sync::oneshot::channel();

        manager
            .spawn(
                |manager| async move { manager.calendar_titles().await },
                move |result| {
                    let _ = tx.send(result);
                },
            )
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap(), Ok(vec!["Home".to_string()]));
    }

    #[tokio::test]
    async fn test_spawn_reports_access_denied() {
        let store = InMemoryCalendarStore::new()
            .with_status(AuthorizationStatus::NotDetermined)
            .with_prompt_answer(false);
        let manager = CalendarManager::new(store);
        let (tx, rx) = tokio::sync::oneshot::channel();

        manager
            .spawn(
                |manager| async move { manager.calendars().await },
                move |result| {
                    let _ = tx.send(result);
                },
            )
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap(), Err(ManagerError::AccessDenied));
        assert_eq!(manager.store().prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_spawn_drops_completion_when_manager_is_gone() {
        let store = InMemoryCalendarStore::new();
        let manager = CalendarManager::new(store);
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);

        let handle = manager.spawn(
            |manager| async move { manager.calendars().await },
            move |_| flag.store(true, Ordering::SeqCst),
        );
        let weak = manager.downgrade();
        drop(manager);
        handle.await.unwrap();

        assert!(!weak.is_alive());
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_weak_handle_does_not_keep_manager_alive() {
        let manager = CalendarManager::new(InMemoryCalendarStore::new());
        let weak = manager.downgrade();

        assert!(weak.upgrade().is_some());
        drop(manager);
        assert!(weak.upgrade().is_none());
    }
}
