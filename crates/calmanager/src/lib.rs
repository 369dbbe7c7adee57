//! calmanager - a convenience facade over a platform calendar store.
//!
//! The host calendar service is reached through the
//! [`CalendarStore`](calmanager_core::storage::CalendarStore) trait. The
//! [`CalendarManager`] adds the permission gate, calendar creation with
//! source fallback, event CRUD and wide range queries on top of it.

pub mod authorization;
pub mod config;
pub mod manager;
pub mod storage;

pub use calmanager_core::authorization::AuthorizationStatus;
pub use calmanager_core::calendar::{
    Calendar, CalendarId, EntityType, Event, EventId, ManagerError, ManagerResult, Source,
    SourceKind, Span,
};
pub use calmanager_core::storage::{CalendarStore, DateRange, EventPredicate, StoreError};
pub use config::ManagerConfig;
pub use manager::{CalendarManager, WeakCalendarManager};

#[cfg(feature = "inmemory")]
pub use storage::InMemoryCalendarStore;
