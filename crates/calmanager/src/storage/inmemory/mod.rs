//! In-memory calendar store for testing.
//!
//! This module provides an in-memory implementation of the `CalendarStore`
//! trait that keeps a platform-side catalog and a cached view of it behind a
//! `tokio::sync::RwLock`. It stands in for the host calendar service in tests
//! and development, with hooks to inject failures and inspect the calls the
//! facade made.
//!
//! # Example
//!
//! ```rust,ignore
//! use calmanager::storage::inmemory::InMemoryCalendarStore;
//!
//! let store = InMemoryCalendarStore::new().reject_source("icloud");
//! // Use store for testing...
//! ```

mod store;

pub use store::InMemoryCalendarStore;
