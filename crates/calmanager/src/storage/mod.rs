//! Calendar store implementations.
//!
//! The `CalendarStore` port lives in `calmanager_core::storage`; host
//! applications bring their own implementation backed by the platform
//! calendar service. This module only ships the in-memory backend, selected
//! with the `inmemory` feature (enabled by default).

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryCalendarStore;
