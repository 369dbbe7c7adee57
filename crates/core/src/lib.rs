//! Core types for the calmanager calendar facade.
//!
//! Everything in this crate is pure: data types, the [`storage::CalendarStore`]
//! port that a host platform implements, error kinds, and the small
//! algorithms (calendar lookup, source fallback ordering, range windowing)
//! that the facade in the `calmanager` crate drives.

pub mod authorization;
pub mod calendar;
pub mod storage;
