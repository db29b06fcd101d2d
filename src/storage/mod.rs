//! Storage layer for docket.
//!
//! This module provides persistence for:
//! - Time entries (the durable record of stopped sessions)
//! - The live timer snapshot, so separate processes share one timer
//! - Entries whose save failed and are waiting for a retry

mod database;
mod migrations;
pub mod pending;
pub mod snapshot;
pub mod time_entries;

pub use database::Database;
pub use pending::PendingQueue;
pub use snapshot::{SessionStore, StoredTimer};
pub use time_entries::{NewTimeEntry, TimeEntry, TimeEntrySink, TimeEntryStorage};
