//! In-memory document store adapter.
//!
//! Implements every application port against process-local state with the
//! same contract a hosted document store would give us: versioned documents,
//! compare-and-swap writes that fail on a stale version, append-only
//! collections, and a push feed of poll changes.

pub mod records;
pub mod snapshot;
pub mod store;

pub use records::{ChatMessage, NotificationRecord};
pub use snapshot::{SnapshotError, StoreSnapshot};
pub use store::InMemoryStore;
