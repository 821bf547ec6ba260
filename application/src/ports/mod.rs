//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! The voting core reads and writes externally persisted aggregates through
//! these seams; it holds no authoritative in-memory state of its own.

pub mod chat_stream;
pub mod notifier;
pub mod poll_store;
pub mod profile_store;
pub mod store;
pub mod team_store;
