//! Infrastructure layer for teamforge
//!
//! This crate contains the adapters behind the application ports: a
//! versioned in-memory document store with compare-and-swap writes and
//! live change feeds, JSON snapshot persistence for carrying state across
//! process runs, and the configuration loader.

pub mod config;
pub mod memory;

pub use config::{ConfigLoader, FileConfig};
pub use memory::{InMemoryStore, StoreSnapshot};
