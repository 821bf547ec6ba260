//! JSON snapshot of the full store state.
//!
//! The CLI carries state between invocations by loading a snapshot at
//! startup and saving it back after the command runs. Document versions are
//! preserved so compare-and-swap semantics survive the round trip.

use super::records::{ChatMessage, NotificationRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use teamforge_application::MemberProfile;
use teamforge_domain::{HonorEvent, KickPoll, Team, UserId};
use thiserror::Error;

/// Errors raised while reading or writing a snapshot file
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A document together with its store version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedDoc<T> {
    pub doc: T,
    pub version: u64,
}

/// Serializable image of everything the in-memory store holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub teams: Vec<VersionedDoc<Team>>,
    pub polls: Vec<VersionedDoc<KickPoll>>,
    pub profiles: Vec<MemberProfile>,
    pub honor_history: HashMap<UserId, Vec<HonorEvent>>,
    pub messages: Vec<ChatMessage>,
    pub notifications: Vec<NotificationRecord>,
}

impl StoreSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
