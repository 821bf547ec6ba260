//! Member-profile store port.
//!
//! Profiles are owned by an external identity/profile service; the voting
//! core only reads display data and applies honor adjustments through this
//! seam.

use super::store::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use teamforge_domain::{HonorEvent, UserId};

/// The slice of a member profile the voting core needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: UserId,
    pub display_name: String,
    pub honor_score: i64,
}

/// Store for member profiles and the append-only honor history.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile.
    async fn get(&self, id: &UserId) -> Result<MemberProfile, StoreError>;

    /// Apply a signed delta to the honor score as a single server-side
    /// operation (no read-modify-write at the caller). Returns the new
    /// score.
    async fn adjust_honor(&self, id: &UserId, delta: i64) -> Result<i64, StoreError>;

    /// Append an entry to the member's honor history. Entries are never
    /// updated or removed.
    async fn append_honor_event(&self, id: &UserId, event: HonorEvent) -> Result<(), StoreError>;
}
