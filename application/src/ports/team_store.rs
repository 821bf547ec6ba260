//! Team document store port.

use super::store::{StoreError, Versioned};
use async_trait::async_trait;
use teamforge_domain::{Team, TeamId};

/// Store for team aggregates.
///
/// Writes go through compare-and-swap keyed on the version returned by
/// `get`: the voting core never blind-writes a team document, because the
/// member list is also mutated by owner actions running concurrently.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Fetch a team with its current version.
    async fn get(&self, id: &TeamId) -> Result<Versioned<Team>, StoreError>;

    /// Insert a new team document.
    async fn insert(&self, team: Team) -> Result<(), StoreError>;

    /// Write back a modified team if `expected_version` is still current.
    async fn compare_and_update(
        &self,
        team: Team,
        expected_version: u64,
    ) -> Result<Versioned<Team>, StoreError>;

    /// Delete a team document (owner action).
    async fn delete(&self, id: &TeamId) -> Result<(), StoreError>;
}
