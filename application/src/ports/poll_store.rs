//! Poll document store port.
//!
//! Defines the [`PollStore`] trait plus [`PollWatch`], the explicit
//! change-subscription handle that replaces ad-hoc live queries: callers
//! that want to react to poll updates subscribe here instead of polling
//! the store.

use super::store::{StoreError, Versioned};
use async_trait::async_trait;
use teamforge_domain::{KickPoll, PollId, TeamId};
use tokio::sync::mpsc;

/// Store for kick-poll documents.
///
/// Polls are never deleted; they only transition to `completed`. Every
/// write is a compare-and-swap keyed on the version from the preceding
/// `get` — this is what makes the read-modify-write of a vote cast a
/// single atomic step instead of two racing round trips.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Fetch a poll with its current version.
    async fn get(&self, id: &PollId) -> Result<Versioned<KickPoll>, StoreError>;

    /// Persist a newly created poll.
    async fn create(&self, poll: KickPoll) -> Result<(), StoreError>;

    /// Write back a modified poll if `expected_version` is still current.
    ///
    /// On success returns the committed snapshot with its new version —
    /// outcome evaluation must use these post-write tallies, never a
    /// separately re-read copy.
    async fn compare_and_update(
        &self,
        poll: KickPoll,
        expected_version: u64,
    ) -> Result<Versioned<KickPoll>, StoreError>;

    /// All polls of a team still accepting votes.
    async fn active_polls(&self, team: &TeamId) -> Result<Vec<KickPoll>, StoreError>;

    /// Subscribe to changes of one poll document.
    ///
    /// The store pushes a full snapshot after every committed write.
    async fn watch(&self, id: &PollId) -> Result<PollWatch, StoreError>;
}

/// Handle for receiving live poll snapshots.
///
/// Wraps an `mpsc::Receiver<KickPoll>` and provides convenience methods
/// for consuming the stream.
#[derive(Debug)]
pub struct PollWatch {
    pub receiver: mpsc::Receiver<KickPoll>,
}

impl PollWatch {
    pub fn new(receiver: mpsc::Receiver<KickPoll>) -> Self {
        Self { receiver }
    }

    /// Wait for the next snapshot; `None` once the store drops the feed.
    pub async fn changed(&mut self) -> Option<KickPoll> {
        self.receiver.recv().await
    }

    /// Consume snapshots until the poll leaves the `active` state.
    ///
    /// Returns the first completed snapshot, or `None` if the feed closes
    /// while the poll is still active.
    pub async fn completed(mut self) -> Option<KickPoll> {
        while let Some(poll) = self.receiver.recv().await {
            if !poll.is_active() {
                return Some(poll);
            }
        }
        None
    }
}
