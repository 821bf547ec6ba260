//! Team chat stream port.
//!
//! The voting core only ever appends system messages (poll announcements,
//! outcome notices); message delivery and ordering for user chat is outside
//! this core.

use super::store::StoreError;
use async_trait::async_trait;
use teamforge_domain::TeamId;

/// Append-only access to a team's message stream.
#[async_trait]
pub trait TeamChat: Send + Sync {
    /// Append an automated, non-user-authored message to the team's chat.
    async fn append_system_message(&self, team: &TeamId, text: &str) -> Result<(), StoreError>;
}
