//! Append-only record types kept by the store: chat messages and
//! notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamforge_application::NotificationKind;
use teamforge_domain::{TeamId, UserId};

/// One entry in a team's message stream.
///
/// The voting core only writes system messages; `author` is kept so the
/// stream can also carry user messages persisted by other parts of the
/// application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub team_id: TeamId,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// An automated, non-user-authored message.
    pub fn system(team_id: TeamId, text: impl Into<String>) -> Self {
        Self {
            team_id,
            author: "System".to_string(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.author == "System"
    }
}

/// A delivered notification, stored unread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub team_id: Option<TeamId>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        team_id: Option<TeamId>,
    ) -> Self {
        Self {
            recipient,
            kind,
            message: message.into(),
            team_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}
