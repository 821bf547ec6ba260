//! Notification sink port.
//!
//! Notifications are fire-and-forget: the `notify` method is infallible by
//! contract and adapters log delivery failures instead of propagating them.
//! A failed notification must never roll back a committed poll outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use teamforge_domain::{TeamId, UserId};

/// Category of a notification, for recipient-side filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient was removed from a team by majority vote.
    MemberKicked,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::MemberKicked => write!(f, "member_kicked"),
        }
    }
}

/// Best-effort delivery of user notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification to one recipient.
    async fn notify(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
        message: &str,
        team: Option<&TeamId>,
    );
}

/// No-op implementation for tests and headless runs.
pub struct NoNotifier;

#[async_trait]
impl Notifier for NoNotifier {
    async fn notify(
        &self,
        _recipient: &UserId,
        _kind: NotificationKind,
        _message: &str,
        _team: Option<&TeamId>,
    ) {
    }
}
