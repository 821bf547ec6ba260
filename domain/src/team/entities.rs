//! Team entity and lifecycle status.

use crate::core::error::DomainError;
use crate::core::ids::{TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TeamStatus {
    /// Recruiting; open to join requests.
    #[default]
    Open,
    /// Roster locked, project underway.
    InProgress,
    /// No longer recruiting.
    Closed,
    /// Project finished.
    Completed,
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamStatus::Open => write!(f, "Open"),
            TeamStatus::InProgress => write!(f, "In Progress"),
            TeamStatus::Closed => write!(f, "Closed"),
            TeamStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// A team aggregate.
///
/// The member list is a set (unique identities, order irrelevant to the
/// logic). Invariant: `created_by` is always present in `members` — the
/// leader cannot be voted out, only members other than the leader can.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// The leader: sole initiator of kick polls.
    pub created_by: UserId,
    pub members: Vec<UserId>,
    pub status: TeamStatus,
    /// Desired final roster size.
    pub target_size: usize,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with the creator as leader and first member.
    pub fn new(id: TeamId, created_by: UserId, target_size: usize) -> Self {
        Self {
            id,
            members: vec![created_by.clone()],
            created_by,
            status: TeamStatus::Open,
            target_size,
            created_at: Utc::now(),
        }
    }

    /// Whether the given user is the team leader.
    pub fn is_leader(&self, user: &UserId) -> bool {
        self.created_by == *user
    }

    /// Whether the given user is currently a member.
    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Add a member, ignoring duplicates.
    pub fn add_member(&mut self, user: UserId) {
        if !self.members.contains(&user) {
            self.members.push(user);
        }
    }

    /// Remove a member from the roster.
    ///
    /// The leader cannot be removed; doing so would break the
    /// `created_by ∈ members` invariant.
    pub fn remove_member(&mut self, user: &UserId) -> Result<(), DomainError> {
        if self.is_leader(user) {
            return Err(DomainError::InvalidTarget(
                "the team leader cannot be removed".to_string(),
            ));
        }
        let before = self.members.len();
        self.members.retain(|m| m != user);
        if self.members.len() == before {
            return Err(DomainError::NotFound(format!(
                "{user} is not a member of team {}",
                self.id
            )));
        }
        Ok(())
    }

    /// Number of members eligible to vote on a poll targeting `target`,
    /// i.e. all current members except the target.
    ///
    /// Re-derive this at evaluation time, never from a snapshot taken at
    /// poll creation: membership can change while a poll is open.
    pub fn eligible_voter_count(&self, target: &UserId) -> usize {
        self.members.iter().filter(|m| *m != target).count()
    }
}
