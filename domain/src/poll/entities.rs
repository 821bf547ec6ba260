//! Kick-poll entity and its state machine.
//!
//! A poll is created `Active` with an empty ledger and only ever makes one
//! transition: to `Completed` with an outcome of `Kicked` or `Kept`.
//! `Completed` is terminal — no further votes, no transition out.

use crate::core::error::DomainError;
use crate::core::ids::{PollId, TeamId, UserId};
use crate::poll::vote::{VoteChoice, VoteLedger};
use crate::team::entities::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Poll lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Active,
    Completed,
}

/// Terminal outcome of a completed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollOutcome {
    /// Yes-majority reached: the target was removed and penalized.
    Kicked,
    /// Yes-majority became impossible: the target stays.
    Kept,
}

impl std::fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollOutcome::Kicked => write!(f, "kicked"),
            PollOutcome::Kept => write!(f, "kept"),
        }
    }
}

/// One kick attempt against a team member.
///
/// Invariants:
/// - `yes_count + no_count == votes.len()` after every mutation;
/// - `outcome` is `Some` if and only if `status == Completed`;
/// - the ledger never contains the target or the poll creator (both are
///   rejected as voters before insertion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickPoll {
    pub id: PollId,
    pub team_id: TeamId,
    /// Member the poll proposes to remove.
    pub target: UserId,
    /// Display-name snapshot taken at creation, for messages that outlive
    /// the membership.
    pub target_name: String,
    pub reason: String,
    /// The leader who opened the poll.
    pub created_by: UserId,
    pub status: PollStatus,
    pub outcome: Option<PollOutcome>,
    pub votes: VoteLedger,
    pub yes_count: usize,
    pub no_count: usize,
    pub created_at: DateTime<Utc>,
    /// Optional deadline; a poll past its deadline resolves as `Kept`.
    /// `None` (the default) means the poll waits for votes indefinitely.
    pub expires_at: Option<DateTime<Utc>>,
}

impl KickPoll {
    pub fn new(
        id: PollId,
        team_id: TeamId,
        target: UserId,
        target_name: impl Into<String>,
        reason: impl Into<String>,
        created_by: UserId,
    ) -> Self {
        Self {
            id,
            team_id,
            target,
            target_name: target_name.into(),
            reason: reason.into(),
            created_by,
            status: PollStatus::Active,
            outcome: None,
            votes: VoteLedger::new(),
            yes_count: 0,
            no_count: 0,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Set a resolution deadline.
    pub fn with_deadline(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == PollStatus::Active
    }

    /// Whether the deadline, if any, has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }

    pub fn has_voted(&self, voter: &UserId) -> bool {
        self.votes.contains(voter)
    }

    /// Check that `voter` may cast a vote on this poll.
    ///
    /// The target and the poll creator are rejected, as is anyone not on
    /// the team's current roster. The eligible-count denominator excludes
    /// only the target (see [`Team::eligible_voter_count`]), so a creator
    /// who never votes can leave a poll short of quorum.
    pub fn check_voter(&self, voter: &UserId, team: &Team) -> Result<(), DomainError> {
        if *voter == self.target {
            return Err(DomainError::InvalidVoter(
                "the poll target cannot vote on their own kick".to_string(),
            ));
        }
        if *voter == self.created_by {
            return Err(DomainError::InvalidVoter(
                "the poll creator does not vote".to_string(),
            ));
        }
        if !team.is_member(voter) {
            return Err(DomainError::InvalidVoter(format!(
                "{voter} is not a member of team {}",
                team.id
            )));
        }
        Ok(())
    }

    /// Record a vote and recompute the tallies from the full ledger.
    ///
    /// Fails with [`DomainError::PollNotActive`] on a completed poll and
    /// [`DomainError::AlreadyVoted`] on a duplicate voter; tallies are
    /// untouched on any failure.
    pub fn record_vote(&mut self, voter: UserId, choice: VoteChoice) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::PollNotActive);
        }
        self.votes.insert(voter, choice)?;
        let (yes, no) = self.votes.tally();
        self.yes_count = yes;
        self.no_count = no;
        Ok(())
    }

    /// Transition to `Completed` with the given outcome.
    ///
    /// Completed polls are terminal; closing one again is rejected.
    pub fn close(&mut self, outcome: PollOutcome) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::PollNotActive);
        }
        self.status = PollStatus::Completed;
        self.outcome = Some(outcome);
        Ok(())
    }
}
