//! Majority arithmetic for kick-poll resolution
//!
//! This module decides, after every vote, whether a poll has reached a
//! terminal state in either direction.

use serde::{Deserialize, Serialize};

/// Decision produced by evaluating a poll's tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollDecision {
    /// A strict yes-majority was reached: execute the kick.
    Kick,
    /// A yes-majority is now mathematically impossible: keep the member.
    Keep,
    /// Neither side has locked the result; the poll stays active.
    Pending,
}

impl PollDecision {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollDecision::Pending)
    }
}

impl std::fmt::Display for PollDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollDecision::Kick => write!(f, "kick"),
            PollDecision::Keep => write!(f, "keep"),
            PollDecision::Pending => write!(f, "pending"),
        }
    }
}

/// Strict-majority rule over a pool of eligible voters.
///
/// The eligible pool is the team's current member list minus the poll's
/// target. The threshold is `floor(n / 2) + 1` — more than half.
///
/// # Example
///
/// ```
/// use teamforge_domain::poll::{MajorityRule, PollDecision};
///
/// let rule = MajorityRule::new(5);
/// assert_eq!(rule.required_majority(), 3);
/// assert_eq!(rule.evaluate(3, 0), PollDecision::Kick);
/// assert_eq!(rule.evaluate(0, 3), PollDecision::Keep);
/// assert_eq!(rule.evaluate(2, 2), PollDecision::Pending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityRule {
    eligible_voters: usize,
}

impl MajorityRule {
    pub fn new(eligible_voters: usize) -> Self {
        Self { eligible_voters }
    }

    /// Number of eligible voters this rule was derived from.
    pub fn eligible_voters(&self) -> usize {
        self.eligible_voters
    }

    /// Minimum yes votes for a strict majority (`floor(n/2) + 1`).
    pub fn required_majority(&self) -> usize {
        self.eligible_voters / 2 + 1
    }

    /// Evaluate the current tallies.
    ///
    /// - `Kick` once yes votes reach the majority threshold.
    /// - `Keep` once no votes exceed `n - majority`: even if every remaining
    ///   eligible voter voted yes, the threshold could no longer be reached.
    /// - `Pending` otherwise.
    pub fn evaluate(&self, yes_count: usize, no_count: usize) -> PollDecision {
        let majority = self.required_majority();
        if yes_count >= majority {
            PollDecision::Kick
        } else if no_count > self.eligible_voters.saturating_sub(majority) {
            PollDecision::Keep
        } else {
            PollDecision::Pending
        }
    }
}
