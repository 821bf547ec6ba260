//! Vote primitives for kick polls
//!
//! This module defines the yes/no vote choice and the per-poll vote ledger.

use crate::core::error::DomainError;
use crate::core::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single member's vote on a kick poll
///
/// # Example
///
/// ```
/// use teamforge_domain::poll::VoteChoice;
///
/// let choice: VoteChoice = "yes".parse().unwrap();
/// assert_eq!(choice, VoteChoice::Yes);
/// assert!("maybe".parse::<VoteChoice>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    /// Kick the target
    Yes,
    /// Keep the target
    No,
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteChoice::Yes => write!(f, "yes"),
            VoteChoice::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" => Ok(VoteChoice::Yes),
            "no" => Ok(VoteChoice::No),
            other => Err(DomainError::InvalidChoice(other.to_string())),
        }
    }
}

/// The ledger of votes cast on one poll: voter identity → choice.
///
/// Keys are unique, so one voter holds at most one vote. The map is ordered
/// to keep serialized snapshots deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteLedger(BTreeMap<UserId, VoteChoice>);

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given voter already holds an entry.
    pub fn contains(&self, voter: &UserId) -> bool {
        self.0.contains_key(voter)
    }

    /// Insert a vote, failing with [`DomainError::AlreadyVoted`] if the
    /// voter already has an entry. Existing entries are never overwritten.
    pub fn insert(&mut self, voter: UserId, choice: VoteChoice) -> Result<(), DomainError> {
        if self.0.contains_key(&voter) {
            return Err(DomainError::AlreadyVoted);
        }
        self.0.insert(voter, choice);
        Ok(())
    }

    /// Recompute (yes, no) counts by a full scan of the ledger.
    ///
    /// A full re-scan rather than incremental bookkeeping: the counts can
    /// never drift from the ledger, whatever sequence of writes produced it.
    pub fn tally(&self) -> (usize, usize) {
        let yes = self.0.values().filter(|v| **v == VoteChoice::Yes).count();
        (yes, self.0.len() - yes)
    }

    /// Number of distinct voters recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (voter, choice) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &VoteChoice)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parse_and_display() {
        assert_eq!("yes".parse::<VoteChoice>().unwrap(), VoteChoice::Yes);
        assert_eq!("NO".parse::<VoteChoice>().unwrap(), VoteChoice::No);
        assert_eq!(VoteChoice::Yes.to_string(), "yes");
        assert!(matches!(
            "abstain".parse::<VoteChoice>(),
            Err(DomainError::InvalidChoice(_))
        ));
    }

    #[test]
    fn test_choice_serde_lowercase() {
        assert_eq!(serde_json::to_string(&VoteChoice::Yes).unwrap(), "\"yes\"");
        let back: VoteChoice = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(back, VoteChoice::No);
    }

    #[test]
    fn test_ledger_insert_and_tally() {
        let mut ledger = VoteLedger::new();
        ledger.insert(UserId::new("a"), VoteChoice::Yes).unwrap();
        ledger.insert(UserId::new("b"), VoteChoice::No).unwrap();
        ledger.insert(UserId::new("c"), VoteChoice::Yes).unwrap();

        let (yes, no) = ledger.tally();
        assert_eq!((yes, no), (2, 1));
        assert_eq!(yes + no, ledger.len());
    }

    #[test]
    fn test_ledger_rejects_double_vote() {
        let mut ledger = VoteLedger::new();
        ledger.insert(UserId::new("a"), VoteChoice::Yes).unwrap();
        let err = ledger.insert(UserId::new("a"), VoteChoice::No).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyVoted));
        // The original vote is untouched.
        assert_eq!(ledger.tally(), (1, 0));
    }

    #[test]
    fn test_ledger_serializes_as_plain_map() {
        let mut ledger = VoteLedger::new();
        ledger.insert(UserId::new("a"), VoteChoice::Yes).unwrap();
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json, serde_json::json!({"a": "yes"}));
    }
}
