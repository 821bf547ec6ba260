//! Honor scoring: the per-member reputation value, the kick penalty, and
//! the append-only adjustment history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score every new member profile starts with.
pub const HONOR_STARTING_SCORE: i64 = 100;

/// Points deducted from a member kicked by majority vote.
pub const HONOR_KICK_PENALTY: i64 = 10;

/// One entry in a member's append-only honor history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HonorEvent {
    /// Signed adjustment applied to the score (negative for penalties).
    pub amount: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl HonorEvent {
    pub fn new(amount: i64, reason: impl Into<String>) -> Self {
        Self {
            amount,
            reason: reason.into(),
            created_at: Utc::now(),
        }
    }
}

/// Reputation tier derived from an honor score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HonorTier {
    Rookie,
    Member,
    Skilled,
    Expert,
    Master,
    Legend,
}

impl HonorTier {
    /// Map a score to its tier.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s >= 900 => HonorTier::Legend,
            s if s >= 700 => HonorTier::Master,
            s if s >= 500 => HonorTier::Expert,
            s if s >= 300 => HonorTier::Skilled,
            s if s >= 100 => HonorTier::Member,
            _ => HonorTier::Rookie,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HonorTier::Legend => "Legend",
            HonorTier::Master => "Master",
            HonorTier::Expert => "Expert",
            HonorTier::Skilled => "Skilled",
            HonorTier::Member => "Member",
            HonorTier::Rookie => "Rookie",
        }
    }
}

impl std::fmt::Display for HonorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
