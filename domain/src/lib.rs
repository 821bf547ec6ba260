//! Domain layer for teamforge
//!
//! This crate contains the core business logic, entities, and value objects
//! for the honor-vote kick mechanism. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Honor vote
//!
//! A team leader may open a kick poll against a member. Every other member
//! casts exactly one yes/no vote; a strict majority of eligible voters
//! decides the outcome:
//!
//! - **Kicked**: yes votes reach the majority threshold — the target loses
//!   honor and is removed from the team.
//! - **Kept**: enough no votes arrive that a yes majority is mathematically
//!   impossible — the poll closes with no consequence.
//!
//! ## Honor score
//!
//! Every member profile carries an integer reputation score (starting at
//! 100). Moderation outcomes adjust it; an append-only history records every
//! adjustment.

pub mod core;
pub mod honor;
pub mod poll;
pub mod team;

// Re-export commonly used types
pub use self::core::{
    error::DomainError,
    ids::{PollId, TeamId, UserId},
};
pub use honor::{HONOR_KICK_PENALTY, HONOR_STARTING_SCORE, HonorEvent, HonorTier};
pub use poll::{
    entities::{KickPoll, PollOutcome, PollStatus},
    majority::{MajorityRule, PollDecision},
    vote::{VoteChoice, VoteLedger},
};
pub use team::entities::{Team, TeamStatus};
