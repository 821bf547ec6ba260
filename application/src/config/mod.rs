//! Application-level configuration.
//!
//! [`VotingConfig`] controls how the voting use cases behave: the bound on
//! optimistic-concurrency retries, the honor penalty applied on a kick, and
//! the optional poll deadline.

use serde::{Deserialize, Serialize};
use teamforge_domain::HONOR_KICK_PENALTY;

/// Tunables for the honor-vote use cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    /// How many times a vote cast retries after losing a compare-and-swap
    /// race before surfacing a transient failure.
    pub max_vote_retries: u32,

    /// Honor points deducted from a kicked member.
    pub honor_kick_penalty: i64,

    /// Deadline in seconds applied to newly created polls. `None` keeps
    /// the reference behavior: a poll with insufficient turnout stays
    /// active indefinitely. When set, a poll past its deadline resolves
    /// as `kept`.
    pub poll_deadline_secs: Option<u64>,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            max_vote_retries: 5,
            honor_kick_penalty: HONOR_KICK_PENALTY,
            poll_deadline_secs: None,
        }
    }
}
