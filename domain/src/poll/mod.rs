//! Kick-poll aggregate: the vote ledger, majority arithmetic, and the poll
//! state machine (`active` → `completed(kicked | kept)`).

pub mod entities;
pub mod majority;
pub mod vote;

pub use entities::{KickPoll, PollOutcome, PollStatus};
pub use majority::{MajorityRule, PollDecision};
pub use vote::{VoteChoice, VoteLedger};
