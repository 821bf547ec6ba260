//! Use cases implementing the honor-vote core.

pub mod cast_vote;
pub mod create_poll;

#[cfg(test)]
pub mod testing;

pub use cast_vote::{CastVoteError, CastVoteInput, CastVoteOutput, CastVoteUseCase};
pub use create_poll::{CreatePollError, CreatePollInput, CreatePollUseCase};
