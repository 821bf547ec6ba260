//! Application layer for teamforge
//!
//! This crate contains the honor-vote use cases, port definitions, and
//! application configuration. It depends only on the domain layer.
//!
//! The two use cases split the voting core along its natural seams:
//!
//! - [`CreatePollUseCase`] — poll lifecycle: leader-only creation, seeding.
//! - [`CastVoteUseCase`] — the vote ledger plus outcome resolution, executed
//!   as one atomic compare-and-swap against the poll document.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::VotingConfig;
pub use ports::{
    chat_stream::TeamChat,
    notifier::{NoNotifier, NotificationKind, Notifier},
    poll_store::{PollStore, PollWatch},
    profile_store::{MemberProfile, ProfileStore},
    store::{StoreError, Versioned},
    team_store::TeamStore,
};
pub use use_cases::cast_vote::{CastVoteError, CastVoteInput, CastVoteOutput, CastVoteUseCase};
pub use use_cases::create_poll::{CreatePollError, CreatePollInput, CreatePollUseCase};
