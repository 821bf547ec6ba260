//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Validation errors are terminal for the calling action and are surfaced to
/// the user as a rejected action. [`DomainError::Conflict`] is the one
/// retryable variant: it signals a lost optimistic-concurrency race and the
/// caller is expected to retry a bounded number of times.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Poll is not active")]
    PollNotActive,

    #[error("Voter has already voted on this poll")]
    AlreadyVoted,

    #[error("Invalid vote choice: {0}")]
    InvalidChoice(String),

    #[error("Not an eligible voter: {0}")]
    InvalidVoter(String),

    #[error("Concurrent update conflict, retry the operation")]
    Conflict,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl DomainError {
    /// Check if this error represents a lost concurrency race worth retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict)
    }
}
