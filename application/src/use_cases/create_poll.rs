//! Create Poll use case
//!
//! The poll lifecycle manager: only the team leader may open a kick poll,
//! and every precondition is enforced here regardless of what any client
//! UI filtered out.

use crate::config::VotingConfig;
use crate::ports::chat_stream::TeamChat;
use crate::ports::poll_store::PollStore;
use crate::ports::profile_store::ProfileStore;
use crate::ports::store::StoreError;
use crate::ports::team_store::TeamStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use teamforge_domain::{DomainError, KickPoll, PollId, TeamId, UserId};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while creating a poll
#[derive(Error, Debug)]
pub enum CreatePollError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the CreatePoll use case
#[derive(Debug, Clone)]
pub struct CreatePollInput {
    pub team_id: TeamId,
    /// Caller identity, as supplied by the identity provider.
    pub requester: UserId,
    /// Member the poll proposes to kick.
    pub target: UserId,
    pub reason: String,
}

/// Use case for opening a kick poll against a team member.
pub struct CreatePollUseCase {
    teams: Arc<dyn TeamStore>,
    polls: Arc<dyn PollStore>,
    profiles: Arc<dyn ProfileStore>,
    chat: Arc<dyn TeamChat>,
    config: VotingConfig,
}

impl CreatePollUseCase {
    pub fn new(
        teams: Arc<dyn TeamStore>,
        polls: Arc<dyn PollStore>,
        profiles: Arc<dyn ProfileStore>,
        chat: Arc<dyn TeamChat>,
        config: VotingConfig,
    ) -> Self {
        Self {
            teams,
            polls,
            profiles,
            chat,
            config,
        }
    }

    /// Validate, persist a fresh `active` poll, and announce it in the
    /// team chat. The target is deliberately not notified at creation.
    pub async fn execute(&self, input: CreatePollInput) -> Result<KickPoll, CreatePollError> {
        let team = self.teams.get(&input.team_id).await?.value;

        if !team.is_leader(&input.requester) {
            return Err(DomainError::PermissionDenied(
                "only the team leader may start a kick poll".to_string(),
            )
            .into());
        }
        if input.target == input.requester {
            return Err(DomainError::InvalidTarget(
                "the leader cannot open a poll against themself".to_string(),
            )
            .into());
        }
        if !team.is_member(&input.target) {
            return Err(DomainError::InvalidTarget(format!(
                "{} is not a member of team {}",
                input.target, team.id
            ))
            .into());
        }
        if input.reason.trim().is_empty() {
            return Err(
                DomainError::ValidationError("a kick poll needs a reason".to_string()).into(),
            );
        }

        // Snapshot the display name now: messages must stay readable after
        // the member is gone.
        let target_name = match self.profiles.get(&input.target).await {
            Ok(profile) => profile.display_name,
            Err(StoreError::NotFound(_)) => "Unknown".to_string(),
            Err(e) => return Err(e.into()),
        };

        let mut poll = KickPoll::new(
            PollId::generate(),
            team.id.clone(),
            input.target.clone(),
            target_name.clone(),
            input.reason,
            input.requester,
        );
        if let Some(secs) = self.config.poll_deadline_secs {
            let deadline = i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|window| Utc::now().checked_add_signed(window));
            match deadline {
                Some(at) => poll = poll.with_deadline(at),
                None => warn!(secs, "poll deadline out of range, poll left open-ended"),
            }
        }

        self.polls.create(poll.clone()).await?;

        info!(
            poll = %poll.id,
            team = %team.id,
            target = %poll.target,
            "kick poll created"
        );

        // The announcement is best-effort once the poll exists.
        if let Err(e) = self
            .chat
            .append_system_message(&team.id, &format!("Voting started: Kick {target_name}"))
            .await
        {
            warn!(poll = %poll.id, error = %e, "failed to announce poll in team chat");
        }

        Ok(poll)
    }
}
