//! Cast Vote use case
//!
//! The vote ledger and outcome resolver in one atomic step. A vote cast is
//! a read-modify-write against a shared poll document with concurrent
//! writers, so the whole of "check not voted → insert → recompute tallies →
//! maybe close" is committed through a single compare-and-swap; losing the
//! race means re-reading and retrying, never overwriting.

use crate::config::VotingConfig;
use crate::ports::chat_stream::TeamChat;
use crate::ports::notifier::{NotificationKind, Notifier};
use crate::ports::poll_store::PollStore;
use crate::ports::profile_store::ProfileStore;
use crate::ports::store::StoreError;
use crate::ports::team_store::TeamStore;
use chrono::Utc;
use std::sync::Arc;
use teamforge_domain::{
    DomainError, HonorEvent, KickPoll, MajorityRule, PollDecision, PollId, PollOutcome,
    PollStatus, UserId, VoteChoice,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while casting a vote
#[derive(Error, Debug)]
pub enum CastVoteError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the CastVote use case
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub poll_id: PollId,
    /// Caller identity, as supplied by the identity provider.
    pub voter: UserId,
    pub choice: VoteChoice,
}

/// Post-write authoritative state of the poll after a successful cast.
#[derive(Debug, Clone)]
pub struct CastVoteOutput {
    pub yes_count: usize,
    pub no_count: usize,
    pub status: PollStatus,
    pub outcome: Option<PollOutcome>,
}

impl From<&KickPoll> for CastVoteOutput {
    fn from(poll: &KickPoll) -> Self {
        Self {
            yes_count: poll.yes_count,
            no_count: poll.no_count,
            status: poll.status,
            outcome: poll.outcome,
        }
    }
}

/// Use case for casting a vote and resolving the poll outcome.
pub struct CastVoteUseCase {
    polls: Arc<dyn PollStore>,
    teams: Arc<dyn TeamStore>,
    profiles: Arc<dyn ProfileStore>,
    chat: Arc<dyn TeamChat>,
    notifier: Arc<dyn Notifier>,
    config: VotingConfig,
}

impl CastVoteUseCase {
    pub fn new(
        polls: Arc<dyn PollStore>,
        teams: Arc<dyn TeamStore>,
        profiles: Arc<dyn ProfileStore>,
        chat: Arc<dyn TeamChat>,
        notifier: Arc<dyn Notifier>,
        config: VotingConfig,
    ) -> Self {
        Self {
            polls,
            teams,
            profiles,
            chat,
            notifier,
            config,
        }
    }

    /// Record one vote and evaluate the outcome.
    ///
    /// Runs a bounded optimistic-concurrency loop: read the poll with its
    /// version, validate, apply the vote, evaluate the majority rule with
    /// an eligible count derived from the team's member list *as of this
    /// attempt*, fold any terminal transition into the same write, and
    /// commit via compare-and-swap. A lost race re-reads and retries;
    /// exhausting the bound surfaces [`DomainError::Conflict`].
    pub async fn execute(&self, input: CastVoteInput) -> Result<CastVoteOutput, CastVoteError> {
        for attempt in 1..=self.config.max_vote_retries {
            let versioned = self.polls.get(&input.poll_id).await?;
            let mut poll = versioned.value;
            let version = versioned.version;

            if !poll.is_active() {
                return Err(DomainError::PollNotActive.into());
            }

            if poll.is_expired(Utc::now()) {
                match self.close_expired(poll, version).await? {
                    // Raced with another writer: start over.
                    None => continue,
                    Some(()) => return Err(DomainError::PollNotActive.into()),
                }
            }

            // Membership is re-read on every attempt: the eligible pool must
            // reflect the roster at evaluation time, not at poll creation.
            let team = self.teams.get(&poll.team_id).await?.value;
            poll.check_voter(&input.voter, &team)?;
            poll.record_vote(input.voter.clone(), input.choice)?;

            let rule = MajorityRule::new(team.eligible_voter_count(&poll.target));
            let decision = rule.evaluate(poll.yes_count, poll.no_count);
            match decision {
                PollDecision::Kick => poll.close(PollOutcome::Kicked)?,
                PollDecision::Keep => poll.close(PollOutcome::Kept)?,
                PollDecision::Pending => {}
            }

            match self.polls.compare_and_update(poll, version).await {
                Ok(committed) => {
                    let poll = &committed.value;
                    info!(
                        poll = %poll.id,
                        voter = %input.voter,
                        choice = %input.choice,
                        yes = poll.yes_count,
                        no = poll.no_count,
                        decision = %decision,
                        "vote committed"
                    );
                    match decision {
                        PollDecision::Kick => self.execute_kick(poll).await,
                        PollDecision::Keep => self.announce_kept(poll).await,
                        PollDecision::Pending => {}
                    }
                    return Ok(CastVoteOutput::from(poll));
                }
                Err(StoreError::Conflict) => {
                    debug!(
                        poll = %input.poll_id,
                        voter = %input.voter,
                        attempt,
                        "lost vote write race, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            poll = %input.poll_id,
            voter = %input.voter,
            retries = self.config.max_vote_retries,
            "vote retries exhausted"
        );
        Err(DomainError::Conflict.into())
    }

    /// Close an expired poll as `kept`.
    ///
    /// Returns `Ok(None)` when the compare-and-swap is lost and the caller
    /// should re-read.
    async fn close_expired(
        &self,
        mut poll: KickPoll,
        version: u64,
    ) -> Result<Option<()>, CastVoteError> {
        poll.close(PollOutcome::Kept)?;
        match self.polls.compare_and_update(poll, version).await {
            Ok(committed) => {
                let poll = &committed.value;
                info!(poll = %poll.id, "poll expired, resolved as kept");
                self.announce_kept(poll).await;
                Ok(Some(()))
            }
            Err(StoreError::Conflict) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply the consequences of a committed kick.
    ///
    /// The poll document is already `completed/kicked` and is the source of
    /// truth; everything here is applied afterwards and a failure is logged
    /// without rolling anything back.
    async fn execute_kick(&self, poll: &KickPoll) {
        let penalty = self.config.honor_kick_penalty;

        match self.profiles.adjust_honor(&poll.target, -penalty).await {
            Ok(new_score) => {
                debug!(target = %poll.target, new_score, "honor penalty applied");
            }
            Err(e) => warn!(target = %poll.target, error = %e, "failed to apply honor penalty"),
        }

        let entry = HonorEvent::new(-penalty, format!("Kicked from team: {}", poll.team_id));
        if let Err(e) = self.profiles.append_honor_event(&poll.target, entry).await {
            warn!(target = %poll.target, error = %e, "failed to append honor history entry");
        }

        if let Err(e) = self.remove_from_team(poll).await {
            warn!(
                target = %poll.target,
                team = %poll.team_id,
                error = %e,
                "failed to remove kicked member from team"
            );
        }

        self.notifier
            .notify(
                &poll.target,
                NotificationKind::MemberKicked,
                "You have been kicked from the team based on a majority vote.",
                Some(&poll.team_id),
            )
            .await;

        if let Err(e) = self
            .chat
            .append_system_message(
                &poll.team_id,
                &format!("{} was removed from the team by majority vote", poll.target_name),
            )
            .await
        {
            warn!(poll = %poll.id, error = %e, "failed to announce kick in team chat");
        }
    }

    /// Remove the kicked member, retrying lost team-document races.
    async fn remove_from_team(&self, poll: &KickPoll) -> Result<(), CastVoteError> {
        for _ in 1..=self.config.max_vote_retries {
            let versioned = self.teams.get(&poll.team_id).await?;
            let mut team = versioned.value;
            match team.remove_member(&poll.target) {
                Ok(()) => {}
                // Someone else already removed them; done.
                Err(DomainError::NotFound(_)) => return Ok(()),
                Err(e) => return Err(e.into()),
            }
            match self
                .teams
                .compare_and_update(team, versioned.version)
                .await
            {
                Ok(_) => return Ok(()),
                Err(StoreError::Conflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(DomainError::Conflict.into())
    }

    async fn announce_kept(&self, poll: &KickPoll) {
        if let Err(e) = self
            .chat
            .append_system_message(
                &poll.team_id,
                &format!("Vote ended: {} stays on the team", poll.target_name),
            )
            .await
        {
            warn!(poll = %poll.id, error = %e, "failed to announce kept outcome in team chat");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{
        FakeChat, FakeNotifier, FakePolls, FakeProfiles, FakeTeams, team_of,
    };
    use teamforge_domain::{Team, TeamId};

    struct Fixture {
        teams: Arc<FakeTeams>,
        polls: Arc<FakePolls>,
        profiles: Arc<FakeProfiles>,
        chat: Arc<FakeChat>,
        notifier: Arc<FakeNotifier>,
        poll_id: PollId,
    }

    impl Fixture {
        /// Five-member team `[a(leader), b, c, d, e]` with an active poll
        /// targeting `b`: eligible pool 4, majority 3.
        async fn standard() -> Self {
            Self::with_team(team_of("t1", &["a", "b", "c", "d", "e"])).await
        }

        async fn with_team(team: Team) -> Self {
            let poll = KickPoll::new(
                PollId::new("p1"),
                team.id.clone(),
                UserId::new("b"),
                "Bee",
                "inactivity",
                UserId::new("a"),
            );
            let polls = Arc::new(FakePolls::new());
            polls.create(poll.clone()).await.unwrap();
            Self {
                teams: Arc::new(FakeTeams::with(team)),
                polls,
                profiles: Arc::new(FakeProfiles::with(&[
                    ("a", "Ay", 100),
                    ("b", "Bee", 100),
                    ("c", "Cee", 100),
                    ("d", "Dee", 100),
                    ("e", "Ee", 100),
                ])),
                chat: Arc::new(FakeChat::new()),
                notifier: Arc::new(FakeNotifier::new()),
                poll_id: poll.id,
            }
        }

        fn use_case(&self) -> CastVoteUseCase {
            CastVoteUseCase::new(
                self.polls.clone(),
                self.teams.clone(),
                self.profiles.clone(),
                self.chat.clone(),
                self.notifier.clone(),
                VotingConfig::default(),
            )
        }

        fn vote(&self, voter: &str, choice: VoteChoice) -> CastVoteInput {
            CastVoteInput {
                poll_id: self.poll_id.clone(),
                voter: UserId::new(voter),
                choice,
            }
        }
    }

    #[tokio::test]
    async fn test_vote_updates_tallies_and_stays_active() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        let out = uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap();
        assert_eq!((out.yes_count, out.no_count), (1, 0));
        assert_eq!(out.status, PollStatus::Active);
        assert!(out.outcome.is_none());

        let poll = fx.polls.snapshot(&fx.poll_id);
        assert_eq!(poll.yes_count + poll.no_count, poll.votes.len());
    }

    #[tokio::test]
    async fn test_double_vote_rejected_without_tally_change() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap();
        let err = uc.execute(fx.vote("c", VoteChoice::No)).await.unwrap_err();

        assert!(matches!(
            err,
            CastVoteError::Domain(DomainError::AlreadyVoted)
        ));
        let poll = fx.polls.snapshot(&fx.poll_id);
        assert_eq!((poll.yes_count, poll.no_count), (1, 0));
    }

    #[tokio::test]
    async fn test_target_and_creator_rejected() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        for voter in ["b", "a"] {
            let err = uc.execute(fx.vote(voter, VoteChoice::No)).await.unwrap_err();
            assert!(matches!(
                err,
                CastVoteError::Domain(DomainError::InvalidVoter(_))
            ));
        }
        let poll = fx.polls.snapshot(&fx.poll_id);
        assert!(poll.votes.is_empty());
    }

    #[tokio::test]
    async fn test_non_member_rejected() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        let err = uc
            .execute(fx.vote("mallory", VoteChoice::Yes))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CastVoteError::Domain(DomainError::InvalidVoter(_))
        ));
    }

    #[tokio::test]
    async fn test_majority_yes_kicks() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap();
        uc.execute(fx.vote("d", VoteChoice::Yes)).await.unwrap();
        let out = uc.execute(fx.vote("e", VoteChoice::Yes)).await.unwrap();

        assert_eq!(out.status, PollStatus::Completed);
        assert_eq!(out.outcome, Some(PollOutcome::Kicked));
        assert_eq!(out.yes_count, 3);

        // Consequences: penalty, history, removal, notification, chat.
        assert_eq!(fx.profiles.score(&UserId::new("b")), 90);
        let history = fx.profiles.history.lock().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].1.amount, -10);
        assert!(history[0].1.reason.contains("t1"));
        drop(history);

        assert!(!fx.teams.snapshot(&TeamId::new("t1")).is_member(&UserId::new("b")));

        let sent = fx.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, UserId::new("b"));
        assert_eq!(sent[0].1, NotificationKind::MemberKicked);
        drop(sent);

        assert!(
            fx.chat
                .texts()
                .iter()
                .any(|m| m.contains("removed from the team"))
        );
    }

    #[tokio::test]
    async fn test_no_majority_lock_keeps_member() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        // eligible 4, majority 3: two no votes make a yes majority
        // impossible (only c/d/e can vote at all).
        uc.execute(fx.vote("c", VoteChoice::No)).await.unwrap();
        let out = uc.execute(fx.vote("d", VoteChoice::No)).await.unwrap();

        assert_eq!(out.status, PollStatus::Completed);
        assert_eq!(out.outcome, Some(PollOutcome::Kept));

        // No consequences for a kept member.
        assert_eq!(fx.profiles.score(&UserId::new("b")), 100);
        assert!(fx.teams.snapshot(&TeamId::new("t1")).is_member(&UserId::new("b")));
        assert!(fx.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completed_poll_rejects_further_votes() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        uc.execute(fx.vote("c", VoteChoice::No)).await.unwrap();
        uc.execute(fx.vote("d", VoteChoice::No)).await.unwrap();

        let err = uc.execute(fx.vote("e", VoteChoice::Yes)).await.unwrap_err();
        assert!(matches!(
            err,
            CastVoteError::Domain(DomainError::PollNotActive)
        ));

        let poll = fx.polls.snapshot(&fx.poll_id);
        assert_eq!((poll.yes_count, poll.no_count), (0, 2));
        assert_eq!(poll.outcome, Some(PollOutcome::Kept));
    }

    #[tokio::test]
    async fn test_insufficient_turnout_leaves_poll_active() {
        // The worked scenario: C yes, D yes, E no; A and B cannot vote, so
        // the poll can never resolve and stays active.
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap();
        uc.execute(fx.vote("d", VoteChoice::Yes)).await.unwrap();
        let out = uc.execute(fx.vote("e", VoteChoice::No)).await.unwrap();

        assert_eq!((out.yes_count, out.no_count), (2, 1));
        assert_eq!(out.status, PollStatus::Active);
        assert!(fx.teams.snapshot(&TeamId::new("t1")).is_member(&UserId::new("b")));
    }

    #[tokio::test]
    async fn test_lost_races_are_retried() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        fx.polls.inject_conflicts(2);
        let out = uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap();
        assert_eq!(out.yes_count, 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_surfaces_conflict() {
        let fx = Fixture::standard().await;
        let uc = fx.use_case();

        fx.polls.inject_conflicts(VotingConfig::default().max_vote_retries);
        let err = uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap_err();
        assert!(matches!(err, CastVoteError::Domain(DomainError::Conflict)));
    }

    #[tokio::test]
    async fn test_expired_poll_resolves_as_kept() {
        let fx = Fixture::standard().await;
        // Replace the poll with one whose deadline already passed.
        let expired = {
            let mut poll = fx.polls.snapshot(&fx.poll_id);
            poll.expires_at = Some(Utc::now() - chrono::Duration::seconds(5));
            poll
        };
        let version = fx.polls.get(&fx.poll_id).await.unwrap().version;
        fx.polls.compare_and_update(expired, version).await.unwrap();

        let uc = fx.use_case();
        let err = uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap_err();
        assert!(matches!(
            err,
            CastVoteError::Domain(DomainError::PollNotActive)
        ));

        let poll = fx.polls.snapshot(&fx.poll_id);
        assert_eq!(poll.status, PollStatus::Completed);
        assert_eq!(poll.outcome, Some(PollOutcome::Kept));
        assert!(poll.votes.is_empty());
    }

    #[tokio::test]
    async fn test_membership_change_rederives_eligible_pool() {
        // Six members [a,b,c,d,e,f]: eligible 5, majority 3. After f leaves
        // the team mid-poll, eligible drops to 4 but majority stays 3.
        let fx = Fixture::with_team(team_of("t1", &["a", "b", "c", "d", "e", "f"])).await;
        let uc = fx.use_case();

        uc.execute(fx.vote("c", VoteChoice::Yes)).await.unwrap();
        uc.execute(fx.vote("d", VoteChoice::Yes)).await.unwrap();

        // f leaves before the deciding vote.
        let versioned = fx.teams.get(&TeamId::new("t1")).await.unwrap();
        let mut team = versioned.value;
        team.remove_member(&UserId::new("f")).unwrap();
        fx.teams
            .compare_and_update(team, versioned.version)
            .await
            .unwrap();

        let out = uc.execute(fx.vote("e", VoteChoice::Yes)).await.unwrap();
        assert_eq!(out.outcome, Some(PollOutcome::Kicked));
    }
}
