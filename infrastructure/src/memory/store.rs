//! The in-memory versioned document store.

use super::records::{ChatMessage, NotificationRecord};
use super::snapshot::{StoreSnapshot, VersionedDoc};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use teamforge_application::{
    MemberProfile, NotificationKind, Notifier, PollStore, PollWatch, ProfileStore, StoreError,
    TeamChat, TeamStore, Versioned,
};
use teamforge_domain::{HonorEvent, KickPoll, PollId, Team, TeamId, UserId};
use tokio::sync::mpsc;
use tracing::debug;

const WATCH_CHANNEL_CAPACITY: usize = 16;

#[derive(Default)]
struct State {
    teams: HashMap<TeamId, (Team, u64)>,
    polls: HashMap<PollId, (KickPoll, u64)>,
    profiles: HashMap<UserId, MemberProfile>,
    honor_history: HashMap<UserId, Vec<HonorEvent>>,
    messages: Vec<ChatMessage>,
    notifications: Vec<NotificationRecord>,
}

/// Process-local document store with the contract of a hosted one:
/// versioned documents, compare-and-swap writes, append-only collections,
/// and a push feed of poll changes.
///
/// The state lock is never held across an await point; watch feeds are
/// notified after the write commits and the lock is released.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    watchers: Mutex<Vec<(PollId, mpsc::Sender<KickPoll>)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot, preserving document versions.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let state = State {
            teams: snapshot
                .teams
                .into_iter()
                .map(|v| (v.doc.id.clone(), (v.doc, v.version)))
                .collect(),
            polls: snapshot
                .polls
                .into_iter()
                .map(|v| (v.doc.id.clone(), (v.doc, v.version)))
                .collect(),
            profiles: snapshot
                .profiles
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            honor_history: snapshot.honor_history,
            messages: snapshot.messages,
            notifications: snapshot.notifications,
        };
        Self {
            state: Mutex::new(state),
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Serializable image of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock().unwrap();
        StoreSnapshot {
            teams: state
                .teams
                .values()
                .map(|(team, version)| VersionedDoc {
                    doc: team.clone(),
                    version: *version,
                })
                .collect(),
            polls: state
                .polls
                .values()
                .map(|(poll, version)| VersionedDoc {
                    doc: poll.clone(),
                    version: *version,
                })
                .collect(),
            profiles: state.profiles.values().cloned().collect(),
            honor_history: state.honor_history.clone(),
            messages: state.messages.clone(),
            notifications: state.notifications.clone(),
        }
    }

    /// Create or replace a member profile.
    pub fn register_profile(&self, profile: MemberProfile) {
        self.state
            .lock()
            .unwrap()
            .profiles
            .insert(profile.id.clone(), profile);
    }

    /// Message stream of one team, oldest first.
    pub fn messages(&self, team: &TeamId) -> Vec<ChatMessage> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.team_id == *team)
            .cloned()
            .collect()
    }

    /// Notifications delivered to one user, oldest first.
    pub fn notifications_for(&self, user: &UserId) -> Vec<NotificationRecord> {
        self.state
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.recipient == *user)
            .cloned()
            .collect()
    }

    /// Honor history of one user, oldest first.
    pub fn honor_history(&self, user: &UserId) -> Vec<HonorEvent> {
        self.state
            .lock()
            .unwrap()
            .honor_history
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    /// All teams, for listings.
    pub fn teams(&self) -> Vec<Team> {
        self.state
            .lock()
            .unwrap()
            .teams
            .values()
            .map(|(team, _)| team.clone())
            .collect()
    }

    /// All polls of a team, any status.
    pub fn polls_of(&self, team: &TeamId) -> Vec<KickPoll> {
        self.state
            .lock()
            .unwrap()
            .polls
            .values()
            .filter(|(poll, _)| poll.team_id == *team)
            .map(|(poll, _)| poll.clone())
            .collect()
    }

    /// Merge a newer snapshot into the live store.
    ///
    /// A document replaces the stored one only when its snapshot version is
    /// ahead; watchers of every replaced poll receive the new state. This is
    /// how a follower process tails a state file that other processes write:
    /// re-load, absorb, and let the watch feeds deliver the diff.
    pub async fn absorb(&self, snapshot: StoreSnapshot) {
        let changed: Vec<KickPoll> = {
            let mut state = self.state.lock().unwrap();
            for VersionedDoc { doc, version } in snapshot.teams {
                match state.teams.get(&doc.id) {
                    Some((_, current)) if *current >= version => {}
                    _ => {
                        state.teams.insert(doc.id.clone(), (doc, version));
                    }
                }
            }
            let mut changed = Vec::new();
            for VersionedDoc { doc, version } in snapshot.polls {
                match state.polls.get(&doc.id) {
                    Some((_, current)) if *current >= version => {}
                    _ => {
                        state.polls.insert(doc.id.clone(), (doc.clone(), version));
                        changed.push(doc);
                    }
                }
            }
            for profile in snapshot.profiles {
                state.profiles.insert(profile.id.clone(), profile);
            }
            state.honor_history = snapshot.honor_history;
            state.messages = snapshot.messages;
            state.notifications = snapshot.notifications;
            changed
        };
        for poll in changed {
            self.publish_poll(&poll).await;
        }
    }

    /// Push a committed poll snapshot to every live watcher of that poll.
    async fn publish_poll(&self, poll: &KickPoll) {
        let senders: Vec<mpsc::Sender<KickPoll>> = {
            let mut watchers = self.watchers.lock().unwrap();
            watchers.retain(|(_, sender)| !sender.is_closed());
            watchers
                .iter()
                .filter(|(id, _)| *id == poll.id)
                .map(|(_, sender)| sender.clone())
                .collect()
        };
        for sender in senders {
            // A full receiver only delays the feed, never the write.
            let _ = sender.send(poll.clone()).await;
        }
    }
}

#[async_trait]
impl TeamStore for InMemoryStore {
    async fn get(&self, id: &TeamId) -> Result<Versioned<Team>, StoreError> {
        let state = self.state.lock().unwrap();
        state
            .teams
            .get(id)
            .map(|(team, version)| Versioned::new(team.clone(), *version))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(&self, team: Team) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.teams.insert(team.id.clone(), (team, 1));
        Ok(())
    }

    async fn compare_and_update(
        &self,
        team: Team,
        expected_version: u64,
    ) -> Result<Versioned<Team>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let (stored, version) = state
            .teams
            .get_mut(&team.id)
            .ok_or_else(|| StoreError::NotFound(team.id.to_string()))?;
        if *version != expected_version {
            return Err(StoreError::Conflict);
        }
        *stored = team.clone();
        *version += 1;
        Ok(Versioned::new(team, *version))
    }

    async fn delete(&self, id: &TeamId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .teams
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl PollStore for InMemoryStore {
    async fn get(&self, id: &PollId) -> Result<Versioned<KickPoll>, StoreError> {
        let state = self.state.lock().unwrap();
        state
            .polls
            .get(id)
            .map(|(poll, version)| Versioned::new(poll.clone(), *version))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, poll: KickPoll) -> Result<(), StoreError> {
        {
            let mut state = self.state.lock().unwrap();
            state.polls.insert(poll.id.clone(), (poll.clone(), 1));
        }
        self.publish_poll(&poll).await;
        Ok(())
    }

    async fn compare_and_update(
        &self,
        poll: KickPoll,
        expected_version: u64,
    ) -> Result<Versioned<KickPoll>, StoreError> {
        let committed = {
            let mut state = self.state.lock().unwrap();
            let (stored, version) = state
                .polls
                .get_mut(&poll.id)
                .ok_or_else(|| StoreError::NotFound(poll.id.to_string()))?;
            if *version != expected_version {
                return Err(StoreError::Conflict);
            }
            *stored = poll.clone();
            *version += 1;
            Versioned::new(poll, *version)
        };
        self.publish_poll(&committed.value).await;
        Ok(committed)
    }

    async fn active_polls(&self, team: &TeamId) -> Result<Vec<KickPoll>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .polls
            .values()
            .filter(|(poll, _)| poll.team_id == *team && poll.is_active())
            .map(|(poll, _)| poll.clone())
            .collect())
    }

    async fn watch(&self, id: &PollId) -> Result<PollWatch, StoreError> {
        {
            let state = self.state.lock().unwrap();
            if !state.polls.contains_key(id) {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        self.watchers.lock().unwrap().push((id.clone(), tx));
        Ok(PollWatch::new(rx))
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get(&self, id: &UserId) -> Result<MemberProfile, StoreError> {
        let state = self.state.lock().unwrap();
        state
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn adjust_honor(&self, id: &UserId, delta: i64) -> Result<i64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let profile = state
            .profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        profile.honor_score += delta;
        Ok(profile.honor_score)
    }

    async fn append_honor_event(&self, id: &UserId, event: HonorEvent) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.honor_history.entry(id.clone()).or_default().push(event);
        Ok(())
    }
}

#[async_trait]
impl TeamChat for InMemoryStore {
    async fn append_system_message(&self, team: &TeamId, text: &str) -> Result<(), StoreError> {
        debug!(team = %team, text, "system message appended");
        let mut state = self.state.lock().unwrap();
        state.messages.push(ChatMessage::system(team.clone(), text));
        Ok(())
    }
}

#[async_trait]
impl Notifier for InMemoryStore {
    async fn notify(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
        message: &str,
        team: Option<&TeamId>,
    ) {
        debug!(recipient = %recipient, kind = %kind, "notification recorded");
        let mut state = self.state.lock().unwrap();
        state.notifications.push(NotificationRecord::new(
            recipient.clone(),
            kind,
            message,
            team.cloned(),
        ));
    }
}
