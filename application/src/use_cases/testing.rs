//! In-memory port implementations shared by the use-case tests.

use crate::ports::chat_stream::TeamChat;
use crate::ports::notifier::{NotificationKind, Notifier};
use crate::ports::poll_store::{PollStore, PollWatch};
use crate::ports::profile_store::{MemberProfile, ProfileStore};
use crate::ports::store::{StoreError, Versioned};
use crate::ports::team_store::TeamStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use teamforge_domain::{HonorEvent, KickPoll, PollId, Team, TeamId, UserId};

/// Versioned single-collection map with compare-and-swap semantics.
struct VersionedMap<T> {
    entries: Mutex<HashMap<String, (T, u64)>>,
}

impl<T: Clone> VersionedMap<T> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Result<Versioned<T>, StoreError> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .map(|(value, version)| Versioned::new(value.clone(), *version))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn insert(&self, key: String, value: T) {
        self.entries.lock().unwrap().insert(key, (value, 1));
    }

    fn compare_and_update(
        &self,
        key: &str,
        value: T,
        expected_version: u64,
    ) -> Result<Versioned<T>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let (stored, version) = entries
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if *version != expected_version {
            return Err(StoreError::Conflict);
        }
        *stored = value.clone();
        *version += 1;
        Ok(Versioned::new(value, *version))
    }
}

pub struct FakeTeams {
    teams: VersionedMap<Team>,
}

impl FakeTeams {
    pub fn with(team: Team) -> Self {
        let store = Self {
            teams: VersionedMap::new(),
        };
        store.teams.insert(team.id.to_string(), team);
        store
    }

    pub fn snapshot(&self, id: &TeamId) -> Team {
        self.teams.get(id.as_str()).unwrap().value
    }
}

#[async_trait]
impl TeamStore for FakeTeams {
    async fn get(&self, id: &TeamId) -> Result<Versioned<Team>, StoreError> {
        self.teams.get(id.as_str())
    }

    async fn insert(&self, team: Team) -> Result<(), StoreError> {
        self.teams.insert(team.id.to_string(), team);
        Ok(())
    }

    async fn compare_and_update(
        &self,
        team: Team,
        expected_version: u64,
    ) -> Result<Versioned<Team>, StoreError> {
        let key = team.id.to_string();
        self.teams.compare_and_update(&key, team, expected_version)
    }

    async fn delete(&self, id: &TeamId) -> Result<(), StoreError> {
        self.teams.entries.lock().unwrap().remove(id.as_str());
        Ok(())
    }
}

pub struct FakePolls {
    polls: VersionedMap<KickPoll>,
    /// When set, the next `n` compare_and_update calls fail with Conflict.
    conflicts_to_inject: Mutex<u32>,
}

impl FakePolls {
    pub fn new() -> Self {
        Self {
            polls: VersionedMap::new(),
            conflicts_to_inject: Mutex::new(0),
        }
    }

    pub fn inject_conflicts(&self, count: u32) {
        *self.conflicts_to_inject.lock().unwrap() = count;
    }

    pub fn snapshot(&self, id: &PollId) -> KickPoll {
        self.polls.get(id.as_str()).unwrap().value
    }

    pub fn len(&self) -> usize {
        self.polls.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl PollStore for FakePolls {
    async fn get(&self, id: &PollId) -> Result<Versioned<KickPoll>, StoreError> {
        self.polls.get(id.as_str())
    }

    async fn create(&self, poll: KickPoll) -> Result<(), StoreError> {
        self.polls.insert(poll.id.to_string(), poll);
        Ok(())
    }

    async fn compare_and_update(
        &self,
        poll: KickPoll,
        expected_version: u64,
    ) -> Result<Versioned<KickPoll>, StoreError> {
        {
            let mut pending = self.conflicts_to_inject.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                return Err(StoreError::Conflict);
            }
        }
        let key = poll.id.to_string();
        self.polls.compare_and_update(&key, poll, expected_version)
    }

    async fn active_polls(&self, team: &TeamId) -> Result<Vec<KickPoll>, StoreError> {
        let entries = self.polls.entries.lock().unwrap();
        Ok(entries
            .values()
            .filter(|(p, _)| p.team_id == *team && p.is_active())
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn watch(&self, _id: &PollId) -> Result<PollWatch, StoreError> {
        let (_tx, rx) = tokio::sync::mpsc::channel(1);
        Ok(PollWatch::new(rx))
    }
}

pub struct FakeProfiles {
    profiles: Mutex<HashMap<UserId, MemberProfile>>,
    pub history: Mutex<Vec<(UserId, HonorEvent)>>,
}

impl FakeProfiles {
    pub fn with(entries: &[(&str, &str, i64)]) -> Self {
        let profiles = entries
            .iter()
            .map(|(id, name, score)| {
                (
                    UserId::new(*id),
                    MemberProfile {
                        id: UserId::new(*id),
                        display_name: name.to_string(),
                        honor_score: *score,
                    },
                )
            })
            .collect();
        Self {
            profiles: Mutex::new(profiles),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn score(&self, id: &UserId) -> i64 {
        self.profiles.lock().unwrap()[id].honor_score
    }
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn get(&self, id: &UserId) -> Result<MemberProfile, StoreError> {
        self.profiles
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn adjust_honor(&self, id: &UserId, delta: i64) -> Result<i64, StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        profile.honor_score += delta;
        Ok(profile.honor_score)
    }

    async fn append_honor_event(&self, id: &UserId, event: HonorEvent) -> Result<(), StoreError> {
        self.history.lock().unwrap().push((id.clone(), event));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeChat {
    pub messages: Mutex<Vec<(TeamId, String)>>,
}

impl FakeChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl TeamChat for FakeChat {
    async fn append_system_message(&self, team: &TeamId, text: &str) -> Result<(), StoreError> {
        self.messages
            .lock()
            .unwrap()
            .push((team.clone(), text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(UserId, NotificationKind, String)>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(
        &self,
        recipient: &UserId,
        kind: NotificationKind,
        message: &str,
        _team: Option<&TeamId>,
    ) {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.clone(), kind, message.to_string()));
    }
}

/// Build a team whose first listed member is the leader.
pub fn team_of(id: &str, members: &[&str]) -> Team {
    let mut team = Team::new(TeamId::new(id), UserId::new(members[0]), members.len());
    for member in &members[1..] {
        team.add_member(UserId::new(*member));
    }
    team
}
