//! In-memory PlayerRepository for tests and local runs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use battle_core::{CombatantId, PlayerProfile};
use serde::{Deserialize, Serialize};

use super::{PlayerRepository, RepositoryError, Result};

/// One entry of a profile file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: CombatantId,
    pub profile: PlayerProfile,
}

/// Profiles held in a map; rest-buff consumption only touches memory.
pub struct InMemoryPlayerRepository {
    profiles: RwLock<HashMap<CombatantId, PlayerProfile>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_profiles(records: impl IntoIterator<Item = ProfileRecord>) -> Self {
        let profiles = records
            .into_iter()
            .map(|record| (record.id, record.profile))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Loads a JSON array of [`ProfileRecord`]s.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<ProfileRecord> = serde_json::from_str(json)?;
        Ok(Self::with_profiles(records))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(&self, id: CombatantId, profile: PlayerProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.insert(id, profile);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.profiles.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn get_profile(&self, id: CombatantId) -> Result<PlayerProfile> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::UnknownPlayer(id))
    }

    async fn consume_rest_buff(&self, id: CombatantId) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let profile = profiles
            .get_mut(&id)
            .ok_or(RepositoryError::UnknownPlayer(id))?;
        profile.rest_buff_active = false;
        Ok(())
    }
}
