//! In-memory stores.
//!
//! Each prediction replay owns a private pair of these, so they need no
//! internal locking.

use std::collections::BTreeMap;

use super::{assign_id, MatchStore, StorageError, TeamStore};
use crate::models::{Match, MatchId, Team, TeamId};

#[derive(Debug, Clone)]
pub struct MemoryTeamStore {
    teams: BTreeMap<TeamId, Team>,
    next_id: u32,
}

impl MemoryTeamStore {
    pub fn new() -> Self {
        Self {
            teams: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Build a store holding copies of `teams`, keeping their IDs.
    pub fn from_teams<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Self {
        let mut store = Self::new();
        for team in teams {
            store.insert(team.clone());
        }
        store
    }

    fn insert(&mut self, mut team: Team) -> Team {
        assign_id(&mut team.id, &mut self.next_id);
        self.teams.insert(team.id, team.clone());
        team
    }
}

impl Default for MemoryTeamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamStore for MemoryTeamStore {
    fn create(&mut self, team: Team) -> Result<Team, StorageError> {
        Ok(self.insert(team))
    }

    fn get(&self, id: TeamId) -> Result<Option<Team>, StorageError> {
        Ok(self.teams.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Team>, StorageError> {
        Ok(self.teams.values().cloned().collect())
    }

    fn update(&mut self, team: &Team) -> Result<(), StorageError> {
        match self.teams.get_mut(&team.id) {
            Some(stored) => {
                *stored = team.clone();
                Ok(())
            }
            None => Err(StorageError::UnknownTeam(team.id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryMatchStore {
    matches: BTreeMap<MatchId, Match>,
    next_id: u32,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self {
            matches: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Build a store holding copies of `matches`, keeping their IDs.
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut store = Self::new();
        for fixture in matches {
            store.insert(fixture.clone());
        }
        store
    }

    fn insert(&mut self, mut fixture: Match) -> Match {
        assign_id(&mut fixture.id, &mut self.next_id);
        self.matches.insert(fixture.id, fixture.clone());
        fixture
    }
}

impl Default for MemoryMatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStore for MemoryMatchStore {
    fn create(&mut self, fixture: Match) -> Result<Match, StorageError> {
        Ok(self.insert(fixture))
    }

    fn get(&self, id: MatchId) -> Result<Option<Match>, StorageError> {
        Ok(self.matches.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Match>, StorageError> {
        Ok(self.matches.values().cloned().collect())
    }

    fn update(&mut self, fixture: &Match) -> Result<(), StorageError> {
        match self.matches.get_mut(&fixture.id) {
            Some(stored) => {
                *stored = fixture.clone();
                Ok(())
            }
            None => Err(StorageError::UnknownMatch(fixture.id)),
        }
    }

    fn delete_all(&mut self) -> Result<(), StorageError> {
        self.matches.clear();
        self.next_id = 1;
        Ok(())
    }
}
