//! Team and match persistence.
//!
//! The season engine talks to storage only through the [`TeamStore`] and
//! [`MatchStore`] traits:
//! - In-memory stores back the isolated prediction replays and tests
//! - JSONL stores under the data directory back the live season

pub mod jsonl;
pub mod memory;

pub use jsonl::{JsonlMatchStore, JsonlReader, JsonlTeamStore, JsonlWriter};
pub use memory::{MemoryMatchStore, MemoryTeamStore};

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{EntityId, Match, MatchId, Team, TeamId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt record at {path:?} line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Team with ID {0} not found for update")]
    UnknownTeam(TeamId),

    #[error("Match with ID {0} not found for update")]
    UnknownMatch(MatchId),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn teams_path(&self) -> PathBuf {
        self.data_dir.join("teams.jsonl")
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Team persistence contract.
pub trait TeamStore: Send + Sync {
    /// Store a new team, assigning an ID if it has none.
    fn create(&mut self, team: Team) -> Result<Team, StorageError>;

    fn get(&self, id: TeamId) -> Result<Option<Team>, StorageError>;

    /// All teams in ID order.
    fn list_all(&self) -> Result<Vec<Team>, StorageError>;

    /// Replace a stored team. Fails if the ID is unknown.
    fn update(&mut self, team: &Team) -> Result<(), StorageError>;
}

/// Match persistence contract.
pub trait MatchStore: Send + Sync {
    /// Store a new match, assigning an ID if it has none.
    fn create(&mut self, fixture: Match) -> Result<Match, StorageError>;

    fn get(&self, id: MatchId) -> Result<Option<Match>, StorageError>;

    /// All matches in ID order.
    fn list_all(&self) -> Result<Vec<Match>, StorageError>;

    /// Replace a stored match. Fails if the ID is unknown.
    fn update(&mut self, fixture: &Match) -> Result<(), StorageError>;

    fn delete_all(&mut self) -> Result<(), StorageError>;

    fn list_by_week(&self, week: u32) -> Result<Vec<Match>, StorageError> {
        let mut matches = self.list_all()?;
        matches.retain(|m| m.week == week);
        Ok(matches)
    }

    fn list_played(&self) -> Result<Vec<Match>, StorageError> {
        let mut matches = self.list_all()?;
        matches.retain(|m| m.played);
        Ok(matches)
    }

    /// Highest week containing a played match, or 0 if nothing has been played.
    fn max_week_played(&self) -> Result<u32, StorageError> {
        Ok(self
            .list_played()?
            .iter()
            .map(|m| m.week)
            .max()
            .unwrap_or(0))
    }
}

impl<S: TeamStore + ?Sized> TeamStore for Box<S> {
    fn create(&mut self, team: Team) -> Result<Team, StorageError> {
        (**self).create(team)
    }

    fn get(&self, id: TeamId) -> Result<Option<Team>, StorageError> {
        (**self).get(id)
    }

    fn list_all(&self) -> Result<Vec<Team>, StorageError> {
        (**self).list_all()
    }

    fn update(&mut self, team: &Team) -> Result<(), StorageError> {
        (**self).update(team)
    }
}

impl<S: MatchStore + ?Sized> MatchStore for Box<S> {
    fn create(&mut self, fixture: Match) -> Result<Match, StorageError> {
        (**self).create(fixture)
    }

    fn get(&self, id: MatchId) -> Result<Option<Match>, StorageError> {
        (**self).get(id)
    }

    fn list_all(&self) -> Result<Vec<Match>, StorageError> {
        (**self).list_all()
    }

    fn update(&mut self, fixture: &Match) -> Result<(), StorageError> {
        (**self).update(fixture)
    }

    fn delete_all(&mut self) -> Result<(), StorageError> {
        (**self).delete_all()
    }

    fn list_by_week(&self, week: u32) -> Result<Vec<Match>, StorageError> {
        (**self).list_by_week(week)
    }

    fn list_played(&self) -> Result<Vec<Match>, StorageError> {
        (**self).list_played()
    }

    fn max_week_played(&self) -> Result<u32, StorageError> {
        (**self).max_week_played()
    }
}

/// Give `id` the next free value if it is unassigned, keeping `next_id` ahead
/// of every ID handed out or accepted.
pub(crate) fn assign_id(id: &mut EntityId, next_id: &mut u32) {
    if id.is_assigned() {
        if id.get() >= *next_id {
            *next_id = id.get() + 1;
        }
    } else {
        *id = EntityId::new(*next_id);
        *next_id += 1;
    }
}
