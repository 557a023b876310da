//! JSONL (JSON Lines) storage.
//!
//! The live season is persisted as one JSON object per line in
//! `teams.jsonl` and `matches.jsonl`. Every mutation rewrites the whole file
//! and only replaces the in-memory copy once the write succeeded.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::memory::{MemoryMatchStore, MemoryTeamStore};
use super::{MatchStore, StorageConfig, StorageError, TeamStore};
use crate::models::{Match, MatchId, Team, TeamId};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write entities, replacing the entire file.
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// failed write leaves the previous contents intact.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file. A missing file reads as empty.
    ///
    /// Unlike a log, these files are the source of truth for the season, so
    /// an unparseable line is an error rather than something to skip.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let entity = serde_json::from_str(&line).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                line: index + 1,
                source,
            })?;
            entities.push(entity);
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Team store persisted to `teams.jsonl`.
pub struct JsonlTeamStore {
    inner: MemoryTeamStore,
    writer: JsonlWriter<Team>,
}

impl JsonlTeamStore {
    /// Load the team file, or start empty if it does not exist yet.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let path = config.teams_path();
        let teams = JsonlReader::<Team>::new(path.clone()).read_all()?;
        info!("Loaded {} teams from {:?}", teams.len(), path);

        Ok(Self {
            inner: MemoryTeamStore::from_teams(&teams),
            writer: JsonlWriter::new(path),
        })
    }

    fn commit(&mut self, next: MemoryTeamStore) -> Result<(), StorageError> {
        self.writer.write_all(&next.list_all()?)?;
        self.inner = next;
        Ok(())
    }
}

impl TeamStore for JsonlTeamStore {
    fn create(&mut self, team: Team) -> Result<Team, StorageError> {
        let mut next = self.inner.clone();
        let created = next.create(team)?;
        self.commit(next)?;
        Ok(created)
    }

    fn get(&self, id: TeamId) -> Result<Option<Team>, StorageError> {
        self.inner.get(id)
    }

    fn list_all(&self) -> Result<Vec<Team>, StorageError> {
        self.inner.list_all()
    }

    fn update(&mut self, team: &Team) -> Result<(), StorageError> {
        let mut next = self.inner.clone();
        next.update(team)?;
        self.commit(next)
    }
}

/// Match store persisted to `matches.jsonl`.
pub struct JsonlMatchStore {
    inner: MemoryMatchStore,
    writer: JsonlWriter<Match>,
}

impl JsonlMatchStore {
    /// Load the match file, or start empty if it does not exist yet.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let path = config.matches_path();
        let matches = JsonlReader::<Match>::new(path.clone()).read_all()?;
        info!("Loaded {} matches from {:?}", matches.len(), path);

        Ok(Self {
            inner: MemoryMatchStore::from_matches(&matches),
            writer: JsonlWriter::new(path),
        })
    }

    fn commit(&mut self, next: MemoryMatchStore) -> Result<(), StorageError> {
        self.writer.write_all(&next.list_all()?)?;
        self.inner = next;
        Ok(())
    }
}

impl MatchStore for JsonlMatchStore {
    fn create(&mut self, fixture: Match) -> Result<Match, StorageError> {
        let mut next = self.inner.clone();
        let created = next.create(fixture)?;
        self.commit(next)?;
        Ok(created)
    }

    fn get(&self, id: MatchId) -> Result<Option<Match>, StorageError> {
        self.inner.get(id)
    }

    fn list_all(&self) -> Result<Vec<Match>, StorageError> {
        self.inner.list_all()
    }

    fn update(&mut self, fixture: &Match) -> Result<(), StorageError> {
        let mut next = self.inner.clone();
        next.update(fixture)?;
        self.commit(next)
    }

    fn delete_all(&mut self) -> Result<(), StorageError> {
        self.commit(MemoryMatchStore::new())
    }
}
