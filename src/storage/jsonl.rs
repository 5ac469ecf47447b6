//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one entity. Match records
//! are only ever appended; resets truncate the file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{StorageConfig, StorageError, TournamentStore};
use crate::models::{MatchRecord, Pairing, Player, PlayerId};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Match,
    Pairing,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
            EntityType::Pairing => "pairings.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Append multiple entities to the file.
    pub fn append_batch(&self, entities: &[T]) -> Result<usize, StorageError> {
        if entities.is_empty() {
            return Ok(0);
        }

        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }

        writer.flush()?;
        info!("Appended {} entities to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    /// Read all entities from the file. A missing file reads as empty.
    ///
    /// Unparseable lines are an error: dropping a match record would change
    /// standings without anyone noticing.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entity = serde_json::from_str(&line).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                line: idx + 1,
                source,
            })?;
            entities.push(entity);
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// A tournament stored as JSONL files in one data directory.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl TournamentStore for JsonlStore {
    fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Player).read_all()
    }

    fn list_matches(&self) -> Result<Vec<MatchRecord>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Match).read_all()
    }

    fn list_pairings(&self) -> Result<Vec<Pairing>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Pairing).read_all()
    }

    fn register_player(&mut self, name: &str) -> Result<Player, StorageError> {
        let next_id = self
            .list_players()?
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(PlayerId::new(1), |id| id.next());

        let player = Player::new(next_id, name);
        JsonlWriter::for_entity(&self.config, EntityType::Player).append(&player)?;
        info!("Registered player {} ({})", player.name, player.id);
        Ok(player)
    }

    fn record_match(&mut self, record: MatchRecord) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Match).append(&record)
    }

    fn record_pairings(&mut self, pairings: &[Pairing]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Pairing).append_batch(pairings)?;
        Ok(())
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        JsonlWriter::<MatchRecord>::for_entity(&self.config, EntityType::Match).write_all(&[])?;
        JsonlWriter::<Pairing>::for_entity(&self.config, EntityType::Pairing).write_all(&[])?;
        Ok(())
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        JsonlWriter::<Player>::for_entity(&self.config, EntityType::Player).write_all(&[])?;
        Ok(())
    }
}
