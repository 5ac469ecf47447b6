//! Tournament persistence.
//!
//! The standings and pairing code never touches storage; it works on
//! snapshots read through [`TournamentStore`]. Two stores are provided:
//! - [`JsonlStore`]: append-only JSON Lines files in a data directory
//! - [`MemoryStore`]: in-process vectors, for tests and embedding

mod jsonl;
mod memory;

pub use jsonl::*;
pub use memory::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{MatchRecord, Pairing, Player};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt record at line {line} of {path:?}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

/// Read and write access to a tournament's players and match history.
///
/// Implementations serialize their own writes; callers must finish recording
/// a round's results before asking for the next round's pairings.
pub trait TournamentStore {
    fn list_players(&self) -> Result<Vec<Player>, StorageError>;

    /// All match records in the order they were appended.
    fn list_matches(&self) -> Result<Vec<MatchRecord>, StorageError>;

    /// Pairings stored for upcoming or past rounds.
    fn list_pairings(&self) -> Result<Vec<Pairing>, StorageError>;

    /// Register a player under the next free id.
    fn register_player(&mut self, name: &str) -> Result<Player, StorageError>;

    fn record_match(&mut self, record: MatchRecord) -> Result<(), StorageError>;

    fn record_pairings(&mut self, pairings: &[Pairing]) -> Result<(), StorageError>;

    /// Remove all match records and stored pairings.
    fn delete_matches(&mut self) -> Result<(), StorageError>;

    fn delete_players(&mut self) -> Result<(), StorageError>;
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

    /// Path of the JSONL file holding one entity type.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(
            config.entity_path(EntityType::Player),
            PathBuf::from("/data/players.jsonl")
        );
        assert_eq!(
            config.entity_path(EntityType::Match),
            PathBuf::from("/data/matches.jsonl")
        );
        assert_eq!(
            config.entity_path(EntityType::Pairing),
            PathBuf::from("/data/pairings.jsonl")
        );
    }
}
