//! In-memory tournament store.

use super::{StorageError, TournamentStore};
use crate::models::{MatchRecord, Pairing, Player, PlayerId};

/// Keeps players, matches and pairings in vectors. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: Vec<Player>,
    matches: Vec<MatchRecord>,
    pairings: Vec<Pairing>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.clone())
    }

    fn list_matches(&self) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self.matches.clone())
    }

    fn list_pairings(&self) -> Result<Vec<Pairing>, StorageError> {
        Ok(self.pairings.clone())
    }

    fn register_player(&mut self, name: &str) -> Result<Player, StorageError> {
        let next_id = self
            .players
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(PlayerId::new(1), |id| id.next());

        let player = Player::new(next_id, name);
        self.players.push(player.clone());
        Ok(player)
    }

    fn record_match(&mut self, record: MatchRecord) -> Result<(), StorageError> {
        self.matches.push(record);
        Ok(())
    }

    fn record_pairings(&mut self, pairings: &[Pairing]) -> Result<(), StorageError> {
        self.pairings.extend_from_slice(pairings);
        Ok(())
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        self.matches.clear();
        self.pairings.clear();
        Ok(())
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        self.players.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let a = store.register_player("Twilight Sparkle").unwrap();
        let b = store.register_player("Fluttershy").unwrap();
        assert_eq!(b.id, PlayerId::new(2));

        store.record_pairings(&[Pairing::new(1, a.id, b.id)]).unwrap();
        store.record_match(MatchRecord::bye(1, a.id)).unwrap();

        assert_eq!(store.list_players().unwrap().len(), 2);
        assert_eq!(store.list_matches().unwrap().len(), 1);
        assert_eq!(store.list_pairings().unwrap().len(), 1);

        store.delete_matches().unwrap();
        assert!(store.list_matches().unwrap().is_empty());
        assert!(store.list_pairings().unwrap().is_empty());
    }
}
