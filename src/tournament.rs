//! Tournament facade over a [`TournamentStore`].
//!
//! Reads a snapshot from the store, hands it to the pure standings and
//! pairing functions, and writes results back. Each player plays exactly one
//! match (or bye) per round, so a reported match belongs to the round after
//! the most recent one either participant has played.

use thiserror::Error;
use tracing::info;

use crate::models::{MatchRecord, Outcome, Pairing, Player, PlayerId, StandingRow};
use crate::pairing::{next_round_pairings, PairingError};
use crate::standings::{compute_standings, StandingsError};
use crate::storage::{StorageError, TournamentStore};

/// Errors surfaced by [`Tournament`] operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Standings(#[from] StandingsError),

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Winner {winner} did not play in {a} vs {b}")]
    InvalidWinner {
        a: PlayerId,
        b: PlayerId,
        winner: PlayerId,
    },

    #[error("Player {0} already has a bye")]
    ByeAlreadyHeld(PlayerId),

    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Cannot delete players while {0} match records exist")]
    MatchesExist(usize),
}

/// Rounds needed to separate a single winner: ceil(log2(players)).
pub fn recommended_rounds(player_count: usize) -> u32 {
    if player_count < 2 {
        0
    } else {
        usize::BITS - (player_count - 1).leading_zeros()
    }
}

/// A Swiss tournament backed by a store.
pub struct Tournament<S> {
    store: S,
    rounds: Option<u32>,
}

impl<S: TournamentStore> Tournament<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rounds: None,
        }
    }

    /// Override the planned number of rounds.
    pub fn with_rounds(mut self, rounds: Option<u32>) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn register_player(&mut self, name: &str) -> Result<Player, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(self.store.register_player(name)?)
    }

    pub fn players(&self) -> Result<Vec<Player>, TournamentError> {
        Ok(self.store.list_players()?)
    }

    pub fn count_players(&self) -> Result<usize, TournamentError> {
        Ok(self.store.list_players()?.len())
    }

    /// Number of match records, byes included.
    pub fn count_matches(&self) -> Result<usize, TournamentError> {
        Ok(self.store.list_matches()?.len())
    }

    /// Record a result. `winner == None` is a draw; `player1 == player2` is a bye.
    pub fn report_match(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        winner: Option<PlayerId>,
    ) -> Result<MatchRecord, TournamentError> {
        let players = self.store.list_players()?;
        for id in [player1, player2] {
            if !players.iter().any(|p| p.id == id) {
                return Err(TournamentError::UnknownPlayer(id));
            }
        }

        let matches = self.store.list_matches()?;
        let outcome = if player1 == player2 {
            if matches.iter().any(|m| m.is_bye() && m.a == player1) {
                return Err(TournamentError::ByeAlreadyHeld(player1));
            }
            match winner {
                Some(w) if w != player1 => {
                    return Err(TournamentError::InvalidWinner {
                        a: player1,
                        b: player2,
                        winner: w,
                    })
                }
                _ => Outcome::WinA,
            }
        } else {
            match winner {
                None => Outcome::Draw,
                Some(w) if w == player1 => Outcome::WinA,
                Some(w) if w == player2 => Outcome::WinB,
                Some(w) => {
                    return Err(TournamentError::InvalidWinner {
                        a: player1,
                        b: player2,
                        winner: w,
                    })
                }
            }
        };

        let played = |id: PlayerId| {
            matches
                .iter()
                .filter(|m| m.involves(id))
                .map(|m| m.round)
                .max()
                .unwrap_or(0)
        };
        let round = played(player1).max(played(player2)) + 1;

        let record = MatchRecord::new(round, player1, player2, outcome);
        self.store.record_match(record.clone())?;
        info!(
            "Round {}: recorded {} vs {} ({})",
            round, player1, player2, outcome
        );
        Ok(record)
    }

    /// Current standings, best first.
    pub fn player_standings(&self) -> Result<Vec<StandingRow>, TournamentError> {
        let players = self.store.list_players()?;
        let matches = self.store.list_matches()?;
        Ok(compute_standings(&players, &matches)?)
    }

    /// Pairings for the next round. Nothing is written.
    pub fn swiss_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        let players = self.store.list_players()?;
        let matches = self.store.list_matches()?;
        let standings = compute_standings(&players, &matches)?;
        Ok(next_round_pairings(&standings, &matches)?)
    }

    /// Store pairings as the intended matchups for their round.
    pub fn record_pairings(&mut self, pairings: &[Pairing]) -> Result<(), TournamentError> {
        self.store.record_pairings(pairings)?;
        Ok(())
    }

    /// Stored pairings for rounds not yet completed.
    pub fn pending_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        let completed = self.completed_rounds()?;
        Ok(self
            .store
            .list_pairings()?
            .into_iter()
            .filter(|p| p.round > completed)
            .collect())
    }

    /// Rounds every player has a result for.
    pub fn completed_rounds(&self) -> Result<u32, TournamentError> {
        Ok(self
            .player_standings()?
            .iter()
            .map(|row| row.played)
            .min()
            .unwrap_or(0))
    }

    /// Configured round count, or ceil(log2(players)).
    pub fn planned_rounds(&self) -> Result<u32, TournamentError> {
        match self.rounds {
            Some(rounds) => Ok(rounds),
            None => Ok(recommended_rounds(self.count_players()?)),
        }
    }

    pub fn is_complete(&self) -> Result<bool, TournamentError> {
        let planned = self.planned_rounds()?;
        Ok(planned > 0 && self.completed_rounds()? >= planned)
    }

    /// Remove all match records and stored pairings.
    pub fn delete_matches(&mut self) -> Result<(), TournamentError> {
        self.store.delete_matches()?;
        info!("Deleted all matches");
        Ok(())
    }

    /// Remove all players. Refused while match records still reference them.
    pub fn delete_players(&mut self) -> Result<(), TournamentError> {
        let matches = self.count_matches()?;
        if matches > 0 {
            return Err(TournamentError::MatchesExist(matches));
        }
        self.store.delete_players()?;
        info!("Deleted all players");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn tournament_with(names: &[&str]) -> (Tournament<MemoryStore>, Vec<PlayerId>) {
        let mut t = Tournament::new(MemoryStore::new());
        let ids = names
            .iter()
            .map(|n| t.register_player(n).unwrap().id)
            .collect();
        (t, ids)
    }

    /// Play every pairing with a fixed, id-derived result and record byes.
    fn play_round(t: &mut Tournament<MemoryStore>, round: u32) {
        let pairings = t.swiss_pairings().unwrap();
        for pr in pairings {
            let (a, b) = (pr.player_a, pr.player_b);
            let winner = if a == b {
                Some(a)
            } else {
                match (a.get() + b.get() + round) % 3 {
                    0 => Some(a),
                    1 => Some(b),
                    _ => None,
                }
            };
            let record = t.report_match(a, b, winner).unwrap();
            assert_eq!(record.round, round);
        }
    }

    #[test]
    fn test_count_after_delete() {
        let (mut t, _) = tournament_with(&["Markov Chaney", "Joe Malik", "Mao Tsu-hsi"]);
        assert_eq!(t.count_players().unwrap(), 3);

        t.delete_matches().unwrap();
        t.delete_players().unwrap();
        assert_eq!(t.count_players().unwrap(), 0);
        assert_eq!(t.count_matches().unwrap(), 0);
    }

    #[test]
    fn test_register_rejects_blank_name() {
        let (mut t, _) = tournament_with(&[]);
        assert!(matches!(
            t.register_player("   "),
            Err(TournamentError::EmptyName)
        ));
    }

    #[test]
    fn test_delete_players_refused_with_matches() {
        let (mut t, ids) = tournament_with(&["Kirk", "Spock"]);
        t.report_match(ids[0], ids[1], None).unwrap();

        assert!(matches!(
            t.delete_players(),
            Err(TournamentError::MatchesExist(1))
        ));
    }

    #[test]
    fn test_report_match_rounds() {
        let (mut t, ids) = tournament_with(&["A", "B", "C", "D"]);

        let r1 = t.report_match(ids[0], ids[1], Some(ids[0])).unwrap();
        let r2 = t.report_match(ids[2], ids[3], Some(ids[3])).unwrap();
        let r3 = t.report_match(ids[0], ids[3], None).unwrap();

        assert_eq!((r1.round, r2.round, r3.round), (1, 1, 2));
        assert_eq!(r1.outcome, Outcome::WinA);
        assert_eq!(r2.outcome, Outcome::WinB);
        assert_eq!(r3.outcome, Outcome::Draw);
    }

    #[test]
    fn test_report_match_validation() {
        let (mut t, ids) = tournament_with(&["A", "B", "C"]);

        assert!(matches!(
            t.report_match(ids[0], PlayerId::new(99), None),
            Err(TournamentError::UnknownPlayer(_))
        ));
        assert!(matches!(
            t.report_match(ids[0], ids[1], Some(ids[2])),
            Err(TournamentError::InvalidWinner { .. })
        ));
        assert!(matches!(
            t.report_match(ids[0], ids[0], Some(ids[1])),
            Err(TournamentError::InvalidWinner { .. })
        ));

        let bye = t.report_match(ids[2], ids[2], None).unwrap();
        assert!(bye.is_bye());
        assert_eq!(bye.winner(), Some(ids[2]));
        assert_eq!(t.count_matches().unwrap(), 1);
    }

    #[test]
    fn test_second_bye_refused() {
        let (mut t, ids) = tournament_with(&["A", "B", "C"]);
        t.report_match(ids[0], ids[0], None).unwrap();

        assert!(matches!(
            t.report_match(ids[0], ids[0], None),
            Err(TournamentError::ByeAlreadyHeld(id)) if id == ids[0]
        ));
        assert_eq!(t.count_matches().unwrap(), 1);

        let standings = t.player_standings().unwrap();
        assert!(standings.iter().all(|row| row.byes <= 1));

        // Another player can still take a bye.
        t.report_match(ids[1], ids[1], None).unwrap();
        assert_eq!(t.count_matches().unwrap(), 2);
    }

    #[test]
    fn test_standings_after_reports() {
        let (mut t, ids) =
            tournament_with(&["Bruno Walton", "Boots O'Neal", "Cathy Burton", "Diane Grant"]);
        t.report_match(ids[0], ids[1], Some(ids[0])).unwrap();
        t.report_match(ids[2], ids[3], Some(ids[2])).unwrap();

        for row in t.player_standings().unwrap() {
            assert_eq!(row.played, 1);
            let winner = row.player_id == ids[0] || row.player_id == ids[2];
            assert_eq!(row.wins, u32::from(winner));
        }
    }

    #[test]
    fn test_one_win_players_paired() {
        let (mut t, ids) =
            tournament_with(&["Twilight Sparkle", "Fluttershy", "Applejack", "Pinkie Pie"]);
        t.report_match(ids[0], ids[1], Some(ids[0])).unwrap();
        t.report_match(ids[2], ids[3], Some(ids[2])).unwrap();

        let pairings = t.swiss_pairings().unwrap();
        assert_eq!(pairings.len(), 2);
        let mut seats: Vec<Vec<PlayerId>> = pairings
            .iter()
            .map(|p| {
                let mut players = p.players();
                players.sort();
                players
            })
            .collect();
        seats.sort();
        assert_eq!(seats, vec![vec![ids[0], ids[2]], vec![ids[1], ids[3]]]);
    }

    #[test]
    fn test_three_players_bye_assigned() {
        let (t, _) = tournament_with(&["Kirk", "Spock", "McCoy"]);

        let pairings = t.swiss_pairings().unwrap();
        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings.iter().filter(|p| p.is_bye()).count(), 1);
    }

    #[test]
    fn test_draws_recorded() {
        let (mut t, _) = tournament_with(&["Kirk", "Spock", "McCoy", "Scotty"]);
        for p in t.swiss_pairings().unwrap() {
            t.report_match(p.player_a, p.player_b, None).unwrap();
        }

        for row in t.player_standings().unwrap() {
            assert_eq!(row.draws, 1);
        }
    }

    #[test]
    fn test_win_or_opponent_win_after_one_round() {
        let (mut t, _) = tournament_with(&["Kirk", "Spock", "McCoy", "Scotty"]);
        for p in t.swiss_pairings().unwrap() {
            t.report_match(p.player_a, p.player_b, Some(p.player_a)).unwrap();
        }

        for row in t.player_standings().unwrap() {
            assert_eq!(row.wins + row.opponent_wins, 1);
        }
    }

    #[test]
    fn test_pending_pairings() {
        let (mut t, _) = tournament_with(&["Kirk", "Spock"]);
        let pairings = t.swiss_pairings().unwrap();
        t.record_pairings(&pairings).unwrap();
        assert_eq!(t.pending_pairings().unwrap().len(), 1);

        let p = &pairings[0];
        t.report_match(p.player_a, p.player_b, Some(p.player_b)).unwrap();
        assert!(t.pending_pairings().unwrap().is_empty());
    }

    #[test]
    fn test_recommended_rounds() {
        assert_eq!(recommended_rounds(0), 0);
        assert_eq!(recommended_rounds(1), 0);
        assert_eq!(recommended_rounds(2), 1);
        assert_eq!(recommended_rounds(3), 2);
        assert_eq!(recommended_rounds(4), 2);
        assert_eq!(recommended_rounds(5), 3);
        assert_eq!(recommended_rounds(8), 3);
        assert_eq!(recommended_rounds(9), 4);
    }

    #[test]
    fn test_planned_rounds_override() {
        let (t, _) = tournament_with(&["A", "B", "C", "D"]);
        assert_eq!(t.planned_rounds().unwrap(), 2);

        let t = t.with_rounds(Some(5));
        assert_eq!(t.planned_rounds().unwrap(), 5);
    }

    #[test]
    fn test_simulated_tournaments() {
        for n in [2usize, 3, 4, 5, 7, 8, 9] {
            let names: Vec<String> = (1..=n).map(|i| format!("Player{:03}", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let (mut t, _) = tournament_with(&refs);

            let rounds = t.planned_rounds().unwrap();
            for round in 1..=rounds {
                assert!(!t.is_complete().unwrap());
                play_round(&mut t, round);
                assert_eq!(t.completed_rounds().unwrap(), round);
            }
            assert!(t.is_complete().unwrap());

            let standings = t.player_standings().unwrap();
            for row in &standings {
                assert_eq!(row.played, rounds, "{n} players");
                assert!(row.byes <= 1);
                assert!(row.wins + row.draws <= rounds);
            }
            assert!(standings[0].wins + standings[0].draws > 0);

            let expected_matches = n.div_ceil(2) * rounds as usize;
            assert_eq!(t.count_matches().unwrap(), expected_matches);
        }
    }
}
