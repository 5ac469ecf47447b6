//! Next-round Swiss pairing.
//!
//! Players are paired down the standings: each unpaired player takes the
//! first later player they have not already met. With an odd field the bye
//! goes to the lowest-standing player without a previous bye; if that choice
//! leaves the rest unpairable, the next candidate up the table is tried.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{MatchRecord, Pairing, PlayerId, StandingRow};

/// Errors raised while pairing a round.
#[derive(Debug, Error)]
pub enum PairingError {
    #[error("No player is eligible for a bye")]
    NoByeCandidate,

    #[error("No complete pairing without rematches exists ({attempts} attempts)")]
    Infeasible { attempts: usize },

    #[error("Match history references player {0} absent from the standings")]
    InvalidReference(PlayerId),

    #[error("Player {0} appears more than once in the standings")]
    DuplicatePlayer(PlayerId),
}

impl PairingError {
    /// True when no legal pairing exists for an otherwise valid history.
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            PairingError::NoByeCandidate | PairingError::Infeasible { .. }
        )
    }
}

/// Round number the next pairings are for: one past the highest recorded round.
pub fn next_round(matches: &[MatchRecord]) -> u32 {
    matches.iter().map(|m| m.round).max().unwrap_or(0) + 1
}

/// Opponents each player has met, byes excluded.
fn previous_opponents(matches: &[MatchRecord]) -> HashMap<PlayerId, HashSet<PlayerId>> {
    let mut met: HashMap<PlayerId, HashSet<PlayerId>> = HashMap::new();
    for m in matches.iter().filter(|m| !m.is_bye()) {
        met.entry(m.a).or_default().insert(m.b);
        met.entry(m.b).or_default().insert(m.a);
    }
    met
}

/// Bye candidates, weakest standing first.
fn bye_candidates(standings: &[StandingRow]) -> Vec<PlayerId> {
    standings
        .iter()
        .rev()
        .filter(|row| !row.has_bye())
        .map(|row| row.player_id)
        .collect()
}

/// Greedy forward scan over `order`. Returns `None` when some player has only
/// previous opponents left to face.
fn pair_in_order(
    order: &[PlayerId],
    met: &HashMap<PlayerId, HashSet<PlayerId>>,
) -> Option<Vec<(PlayerId, PlayerId)>> {
    let mut paired = vec![false; order.len()];
    let mut pairs = Vec::with_capacity(order.len() / 2);

    for i in 0..order.len() {
        if paired[i] {
            continue;
        }
        let player = order[i];
        let opponents = met.get(&player);
        let partner = (i + 1..order.len()).find(|&j| {
            !paired[j] && opponents.map_or(true, |seen| !seen.contains(&order[j]))
        })?;

        paired[i] = true;
        paired[partner] = true;
        pairs.push((player, order[partner]));
    }

    Some(pairs)
}

/// Produce pairings for the next round.
///
/// `standings` must be in standings order (as returned by
/// [`compute_standings`](crate::standings::compute_standings)) and `matches`
/// the full history they were computed from.
pub fn next_round_pairings(
    standings: &[StandingRow],
    matches: &[MatchRecord],
) -> Result<Vec<Pairing>, PairingError> {
    let mut known = HashSet::with_capacity(standings.len());
    for row in standings {
        if !known.insert(row.player_id) {
            return Err(PairingError::DuplicatePlayer(row.player_id));
        }
    }
    if let Some(unknown) = matches
        .iter()
        .flat_map(|m| [m.a, m.b])
        .find(|id| !known.contains(id))
    {
        return Err(PairingError::InvalidReference(unknown));
    }

    let round = next_round(matches);
    let order: Vec<PlayerId> = standings.iter().map(|row| row.player_id).collect();

    match order.as_slice() {
        [] => return Ok(Vec::new()),
        [only] => {
            info!("Round {}: single player {} receives a bye", round, only);
            return Ok(vec![Pairing::bye(round, *only)]);
        }
        _ => {}
    }

    let met = previous_opponents(matches);
    let to_pairings = |pairs: Vec<(PlayerId, PlayerId)>| -> Vec<Pairing> {
        pairs
            .into_iter()
            .map(|(a, b)| Pairing::new(round, a, b))
            .collect()
    };

    if order.len() % 2 == 0 {
        return match pair_in_order(&order, &met) {
            Some(pairs) => {
                info!("Round {}: paired {} players", round, order.len());
                Ok(to_pairings(pairs))
            }
            None => {
                warn!("Round {}: no pairing without rematches", round);
                Err(PairingError::Infeasible { attempts: 1 })
            }
        };
    }

    let candidates = bye_candidates(standings);
    if candidates.is_empty() {
        warn!("Round {}: every player already has a bye", round);
        return Err(PairingError::NoByeCandidate);
    }

    for (attempt, bye_player) in candidates.iter().enumerate() {
        let remaining: Vec<PlayerId> = order
            .iter()
            .copied()
            .filter(|id| id != bye_player)
            .collect();

        match pair_in_order(&remaining, &met) {
            Some(pairs) => {
                info!(
                    "Round {}: paired {} players, bye to {} (attempt {})",
                    round,
                    order.len(),
                    bye_player,
                    attempt + 1
                );
                let mut pairings = vec![Pairing::bye(round, *bye_player)];
                pairings.extend(to_pairings(pairs));
                return Ok(pairings);
            }
            None => debug!(
                "Round {}: bye to {} leaves no complete pairing, trying next candidate",
                round, bye_player
            ),
        }
    }

    warn!(
        "Round {}: all {} bye candidates exhausted",
        round,
        candidates.len()
    );
    Err(PairingError::Infeasible {
        attempts: candidates.len(),
    })
}
