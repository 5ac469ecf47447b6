//! Standings calculation.
//!
//! Folds the match history into one [`StandingRow`] per player and orders
//! them:
//! - ascending rank (`played - wins - draws / 2`)
//! - descending opponent wins
//! - ascending player id, so the order is total and pairings reproducible
//!
//! Opponent wins are summed against each opponent's *final* win total, so the
//! result does not depend on the order of the match list.

use std::cmp::Ordering;
use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{MatchId, MatchRecord, Outcome, Player, PlayerId, StandingRow};

/// Errors raised while folding a match history.
#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("Match {match_id} references unknown player {player}")]
    InvalidReference { match_id: MatchId, player: PlayerId },

    #[error("Player {0} appears more than once in the player list")]
    DuplicatePlayer(PlayerId),
}

/// Rank score: `played - wins - draws / 2`. Lower is better.
pub fn rank_score(played: u32, wins: u32, draws: u32) -> f64 {
    played as f64 - wins as f64 - draws as f64 / 2.0
}

/// Total order used for standings.
pub fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    a.rank
        .total_cmp(&b.rank)
        .then_with(|| b.opponent_wins.cmp(&a.opponent_wins))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Compute ordered standings for `players` from `matches`.
pub fn compute_standings(
    players: &[Player],
    matches: &[MatchRecord],
) -> Result<Vec<StandingRow>, StandingsError> {
    let mut rows: HashMap<PlayerId, StandingRow> = HashMap::with_capacity(players.len());
    for player in players {
        if rows.insert(player.id, StandingRow::empty(player)).is_some() {
            return Err(StandingsError::DuplicatePlayer(player.id));
        }
    }

    for m in matches {
        for player in [m.a, m.b] {
            if !rows.contains_key(&player) {
                return Err(StandingsError::InvalidReference {
                    match_id: m.id.clone(),
                    player,
                });
            }
        }
    }

    for m in matches {
        if m.is_bye() {
            if let Some(row) = rows.get_mut(&m.a) {
                row.byes += 1;
                row.played += 1;
                row.wins += 1;
            }
            continue;
        }

        for player in [m.a, m.b] {
            if let Some(row) = rows.get_mut(&player) {
                row.played += 1;
                if m.outcome == Outcome::Draw {
                    row.draws += 1;
                }
            }
        }
        if let Some(row) = m.winner().and_then(|winner| rows.get_mut(&winner)) {
            row.wins += 1;
        }
    }

    let final_wins: HashMap<PlayerId, u32> =
        rows.iter().map(|(id, row)| (*id, row.wins)).collect();
    let wins_of = |player: PlayerId| final_wins.get(&player).copied().unwrap_or(0);

    for m in matches.iter().filter(|m| !m.is_bye()) {
        let (a_wins, b_wins) = (wins_of(m.a), wins_of(m.b));
        if let Some(row) = rows.get_mut(&m.a) {
            row.opponent_wins += b_wins;
        }
        if let Some(row) = rows.get_mut(&m.b) {
            row.opponent_wins += a_wins;
        }
    }

    let mut table: Vec<StandingRow> = rows
        .into_values()
        .map(|mut row| {
            row.rank = rank_score(row.played, row.wins, row.draws);
            row
        })
        .collect();
    table.sort_by(compare_rows);

    debug!(
        "Computed standings for {} players from {} matches",
        table.len(),
        matches.len()
    );
    Ok(table)
}
