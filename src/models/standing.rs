//! Derived standings row.

use serde::{Deserialize, Serialize};

use super::{Player, PlayerId};

/// One player's line in the standings table.
///
/// Recomputed from the match history every round; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub player_id: PlayerId,

    pub name: String,

    /// Wins, including a bye
    pub wins: u32,

    pub draws: u32,

    /// Matches played, including a bye
    pub played: u32,

    /// Byes received (0 or 1 in a well-formed history)
    pub byes: u32,

    /// Sum of the final win totals of every opponent faced, byes excluded
    pub opponent_wins: u32,

    /// Deficit score `played - wins - draws / 2`; 0 is perfect, lower is better
    pub rank: f64,
}

impl StandingRow {
    /// A zeroed row for a player with no matches.
    pub fn empty(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            wins: 0,
            draws: 0,
            played: 0,
            byes: 0,
            opponent_wins: 0,
            rank: 0.0,
        }
    }

    pub fn losses(&self) -> u32 {
        self.played.saturating_sub(self.wins).saturating_sub(self.draws)
    }

    pub fn has_bye(&self) -> bool {
        self.byes > 0
    }
}
