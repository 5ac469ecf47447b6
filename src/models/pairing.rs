//! Pairing model — an intended head-to-head matchup for an upcoming round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A single pairing. `player_a == player_b` denotes a bye.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    /// Round number the pairing is for
    pub round: u32,

    /// Higher-standing player of the two
    pub player_a: PlayerId,

    pub player_b: PlayerId,

    /// When this pairing was produced
    pub created_at: DateTime<Utc>,
}

impl Pairing {
    pub fn new(round: u32, player_a: PlayerId, player_b: PlayerId) -> Self {
        Self {
            round,
            player_a,
            player_b,
            created_at: Utc::now(),
        }
    }

    pub fn bye(round: u32, player: PlayerId) -> Self {
        Self::new(round, player, player)
    }

    pub fn is_bye(&self) -> bool {
        self.player_a == self.player_b
    }

    /// The distinct players in this pairing (one for a bye).
    pub fn players(&self) -> Vec<PlayerId> {
        if self.is_bye() {
            vec![self.player_a]
        } else {
            vec![self.player_a, self.player_b]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_creation() {
        let pairing = Pairing::new(1, PlayerId::new(1), PlayerId::new(2));

        assert_eq!(pairing.round, 1);
        assert!(!pairing.is_bye());
        assert_eq!(pairing.players(), vec![PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_bye_pairing() {
        let pairing = Pairing::bye(3, PlayerId::new(9));
        assert!(pairing.is_bye());
        assert_eq!(pairing.players(), vec![PlayerId::new(9)]);
    }

    #[test]
    fn test_pairing_serialization() {
        let pairing = Pairing::new(2, PlayerId::new(4), PlayerId::new(7));
        let json = serde_json::to_string(&pairing).unwrap();
        let parsed: Pairing = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.round, 2);
        assert_eq!(parsed.players(), pairing.players());
    }
}
