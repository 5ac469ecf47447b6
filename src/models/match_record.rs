//! Match record model — the append-only facts standings and pairings derive from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, MatchId, PlayerId};

/// Outcome of a single match between `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    WinA,
    WinB,
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::WinA => write!(f, "win_a"),
            Outcome::WinB => write!(f, "win_b"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A completed match. A bye is stored as `a == b` with [`Outcome::WinA`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Derived from round and participants
    pub id: MatchId,

    /// Round this match was played in (1-based)
    pub round: u32,

    pub a: PlayerId,

    pub b: PlayerId,

    pub outcome: Outcome,

    /// When the result was reported
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(round: u32, a: PlayerId, b: PlayerId, outcome: Outcome) -> Self {
        let id = EntityId::generate(&[&round.to_string(), &a.to_string(), &b.to_string()]);

        Self {
            id,
            round,
            a,
            b,
            outcome,
            recorded_at: Utc::now(),
        }
    }

    /// A bye for `player`: a self-pairing that always counts as a win.
    pub fn bye(round: u32, player: PlayerId) -> Self {
        Self::new(round, player, player, Outcome::WinA)
    }

    pub fn is_bye(&self) -> bool {
        self.a == self.b
    }

    /// The winning player, or `None` for a draw.
    pub fn winner(&self) -> Option<PlayerId> {
        match self.outcome {
            Outcome::WinA => Some(self.a),
            Outcome::WinB => Some(self.b),
            Outcome::Draw => None,
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.a == player || self.b == player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_winner() {
        assert_eq!(MatchRecord::new(1, p(1), p(2), Outcome::WinA).winner(), Some(p(1)));
        assert_eq!(MatchRecord::new(1, p(1), p(2), Outcome::WinB).winner(), Some(p(2)));
        assert_eq!(MatchRecord::new(1, p(1), p(2), Outcome::Draw).winner(), None);
    }

    #[test]
    fn test_bye_record() {
        let bye = MatchRecord::bye(2, p(5));
        assert!(bye.is_bye());
        assert_eq!(bye.winner(), Some(p(5)));
        assert!(bye.involves(p(5)));
    }

    #[test]
    fn test_involves() {
        let m = MatchRecord::new(1, p(1), p(2), Outcome::Draw);
        assert!(m.involves(p(1)));
        assert!(m.involves(p(2)));
        assert!(!m.involves(p(3)));
    }

    #[test]
    fn test_match_id_deterministic() {
        let m1 = MatchRecord::new(1, p(1), p(2), Outcome::WinA);
        let m2 = MatchRecord::new(1, p(1), p(2), Outcome::WinB);
        let m3 = MatchRecord::new(2, p(1), p(2), Outcome::WinA);
        assert_eq!(m1.id, m2.id);
        assert_ne!(m1.id, m3.id);
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_string(&Outcome::WinA).unwrap(), "\"win_a\"");
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"draw\"");

        let parsed: Outcome = serde_json::from_str("\"win_b\"").unwrap();
        assert_eq!(parsed, Outcome::WinB);
    }
}
