//! # Swiss Pairing
//!
//! Standings and next-round pairings for Swiss-system tournaments.
//!
//! ## Architecture
//!
//! - **models**: Players, match records, standings rows, pairings
//! - **standings**: Pure fold from match history to ordered standings
//! - **pairing**: Next-round pairing with bye selection and backtracking
//! - **storage**: Store trait plus JSONL and in-memory implementations
//! - **tournament**: Facade tying a store to the standings and pairing code
//! - **config**: Configuration loading and validation

pub mod config;
pub mod models;
pub mod pairing;
pub mod standings;
pub mod storage;
pub mod tournament;

pub use models::*;
pub use pairing::{next_round_pairings, PairingError};
pub use standings::{compute_standings, StandingsError};
pub use tournament::{Tournament, TournamentError};
