//! Core entity model: players, pawns, session state, commands, dice, configuration.
//!
//! This module holds passive data. All rule decisions live in `rules`.

pub mod player;
pub mod pawn;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use player::{Player, PlayerId, Seat};
pub use pawn::{advance_field, Location, Pawn};
pub use rng::{GameRng, RandomSource, ScriptedDice};
pub use config::{
    ConfigError, RulesConfig, FULL_DISTANCE, MAX_SEATS, PAWNS_PER_PLAYER, SEAT_SPACING, STRETCH_LEN, TRACK_LEN,
};
pub use action::{ActionRecord, Command};
pub use state::{GameStatus, Phase, SessionSnapshot, SessionState, SnapshotError};
