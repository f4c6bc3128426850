//! # rust-ludo
//!
//! Authoritative rule engine for four-seat Ludo boards.
//!
//! ## Design Principles
//!
//! 1. **One Writer Per Board**: A `Session` is mutated only through
//!    `&mut self` commands that run to completion, events included.
//!    Hosting many boards means one worker per board (`hub`).
//!
//! 2. **Reject, Don't Repair**: Illegal commands return a `Rejection` and
//!    leave the board untouched. Nothing is published for them.
//!
//! 3. **Deterministic Dice**: Dice come from a `RandomSource`. The default
//!    is a seeded ChaCha stream, so a seed plus a command list replays a
//!    game exactly.
//!
//! ## Modules
//!
//! - `core`: Players, pawns, session state, commands, dice, configuration
//! - `rules`: Turn manager, dice engine and movement engine
//! - `events`: Outbound notifications and the sinks they are pushed into
//! - `hub`: Per-board worker tasks for hosting many isolated boards
//! - `selfplay`: Random-agent games for soak testing and benchmarks

pub mod core;
pub mod events;
pub mod hub;
pub mod rules;
pub mod selfplay;

// Re-export commonly used types
pub use crate::core::{
    Command, GameRng, GameStatus, Location, Pawn, Phase, Player, PlayerId, RandomSource,
    RulesConfig, ScriptedDice, Seat, SessionSnapshot,
};

pub use crate::events::{EventSink, SessionEvent};

pub use crate::hub::{BoardHandle, BoardId, HubError, SessionHub};

pub use crate::rules::{Applied, CapturedPawn, Rejection, Session};
