//! Player intents and the record of applied ones.
//!
//! Commands arrive from the command source already authenticated: the
//! issuing `PlayerId` travels alongside the command, never inside it.

use serde::{Deserialize, Serialize};

use super::player::Seat;

/// A player intent delivered to a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Take a seat on the board.
    Join { name: String },
    /// Give up a seat before the game starts.
    Leave,
    /// Signal readiness; creates the player's pawns.
    Ready,
    /// Roll the die (DRAW phase).
    RollDice,
    /// Move one pawn by the last roll (MOVE phase).
    MovePawn { pawn: u8 },
    /// End a MOVE phase that has no legal pawn move.
    Pass,
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Join { .. } => "join",
            Command::Leave => "leave",
            Command::Ready => "ready",
            Command::RollDice => "rollDice",
            Command::MovePawn { .. } => "movePawn",
            Command::Pass => "pass",
        }
    }
}

/// A recorded command with metadata for history tracking.
///
/// Used for:
/// - Replay/debugging
/// - Resyncing late viewers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The seat that issued the command.
    pub seat: Seat,

    /// The command applied.
    pub command: Command,

    /// Turn number when the command was applied (0 before the game starts).
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(seat: Seat, command: Command, turn: u32, sequence: u32) -> Self {
        Self {
            seat,
            command,
            turn,
            sequence,
        }
    }
}
