//! Command outcomes.
//!
//! Every command either applies completely (`Applied`) or is rejected as a
//! rule violation (`Rejection`). A rejected command leaves the session
//! untouched and publishes nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Phase, PlayerId, Seat};

/// A pawn sent back to base by a capture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPawn {
    pub owner: PlayerId,
    pub number: u8,
    /// Track field the capture happened on.
    pub field: u8,
    /// Base slot the pawn was returned to.
    pub base_slot: u8,
}

/// What an accepted command did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Applied {
    Joined { seat: Seat },
    /// The player already held a seat; nothing changed.
    Rejoined { seat: Seat },
    Left { seat: Seat },
    Ready { seat: Seat, game_started: bool },
    GameStarted { first: Seat },
    Rolled { value: u8, forfeited: bool },
    Moved {
        pawn: u8,
        captured: Option<CapturedPawn>,
        entered_home: bool,
        finished: bool,
    },
    Passed,
}

/// Why a command was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("player {0} has no seat on this board")]
    UnknownPlayer(PlayerId),

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("expected {expected:?} phase, board is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("pawn {0} does not exist")]
    UnknownPawn(u8),

    #[error("a roll of {roll} cannot bring a pawn out of base")]
    PawnInBase { roll: u8 },

    #[error("pawn {0} is already home")]
    PawnInHome(u8),

    #[error("only {fields_left} fields left, rolled {roll}")]
    InsufficientDistance { fields_left: u8, roll: u8 },

    #[error("track field {field} already holds two pawns")]
    FieldFull { field: u8 },

    #[error("player {0} is already ready")]
    AlreadyReady(PlayerId),

    #[error("all four seats are taken")]
    TableFull,

    #[error("the game has already started")]
    GameInProgress,

    #[error("the game has not started")]
    GameNotStarted,

    #[error("{joined} seats joined, {required} required")]
    NotEnoughPlayers { joined: usize, required: usize },

    #[error("not every seat is ready")]
    PlayersNotReady,

    #[error("a legal move exists, passing is not allowed")]
    MoveAvailable,

    #[error("the game is over")]
    GameOver,
}
