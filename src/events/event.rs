//! Notifications published to everyone watching a board.
//!
//! Event names and payload keys follow the viewer protocol (`playerTurn`,
//! `pawnUpdate`, `playerId`, ...), so the serialized form can be handed to
//! a transport as-is.

use serde::{Deserialize, Serialize};

use crate::core::{Pawn, Player, PlayerId};

/// A state change on a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// Whose turn it is now.
    PlayerTurn {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        name: String,
    },

    /// All seats are ready and the first turn is about to be announced.
    GameStart,

    /// The current player rolled.
    Draw { number: u8 },

    /// Full pawn set of one player after a change.
    PawnUpdate {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        pawns: Vec<Pawn>,
    },

    /// A player finished setup; carries the pawns just created.
    PlayerReady { player: Player },

    /// The seat count reached the minimum needed to start.
    EnoughPlayers,

    /// A player brought all four pawns home.
    GameOver {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        name: String,
    },
}

impl SessionEvent {
    /// Turn announcement for a player.
    pub fn player_turn(player: &Player) -> Self {
        SessionEvent::PlayerTurn {
            player_id: player.id.clone(),
            name: player.name.clone(),
        }
    }

    /// Pawn update carrying a player's full pawn set.
    pub fn pawn_update(player: &Player) -> Self {
        SessionEvent::PawnUpdate {
            player_id: player.id.clone(),
            pawns: player.pawns.to_vec(),
        }
    }

    /// Protocol name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::PlayerTurn { .. } => "playerTurn",
            SessionEvent::GameStart => "gameStart",
            SessionEvent::Draw { .. } => "draw",
            SessionEvent::PawnUpdate { .. } => "pawnUpdate",
            SessionEvent::PlayerReady { .. } => "playerReady",
            SessionEvent::EnoughPlayers => "enoughPlayers",
            SessionEvent::GameOver { .. } => "gameOver",
        }
    }
}
