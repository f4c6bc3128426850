//! Session state: seats, turn, phase and history.
//!
//! ## SessionState
//!
//! Everything the rule engine reads and writes for one board:
//! - Seats in join order
//! - Whose turn it is and which sub-phase is active
//! - The last roll (meaningful during `Phase::Move` only)
//! - Turn counter and command history
//!
//! ## SessionSnapshot
//!
//! Plain copy of the observable state, used to resync viewers and to
//! rebuild a session at an exact position.

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::ActionRecord;
use super::config::{FULL_DISTANCE, MAX_SEATS, PAWNS_PER_PLAYER, STRETCH_LEN, TRACK_LEN};
use super::pawn::Location;
use super::player::{Player, PlayerId, Seat};

/// Sub-phase of the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Waiting for the current player to roll.
    #[default]
    Draw,
    /// Waiting for the current player to move a pawn by the last roll.
    Move,
}

/// Lifecycle of a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Seats are being taken; no turn yet.
    #[default]
    Lobby,
    InProgress,
    /// Someone brought all four pawns home.
    Finished { winner: Seat },
}

/// Mutable state of one board.
///
/// Only the rule engine writes `current`, `phase` and `last_roll`.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub(crate) players: Vec<Player>,
    pub(crate) status: GameStatus,
    pub(crate) current: Option<Seat>,
    pub(crate) phase: Phase,
    pub(crate) last_roll: Option<u8>,

    /// Turn number (1 for the first turn, 0 in the lobby).
    pub(crate) turn_number: u32,

    /// Command sequence within the turn.
    pub(crate) action_sequence: u32,

    pub(crate) history: Vector<ActionRecord>,
}

impl SessionState {
    /// Create an empty lobby.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player's seat by external ID.
    #[must_use]
    pub fn seat_of(&self, id: &PlayerId) -> Option<Seat> {
        self.players
            .iter()
            .position(|p| &p.id == id)
            .map(|i| Seat::new(i as u8))
    }

    /// Get the player at a seat.
    #[must_use]
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    pub(crate) fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat.index()]
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn current_seat(&self) -> Option<Seat> {
        self.current
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Every applied command, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// True when every joined seat has signalled readiness.
    #[must_use]
    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.ready)
    }

    /// Record an applied command under the current turn.
    pub(crate) fn record(&mut self, seat: Seat, command: super::Command) {
        let sequence = self.action_sequence;
        self.action_sequence += 1;
        self.history
            .push_back(ActionRecord::new(seat, command, self.turn_number, sequence));
    }

    /// Capture the observable state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            players: self.players.clone(),
            status: self.status,
            current: self.current,
            phase: self.phase,
            last_roll: self.last_roll,
            turn_number: self.turn_number,
        }
    }
}

/// Observable state of a board at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub players: Vec<Player>,
    pub status: GameStatus,
    pub current: Option<Seat>,
    pub phase: Phase,
    pub last_roll: Option<u8>,
    pub turn_number: u32,
}

/// Why a snapshot cannot be turned back into a session.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot has {0} seats, at most 4 are allowed")]
    TooManySeats(usize),

    #[error("player {0} appears in more than one seat")]
    DuplicatePlayer(PlayerId),

    #[error("player {player} has an invalid pawn set: {reason}")]
    InvalidPawns { player: PlayerId, reason: &'static str },

    #[error("current seat {0} is not occupied")]
    UnknownSeat(Seat),

    #[error("inconsistent turn state: {0}")]
    InconsistentTurn(&'static str),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

impl SessionSnapshot {
    /// Encode for transfer to a viewer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate a snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: SessionSnapshot = bincode::deserialize(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the board invariants a rule engine relies on.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.players.len() > MAX_SEATS {
            return Err(SnapshotError::TooManySeats(self.players.len()));
        }

        for (i, player) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|p| p.id == player.id) {
                return Err(SnapshotError::DuplicatePlayer(player.id.clone()));
            }
            validate_pawns(player)?;
        }

        let invalid_turn = SnapshotError::InconsistentTurn;
        match self.status {
            GameStatus::Lobby => {
                if self.current.is_some() || self.phase != Phase::Draw {
                    return Err(invalid_turn("lobby has a current seat or phase"));
                }
            }
            GameStatus::InProgress | GameStatus::Finished { .. } => {
                let seat = self
                    .current
                    .ok_or(invalid_turn("started game has no current seat"))?;
                if seat.index() >= self.players.len() {
                    return Err(SnapshotError::UnknownSeat(seat));
                }
                if !self.all_ready() {
                    return Err(invalid_turn("started game has unready seats"));
                }
            }
        }
        if let GameStatus::Finished { winner } = self.status {
            if winner.index() >= self.players.len() {
                return Err(SnapshotError::UnknownSeat(winner));
            }
        }

        match (self.phase, self.last_roll) {
            (Phase::Move, Some(roll)) if (1..=6).contains(&roll) => {}
            (Phase::Move, _) => return Err(invalid_turn("MOVE phase without a valid roll")),
            (Phase::Draw, Some(_)) => return Err(invalid_turn("DRAW phase with a stored roll")),
            (Phase::Draw, None) => {}
        }

        // At most two pawns per track field
        for field in 1..=TRACK_LEN {
            let occupants = self
                .players
                .iter()
                .flat_map(|p| p.pawns.iter())
                .filter(|pawn| pawn.occupies(field))
                .count();
            if occupants > 2 {
                return Err(invalid_turn("more than two pawns share a track field"));
            }
        }

        Ok(())
    }

    fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.ready)
    }
}

fn validate_pawns(player: &Player) -> Result<(), SnapshotError> {
    let invalid = |reason| SnapshotError::InvalidPawns {
        player: player.id.clone(),
        reason,
    };

    if !player.ready {
        return if player.pawns.is_empty() {
            Ok(())
        } else {
            Err(invalid("pawns exist before readiness"))
        };
    }

    if player.pawns.len() != PAWNS_PER_PLAYER as usize {
        return Err(invalid("ready player must own exactly four pawns"));
    }
    for number in 1..=PAWNS_PER_PLAYER {
        if player.pawns.iter().filter(|p| p.number == number).count() != 1 {
            return Err(invalid("pawn numbers must be 1-4, each once"));
        }
    }

    for pawn in &player.pawns {
        if pawn.owner != player.id {
            return Err(invalid("pawn owner does not match seat"));
        }
        if pawn.fields_left > FULL_DISTANCE {
            return Err(invalid("fieldsLeft above 43"));
        }
        let in_range = match pawn.location {
            Location::Base | Location::Home => (1..=STRETCH_LEN).contains(&pawn.position),
            Location::Track => (1..=TRACK_LEN).contains(&pawn.position),
        };
        if !in_range {
            return Err(invalid("position out of range for location"));
        }
    }

    for location in [Location::Base, Location::Home] {
        let mut slots: Vec<u8> = player
            .pawns
            .iter()
            .filter(|p| p.location == location)
            .map(|p| p.position)
            .collect();
        let count = slots.len();
        slots.sort_unstable();
        slots.dedup();
        if slots.len() != count {
            return Err(invalid("two pawns share a base or home slot"));
        }
    }

    Ok(())
}

impl From<SessionSnapshot> for SessionState {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            players: snapshot.players,
            status: snapshot.status,
            current: snapshot.current,
            phase: snapshot.phase,
            last_roll: snapshot.last_roll,
            turn_number: snapshot.turn_number,
            action_sequence: 0,
            history: Vector::new(),
        }
    }
}
