//! Player identification and per-seat data.
//!
//! ## PlayerId
//!
//! Stable external identity handed in by the command source. The engine
//! never interprets it beyond equality.
//!
//! ## Seat
//!
//! Position in turn order. Seat indices are 0-based internally and shown
//! 1-based; seat `s` enters the shared loop at field `1 + s * 10`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::{PAWNS_PER_PLAYER, SEAT_SPACING};
use super::pawn::{Location, Pawn};

/// External player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a player ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seat in turn order.
///
/// ```
/// use rust_ludo::core::Seat;
///
/// assert_eq!(Seat::new(0).entry_field(), 1);
/// assert_eq!(Seat::new(3).entry_field(), 31);
/// assert_eq!(format!("{}", Seat::new(0)), "Seat 1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a seat from its 0-based index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the 0-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Track field where this seat's pawns leave base.
    #[must_use]
    pub const fn entry_field(self) -> u8 {
        1 + self.0 * SEAT_SPACING
    }

    /// The seat after this one, wrapping after `seat_count`.
    #[must_use]
    pub fn next(self, seat_count: usize) -> Self {
        Self(((self.index() + 1) % seat_count) as u8)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0 + 1)
    }
}

/// One joined seat.
///
/// Pawns are empty until the player signals readiness, then hold exactly
/// four pawns for the rest of the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(rename = "readyToPlay")]
    pub ready: bool,
    pub pawns: SmallVec<[Pawn; 4]>,
}

impl Player {
    /// Create a player that has joined but is not ready yet.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ready: false,
            pawns: SmallVec::new(),
        }
    }

    /// Mark the player ready and create their pawns in base slots 1-4.
    ///
    /// Returns false if the player was already ready; pawns are never
    /// re-created.
    pub fn make_ready(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.pawns = (1..=PAWNS_PER_PLAYER)
            .map(|number| Pawn::new(self.id.clone(), number))
            .collect();
        self.ready = true;
        true
    }

    /// Get a pawn by its number (1-4).
    #[must_use]
    pub fn pawn(&self, number: u8) -> Option<&Pawn> {
        self.pawns.iter().find(|p| p.number == number)
    }

    /// Get a mutable pawn by its number (1-4).
    pub fn pawn_mut(&mut self, number: u8) -> Option<&mut Pawn> {
        self.pawns.iter_mut().find(|p| p.number == number)
    }

    /// Number of this player's pawns in the home stretch.
    #[must_use]
    pub fn home_count(&self) -> u8 {
        self.pawns.iter().filter(|p| p.location == Location::Home).count() as u8
    }

    /// True once every pawn has reached the home stretch.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.ready && self.home_count() == PAWNS_PER_PLAYER
    }

    /// Lowest base slot (1-4) not held by another of this player's base pawns.
    #[must_use]
    pub fn free_base_slot(&self) -> u8 {
        (1..=PAWNS_PER_PLAYER)
            .find(|slot| {
                !self
                    .pawns
                    .iter()
                    .any(|p| p.location == Location::Base && p.position == *slot)
            })
            .unwrap_or(1)
    }
}
