//! Pawns and where they stand.
//!
//! A pawn is always in exactly one of three places. What `position` means
//! depends on the location:
//!
//! | Location | `position`                      |
//! |----------|---------------------------------|
//! | `Base`   | base slot, 1-4                  |
//! | `Track`  | field on the shared loop, 1-40  |
//! | `Home`   | home-stretch slot, 1-4          |

use serde::{Deserialize, Serialize};

use super::config::{FULL_DISTANCE, TRACK_LEN};
use super::player::PlayerId;

/// Where a pawn currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Base,
    Track,
    Home,
}

/// One of a player's four tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    /// 1-4, unique within the owner.
    pub number: u8,
    pub location: Location,
    pub position: u8,
    /// Remaining distance, counting down from 43.
    #[serde(rename = "fieldsLeft")]
    pub fields_left: u8,
    #[serde(rename = "ownerId")]
    pub owner: PlayerId,
}

impl Pawn {
    /// Create a pawn in its own base slot (slot = pawn number).
    #[must_use]
    pub fn new(owner: PlayerId, number: u8) -> Self {
        Self {
            number,
            location: Location::Base,
            position: number,
            fields_left: FULL_DISTANCE,
            owner,
        }
    }

    /// True if the pawn is on the shared loop.
    #[must_use]
    pub fn on_track(&self) -> bool {
        self.location == Location::Track
    }

    /// True if the pawn sits on the given track field.
    #[must_use]
    pub fn occupies(&self, field: u8) -> bool {
        self.on_track() && self.position == field
    }
}

/// Advance along the loop, wrapping after field 40.
///
/// ```
/// use rust_ludo::core::advance_field;
///
/// assert_eq!(advance_field(38, 3), 1);
/// assert_eq!(advance_field(5, 3), 8);
/// ```
#[must_use]
pub fn advance_field(field: u8, steps: u8) -> u8 {
    let target = field + steps;
    if target > TRACK_LEN {
        target - TRACK_LEN
    } else {
        target
    }
}
