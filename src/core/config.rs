//! Board geometry and rule configuration.
//!
//! The board geometry is fixed: four seats around a 40-field shared loop,
//! each seat owning a 10-field slice and a private 4-slot home stretch.
//! Rule variants that are not fixed by the board live in `RulesConfig`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields on the shared loop.
pub const TRACK_LEN: u8 = 40;

/// Distance between consecutive seats' entry fields.
pub const SEAT_SPACING: u8 = 10;

/// Total distance a pawn covers from its entry field to the deepest
/// home-stretch slot.
pub const FULL_DISTANCE: u8 = 43;

/// Slots in each player's home stretch.
pub const STRETCH_LEN: u8 = 4;

/// Pawns owned by every ready player.
pub const PAWNS_PER_PLAYER: u8 = 4;

/// Seats on a board.
pub const MAX_SEATS: usize = 4;

/// A rules file that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("min_players must be 2-4, got {0}")]
    MinPlayers(usize),
}

/// Rule variants for a board.
///
/// ## Example
///
/// ```
/// use rust_ludo::core::RulesConfig;
///
/// let config = RulesConfig::default()
///     .with_min_players(3)
///     .with_extra_turn_on_six(true);
///
/// assert_eq!(config.min_players, 3);
/// assert!(config.extra_turn_on_six);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Seats that must be joined (and ready) before the game can start.
    ///
    /// The engine reads this through [`RulesConfig::required_players`], so
    /// a value outside 2-4 set directly on the struct is clamped.
    pub min_players: usize,

    /// Keep the turn after a successful move made with a 6.
    ///
    /// Off by default: every successful move ends the turn.
    pub extra_turn_on_six: bool,

    /// Seed for the board's dice.
    pub seed: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            extra_turn_on_six: false,
            seed: 42,
        }
    }
}

impl RulesConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of seats required to start.
    ///
    /// # Panics
    ///
    /// Panics if `count` is outside 2-4.
    #[must_use]
    pub fn with_min_players(mut self, count: usize) -> Self {
        assert!((2..=MAX_SEATS).contains(&count), "Minimum players must be 2-4");
        self.min_players = count;
        self
    }

    /// Enable or disable the extra turn after a 6.
    #[must_use]
    pub fn with_extra_turn_on_six(mut self, enabled: bool) -> Self {
        self.extra_turn_on_six = enabled;
        self
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Seats needed to start, never fewer than two or more than a board holds.
    #[must_use]
    pub fn required_players(&self) -> usize {
        self.min_players.clamp(2, MAX_SEATS)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SEATS).contains(&self.min_players) {
            return Err(ConfigError::MinPlayers(self.min_players));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON. Missing keys take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
