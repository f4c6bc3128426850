//! Dice and other randomness.
//!
//! The rule engine never touches an RNG directly; it asks a
//! [`RandomSource`] for a die face or a starting seat. Two sources ship:
//!
//! - [`GameRng`]: seeded ChaCha8 stream, reproducible per seed and per board
//! - [`ScriptedDice`]: replays a fixed list of faces, for tests and demos
//!
//! ```
//! use rust_ludo::core::{GameRng, RandomSource};
//!
//! let mut lobby = GameRng::new(42).for_context("board-a");
//! let mut replay = GameRng::new(42).for_context("board-a");
//! assert_eq!(lobby.roll_die(), replay.roll_die());
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness for the dice engine and starting-seat draw.
pub trait RandomSource {
    /// Roll one six-sided die, uniform in 1..=6.
    fn roll_die(&mut self) -> u8;

    /// Pick a seat index uniformly in `0..seat_count`.
    fn pick_seat(&mut self, seat_count: usize) -> usize;
}

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Independent stream for a named board (or agent) under the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform index in `0..n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn below(&mut self, n: usize) -> usize {
        self.inner.gen_range(0..n)
    }

    /// Uniformly chosen element, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}

impl RandomSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    fn pick_seat(&mut self, seat_count: usize) -> usize {
        self.below(seat_count)
    }
}

/// Fixed roll sequence, cycling when exhausted.
///
/// ```
/// use rust_ludo::core::{RandomSource, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([6, 3]);
/// assert_eq!(dice.roll_die(), 6);
/// assert_eq!(dice.roll_die(), 3);
/// assert_eq!(dice.roll_die(), 6);
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    rolls: Vec<u8>,
    cursor: usize,
    start_seat: usize,
}

impl ScriptedDice {
    /// Create scripted dice. The game starts at seat 1 unless overridden.
    ///
    /// # Panics
    ///
    /// Panics on an empty list or a face outside 1-6.
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        let rolls: Vec<u8> = rolls.into_iter().collect();
        assert!(!rolls.is_empty(), "Scripted dice need at least one roll");
        assert!(
            rolls.iter().all(|r| (1..=6).contains(r)),
            "Scripted rolls must be 1-6"
        );
        Self {
            rolls,
            cursor: 0,
            start_seat: 0,
        }
    }

    /// Set the 0-based seat that wins the starting-seat draw.
    #[must_use]
    pub fn starting_at(mut self, seat_index: usize) -> Self {
        self.start_seat = seat_index;
        self
    }

    /// Number of rolls served so far.
    #[must_use]
    pub fn rolled(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }

    fn pick_seat(&mut self, seat_count: usize) -> usize {
        self.start_seat % seat_count
    }
}
