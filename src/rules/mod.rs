//! Rule engine for one board.
//!
//! `Session` is split across files by concern:
//! - `session`: seating, readiness and command routing
//! - `turn`: game start and turn advancement
//! - `dice`: rolling and the forfeiture rule
//! - `movement`: pawn moves, the home stretch and captures
//!
//! All commands go through `&mut Session`, so a board is mutated by at most
//! one command at a time.

mod dice;
mod movement;
mod outcome;
mod session;
mod turn;

#[cfg(test)]
pub(crate) mod testing;

pub use dice::{grants_move, opens_base};
pub use outcome::{Applied, CapturedPawn, Rejection};
pub use session::Session;
