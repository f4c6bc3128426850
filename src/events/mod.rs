//! Event publishing boundary.
//!
//! - [`SessionEvent`]: What changed on a board (turns, rolls, pawn moves)
//! - [`EventSink`]: Where the rule engine pushes events; implemented for a
//!   recording `Vec`, a tokio `broadcast::Sender` and [`NullSink`]

mod event;
mod sink;

pub use event::SessionEvent;
pub use sink::{EventSink, NullSink};
