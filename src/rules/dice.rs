//! Dice engine: rolling and the forfeiture rule.

use tracing::debug;

use crate::core::{Command, Phase, Player, PlayerId, RandomSource};
use crate::events::{EventSink, SessionEvent};

use super::outcome::{Applied, Rejection};
use super::session::Session;

/// A 1 or a 6 lets a pawn leave base.
#[must_use]
pub fn opens_base(roll: u8) -> bool {
    roll == 1 || roll == 6
}

/// Whether a roll gives the player a move opportunity.
///
/// 1 and 6 always do. Any other roll needs a pawn on the track with at
/// least that many fields left.
#[must_use]
pub fn grants_move(player: &Player, roll: u8) -> bool {
    opens_base(roll)
        || player
            .pawns
            .iter()
            .any(|p| p.on_track() && p.fields_left >= roll)
}

impl<R: RandomSource> Session<R> {
    /// Roll for the current player.
    ///
    /// Publishes the value, then either opens the MOVE phase or, when the
    /// roll cannot be used, forfeits the turn straight away.
    pub fn roll_dice(
        &mut self,
        player: &PlayerId,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        let seat = self.expect_turn(player)?;
        self.expect_phase(Phase::Draw)?;

        let roll = self.rng.roll_die();
        self.state.last_roll = Some(roll);
        self.state.record(seat, Command::RollDice);
        sink.publish(SessionEvent::Draw { number: roll });

        let forfeited = !grants_move(&self.state.players[seat.index()], roll);
        if forfeited {
            debug!(%player, roll, "no pawn can use the roll, turn forfeited");
            self.advance_turn(sink);
        } else {
            self.state.phase = Phase::Move;
        }

        Ok(Applied::Rolled {
            value: roll,
            forfeited,
        })
    }
}
