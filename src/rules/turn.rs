//! Turn manager: game start, whose turn it is, and turn advancement.
//!
//! Only this module moves `current` and resets `phase` to DRAW.

use tracing::info;

use crate::core::{GameStatus, Phase, RandomSource, Seat};
use crate::events::{EventSink, SessionEvent};

use super::outcome::{Applied, Rejection};
use super::session::Session;

impl<R: RandomSource> Session<R> {
    /// Start the game explicitly.
    ///
    /// Requires at least `min_players` seats (never fewer than two), all of
    /// them ready. The first
    /// seat is drawn uniformly from the joined seats.
    pub fn start_game(&mut self, sink: &mut dyn EventSink) -> Result<Applied, Rejection> {
        match self.state.status {
            GameStatus::Lobby => {}
            GameStatus::InProgress => return Err(Rejection::GameInProgress),
            GameStatus::Finished { .. } => return Err(Rejection::GameOver),
        }

        let joined = self.state.players.len();
        let required = self.config.required_players();
        if joined < required {
            return Err(Rejection::NotEnoughPlayers { joined, required });
        }
        if !self.state.all_ready() {
            return Err(Rejection::PlayersNotReady);
        }

        let first = self.begin(sink);
        Ok(Applied::GameStarted { first })
    }

    /// True when the lobby satisfies every start precondition.
    pub(crate) fn can_start(&self) -> bool {
        self.state.status == GameStatus::Lobby
            && self.state.players.len() >= self.config.required_players()
            && self.state.all_ready()
    }

    /// Draw the first seat and open turn 1.
    pub(crate) fn begin(&mut self, sink: &mut dyn EventSink) -> Seat {
        let first = Seat::new(self.rng.pick_seat(self.state.players.len()) as u8);

        self.state.status = GameStatus::InProgress;
        self.state.current = Some(first);
        self.state.phase = Phase::Draw;
        self.state.last_roll = None;
        self.state.turn_number = 1;
        self.state.action_sequence = 0;

        info!(seats = self.state.players.len(), %first, "game started");
        sink.publish(SessionEvent::GameStart);
        self.announce_turn(sink);
        first
    }

    /// Hand the turn to the next seat in join order, wrapping after the
    /// last one. Called exactly once per completed turn.
    pub(crate) fn advance_turn(&mut self, sink: &mut dyn EventSink) {
        let seat_count = self.state.players.len();
        let next = match self.state.current {
            Some(seat) => seat.next(seat_count),
            None => Seat::new(0),
        };
        self.state.current = Some(next);
        self.open_turn(sink);
    }

    /// Give the current seat another turn (extra turn after a 6).
    pub(crate) fn repeat_turn(&mut self, sink: &mut dyn EventSink) {
        self.open_turn(sink);
    }

    fn open_turn(&mut self, sink: &mut dyn EventSink) {
        self.state.phase = Phase::Draw;
        self.state.last_roll = None;
        self.state.turn_number += 1;
        self.state.action_sequence = 0;
        self.announce_turn(sink);
    }

    fn announce_turn(&self, sink: &mut dyn EventSink) {
        if let Some(player) = self.current_player() {
            info!(player = %player.id, turn = self.state.turn_number, "turn");
            sink.publish(SessionEvent::player_turn(player));
        }
    }
}
