//! One board's rule engine.
//!
//! `Session` owns the board state, the dice and the rule variants. Every
//! command runs to completion (including its event publishes) before the
//! next one is looked at; callers that share a session across tasks must
//! serialize access, which is what `hub` does with one worker per board.

use tracing::{debug, info};

use crate::core::{
    Command, GameRng, GameStatus, Phase, Player, PlayerId, RandomSource, RulesConfig, Seat,
    SessionSnapshot, SessionState, SnapshotError, MAX_SEATS,
};
use crate::events::{EventSink, SessionEvent};

use super::outcome::{Applied, Rejection};

/// Rule engine for a single board.
///
/// ## Example
///
/// ```
/// use rust_ludo::core::{PlayerId, RulesConfig, ScriptedDice};
/// use rust_ludo::events::SessionEvent;
/// use rust_ludo::rules::{Applied, Session};
///
/// let mut session = Session::with_rng(RulesConfig::default(), ScriptedDice::new([6]));
/// let mut events: Vec<SessionEvent> = Vec::new();
///
/// let ann = PlayerId::new("ann");
/// let bob = PlayerId::new("bob");
/// session.join(&ann, "Ann", &mut events).unwrap();
/// session.join(&bob, "Bob", &mut events).unwrap();
/// session.ready(&ann, &mut events).unwrap();
/// session.ready(&bob, &mut events).unwrap();
///
/// // Ann holds seat 1 and the scripted dice start the game there
/// let rolled = session.roll_dice(&ann, &mut events).unwrap();
/// assert_eq!(rolled, Applied::Rolled { value: 6, forfeited: false });
/// assert_eq!(session.legal_moves(), vec![1, 2, 3, 4]);
/// ```
pub struct Session<R: RandomSource = GameRng> {
    pub(crate) state: SessionState,
    pub(crate) config: RulesConfig,
    pub(crate) rng: R,
}

impl Session<GameRng> {
    /// Create an empty board rolling seeded dice from `config.seed`.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Session<R> {
    /// Create an empty board with an explicit random source.
    pub fn with_rng(config: RulesConfig, rng: R) -> Self {
        Self {
            state: SessionState::new(),
            config,
            rng,
        }
    }

    /// Rebuild a board at the exact position described by a snapshot.
    pub fn from_snapshot(
        snapshot: SessionSnapshot,
        config: RulesConfig,
        rng: R,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self {
            state: SessionState::from(snapshot),
            config,
            rng,
        })
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Seats in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.state.players()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.state.current_seat().and_then(|seat| self.state.player(seat))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[must_use]
    pub fn last_roll(&self) -> Option<u8> {
        self.state.last_roll()
    }

    /// The winner, once someone has brought all four pawns home.
    #[must_use]
    pub fn result(&self) -> Option<&Player> {
        match self.state.status() {
            GameStatus::Finished { winner } => self.state.player(winner),
            _ => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    // === Command Source ===

    /// Route a command from the command source.
    pub fn apply(
        &mut self,
        player: &PlayerId,
        command: Command,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        let name = command.name();
        let result = match command {
            Command::Join { name } => self.join(player, &name, sink),
            Command::Leave => self.leave(player, sink),
            Command::Ready => self.ready(player, sink),
            Command::RollDice => self.roll_dice(player, sink),
            Command::MovePawn { pawn } => self.move_pawn(player, pawn, sink),
            Command::Pass => self.pass(player, sink),
        };

        match &result {
            Ok(applied) => debug!(%player, command = name, ?applied, "command applied"),
            Err(reason) => debug!(%player, command = name, %reason, "command rejected"),
        }
        result
    }

    /// Take a seat. Joining twice is a no-op that reports the held seat.
    pub fn join(
        &mut self,
        player: &PlayerId,
        name: &str,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        if let Some(seat) = self.state.seat_of(player) {
            return Ok(Applied::Rejoined { seat });
        }
        self.expect_lobby()?;
        if self.state.players.len() >= MAX_SEATS {
            return Err(Rejection::TableFull);
        }

        self.state
            .players
            .push(Player::new(player.clone(), name));
        let seat = Seat::new((self.state.players.len() - 1) as u8);
        self.state.record(
            seat,
            Command::Join {
                name: name.to_string(),
            },
        );
        info!(%player, %seat, "player joined");

        if self.state.players.len() == self.config.required_players() {
            sink.publish(SessionEvent::EnoughPlayers);
        }
        Ok(Applied::Joined { seat })
    }

    /// Give up a seat. Only possible before the game starts; later seats
    /// shift down by one.
    pub fn leave(
        &mut self,
        player: &PlayerId,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        let seat = self.seat_of(player)?;
        self.expect_lobby()?;

        self.state.record(seat, Command::Leave);
        self.state.players.remove(seat.index());
        info!(%player, %seat, "player left");

        if self.can_start() {
            self.begin(sink);
        }
        Ok(Applied::Left { seat })
    }

    /// Mark a player ready and create their pawns. Starts the game once
    /// every joined seat is ready and enough seats are taken.
    pub fn ready(
        &mut self,
        player: &PlayerId,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        let seat = self.seat_of(player)?;
        let seated = self.state.player_mut(seat);
        if !seated.make_ready() {
            return Err(Rejection::AlreadyReady(player.clone()));
        }

        sink.publish(SessionEvent::PlayerReady {
            player: seated.clone(),
        });
        sink.publish(SessionEvent::pawn_update(seated));
        self.state.record(seat, Command::Ready);

        let game_started = self.can_start();
        if game_started {
            self.begin(sink);
        }
        Ok(Applied::Ready { seat, game_started })
    }

    /// End a MOVE phase in which no pawn can use the roll.
    pub fn pass(
        &mut self,
        player: &PlayerId,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        let seat = self.expect_turn(player)?;
        self.expect_phase(Phase::Move)?;
        if !self.legal_moves().is_empty() {
            return Err(Rejection::MoveAvailable);
        }

        self.state.record(seat, Command::Pass);
        self.advance_turn(sink);
        Ok(Applied::Passed)
    }

    // === Preconditions ===

    pub(crate) fn seat_of(&self, player: &PlayerId) -> Result<Seat, Rejection> {
        self.state
            .seat_of(player)
            .ok_or_else(|| Rejection::UnknownPlayer(player.clone()))
    }

    fn expect_lobby(&self) -> Result<(), Rejection> {
        match self.state.status {
            GameStatus::Lobby => Ok(()),
            GameStatus::InProgress => Err(Rejection::GameInProgress),
            GameStatus::Finished { .. } => Err(Rejection::GameOver),
        }
    }

    /// The game is running and it is this player's turn.
    pub(crate) fn expect_turn(&self, player: &PlayerId) -> Result<Seat, Rejection> {
        match self.state.status {
            GameStatus::Lobby => return Err(Rejection::GameNotStarted),
            GameStatus::Finished { .. } => return Err(Rejection::GameOver),
            GameStatus::InProgress => {}
        }
        let seat = self.seat_of(player)?;
        if self.state.current != Some(seat) {
            return Err(Rejection::NotYourTurn(player.clone()));
        }
        Ok(seat)
    }

    pub(crate) fn expect_phase(&self, expected: Phase) -> Result<(), Rejection> {
        let actual = self.state.phase;
        if actual == expected {
            Ok(())
        } else {
            Err(Rejection::WrongPhase { expected, actual })
        }
    }
}
