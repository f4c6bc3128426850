//! Random self-play.
//!
//! Plays whole games with every seat choosing uniformly among its legal
//! moves. Used by the `selfplay` binary, the benchmarks, and the property
//! tests as a source of realistic positions.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{
    Command, GameRng, GameStatus, Phase, PlayerId, RandomSource, RulesConfig, MAX_SEATS,
};
use crate::events::SessionEvent;
use crate::rules::{Applied, Rejection, Session};

/// Configuration for self-play runs.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Seats per game (2-4).
    pub seats: usize,

    /// Commands after which an unfinished game is abandoned.
    pub max_commands: usize,

    /// Base seed; game `i` uses `seed + i`.
    pub seed: u64,

    /// Rule variants applied to every game.
    pub rules: RulesConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            seats: MAX_SEATS,
            max_commands: 20_000,
            seed: 0,
            rules: RulesConfig::default(),
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of seats.
    ///
    /// # Panics
    ///
    /// Panics if `seats` is outside 2-4.
    pub fn with_seats(mut self, seats: usize) -> Self {
        assert!((2..=MAX_SEATS).contains(&seats), "Seats must be 2-4");
        self.seats = seats;
        self
    }

    pub fn with_max_commands(mut self, max: usize) -> Self {
        self.max_commands = max;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }
}

/// How one self-play game went.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub commands: usize,
    pub rolls: usize,
    pub forfeits: usize,
    pub passes: usize,
    pub captures: usize,
    pub events: usize,
}

/// Seat `count` random players on a fresh board and start the game.
///
/// Fails with the engine's rejection when `count` does not fit a board.
pub fn seat_players<R: RandomSource>(
    session: &mut Session<R>,
    count: usize,
    events: &mut Vec<SessionEvent>,
) -> Result<Vec<PlayerId>, Rejection> {
    let ids: Vec<PlayerId> = (1..=count)
        .map(|i| PlayerId::new(format!("p{}", i)))
        .collect();
    for (i, id) in ids.iter().enumerate() {
        session.join(id, &format!("Player {}", i + 1), events)?;
    }
    for id in &ids {
        session.ready(id, events)?;
    }
    if session.state().status() == GameStatus::Lobby {
        session.start_game(events)?;
    }
    Ok(ids)
}

/// Play one game to completion (or until `max_commands`).
pub fn play_random_game(
    config: &SelfPlayConfig,
    game_index: u64,
) -> Result<GameSummary, Rejection> {
    let seed = config.seed.wrapping_add(game_index);
    let rules = config.rules.clone().with_seed(seed);
    let mut session = Session::new(rules);
    let mut agent = GameRng::new(seed).for_context("agent");
    let mut events: Vec<SessionEvent> = Vec::new();
    seat_players(&mut session, config.seats, &mut events)?;

    let mut summary = GameSummary {
        seed,
        ..GameSummary::default()
    };

    while summary.commands < config.max_commands {
        let Some(player) = session.current_player().map(|p| p.id.clone()) else {
            break;
        };
        if session.state().status() != GameStatus::InProgress {
            break;
        }

        let command = match session.phase() {
            Phase::Draw => Command::RollDice,
            Phase::Move => {
                let legal = session.legal_moves();
                match agent.choose(&legal) {
                    Some(&pawn) => Command::MovePawn { pawn },
                    None => Command::Pass,
                }
            }
        };

        summary.commands += 1;
        match session.apply(&player, command, &mut events) {
            Ok(Applied::Rolled { forfeited, .. }) => {
                summary.rolls += 1;
                if forfeited {
                    summary.forfeits += 1;
                }
            }
            Ok(Applied::Moved { captured, .. }) => {
                if captured.is_some() {
                    summary.captures += 1;
                }
            }
            Ok(Applied::Passed) => summary.passes += 1,
            Ok(_) => {}
            Err(reason) => {
                // Only legal commands are generated
                debug!(%player, %reason, "self-play command rejected");
                break;
            }
        }
    }

    summary.winner = session.result().map(|p| p.id.clone());
    summary.turns = session.state().turn_number();
    summary.events = events.len();
    info!(
        seed,
        turns = summary.turns,
        winner = ?summary.winner,
        captures = summary.captures,
        "self-play game finished"
    );
    Ok(summary)
}

/// Play `games` games back to back.
pub fn run(config: &SelfPlayConfig, games: u64) -> Result<Vec<GameSummary>, Rejection> {
    (0..games).map(|i| play_random_game(config, i)).collect()
}
