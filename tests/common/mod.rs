//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use rust_ludo::core::{
    GameStatus, Location, Phase, Player, PlayerId, RulesConfig, ScriptedDice, Seat,
    SessionSnapshot,
};
use rust_ludo::events::SessionEvent;
use rust_ludo::rules::Session;

pub const NAMES: [&str; 4] = ["Ann", "Bob", "Cid", "Dee"];

pub fn id(seat: usize) -> PlayerId {
    PlayerId::new(["a", "b", "c", "d"][seat])
}

/// Running game with every pawn in base, seat 1 to roll.
pub fn running_board(seats: usize) -> SessionSnapshot {
    let players = (0..seats)
        .map(|seat| {
            let mut player = Player::new(id(seat), NAMES[seat]);
            player.make_ready();
            player
        })
        .collect();

    SessionSnapshot {
        players,
        status: GameStatus::InProgress,
        current: Some(Seat::new(0)),
        phase: Phase::Draw,
        last_roll: None,
        turn_number: 1,
    }
}

/// Move a pawn to an arbitrary spot.
pub fn put(
    snapshot: &mut SessionSnapshot,
    seat: usize,
    pawn: u8,
    location: Location,
    position: u8,
    fields_left: u8,
) {
    let pawn = snapshot.players[seat]
        .pawn_mut(pawn)
        .expect("pawn exists");
    pawn.location = location;
    pawn.position = position;
    pawn.fields_left = fields_left;
}

/// Session at `snapshot` whose dice produce `rolls` in order (then repeat).
pub fn session_at(snapshot: SessionSnapshot, rolls: &[u8]) -> Session<ScriptedDice> {
    Session::from_snapshot(
        snapshot,
        RulesConfig::default(),
        ScriptedDice::new(rolls.iter().copied()),
    )
    .expect("valid snapshot")
}

/// Join and ready `seats` players on a fresh board.
pub fn start_game(seats: usize, dice: ScriptedDice) -> (Session<ScriptedDice>, Vec<SessionEvent>) {
    let mut session = Session::with_rng(RulesConfig::default(), dice);
    let mut events = Vec::new();
    for seat in 0..seats {
        session.join(&id(seat), NAMES[seat], &mut events).unwrap();
    }
    for seat in 0..seats {
        session.ready(&id(seat), &mut events).unwrap();
    }
    (session, events)
}

pub fn event_names(events: &[SessionEvent]) -> Vec<&'static str> {
    events.iter().map(SessionEvent::name).collect()
}
