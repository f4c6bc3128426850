//! Board fixtures shared by the rule tests.

use crate::core::{Location, PlayerId, RulesConfig, ScriptedDice};
use crate::events::SessionEvent;

use super::Session;

pub(crate) fn ids() -> [PlayerId; 4] {
    ["a", "b", "c", "d"].map(PlayerId::new)
}

/// A lobby with `count` joined (not ready) players named A, B, ...
pub(crate) fn lobby(count: usize) -> (Session<ScriptedDice>, Vec<SessionEvent>) {
    let mut session = Session::with_rng(RulesConfig::default(), ScriptedDice::new([6]));
    let mut events = Vec::new();
    for (id, name) in ids().iter().zip(["A", "B", "C", "D"]).take(count) {
        session.join(id, name, &mut events).unwrap();
    }
    (session, events)
}

pub(crate) fn ready_all(session: &mut Session<ScriptedDice>) {
    let mut events: Vec<SessionEvent> = Vec::new();
    let joined: Vec<PlayerId> = session.players().iter().map(|p| p.id.clone()).collect();
    for id in &joined {
        session.ready(id, &mut events).unwrap();
    }
}

/// A running game with seat 1 to act and the given rolls queued.
pub(crate) fn started(count: usize, rolls: &[u8]) -> (Session<ScriptedDice>, Vec<SessionEvent>) {
    let (mut session, _) = lobby(count);
    session.rng = ScriptedDice::new(rolls.iter().copied());
    ready_all(&mut session);
    assert_eq!(session.state().current_seat().map(|s| s.index()), Some(0));
    (session, Vec::new())
}

/// Put a pawn anywhere, bypassing the rules.
pub(crate) fn place(
    session: &mut Session<ScriptedDice>,
    seat: usize,
    pawn: u8,
    location: Location,
    position: u8,
    fields_left: u8,
) {
    let pawn = session.state.players[seat]
        .pawn_mut(pawn)
        .expect("pawn exists");
    pawn.location = location;
    pawn.position = position;
    pawn.fields_left = fields_left;
}
