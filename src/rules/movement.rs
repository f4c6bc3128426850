//! Movement engine: leaving base, advancing, entering the home stretch,
//! and capturing.
//!
//! ## Distances
//!
//! `fields_left` of a pawn not yet home counts the fields still ahead of
//! it, where occupied home-stretch slots do not count. With `h` pawns home
//! there are `4 - h` free slots, so:
//!
//! - a move ending with `fields_left < 4 - h` enters the stretch and takes
//!   free slot number `(4 - h) - fields_left`, counted from the entrance
//!   and skipping the owner's home pawns
//! - every other pawn of the owner loses one field when a pawn enters
//! - leaving base (or being captured back to it) sets `fields_left` to
//!   `43 - h`
//!
//! With nobody home the slot is simply `4 - fields_left`.
//!
//! ## Track occupancy
//!
//! A track field holds at most two pawns. Landing on a lone opposing pawn
//! captures it; landing on a lone own pawn shares the field; a field that
//! already holds two pawns cannot be entered.
//!
//! Moves are planned against the unchanged state first and only applied
//! once the plan is known to be legal.

use smallvec::SmallVec;
use tracing::info;

use crate::core::{
    advance_field, Command, GameStatus, Location, Phase, PlayerId, RandomSource, Seat,
    FULL_DISTANCE, PAWNS_PER_PLAYER, STRETCH_LEN,
};
use crate::events::{EventSink, SessionEvent};

use super::dice::opens_base;
use super::outcome::{Applied, CapturedPawn, Rejection};
use super::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    EnterTrack { field: u8, fields_left: u8 },
    Advance { field: u8, fields_left: u8 },
    EnterHome { slot: u8, fields_left: u8 },
}

#[derive(Clone, Copy, Debug)]
struct MovePlan {
    pawn: u8,
    step: Step,
    /// Lone opposing pawn on the landing field.
    capture: Option<(Seat, u8)>,
}

impl<R: RandomSource> Session<R> {
    /// Move one of the current player's pawns by the last roll.
    ///
    /// A successful move always ends the turn, unless the extra-turn-on-six
    /// variant is enabled and the roll was a 6.
    pub fn move_pawn(
        &mut self,
        player: &PlayerId,
        pawn: u8,
        sink: &mut dyn EventSink,
    ) -> Result<Applied, Rejection> {
        let seat = self.expect_turn(player)?;
        self.expect_phase(Phase::Move)?;
        let plan = self.plan_move(seat, pawn)?;
        let roll = self.state.last_roll;

        self.state.record(seat, Command::MovePawn { pawn });
        let applied = self.apply_move(seat, plan, sink);
        let finished = matches!(applied, Applied::Moved { finished: true, .. });

        if self.config.extra_turn_on_six && roll == Some(6) && !finished {
            self.repeat_turn(sink);
        } else {
            self.advance_turn(sink);
        }
        if finished {
            self.finish(seat, sink);
        }
        Ok(applied)
    }

    /// Pawn numbers the current player could legally move right now.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<u8> {
        let seat = match (self.state.status, self.state.current, self.state.phase) {
            (GameStatus::InProgress, Some(seat), Phase::Move) => seat,
            _ => return Vec::new(),
        };
        (1..=PAWNS_PER_PLAYER)
            .filter(|&number| self.plan_move(seat, number).is_ok())
            .collect()
    }

    fn plan_move(&self, seat: Seat, number: u8) -> Result<MovePlan, Rejection> {
        let roll = self.state.last_roll.ok_or(Rejection::WrongPhase {
            expected: Phase::Move,
            actual: self.state.phase,
        })?;
        let player = &self.state.players[seat.index()];
        let pawn = player.pawn(number).ok_or(Rejection::UnknownPawn(number))?;
        let home = player.home_count();

        let step = match pawn.location {
            Location::Base => {
                if !opens_base(roll) {
                    return Err(Rejection::PawnInBase { roll });
                }
                Step::EnterTrack {
                    field: seat.entry_field(),
                    fields_left: FULL_DISTANCE - home,
                }
            }
            Location::Track => {
                if pawn.fields_left < roll {
                    return Err(Rejection::InsufficientDistance {
                        fields_left: pawn.fields_left,
                        roll,
                    });
                }
                let fields_left = pawn.fields_left - roll;
                let open_slots = STRETCH_LEN - home;

                if fields_left < open_slots {
                    // At least `open_slots` slots are free, so the rank exists
                    let rank = open_slots - fields_left;
                    let slot = (1..=STRETCH_LEN)
                        .filter(|&slot| {
                            !player
                                .pawns
                                .iter()
                                .any(|p| p.location == Location::Home && p.position == slot)
                        })
                        .nth(usize::from(rank - 1))
                        .unwrap_or(STRETCH_LEN);
                    Step::EnterHome { slot, fields_left }
                } else {
                    Step::Advance {
                        field: advance_field(pawn.position, roll),
                        fields_left,
                    }
                }
            }
            Location::Home => return Err(Rejection::PawnInHome(number)),
        };

        let capture = match step {
            Step::EnterTrack { field, .. } | Step::Advance { field, .. } => {
                self.landing(seat, field)?
            }
            Step::EnterHome { .. } => None,
        };

        Ok(MovePlan {
            pawn: number,
            step,
            capture,
        })
    }

    /// Who would be captured by landing on `field`.
    fn landing(&self, mover: Seat, field: u8) -> Result<Option<(Seat, u8)>, Rejection> {
        let occupants: SmallVec<[(Seat, u8); 2]> = self
            .state
            .players
            .iter()
            .enumerate()
            .flat_map(|(i, player)| {
                player
                    .pawns
                    .iter()
                    .filter(move |pawn| pawn.occupies(field))
                    .map(move |pawn| (Seat::new(i as u8), pawn.number))
            })
            .collect();

        match occupants.as_slice() {
            [] => Ok(None),
            [(owner, number)] if *owner != mover => Ok(Some((*owner, *number))),
            [_] => Ok(None),
            _ => Err(Rejection::FieldFull { field }),
        }
    }

    fn apply_move(&mut self, seat: Seat, plan: MovePlan, sink: &mut dyn EventSink) -> Applied {
        let captured = match (plan.capture, plan.step) {
            (Some((owner, number)), Step::EnterTrack { field, .. })
            | (Some((owner, number)), Step::Advance { field, .. }) => {
                Some(self.send_to_base(owner, number, field, sink))
            }
            _ => None,
        };

        let player = self.state.player_mut(seat);
        if let Some(pawn) = player.pawn_mut(plan.pawn) {
            let (location, position, fields_left) = match plan.step {
                Step::EnterTrack { field, fields_left } | Step::Advance { field, fields_left } => {
                    (Location::Track, field, fields_left)
                }
                Step::EnterHome { slot, fields_left } => (Location::Home, slot, fields_left),
            };
            pawn.location = location;
            pawn.position = position;
            pawn.fields_left = fields_left;
        }

        let entered_home = matches!(plan.step, Step::EnterHome { .. });
        if entered_home {
            // The stretch queue got one slot shorter for everyone still out
            for pawn in player
                .pawns
                .iter_mut()
                .filter(|p| p.number != plan.pawn && p.location != Location::Home)
            {
                pawn.fields_left = pawn.fields_left.saturating_sub(1);
            }
        }

        let finished = player.has_finished();
        sink.publish(SessionEvent::pawn_update(player));

        Applied::Moved {
            pawn: plan.pawn,
            captured,
            entered_home,
            finished,
        }
    }

    /// Return a captured pawn to its owner's lowest free base slot.
    fn send_to_base(
        &mut self,
        owner: Seat,
        number: u8,
        field: u8,
        sink: &mut dyn EventSink,
    ) -> CapturedPawn {
        let player = self.state.player_mut(owner);
        let base_slot = player.free_base_slot();
        let fields_left = FULL_DISTANCE - player.home_count();

        if let Some(pawn) = player.pawn_mut(number) {
            pawn.location = Location::Base;
            pawn.position = base_slot;
            pawn.fields_left = fields_left;
        }

        info!(owner = %player.id, pawn = number, field, "pawn captured");
        sink.publish(SessionEvent::pawn_update(player));

        CapturedPawn {
            owner: player.id.clone(),
            number,
            field,
            base_slot,
        }
    }

    fn finish(&mut self, winner: Seat, sink: &mut dyn EventSink) {
        self.state.status = GameStatus::Finished { winner };
        if let Some(player) = self.state.player(winner) {
            info!(player = %player.id, "game over");
            sink.publish(SessionEvent::GameOver {
                player_id: player.id.clone(),
                name: player.name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pawn, RulesConfig, ScriptedDice};
    use crate::rules::testing::{ids, place, started};

    fn pawn(session: &Session<ScriptedDice>, seat: usize, number: u8) -> Pawn {
        session.players()[seat].pawn(number).cloned().unwrap()
    }

    /// Roll for the current seat (index 0 in these tests).
    fn roll(session: &mut Session<ScriptedDice>) -> Vec<SessionEvent> {
        let [a, _, _, _] = ids();
        let mut events = Vec::new();
        session.roll_dice(&a, &mut events).unwrap();
        events
    }

    #[test]
    fn test_leave_base_on_six() {
        let (mut session, _) = started(2, &[6]);
        let [a, _, _, _] = ids();
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        let applied = session.move_pawn(&a, 1, &mut events).unwrap();

        assert_eq!(
            applied,
            Applied::Moved { pawn: 1, captured: None, entered_home: false, finished: false }
        );
        let moved = pawn(&session, 0, 1);
        assert_eq!(moved.location, Location::Track);
        assert_eq!(moved.position, 1);
        assert_eq!(moved.fields_left, 43);
        assert_eq!(session.state().current_seat(), Some(Seat::new(1)));
        assert_eq!(session.phase(), Phase::Draw);

        let names: Vec<_> = events.iter().map(SessionEvent::name).collect();
        assert_eq!(names, vec!["pawnUpdate", "playerTurn"]);
    }

    #[test]
    fn test_leave_base_uses_seat_entry_field() {
        let (mut session, _) = started(4, &[1]);
        let [_, b, _, _] = ids();
        let mut events: Vec<SessionEvent> = Vec::new();
        session.advance_turn(&mut events);

        session.roll_dice(&b, &mut events).unwrap();
        session.move_pawn(&b, 3, &mut events).unwrap();

        let moved = pawn(&session, 1, 3);
        assert_eq!(moved.location, Location::Track);
        assert_eq!(moved.position, 11);
    }

    #[test]
    fn test_base_pawn_needs_opening_roll() {
        let (mut session, _) = started(2, &[3]);
        let [a, _, _, _] = ids();
        place(&mut session, 0, 2, Location::Track, 10, 34);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();
        let before = session.snapshot();

        assert_eq!(session.move_pawn(&a, 1, &mut events), Err(Rejection::PawnInBase { roll: 3 }));
        assert_eq!(session.snapshot(), before);
        assert!(events.is_empty());
        assert_eq!(session.legal_moves(), vec![2]);
    }

    #[test]
    fn test_advance_and_capture() {
        let (mut session, _) = started(2, &[3]);
        let [a, b, _, _] = ids();
        place(&mut session, 0, 1, Location::Track, 5, 38);
        place(&mut session, 1, 2, Location::Track, 8, 6);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        let applied = session.move_pawn(&a, 1, &mut events).unwrap();

        assert_eq!(
            applied,
            Applied::Moved {
                pawn: 1,
                captured: Some(CapturedPawn { owner: b.clone(), number: 2, field: 8, base_slot: 2 }),
                entered_home: false,
                finished: false,
            }
        );
        let mover = pawn(&session, 0, 1);
        assert_eq!((mover.location, mover.position, mover.fields_left), (Location::Track, 8, 35));

        let victim = pawn(&session, 1, 2);
        assert_eq!((victim.location, victim.position, victim.fields_left), (Location::Base, 2, 43));

        // Captured owner's update comes first, then the mover's, then the turn
        assert_eq!(
            events[0],
            SessionEvent::PawnUpdate { player_id: b.clone(), pawns: session.players()[1].pawns.to_vec() }
        );
        assert_eq!(events[1], SessionEvent::pawn_update(&session.players()[0]));
        assert_eq!(events[2].name(), "playerTurn");
    }

    #[test]
    fn test_capture_takes_lowest_free_base_slot() {
        let (mut session, _) = started(2, &[2]);
        let [a, _, _, _] = ids();
        // Seat 2's pawns 1 and 3 are out; pawn 3 is the victim, slot 1 is free
        place(&mut session, 1, 1, Location::Track, 30, 24);
        place(&mut session, 1, 3, Location::Track, 14, 40);
        place(&mut session, 0, 4, Location::Track, 12, 32);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        session.move_pawn(&a, 4, &mut events).unwrap();

        let victim = pawn(&session, 1, 3);
        assert_eq!((victim.location, victim.position), (Location::Base, 1));
    }

    #[test]
    fn test_leaving_base_captures_on_entry_field() {
        let (mut session, _) = started(2, &[6]);
        let [a, b, _, _] = ids();
        place(&mut session, 1, 1, Location::Track, 1, 13);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        let applied = session.move_pawn(&a, 4, &mut events).unwrap();

        match applied {
            Applied::Moved { captured: Some(captured), .. } => {
                assert_eq!(captured.owner, b);
                assert_eq!(captured.field, 1);
            }
            other => panic!("expected a capture, got {:?}", other),
        }
        assert_eq!(pawn(&session, 1, 1).location, Location::Base);
    }

    #[test]
    fn test_own_pawn_shares_field() {
        let (mut session, _) = started(2, &[2]);
        let [a, _, _, _] = ids();
        place(&mut session, 0, 1, Location::Track, 7, 37);
        place(&mut session, 0, 2, Location::Track, 9, 35);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        let applied = session.move_pawn(&a, 1, &mut events).unwrap();

        assert!(matches!(applied, Applied::Moved { captured: None, .. }));
        assert_eq!(pawn(&session, 0, 1).position, 9);
        assert_eq!(pawn(&session, 0, 2).position, 9);
    }

    #[test]
    fn test_full_field_rejected() {
        let (mut session, _) = started(2, &[2]);
        let [a, _, _, _] = ids();
        place(&mut session, 0, 1, Location::Track, 7, 37);
        place(&mut session, 1, 1, Location::Track, 9, 5);
        place(&mut session, 1, 2, Location::Track, 9, 5);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();
        let before = session.snapshot();

        assert_eq!(session.move_pawn(&a, 1, &mut events), Err(Rejection::FieldFull { field: 9 }));
        assert_eq!(session.snapshot(), before);
        assert!(events.is_empty());
    }

    #[test]
    fn test_position_wraps_after_forty() {
        let (mut session, _) = started(2, &[3]);
        let [_, b, _, _] = ids();
        let mut events: Vec<SessionEvent> = Vec::new();
        session.advance_turn(&mut events);
        // Seat 2 enters at 11, so field 38 is 27 fields in
        place(&mut session, 1, 1, Location::Track, 38, 16);

        session.roll_dice(&b, &mut events).unwrap();
        session.move_pawn(&b, 1, &mut events).unwrap();

        let moved = pawn(&session, 1, 1);
        assert_eq!((moved.position, moved.fields_left), (1, 13));
    }

    #[test]
    fn test_insufficient_distance_rejected() {
        let (mut session, _) = started(2, &[6]);
        let [a, _, _, _] = ids();
        place(&mut session, 0, 1, Location::Track, 40, 4);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();
        let before = session.snapshot();

        assert_eq!(
            session.move_pawn(&a, 1, &mut events),
            Err(Rejection::InsufficientDistance { fields_left: 4, roll: 6 })
        );
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_enter_home_stretch() {
        let (mut session, _) = started(2, &[3]);
        let [a, _, _, _] = ids();
        // Seat 1's last track field is 40, four fields before the deepest slot
        place(&mut session, 0, 1, Location::Track, 40, 4);
        place(&mut session, 0, 2, Location::Track, 20, 24);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        let applied = session.move_pawn(&a, 1, &mut events).unwrap();

        assert!(matches!(applied, Applied::Moved { entered_home: true, captured: None, .. }));
        let home = pawn(&session, 0, 1);
        assert_eq!((home.location, home.position, home.fields_left), (Location::Home, 3, 1));

        // Trailing pawns (track and base) lose one field
        assert_eq!(pawn(&session, 0, 2).fields_left, 23);
        assert_eq!(pawn(&session, 0, 3).fields_left, 42);
        assert_eq!(pawn(&session, 0, 2).position, 20);
    }

    #[test]
    fn test_home_pawn_cannot_move() {
        let (mut session, _) = started(2, &[1]);
        let [a, _, _, _] = ids();
        place(&mut session, 0, 1, Location::Home, 2, 2);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        assert_eq!(session.move_pawn(&a, 1, &mut events), Err(Rejection::PawnInHome(1)));
    }

    #[test]
    fn test_home_pawns_are_skipped() {
        let (mut session, _) = started(2, &[2]);
        let [a, _, _, _] = ids();
        // Free slots are 1, 3 and 4; two fields left means the third of them
        place(&mut session, 0, 1, Location::Home, 2, 0);
        place(&mut session, 0, 2, Location::Track, 40, 3);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        session.move_pawn(&a, 2, &mut events).unwrap();

        let second = pawn(&session, 0, 2);
        assert_eq!((second.location, second.position, second.fields_left), (Location::Home, 3, 1));
    }

    #[test]
    fn test_entry_always_finds_a_free_slot() {
        // Every set of occupied slots, every entering distance
        for occupied in 0u8..15 {
            let home: Vec<u8> = (1..=STRETCH_LEN)
                .filter(|slot| occupied & (1 << (slot - 1)) != 0)
                .collect();
            let free: Vec<u8> = (1..=STRETCH_LEN).filter(|slot| !home.contains(slot)).collect();
            let open = free.len() as u8;

            for target in 0..open {
                let (mut session, _) = started(2, &[1]);
                let [a, _, _, _] = ids();
                for (i, &slot) in home.iter().enumerate() {
                    place(&mut session, 0, i as u8 + 1, Location::Home, slot, 0);
                }
                place(&mut session, 0, 4, Location::Track, 40, target + 1);
                roll(&mut session);
                let mut events: Vec<SessionEvent> = Vec::new();

                session.move_pawn(&a, 4, &mut events).unwrap();

                let entered = pawn(&session, 0, 4);
                assert_eq!(entered.location, Location::Home);
                assert_eq!(entered.position, free[usize::from(open - target) - 1]);
            }
        }
    }

    #[test]
    fn test_second_pawn_home_behind_first() {
        let (mut session, _) = started(2, &[3]);
        let [a, _, _, _] = ids();
        place(&mut session, 0, 1, Location::Home, 4, 0);
        place(&mut session, 0, 2, Location::Track, 40, 3);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        session.move_pawn(&a, 2, &mut events).unwrap();

        let second = pawn(&session, 0, 2);
        assert_eq!((second.location, second.position), (Location::Home, 3));
    }

    #[test]
    fn test_unknown_pawn_rejected() {
        let (mut session, _) = started(2, &[6]);
        let [a, _, _, _] = ids();
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        assert_eq!(session.move_pawn(&a, 5, &mut events), Err(Rejection::UnknownPawn(5)));
        assert_eq!(session.move_pawn(&a, 0, &mut events), Err(Rejection::UnknownPawn(0)));
    }

    #[test]
    fn test_move_in_draw_phase_rejected() {
        let (mut session, _) = started(2, &[6]);
        let [a, _, _, _] = ids();
        let mut events: Vec<SessionEvent> = Vec::new();

        assert_eq!(
            session.move_pawn(&a, 1, &mut events),
            Err(Rejection::WrongPhase { expected: Phase::Move, actual: Phase::Draw })
        );
    }

    #[test]
    fn test_other_player_cannot_move() {
        let (mut session, _) = started(2, &[6]);
        let [_, b, _, _] = ids();
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        assert_eq!(session.move_pawn(&b, 1, &mut events), Err(Rejection::NotYourTurn(b.clone())));
        assert_eq!(pawn(&session, 1, 1).location, Location::Base);
    }

    #[test]
    fn test_pass_only_without_legal_moves() {
        let (mut session, _) = started(2, &[6]);
        let [a, _, _, _] = ids();
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        assert_eq!(session.pass(&a, &mut events), Err(Rejection::MoveAvailable));

        // Block the entry field with two opposing pawns
        place(&mut session, 1, 1, Location::Track, 1, 13);
        place(&mut session, 1, 2, Location::Track, 1, 13);
        assert!(session.legal_moves().is_empty());

        assert_eq!(session.pass(&a, &mut events), Ok(Applied::Passed));
        assert_eq!(session.state().current_seat(), Some(Seat::new(1)));
    }

    #[test]
    fn test_extra_turn_on_six_variant() {
        let (mut session, _) = started(2, &[6]);
        session.config = RulesConfig::default().with_extra_turn_on_six(true);
        let [a, _, _, _] = ids();
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        session.move_pawn(&a, 1, &mut events).unwrap();

        assert_eq!(session.state().current_seat(), Some(Seat::new(0)));
        assert_eq!(session.phase(), Phase::Draw);
        assert_eq!(events[1], SessionEvent::player_turn(&session.players()[0]));
    }

    #[test]
    fn test_last_pawn_home_ends_game() {
        let (mut session, _) = started(2, &[1]);
        let [a, b, _, _] = ids();
        place(&mut session, 0, 1, Location::Home, 4, 0);
        place(&mut session, 0, 2, Location::Home, 3, 0);
        place(&mut session, 0, 3, Location::Home, 2, 0);
        place(&mut session, 0, 4, Location::Track, 40, 1);
        roll(&mut session);
        let mut events: Vec<SessionEvent> = Vec::new();

        let applied = session.move_pawn(&a, 4, &mut events).unwrap();

        assert!(matches!(applied, Applied::Moved { finished: true, entered_home: true, .. }));
        assert_eq!(pawn(&session, 0, 4).position, 1);
        assert_eq!(session.state().status(), GameStatus::Finished { winner: Seat::new(0) });
        assert_eq!(session.result().map(|p| p.id.clone()), Some(a.clone()));

        let names: Vec<_> = events.iter().map(SessionEvent::name).collect();
        assert_eq!(names, vec!["pawnUpdate", "playerTurn", "gameOver"]);

        assert_eq!(session.roll_dice(&b, &mut events), Err(Rejection::GameOver));
    }
}
