//! Relay sowing and capture
//!
//! A move lifts every shell from the chosen pit and drops them one at a time
//! along the sowing cycle. If the pit after the last drop holds shells, they
//! are lifted and sowing continues from there (a relay). The move ends when
//! that pit is empty; the pit after it is then captured by the mover.
//!
//! Sowing is deterministic, so a relay chain that lifts the same shells from
//! the same pit on the same board twice can never settle.

use crate::board::{Board, PitRef, PITS_PER_ROW, TOTAL_PITS};
use crate::error::{GameError, InvalidMove, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Relays sown before lift states start being recorded
const RELAYS_BEFORE_TRACKING: u32 = TOTAL_PITS as u32;

/// One observable step of a sowing move, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SowEvent {
    /// Shells lifted from a pit (the source, then each relay pit)
    Lift { pit: PitRef, shells: u32 },
    /// One shell dropped; `remaining` are still in hand
    Drop { pit: PitRef, remaining: u32 },
    /// Sowing stopped on this empty pit
    Land { pit: PitRef },
}

/// Where a sowing move stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SowOutcome {
    pub terminal: PitRef,
    pub drops: u32,
    pub relays: u32,
}

/// A complete move: sowing followed by capture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub start: PitRef,
    pub terminal: PitRef,
    pub captured_from: PitRef,
    pub captured: u32,
    pub drops: u32,
    pub relays: u32,
}

/// Next pit in the sowing cycle
pub fn next_pit(pos: PitRef) -> PitRef {
    pos.next()
}

/// Sow from `start`, returning the terminal pit.
///
/// The board is only updated when sowing settles; on error it is unchanged.
pub fn sow_move(board: &mut Board, start: PitRef) -> Result<SowOutcome> {
    sow_with(board, start, |_| {})
}

/// Like [`sow_move`], also recording every lift, drop and landing
pub fn sow_move_traced(board: &mut Board, start: PitRef) -> Result<(SowOutcome, Vec<SowEvent>)> {
    let mut events = Vec::new();
    let outcome = sow_with(board, start, |event| events.push(event))?;
    Ok((outcome, events))
}

/// Capture the pit after `terminal`, returning the shells taken
pub fn capture_from(board: &mut Board, terminal: PitRef) -> u32 {
    board.take(next_pit(terminal))
}

/// Sow from `start` and apply the capture
pub fn play_pit(board: &mut Board, start: PitRef) -> Result<Turn> {
    let outcome = sow_move(board, start)?;
    let captured = capture_from(board, outcome.terminal);

    Ok(Turn {
        start,
        terminal: outcome.terminal,
        captured_from: next_pit(outcome.terminal),
        captured,
        drops: outcome.drops,
        relays: outcome.relays,
    })
}

/// Whether sowing from `pos` is possible and settles
pub fn is_playable(board: &Board, pos: PitRef) -> bool {
    if pos.pit >= PITS_PER_ROW || board.get(pos) == 0 {
        return false;
    }
    let mut scratch = *board;
    sow_move(&mut scratch, pos).is_ok()
}

fn sow_with<F: FnMut(SowEvent)>(board: &mut Board, start: PitRef, mut on_event: F) -> Result<SowOutcome> {
    if start.pit >= PITS_PER_ROW {
        return Err(InvalidMove::PitOutOfRange { pit: start.pit }.into());
    }

    let mut work = *board;
    let mut in_hand = work.take(start);
    if in_hand == 0 {
        return Err(InvalidMove::EmptyPit {
            player: start.player,
            pit: start.pit,
        }
        .into());
    }
    on_event(SowEvent::Lift { pit: start, shells: in_hand });

    let mut pos = start;
    let mut drops = 0u32;
    let mut relays = 0u32;
    let mut seen: FxHashSet<(Board, PitRef, u32)> = FxHashSet::default();

    loop {
        while in_hand > 0 {
            pos = next_pit(pos);
            work.drop_one(pos);
            in_hand -= 1;
            drops += 1;
            on_event(SowEvent::Drop { pit: pos, remaining: in_hand });
        }

        pos = next_pit(pos);
        in_hand = work.take(pos);
        if in_hand == 0 {
            on_event(SowEvent::Land { pit: pos });
            *board = work;
            return Ok(SowOutcome {
                terminal: pos,
                drops,
                relays,
            });
        }

        relays += 1;
        if relays > RELAYS_BEFORE_TRACKING && !seen.insert((work, pos, in_hand)) {
            return Err(GameError::EndlessRelay { start, drops });
        }
        on_event(SowEvent::Lift { pit: pos, shells: in_hand });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;

    fn ai(pit: usize) -> PitRef {
        PitRef::new(Player::Ai, pit)
    }

    fn human(pit: usize) -> PitRef {
        PitRef::new(Player::Human, pit)
    }

    fn relay_board() -> Board {
        Board::from_rows([0, 0, 3, 0, 0, 0, 0], [2, 0, 0, 0, 0, 0, 5])
    }

    #[test]
    fn test_simple_sow_without_relay() {
        let mut board = Board::from_rows([0; 7], [6, 0, 0, 0, 0, 0, 4]);

        let outcome = sow_move(&mut board, human(0)).unwrap();
        assert_eq!(outcome.terminal, ai(6));
        assert_eq!(outcome.drops, 6);
        assert_eq!(outcome.relays, 0);
        assert_eq!(board.row(Player::Ai), &[1, 1, 1, 1, 1, 1, 0]);

        let captured = capture_from(&mut board, outcome.terminal);
        assert_eq!(captured, 4);
        assert_eq!(board.get(human(6)), 0);
    }

    #[test]
    fn test_relay_chain_moves_past_naive_landing() {
        let mut board = relay_board();

        let outcome = sow_move(&mut board, human(0)).unwrap();
        // Without relaying, sowing would have stopped at ai(2)
        assert_ne!(outcome.terminal, ai(2));
        assert_eq!(outcome.terminal, ai(6));
        assert_eq!(outcome.relays, 1);
        assert_eq!(outcome.drops, 5);
        assert_eq!(board.row(Player::Ai), &[1, 1, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_play_pit_sows_and_captures() {
        let mut board = relay_board();
        let before = board.total();

        let turn = play_pit(&mut board, human(0)).unwrap();
        assert_eq!(turn.captured_from, human(6));
        assert_eq!(turn.captured, 5);
        assert_eq!(board.total() + turn.captured, before);
        assert!(board.row_is_empty(Player::Human));
    }

    #[test]
    fn test_traced_events() {
        let mut board = relay_board();
        let (_, events) = sow_move_traced(&mut board, human(0)).unwrap();

        assert_eq!(
            events,
            vec![
                SowEvent::Lift { pit: human(0), shells: 2 },
                SowEvent::Drop { pit: ai(0), remaining: 1 },
                SowEvent::Drop { pit: ai(1), remaining: 0 },
                SowEvent::Lift { pit: ai(2), shells: 3 },
                SowEvent::Drop { pit: ai(3), remaining: 2 },
                SowEvent::Drop { pit: ai(4), remaining: 1 },
                SowEvent::Drop { pit: ai(5), remaining: 0 },
                SowEvent::Land { pit: ai(6) },
            ]
        );
    }

    #[test]
    fn test_sowing_is_deterministic() {
        let start = Board::default();
        for pit in 0..PITS_PER_ROW {
            let mut a = start;
            let mut b = start;
            let (out_a, events_a) = sow_move_traced(&mut a, human(pit)).unwrap();
            let (out_b, events_b) = sow_move_traced(&mut b, human(pit)).unwrap();
            assert_eq!(out_a, out_b);
            assert_eq!(events_a, events_b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_empty_pit_is_rejected() {
        let mut board = Board::from_rows([0; 7], [0, 3, 0, 0, 0, 0, 0]);
        let err = sow_move(&mut board, human(0)).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidMove(InvalidMove::EmptyPit {
                player: Player::Human,
                pit: 0
            })
        );
        assert!(!is_playable(&board, human(0)));
        assert!(is_playable(&board, human(1)));
    }

    #[test]
    fn test_out_of_range_pit_is_rejected() {
        let mut board = Board::default();
        let err = sow_move(&mut board, ai(PITS_PER_ROW)).unwrap_err();
        assert_eq!(err, GameError::InvalidMove(InvalidMove::PitOutOfRange { pit: PITS_PER_ROW }));
        assert_eq!(board, Board::default());
    }

    #[test]
    fn test_endless_relay_is_detected() {
        let original = Board::from_rows([2, 1, 0, 1, 0, 1, 0], [1, 0, 1, 2, 1, 0, 1]);
        let mut board = original;

        let err = sow_move(&mut board, ai(0)).unwrap_err();
        assert!(matches!(err, GameError::EndlessRelay { start, .. } if start == ai(0)));
        // Failed sowing leaves the board untouched
        assert_eq!(board, original);
        assert!(!is_playable(&original, ai(0)));
    }

    #[test]
    fn test_endless_relay_stops_at_first_repeat() {
        let original = Board::from_rows([2, 1, 0, 1, 0, 1, 0], [1, 0, 1, 2, 1, 0, 1]);

        let mut board = original;
        let Err(GameError::EndlessRelay { drops, .. }) = sow_move(&mut board, ai(0)) else {
            panic!("relay from ai(0) should never settle");
        };
        // The loop repeats within a few laps of the 14 shells
        assert!(drops < 20 * original.total(), "took {} drops", drops);

        let mut traced = original;
        assert!(sow_move_traced(&mut traced, ai(0)).is_err());
        assert_eq!(traced, original);

        // Other pits on the same board still settle
        for pit in [1, 3, 5] {
            assert!(is_playable(&original, ai(pit)));
        }
    }

    #[test]
    fn test_standard_opening_moves_settle_quickly() {
        let board = Board::default();
        for player in Player::ALL {
            for pit in 0..PITS_PER_ROW {
                let mut scratch = board;
                let outcome = sow_move(&mut scratch, PitRef::new(player, pit)).unwrap();
                assert!(outcome.drops <= board.total() * 4);
                assert_eq!(scratch.get(outcome.terminal), 0);
            }
        }
    }
}
