//! Tests for the two-phase claim on the centre cell.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use strictly_cube::{
    Cell, ClaimError, ClaimPhase, CubeEngine, EngineConfig, GameStatus, IllegalMove, ManualClock,
    Occupant, Player,
};

fn engine() -> (CubeEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (CubeEngine::with_clock(EngineConfig::default(), clock.clone()), clock)
}

#[test]
fn test_direct_claim_on_centre_rejected() {
    let (mut engine, _) = engine();
    assert_eq!(
        engine.claim_cell(13),
        Err(IllegalMove::GatedCell(Cell::CENTER))
    );
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Empty));
}

#[test]
fn test_space_diagonal_through_gated_centre() {
    let (mut engine, clock) = engine();
    engine.claim_cell(0).unwrap();
    engine.claim_cell(9).unwrap();
    engine.activate_gated_cell(Player::X).unwrap();
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Empty));

    clock.advance_ms(1000);
    assert_eq!(engine.poll(), 1);
    engine.claim_cell(10).unwrap();
    engine.claim_cell(26).unwrap();

    assert_eq!(engine.status(), GameStatus::Won(Player::X));
    assert_eq!(engine.winning_pattern().map(|p| p.indices()), Some([0, 13, 26]));
}

#[test]
fn test_commit_waits_for_full_delay() {
    let (mut engine, clock) = engine();
    engine.activate_gated_cell(Player::X).unwrap();

    clock.advance_ms(999);
    assert_eq!(engine.poll(), 0);
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Empty));
    assert_eq!(engine.pending_request().map(|r| r.phase), Some(ClaimPhase::Pending));

    clock.advance_ms(1);
    assert_eq!(engine.poll(), 1);
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Occupied(Player::X)));
    assert!(engine.pending_request().is_none());
}

#[test]
fn test_second_activation_is_busy() {
    let (mut engine, _) = engine();
    engine.activate_gated_cell(Player::X).unwrap();
    assert_eq!(
        engine.activate_gated_cell(Player::O),
        Err(ClaimError::GatedCellBusy(Cell::CENTER))
    );
    assert_eq!(
        engine.pending_request().map(|r| r.claiming_player),
        Some(Player::X)
    );
}

#[test]
fn test_commit_goes_to_activating_player_after_turn_change() {
    let (mut engine, clock) = engine();
    engine.activate_gated_cell(Player::X).unwrap();

    // Other cells stay open while the centre waits.
    engine.claim_cell(0).unwrap();
    engine.claim_cell(1).unwrap();
    engine.claim_cell(2).unwrap();
    assert_eq!(engine.current_player(), Player::O);

    clock.advance_ms(1000);
    engine.poll();
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Occupied(Player::X)));
}

#[test]
fn test_mutating_call_applies_due_commit_first() {
    let (mut engine, clock) = engine();
    engine.activate_gated_cell(Player::X).unwrap();
    clock.advance_ms(1500);

    // The claim polls first, so the centre lands for X and O then claims 4.
    engine.claim_cell(4).unwrap();
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Occupied(Player::X)));
    assert_eq!(engine.occupant_at(4), Ok(Occupant::Occupied(Player::O)));
}

#[test]
fn test_reset_makes_stale_commit_a_no_op() {
    let (mut engine, clock) = engine();
    engine.activate_gated_cell(Player::O).unwrap();
    clock.advance_ms(500);
    engine.reset_game();

    clock.advance_ms(5000);
    assert_eq!(engine.poll(), 0);
    assert!(engine.snapshot().board.iter().all(|o| o.is_empty()));
    assert!(engine.pending_request().is_none());
}

#[test]
fn test_activation_after_reset_keeps_its_own_deadline() {
    let (mut engine, clock) = engine();
    engine.activate_gated_cell(Player::O).unwrap();
    clock.advance_ms(500);
    engine.reset_game();

    engine.activate_gated_cell(Player::X).unwrap();
    clock.advance_ms(500);
    assert_eq!(engine.poll(), 0, "the pre-reset deadline must not fire");
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Empty));

    clock.advance_ms(500);
    assert_eq!(engine.poll(), 1);
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Occupied(Player::X)));
}

#[test]
fn test_reset_reports_cancelled_request() {
    let (mut engine, _) = engine();
    let cancelled = Rc::new(RefCell::new(Vec::new()));
    let sink = cancelled.clone();
    engine.on_gated_cancelled(move |request| sink.borrow_mut().push(request));

    engine.activate_gated_cell(Player::O).unwrap();
    engine.reset_game();

    let cancelled = cancelled.borrow();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].claiming_player, Player::O);
    assert_eq!(cancelled[0].phase, ClaimPhase::Cancelled);
}

#[test]
fn test_pending_claim_cancelled_when_game_ends() {
    let (mut engine, clock) = engine();
    engine.claim_cell(0).unwrap();
    engine.claim_cell(9).unwrap();
    engine.claim_cell(1).unwrap();
    engine.activate_gated_cell(Player::O).unwrap();
    engine.claim_cell(10).unwrap();
    engine.claim_cell(2).unwrap();
    assert_eq!(engine.status(), GameStatus::Won(Player::X));
    assert!(engine.pending_request().is_none());

    clock.advance_ms(1000);
    assert_eq!(engine.poll(), 0);
    assert_eq!(engine.occupant_at(13), Ok(Occupant::Empty));
}

#[test]
fn test_configured_commit_delay() {
    let clock = ManualClock::new();
    let config = EngineConfig::default().with_commit_delay_ms(250);
    let mut engine = CubeEngine::with_clock(config, clock.clone());

    engine.activate_gated_cell(Player::X).unwrap();
    assert_eq!(engine.time_until_commit(), Some(Duration::from_millis(250)));
    clock.advance_ms(250);
    assert_eq!(engine.poll(), 1);
}

#[test]
fn test_gated_commit_can_win_the_game() {
    let (mut engine, clock) = engine();
    let log = Rc::new(RefCell::new(Vec::new()));

    let sink = log.clone();
    engine.on_gated_pending(move |request| {
        sink.borrow_mut()
            .push(format!("pending {} {:?}", request.claiming_player, request.phase));
    });
    let sink = log.clone();
    engine.on_gated_committed(move |request| {
        sink.borrow_mut()
            .push(format!("committed {} {:?}", request.claiming_player, request.phase));
    });
    let sink = log.clone();
    engine.on_game_ended(move |outcome| sink.borrow_mut().push(format!("ended {}", outcome)));

    for index in [4, 0, 22, 1] {
        engine.claim_cell(index).unwrap();
    }
    engine.activate_gated_cell(Player::X).unwrap();
    assert_eq!(*log.borrow(), vec!["pending X Pending".to_string()]);

    clock.advance_ms(1000);
    assert_eq!(engine.poll(), 1);

    assert_eq!(engine.status(), GameStatus::Won(Player::X));
    assert_eq!(engine.winning_pattern().map(|p| p.indices()), Some([4, 13, 22]));
    assert_eq!(
        *log.borrow(),
        vec![
            "pending X Pending".to_string(),
            "committed X Committed".to_string(),
            "ended Player X wins".to_string(),
        ]
    );
}

#[test]
fn test_due_commit_lands_before_rejected_claim() {
    let (mut engine, clock) = engine();
    engine.claim_cell(0).unwrap();
    engine.activate_gated_cell(Player::O).unwrap();
    clock.advance_ms(1000);

    // Reading does not poll, so the overdue claim still shows as pending.
    let overdue = engine.snapshot();
    assert_eq!(overdue.pending.map(|r| r.claiming_player), Some(Player::O));
    assert_eq!(overdue.board[13], Occupant::Empty);

    assert!(matches!(engine.claim_cell(0), Err(IllegalMove::Occupied(_))));
    let after = engine.snapshot();
    assert_eq!(after.board[13], Occupant::Occupied(Player::O));
    assert_eq!(after.pending, None);
    assert_eq!(after.current_player, Player::X);

    // Nothing else was left to apply, so a second rejection changes nothing.
    assert!(matches!(engine.claim_cell(0), Err(IllegalMove::Occupied(_))));
    assert_eq!(engine.snapshot(), after);
}
