//! End-to-end scenarios driven through the public engine API.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use seating_core::invariants;
use seating_core::{ErrorKind, ImportFormat, Placement, PlannerConfig, SeatingEngine, SeatingError};
use seating_types::Position;

fn engine() -> SeatingEngine {
    SeatingEngine::empty(&PlannerConfig::default())
}

#[test]
fn full_table_rejects_without_change() {
    let mut engine = engine();
    let table = engine.create_table(2, None).unwrap();
    for name in ["A", "B"] {
        let guest = engine.create_guest(name).unwrap();
        engine.assign_to_first_available_seat(guest, table).unwrap();
    }
    let late = engine.create_guest("C").unwrap();
    let before = engine.state().clone();
    let history_before = engine.history_len();

    let err = engine.assign_to_first_available_seat(late, table).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TableFull);
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.history_len(), history_before);
}

#[test]
fn alice_bob_carol_eviction() {
    let mut engine = engine();
    let table = engine.create_table(2, None).unwrap();
    let alice = engine.create_guest("Alice").unwrap();
    let bob = engine.create_guest("Bob").unwrap();
    let carol = engine.create_guest("Carol").unwrap();
    engine.assign_to_specific_seat(alice, table, 0).unwrap();
    engine.assign_to_specific_seat(bob, table, 1).unwrap();

    let placement = engine.assign_to_specific_seat(carol, table, 0).unwrap();
    assert_eq!(placement, Placement::Displaced { displaced: alice });

    let carol = engine.guest(carol).unwrap();
    assert_eq!(carol.table_id, Some(table));
    assert_eq!(carol.seat_position, Some(0));
    let alice = engine.guest(alice).unwrap();
    assert!(alice.table_id.is_none());
    assert!(alice.seat_position.is_none());
    assert!(!engine.table(table).unwrap().has_guest(alice.id));
    assert_eq!(engine.table(table).unwrap().guest_ids.len(), 2);
}

#[test]
fn seated_mover_swaps_with_occupant() {
    let mut engine = engine();
    let t1 = engine.create_table(4, None).unwrap();
    let t2 = engine.create_table(4, None).unwrap();
    let a = engine.create_guest("A").unwrap();
    let b = engine.create_guest("B").unwrap();
    engine.assign_to_specific_seat(a, t1, 3).unwrap();
    engine.assign_to_specific_seat(b, t2, 1).unwrap();

    engine.assign_to_specific_seat(a, t2, 1).unwrap();
    assert_eq!(engine.guest(a).unwrap().placement(), Some((t2, 1)));
    assert_eq!(engine.guest(b).unwrap().placement(), Some((t1, 3)));
    assert!(invariants::verify(engine.state()).is_empty());
}

#[test]
fn undo_redo_round_trip() {
    let mut engine = engine();
    let s0 = engine.state().clone();
    let table = engine.create_table(6, None).unwrap();
    let s1 = engine.state().clone();
    let guest = engine.create_guest("Dana").unwrap();
    let s2 = engine.state().clone();
    engine.assign_to_specific_seat(guest, table, 4).unwrap();
    let s3 = engine.state().clone();

    engine.undo().unwrap();
    assert_eq!(engine.state(), &s2);
    engine.undo().unwrap();
    assert_eq!(engine.state(), &s1);
    engine.undo().unwrap();
    assert_eq!(engine.state(), &s0);
    assert_eq!(engine.undo(), Err(SeatingError::NothingToUndo));

    engine.redo().unwrap();
    engine.redo().unwrap();
    engine.redo().unwrap();
    assert_eq!(engine.state(), &s3);
    assert_eq!(engine.redo(), Err(SeatingError::NothingToRedo));
}

#[test]
fn new_command_after_undo_drops_redo() {
    let mut engine = engine();
    engine.create_guest("One").unwrap();
    engine.create_guest("Two").unwrap();
    engine.undo().unwrap();
    assert!(engine.can_redo());

    engine.create_guest("Three").unwrap();
    assert!(!engine.can_redo());
    let names: Vec<&str> = engine.guests().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["One", "Three"]);
}

#[test]
fn history_keeps_fifty_snapshots() {
    let mut engine = engine();
    for i in 0..60 {
        engine.create_guest(&format!("Guest {i}")).unwrap();
    }
    assert_eq!(engine.history_len(), 50);

    let mut undos = 0;
    while engine.undo().is_ok() {
        undos += 1;
    }
    assert_eq!(undos, 49);
    assert_eq!(engine.guests().len(), 11);
}

#[test]
fn undo_on_fresh_engine() {
    let mut engine = engine();
    let before = engine.state().clone();
    assert_eq!(engine.undo(), Err(SeatingError::NothingToUndo));
    assert_eq!(engine.state(), &before);
}

#[test]
fn import_simple_structured_row() {
    let mut engine = engine();
    let report = engine
        .import_guests_from_text("First Name,Last Name\nJohn,Doe")
        .unwrap();
    assert_eq!(report.format, ImportFormat::Structured);
    assert_eq!(report.imported.len(), 1);

    let guest = engine.guests().first().unwrap();
    assert_eq!(guest.name, "John Doe");
    assert!(guest.table_id.is_none());
    assert!(guest.seat_position.is_none());
}

#[test]
fn import_is_one_undo_step() {
    let mut engine = engine();
    engine.create_guest("Existing").unwrap();
    engine
        .import_guests_from_text("Alice\nBob\nCarol\n")
        .unwrap();
    assert_eq!(engine.guests().len(), 4);

    engine.undo().unwrap();
    assert_eq!(engine.guests().len(), 1);
}

#[test]
fn delete_table_unassigns_guests() {
    let mut engine = engine();
    let table = engine.create_table(3, None).unwrap();
    let (guest, seat) = engine.create_guest_at_table("Eve", table).unwrap();
    assert_eq!(seat, Some(0));

    let released = engine.delete_table(table).unwrap();
    assert_eq!(released, vec![guest]);
    assert!(engine.guest(guest).unwrap().table_id.is_none());
    assert!(engine.table(table).is_none());
}

#[test]
fn explicit_position_and_move() {
    let mut engine = engine();
    let table = engine
        .create_table(4, Some(Position::new(10.0, 20.0)))
        .unwrap();
    let moved = engine.move_table(table, Position::new(5.0, -40.0)).unwrap();
    assert!((moved.x - 15.0).abs() < f64::EPSILON);
    assert!((moved.y + 20.0).abs() < f64::EPSILON);
}

#[test]
fn no_op_commands_do_not_record_history() {
    let mut engine = engine();
    let table = engine.create_table(4, None).unwrap();
    let guest = engine.create_guest("Zed").unwrap();
    let len = engine.history_len();

    assert!(engine.clear_table(table).unwrap_err().is_no_op());
    assert!(engine.unassign_from_table(guest).unwrap_err().is_no_op());
    assert!(engine.rename_table(table, "Table 1").unwrap_err().is_no_op());
    assert!(engine.move_table(table, Position::ORIGIN).unwrap_err().is_no_op());
    assert_eq!(engine.history_len(), len);
}
