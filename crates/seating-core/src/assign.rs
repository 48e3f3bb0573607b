//! Seat assignment, swapping, and unassignment.
//!
//! Moves a guest into a table/seat while keeping the store consistent. All
//! checks run before the first write, and every change goes through the
//! store's paired primitives, so an assignment either applies completely or
//! not at all.
//!
//! # Seat conflicts
//!
//! Dropping guest A onto a seat held by guest B:
//!
//! | A before | Result |
//! |----------|--------|
//! | seated at (t1, s1) | A takes the target seat, B takes (t1, s1) |
//! | unassigned | A takes the target seat, B becomes unassigned |
//! | is B | nothing happens |
//!
//! Vacated seats are never compacted: other guests keep their numbers.

use seating_types::{GuestId, TableId};

use crate::error::SeatingError;
use crate::store::EntityStore;

/// What a specific-seat assignment did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The seat was free and the guest took it.
    Seated {
        /// The seat taken.
        seat: u32,
    },
    /// The seat was held; the occupant moved to the mover's old seat.
    Swapped {
        /// The previous occupant.
        displaced: GuestId,
        /// Where the previous occupant now sits.
        displaced_to: (TableId, u32),
    },
    /// The seat was held by someone the unassigned mover evicted.
    Displaced {
        /// The previous occupant, now unassigned.
        displaced: GuestId,
    },
}

/// Seat a guest at the lowest-numbered free seat of a table.
///
/// A guest seated elsewhere leaves their old seat first. A guest already at
/// `table` moves down to a lower free seat if there is one, keeping their
/// slot in the table's guest list.
///
/// Returns the seat index taken.
///
/// # Errors
///
/// - [`SeatingError::GuestNotFound`] / [`SeatingError::TableNotFound`] for
///   unknown ids.
/// - [`SeatingError::TableFull`] if the table lists `capacity` guests,
///   whoever is asking.
/// - [`SeatingError::AlreadySeated`] if the guest already sits at `table`
///   and no lower seat is free.
pub fn assign_to_first_available_seat(
    store: &mut EntityStore,
    guest: GuestId,
    table: TableId,
) -> Result<u32, SeatingError> {
    let current = store
        .guest(guest)
        .ok_or(SeatingError::GuestNotFound(guest))?
        .placement();
    let target = store.table(table).ok_or(SeatingError::TableNotFound(table))?;
    let full = SeatingError::TableFull {
        table,
        capacity: target.capacity,
    };
    if target.is_full() {
        return Err(full);
    }
    let seat = store.first_free_seat(table).ok_or(full)?;

    match current {
        Some((at, held)) if at == table => {
            if seat >= held {
                return Err(SeatingError::AlreadySeated { guest, table });
            }
            store.seat(guest, table, seat)?;
        }
        _ => {
            store.unseat(guest);
            store.seat(guest, table, seat)?;
        }
    }
    tracing::trace!(%guest, %table, seat, "Guest took first free seat");
    Ok(seat)
}

/// Seat a guest at a specific seat, swapping or evicting any occupant.
///
/// # Errors
///
/// - [`SeatingError::GuestNotFound`] / [`SeatingError::TableNotFound`] for
///   unknown ids.
/// - [`SeatingError::SeatOutOfRange`] if `seat >= capacity`.
/// - [`SeatingError::Unchanged`] if the guest already holds that seat.
/// - [`SeatingError::TableFull`] if the seat is free but the table is full
///   and the guest comes from another table.
pub fn assign_to_specific_seat(
    store: &mut EntityStore,
    guest: GuestId,
    table: TableId,
    seat: u32,
) -> Result<Placement, SeatingError> {
    let mover = store.guest(guest).ok_or(SeatingError::GuestNotFound(guest))?;
    let previous = mover.placement();
    let previous_table = mover.table_id;
    let target = store.table(table).ok_or(SeatingError::TableNotFound(table))?;
    let capacity = target.capacity;
    if seat >= capacity {
        return Err(SeatingError::SeatOutOfRange {
            table,
            seat,
            capacity,
        });
    }

    match store.seat_occupant(table, seat) {
        Some(occupant) if occupant == guest => Err(SeatingError::Unchanged {
            operation: "assign_to_specific_seat",
        }),
        Some(occupant) => match previous {
            Some(displaced_to) => {
                store.swap_placements(guest, occupant)?;
                tracing::trace!(%guest, %occupant, %table, seat, "Guests swapped seats");
                Ok(Placement::Swapped {
                    displaced: occupant,
                    displaced_to,
                })
            }
            None => {
                store.unseat(occupant);
                store.unseat(guest);
                store.seat(guest, table, seat)?;
                tracing::trace!(%guest, %occupant, %table, seat, "Occupant evicted to unassigned");
                Ok(Placement::Displaced {
                    displaced: occupant,
                })
            }
        },
        None => {
            if previous_table != Some(table) && target.is_full() {
                return Err(SeatingError::TableFull { table, capacity });
            }
            store.unseat(guest);
            store.seat(guest, table, seat)?;
            tracing::trace!(%guest, %table, seat, "Guest took requested seat");
            Ok(Placement::Seated { seat })
        }
    }
}

/// Remove a guest from their table. Remaining seats are not renumbered.
///
/// Returns the `(table, seat)` that was freed.
///
/// # Errors
///
/// [`SeatingError::GuestNotFound`] for an unknown guest and
/// [`SeatingError::NotSeated`] if the guest has no table.
pub fn unassign_from_table(
    store: &mut EntityStore,
    guest: GuestId,
) -> Result<Option<(TableId, u32)>, SeatingError> {
    let current = store.guest(guest).ok_or(SeatingError::GuestNotFound(guest))?;
    if !current.is_seated() {
        return Err(SeatingError::NotSeated(guest));
    }
    Ok(store.unseat(guest))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seating_types::Position;

    use super::*;
    use crate::error::ErrorKind;
    use crate::invariants;

    struct Fixture {
        store: EntityStore,
        table: TableId,
    }

    fn fixture(capacity: u32) -> Fixture {
        let mut store = EntityStore::new();
        let table = store.create_table(capacity, Position::ORIGIN).unwrap();
        Fixture { store, table }
    }

    fn consistent(store: &EntityStore) -> bool {
        invariants::verify(store.state()).is_empty()
    }

    #[test]
    fn first_available_picks_lowest_free_seat() {
        let mut f = fixture(4);
        let a = f.store.create_guest("A").unwrap();
        let b = f.store.create_guest("B").unwrap();
        let c = f.store.create_guest("C").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 0).unwrap();
        assign_to_specific_seat(&mut f.store, b, f.table, 2).unwrap();

        assert_eq!(assign_to_first_available_seat(&mut f.store, c, f.table), Ok(1));
        assert!(consistent(&f.store));
    }

    #[test]
    fn first_available_rejects_full_table_without_change() {
        let mut f = fixture(1);
        let a = f.store.create_guest("A").unwrap();
        let b = f.store.create_guest("B").unwrap();
        assign_to_first_available_seat(&mut f.store, a, f.table).unwrap();
        let before = f.store.clone();

        let err = assign_to_first_available_seat(&mut f.store, b, f.table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
        assert_eq!(f.store, before);
    }

    #[test]
    fn first_available_moves_guest_between_tables() {
        let mut f = fixture(2);
        let other = f.store.create_table(2, Position::ORIGIN).unwrap();
        let a = f.store.create_guest("A").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 1).unwrap();

        assert_eq!(assign_to_first_available_seat(&mut f.store, a, other), Ok(0));
        assert!(f.store.table(f.table).unwrap().guest_ids.is_empty());
        assert_eq!(f.store.table(other).unwrap().guest_ids, vec![a]);
        assert!(consistent(&f.store));
    }

    #[test]
    fn first_available_full_table_rejects_own_guest() {
        let mut f = fixture(2);
        let a = f.store.create_guest("A").unwrap();
        let b = f.store.create_guest("B").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 0).unwrap();
        assign_to_specific_seat(&mut f.store, b, f.table, 1).unwrap();
        let before = f.store.clone();

        let err = assign_to_first_available_seat(&mut f.store, a, f.table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
        assert_eq!(f.store, before);
    }

    #[test]
    fn first_available_same_table_moves_down_to_lower_seat() {
        let mut f = fixture(3);
        let a = f.store.create_guest("A").unwrap();
        let c = f.store.create_guest("C").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 1).unwrap();
        assign_to_specific_seat(&mut f.store, c, f.table, 2).unwrap();

        assert_eq!(assign_to_first_available_seat(&mut f.store, c, f.table), Ok(0));
        assert_eq!(f.store.guest(c).unwrap().seat_position, Some(0));
        assert_eq!(f.store.table(f.table).unwrap().guest_ids, vec![a, c]);
        assert!(consistent(&f.store));
    }

    #[test]
    fn first_available_same_table_without_lower_seat_is_no_op() {
        let mut f = fixture(3);
        let a = f.store.create_guest("A").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 0).unwrap();
        let before = f.store.clone();

        let err = assign_to_first_available_seat(&mut f.store, a, f.table).unwrap_err();
        assert!(matches!(err, SeatingError::AlreadySeated { .. }));
        assert_eq!(f.store, before);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut f = fixture(3);
        let a = f.store.create_guest("A").unwrap();
        let ghost = GuestId::new();
        assert_eq!(
            assign_to_first_available_seat(&mut f.store, ghost, f.table),
            Err(SeatingError::GuestNotFound(ghost))
        );
        let missing = TableId::new();
        assert_eq!(
            assign_to_specific_seat(&mut f.store, a, missing, 0),
            Err(SeatingError::TableNotFound(missing))
        );
    }

    #[test]
    fn specific_seat_out_of_range() {
        let mut f = fixture(3);
        let a = f.store.create_guest("A").unwrap();
        let err = assign_to_specific_seat(&mut f.store, a, f.table, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(f.store.guest(a).unwrap().table_id.is_none());
    }

    #[test]
    fn unseated_mover_evicts_occupant() {
        let mut f = fixture(2);
        let alice = f.store.create_guest("Alice").unwrap();
        let bob = f.store.create_guest("Bob").unwrap();
        let carol = f.store.create_guest("Carol").unwrap();
        assign_to_specific_seat(&mut f.store, alice, f.table, 0).unwrap();
        assign_to_specific_seat(&mut f.store, bob, f.table, 1).unwrap();

        let placement = assign_to_specific_seat(&mut f.store, carol, f.table, 0).unwrap();
        assert_eq!(placement, Placement::Displaced { displaced: alice });
        assert_eq!(f.store.guest(carol).unwrap().placement(), Some((f.table, 0)));
        assert!(f.store.guest(alice).unwrap().table_id.is_none());
        assert!(f.store.guest(alice).unwrap().seat_position.is_none());
        assert!(!f.store.table(f.table).unwrap().has_guest(alice));
        assert!(consistent(&f.store));
    }

    #[test]
    fn seated_mover_swaps_within_table() {
        let mut f = fixture(3);
        let a = f.store.create_guest("A").unwrap();
        let b = f.store.create_guest("B").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 0).unwrap();
        assign_to_specific_seat(&mut f.store, b, f.table, 2).unwrap();

        let placement = assign_to_specific_seat(&mut f.store, a, f.table, 2).unwrap();
        assert_eq!(
            placement,
            Placement::Swapped {
                displaced: b,
                displaced_to: (f.table, 0)
            }
        );
        assert_eq!(f.store.guest(a).unwrap().seat_position, Some(2));
        assert_eq!(f.store.guest(b).unwrap().seat_position, Some(0));
        assert_eq!(f.store.table(f.table).unwrap().guest_ids.len(), 2);
        assert!(consistent(&f.store));
    }

    #[test]
    fn seated_mover_swaps_across_full_tables() {
        let mut f = fixture(1);
        let other = f.store.create_table(1, Position::ORIGIN).unwrap();
        let a = f.store.create_guest("A").unwrap();
        let b = f.store.create_guest("B").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 0).unwrap();
        assign_to_specific_seat(&mut f.store, b, other, 0).unwrap();

        assign_to_specific_seat(&mut f.store, a, other, 0).unwrap();
        assert_eq!(f.store.guest(a).unwrap().placement(), Some((other, 0)));
        assert_eq!(f.store.guest(b).unwrap().placement(), Some((f.table, 0)));
        assert_eq!(f.store.table(f.table).unwrap().guest_ids, vec![b]);
        assert_eq!(f.store.table(other).unwrap().guest_ids, vec![a]);
        assert!(consistent(&f.store));
    }

    #[test]
    fn dropping_onto_own_seat_is_no_op() {
        let mut f = fixture(2);
        let a = f.store.create_guest("A").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 1).unwrap();
        let before = f.store.clone();
        let err = assign_to_specific_seat(&mut f.store, a, f.table, 1).unwrap_err();
        assert!(err.is_no_op());
        assert_eq!(f.store, before);
    }

    #[test]
    fn moving_to_free_seat_at_same_table() {
        let mut f = fixture(3);
        let a = f.store.create_guest("A").unwrap();
        assign_to_specific_seat(&mut f.store, a, f.table, 0).unwrap();
        assert_eq!(
            assign_to_specific_seat(&mut f.store, a, f.table, 2),
            Ok(Placement::Seated { seat: 2 })
        );
        assert_eq!(f.store.occupied_seats(f.table).into_iter().collect::<Vec<_>>(), vec![2]);
        assert!(consistent(&f.store));
    }

    #[test]
    fn unassign_rules() {
        let mut f = fixture(2);
        let a = f.store.create_guest("A").unwrap();
        assert_eq!(
            unassign_from_table(&mut f.store, a),
            Err(SeatingError::NotSeated(a))
        );
        assign_to_specific_seat(&mut f.store, a, f.table, 1).unwrap();
        assert_eq!(unassign_from_table(&mut f.store, a), Ok(Some((f.table, 1))));
        assert!(f.store.table(f.table).unwrap().guest_ids.is_empty());
        assert!(consistent(&f.store));
    }
}
