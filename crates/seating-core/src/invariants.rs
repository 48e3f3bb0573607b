//! Structural invariants of the seating relation, and repair of untrusted
//! state.
//!
//! The engine keeps these true after every command:
//!
//! | Rule | Statement |
//! |------|-----------|
//! | Membership | `guest.table_id == Some(t)` iff the guest is listed in exactly one table's `guest_ids`, and that table is `t` |
//! | Unique seats | no two guests at a table share a seat |
//! | Seat range | a seat index is below the table's capacity |
//! | Capacity | a table lists at most `capacity` guests |
//! | Pairing | `table_id` and `seat_position` are both present or both absent |
//!
//! [`verify`] reports violations without changing anything. [`repair`]
//! rewrites persisted state that breaks the rules so the engine can adopt
//! it; guest-side fields win over table lists.

use std::collections::{BTreeMap, BTreeSet};

use seating_types::{GuestId, SeatingState, TableId};

/// A single broken rule found by [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A guest references a table that does not exist.
    DanglingTable {
        /// The guest.
        guest: GuestId,
        /// The missing table.
        table: TableId,
    },
    /// A guest references a table that does not list them.
    NotListed {
        /// The guest.
        guest: GuestId,
        /// The table they claim.
        table: TableId,
    },
    /// A table lists a guest that does not reference it (or does not exist).
    StrayListing {
        /// The table.
        table: TableId,
        /// The listed guest.
        guest: GuestId,
    },
    /// A table lists the same guest twice.
    DuplicateListing {
        /// The table.
        table: TableId,
        /// The repeated guest.
        guest: GuestId,
    },
    /// Two guests hold the same seat.
    SeatCollision {
        /// The table.
        table: TableId,
        /// The contested seat.
        seat: u32,
    },
    /// A seat index is at or above the table's capacity.
    SeatOutOfRange {
        /// The guest.
        guest: GuestId,
        /// Their seat.
        seat: u32,
        /// The table's capacity.
        capacity: u32,
    },
    /// A table lists more guests than it has seats.
    OverCapacity {
        /// The table.
        table: TableId,
        /// Number of listed guests.
        listed: usize,
        /// Its capacity.
        capacity: u32,
    },
    /// A guest has a table without a seat or a seat without a table.
    HalfPlaced {
        /// The guest.
        guest: GuestId,
    },
    /// A table has no seats at all.
    ZeroCapacity {
        /// The table.
        table: TableId,
    },
}

/// Check every rule, returning all violations found.
///
/// An empty vector means the state is consistent.
pub fn verify(state: &SeatingState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let capacities: BTreeMap<TableId, u32> =
        state.tables.iter().map(|t| (t.id, t.capacity)).collect();
    let claimed: BTreeMap<GuestId, Option<TableId>> =
        state.guests.iter().map(|g| (g.id, g.table_id)).collect();

    for table in &state.tables {
        if table.capacity == 0 {
            violations.push(InvariantViolation::ZeroCapacity { table: table.id });
        }
        if table.guest_ids.len() > usize::try_from(table.capacity).unwrap_or(usize::MAX) {
            violations.push(InvariantViolation::OverCapacity {
                table: table.id,
                listed: table.guest_ids.len(),
                capacity: table.capacity,
            });
        }
        let mut seen = BTreeSet::new();
        for guest in &table.guest_ids {
            if !seen.insert(*guest) {
                violations.push(InvariantViolation::DuplicateListing {
                    table: table.id,
                    guest: *guest,
                });
            }
            if claimed.get(guest).copied().flatten() != Some(table.id) {
                violations.push(InvariantViolation::StrayListing {
                    table: table.id,
                    guest: *guest,
                });
            }
        }
    }

    let mut seats_taken: BTreeSet<(TableId, u32)> = BTreeSet::new();
    for guest in &state.guests {
        if guest.table_id.is_some() != guest.seat_position.is_some() {
            violations.push(InvariantViolation::HalfPlaced { guest: guest.id });
        }
        let Some(table_id) = guest.table_id else {
            continue;
        };
        let Some(capacity) = capacities.get(&table_id).copied() else {
            violations.push(InvariantViolation::DanglingTable {
                guest: guest.id,
                table: table_id,
            });
            continue;
        };
        let listed = state
            .tables
            .iter()
            .any(|t| t.id == table_id && t.has_guest(guest.id));
        if !listed {
            violations.push(InvariantViolation::NotListed {
                guest: guest.id,
                table: table_id,
            });
        }
        if let Some(seat) = guest.seat_position {
            if seat >= capacity {
                violations.push(InvariantViolation::SeatOutOfRange {
                    guest: guest.id,
                    seat,
                    capacity,
                });
            }
            if !seats_taken.insert((table_id, seat)) {
                violations.push(InvariantViolation::SeatCollision {
                    table: table_id,
                    seat,
                });
            }
        }
    }

    violations
}

/// Rewrite `state` so that [`verify`] finds nothing.
///
/// Zero capacities become 1. Guests keep a valid, uncontested seat; guests
/// with a missing, out-of-range, or contested seat at an existing table get
/// the lowest free seat if one is left, and are unassigned otherwise. Table
/// lists keep the order of their valid entries, with newly seated guests
/// appended. Guests are never deleted.
///
/// Returns the number of individual fixes applied.
pub fn repair(state: &mut SeatingState) -> usize {
    let mut fixes: usize = 0;

    for table in &mut state.tables {
        if table.capacity == 0 {
            table.capacity = 1;
            fixes = fixes.saturating_add(1);
        }
    }
    let capacities: BTreeMap<TableId, u32> =
        state.tables.iter().map(|t| (t.id, t.capacity)).collect();

    // Pass 1: keep valid, uncontested seats in guest order.
    let mut taken: BTreeSet<(TableId, u32)> = BTreeSet::new();
    let mut needs_seat: Vec<usize> = Vec::new();
    for (index, guest) in state.guests.iter_mut().enumerate() {
        let Some(table_id) = guest.table_id else {
            if guest.seat_position.take().is_some() {
                fixes = fixes.saturating_add(1);
            }
            continue;
        };
        let Some(capacity) = capacities.get(&table_id).copied() else {
            guest.table_id = None;
            guest.seat_position = None;
            fixes = fixes.saturating_add(1);
            continue;
        };
        match guest.seat_position {
            Some(seat) if seat < capacity && taken.insert((table_id, seat)) => {}
            _ => needs_seat.push(index),
        }
    }

    // Pass 2: re-seat or unassign the rest.
    for index in needs_seat {
        let Some(guest) = state.guests.get_mut(index) else {
            continue;
        };
        fixes = fixes.saturating_add(1);
        let free = guest.table_id.and_then(|table_id| {
            let capacity = capacities.get(&table_id).copied()?;
            (0..capacity)
                .find(|seat| !taken.contains(&(table_id, *seat)))
                .map(|seat| (table_id, seat))
        });
        if let Some((table_id, seat)) = free {
            taken.insert((table_id, seat));
            guest.seat_position = Some(seat);
        } else {
            guest.table_id = None;
            guest.seat_position = None;
        }
    }

    // Rebuild table lists from the guest side.
    let mut members: BTreeMap<TableId, Vec<GuestId>> = BTreeMap::new();
    for guest in &state.guests {
        if let Some(table_id) = guest.table_id {
            members.entry(table_id).or_default().push(guest.id);
        }
    }
    for table in &mut state.tables {
        let expected = members.remove(&table.id).unwrap_or_default();
        let expected_set: BTreeSet<GuestId> = expected.iter().copied().collect();
        let mut seen = BTreeSet::new();
        let mut rebuilt: Vec<GuestId> = table
            .guest_ids
            .iter()
            .copied()
            .filter(|id| expected_set.contains(id) && seen.insert(*id))
            .collect();
        rebuilt.extend(expected.into_iter().filter(|id| seen.insert(*id)));
        if rebuilt != table.guest_ids {
            fixes = fixes.saturating_add(1);
            table.guest_ids = rebuilt;
        }
    }

    fixes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use seating_types::{Guest, Position, Table};

    use super::*;

    fn seated(name: &str, table: TableId, seat: Option<u32>) -> Guest {
        let mut guest = Guest::new(name);
        guest.table_id = Some(table);
        guest.seat_position = seat;
        guest
    }

    #[test]
    fn empty_state_is_consistent() {
        assert!(verify(&SeatingState::default()).is_empty());
    }

    #[test]
    fn detects_unlisted_and_stray_guests() {
        let mut table = Table::new("T", 2, Position::ORIGIN);
        let guest = seated("A", table.id, Some(0));
        let ghost = GuestId::new();
        table.guest_ids.push(ghost);
        let state = SeatingState::new(vec![guest.clone()], vec![table.clone()]);

        let violations = verify(&state);
        assert!(violations.contains(&InvariantViolation::NotListed {
            guest: guest.id,
            table: table.id
        }));
        assert!(violations.contains(&InvariantViolation::StrayListing {
            table: table.id,
            guest: ghost
        }));
    }

    #[test]
    fn detects_collisions_and_range() {
        let mut table = Table::new("T", 2, Position::ORIGIN);
        let a = seated("A", table.id, Some(1));
        let b = seated("B", table.id, Some(1));
        let c = seated("C", table.id, Some(5));
        table.guest_ids = vec![a.id, b.id, c.id];
        let state = SeatingState::new(vec![a, b, c], vec![table.clone()]);

        let violations = verify(&state);
        assert!(violations.contains(&InvariantViolation::SeatCollision {
            table: table.id,
            seat: 1
        }));
        assert!(violations.iter().any(|v| matches!(v, InvariantViolation::SeatOutOfRange { .. })));
        assert!(violations.iter().any(|v| matches!(v, InvariantViolation::OverCapacity { .. })));
    }

    #[test]
    fn repair_reseats_contested_and_unassigns_overflow() {
        let mut table = Table::new("T", 2, Position::ORIGIN);
        let a = seated("A", table.id, Some(0));
        let b = seated("B", table.id, Some(0));
        let c = seated("C", table.id, None);
        table.guest_ids = vec![c.id, a.id];
        let (a_id, b_id, c_id) = (a.id, b.id, c.id);
        let mut state = SeatingState::new(vec![a, b, c], vec![table]);

        let fixes = repair(&mut state);
        assert!(fixes > 0);
        assert!(verify(&state).is_empty());

        let by_id = |id: GuestId| state.guests.iter().find(|g| g.id == id).unwrap();
        assert_eq!(by_id(a_id).seat_position, Some(0));
        assert_eq!(by_id(b_id).seat_position, Some(1));
        assert!(by_id(c_id).table_id.is_none());
        // Existing valid entries keep their order, new ones are appended.
        assert_eq!(state.tables.first().unwrap().guest_ids, vec![a_id, b_id]);
    }

    #[test]
    fn repair_handles_dangling_tables_and_zero_capacity() {
        let mut table = Table::new("T", 0, Position::ORIGIN);
        table.guest_ids.push(GuestId::new());
        let lost = seated("Lost", TableId::new(), Some(0));
        let mut state = SeatingState::new(vec![lost], vec![table]);

        repair(&mut state);
        assert!(verify(&state).is_empty());
        assert_eq!(state.tables.first().unwrap().capacity, 1);
        assert!(state.tables.first().unwrap().guest_ids.is_empty());
        assert!(state.guests.first().unwrap().table_id.is_none());
    }

    #[test]
    fn repair_leaves_consistent_state_alone() {
        let mut table = Table::new("T", 3, Position::ORIGIN);
        let a = seated("A", table.id, Some(2));
        table.guest_ids.push(a.id);
        let mut state = SeatingState::new(vec![a, Guest::new("B")], vec![table]);
        let before = state.clone();

        assert_eq!(repair(&mut state), 0);
        assert_eq!(state, before);
    }
}
