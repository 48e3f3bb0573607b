//! Bounded snapshot history for undo/redo.
//!
//! [`History`] keeps a linear sequence of full [`SeatingState`] snapshots
//! and a cursor pointing at the one that matches the live state. Snapshot 0
//! is the state the engine started from. After each successful command the
//! new state is committed: anything after the cursor (the redo tail) is
//! discarded, the snapshot is appended, and the cursor moves onto it. The
//! state before the command therefore stays one step back.
//!
//! When the sequence exceeds its limit the oldest snapshot is evicted and
//! the cursor stays on the last index.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use seating_types::SeatingState;

/// Number of snapshots kept when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One entry in the history.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// The complete state after the command ran.
    pub state: SeatingState,
    /// The command that produced the state (`"initial"` for snapshot 0).
    pub label: &'static str,
    /// When the checkpoint was taken.
    pub recorded_at: DateTime<Utc>,
}

impl Checkpoint {
    fn new(state: SeatingState, label: &'static str) -> Self {
        Self {
            state,
            label,
            recorded_at: Utc::now(),
        }
    }
}

/// Linear undo/redo history of full-state snapshots.
#[derive(Debug, Clone)]
pub struct History {
    checkpoints: VecDeque<Checkpoint>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start a history whose only snapshot is `initial`.
    ///
    /// A `limit` of zero is treated as one.
    pub fn new(initial: SeatingState, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut checkpoints = VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT));
        checkpoints.push_back(Checkpoint::new(initial, "initial"));
        Self {
            checkpoints,
            cursor: 0,
            limit,
        }
    }

    /// Commit the state produced by a command.
    pub fn record(&mut self, state: SeatingState, label: &'static str) {
        self.checkpoints.truncate(self.cursor.saturating_add(1));
        self.checkpoints.push_back(Checkpoint::new(state, label));
        while self.checkpoints.len() > self.limit {
            self.checkpoints.pop_front();
        }
        self.cursor = self.checkpoints.len().saturating_sub(1);
    }

    /// Step back one snapshot, returning the state to restore.
    ///
    /// Returns `None` at the earliest snapshot.
    pub fn undo(&mut self) -> Option<&SeatingState> {
        let target = self.cursor.checked_sub(1)?;
        self.cursor = target;
        self.checkpoints.get(target).map(|c| &c.state)
    }

    /// Step forward one snapshot, returning the state to restore.
    ///
    /// Returns `None` at the latest snapshot.
    pub fn redo(&mut self) -> Option<&SeatingState> {
        let target = self.cursor.checked_add(1)?;
        let checkpoint = self.checkpoints.get(target)?;
        self.cursor = target;
        Some(&checkpoint.state)
    }

    /// Whether [`History::undo`] would do anything.
    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`History::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        self.cursor.saturating_add(1) < self.checkpoints.len()
    }

    /// The checkpoint matching the live state.
    pub fn current(&self) -> Option<&Checkpoint> {
        self.checkpoints.get(self.cursor)
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether no snapshots are held. Never true after construction.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Index of the live snapshot.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of snapshots held.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Labels of all snapshots, oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checkpoints.iter().map(|c| c.label)
    }
}
