//! Error types for the `seating-core` crate.
//!
//! Every engine command returns [`SeatingError`] on rejection. None of them
//! are fatal: the state is left exactly as it was and the caller decides
//! whether to surface a message. [`ErrorKind`] groups variants into the four
//! categories the presentation layer reacts to.

use seating_types::{GuestId, TableId};

/// Broad category of a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty or invalid input.
    Validation,
    /// A referenced guest or table does not exist.
    NotFound,
    /// The assignment would exceed a table's capacity.
    TableFull,
    /// The command would not change anything.
    NoOp,
}

/// Reasons an engine command is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatingError {
    /// A guest name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// A table capacity was zero.
    #[error("invalid table capacity {capacity} (must be at least 1)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: u32,
    },

    /// A seat index is outside the table's seat ring.
    #[error("seat {seat} is out of range for table {table} (capacity {capacity})")]
    SeatOutOfRange {
        /// The target table.
        table: TableId,
        /// The requested zero-based seat.
        seat: u32,
        /// The table's capacity.
        capacity: u32,
    },

    /// A table position has an infinite or NaN coordinate.
    #[error("{operation} would leave a table at a non-finite position")]
    NonFinitePosition {
        /// Name of the operation.
        operation: &'static str,
    },

    /// No guest with this id exists.
    #[error("guest not found: {0}")]
    GuestNotFound(GuestId),

    /// No table with this id exists.
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    /// Every seat at the table is taken.
    #[error("table {table} is full ({capacity} seats)")]
    TableFull {
        /// The full table.
        table: TableId,
        /// Its capacity.
        capacity: u32,
    },

    /// The operation would leave the state unchanged.
    #[error("{operation} would not change anything")]
    Unchanged {
        /// Name of the operation.
        operation: &'static str,
    },

    /// The guest already sits at the requested table.
    #[error("guest {guest} is already seated at table {table}")]
    AlreadySeated {
        /// The guest.
        guest: GuestId,
        /// The table.
        table: TableId,
    },

    /// The guest has no table to leave.
    #[error("guest {0} is not seated")]
    NotSeated(GuestId),

    /// The history cursor is at the earliest snapshot.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The history cursor is at the latest snapshot.
    #[error("nothing to redo")]
    NothingToRedo,

    /// An import payload contained no guest names.
    #[error("import contained no guest names")]
    NothingImported,
}

impl SeatingError {
    /// Category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName
            | Self::InvalidCapacity { .. }
            | Self::SeatOutOfRange { .. }
            | Self::NonFinitePosition { .. } => ErrorKind::Validation,
            Self::GuestNotFound(_) | Self::TableNotFound(_) => ErrorKind::NotFound,
            Self::TableFull { .. } => ErrorKind::TableFull,
            Self::Unchanged { .. }
            | Self::AlreadySeated { .. }
            | Self::NotSeated(_)
            | Self::NothingToUndo
            | Self::NothingToRedo
            | Self::NothingImported => ErrorKind::NoOp,
        }
    }

    /// Whether the rejection only means "nothing to do".
    pub const fn is_no_op(&self) -> bool {
        matches!(self.kind(), ErrorKind::NoOp)
    }
}
