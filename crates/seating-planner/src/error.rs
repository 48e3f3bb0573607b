//! Error types for the planner binary.
//!
//! [`PlannerError`] covers startup failures and ends the process.
//! [`CommandError`] covers a single rejected shell line; the shell prints it
//! and keeps going.

use std::path::PathBuf;

use seating_core::SeatingError;

/// Top-level error for the planner binary.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: seating_core::ConfigError,
    },

    /// Opening or writing storage failed.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: seating_db::DbError,
    },

    /// Reading commands or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Why one shell command was not carried out.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A double quote was opened and never closed.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// The first word is not a known command.
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// Wrong number or shape of arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An argument that should be a number is not one.
    #[error("not a valid number: {0:?}")]
    InvalidNumber(String),

    /// Seat numbers in the shell start at 1.
    #[error("seat numbers start at 1")]
    SeatNumberZero,

    /// Requested capacity is above the configured maximum.
    #[error("capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge {
        /// The requested capacity.
        capacity: u32,
        /// The configured maximum.
        max: u32,
    },

    /// No guest or table matches a reference.
    #[error("no {kind} matches {reference:?}")]
    NoMatch {
        /// `"guest"` or `"table"`.
        kind: &'static str,
        /// The reference as typed.
        reference: String,
    },

    /// Several guests or tables share the referenced name.
    #[error("{count} {kind}s are named {reference:?}; use the id instead")]
    Ambiguous {
        /// `"guest"` or `"table"`.
        kind: &'static str,
        /// The reference as typed.
        reference: String,
        /// How many matched.
        count: usize,
    },

    /// An import file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        /// The file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The engine rejected the command.
    #[error(transparent)]
    Seating(#[from] SeatingError),
}
