//! Enumeration types for the seating data model.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Physical outline of a table on the canvas.
///
/// Shape only affects rendering; seat numbering is the same ring for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TableShape {
    /// Round table, seats evenly spaced on a circle.
    #[default]
    Round,
    /// Rectangular table, seats along the long edges.
    Rectangular,
}
