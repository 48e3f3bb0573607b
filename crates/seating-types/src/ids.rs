//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Guests and tables each get a distinct id type so a table id can never be
//! passed where a guest id is expected. New ids use UUID v7 (time-ordered);
//! ids loaded from persisted data may be any UUID version.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a guest.
    GuestId
}

define_id! {
    /// Unique identifier for a table.
    TableId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_values() {
        let a = GuestId::new();
        let b = GuestId::new();
        assert_ne!(a, b);
        assert_ne!(TableId::new().into_inner(), Uuid::nil());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = TableId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let restored: TableId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, id);
    }

    #[test]
    fn id_parses_from_display() {
        let id = GuestId::new();
        let parsed: Result<GuestId, _> = id.to_string().parse();
        assert_eq!(parsed.ok(), Some(id));
        assert!("not-a-uuid".parse::<GuestId>().is_err());
    }
}
