//! Identifiers and lightweight battlefield entities.
//!
//! Units and items refer to each other only through these ids. A handle is
//! resolved against the world at the moment it is used and may be dangling
//! (the entity was removed), which callers treat as "target lost".
//!
//! - [`UnitId`]: identifier of a unit in the battlefield's unit table
//! - [`ItemId`]: identifier of an item lying on the map
//! - [`components`]: projectiles, visual effects, dead markers and items

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{DeadMarker, Item, Projectile, StaticEffect, StaticEffectKind};

/// Unique identifier for a unit.
///
/// Ids are assigned monotonically by the battlefield and never reused, so the
/// natural ordering doubles as the per-tick update order.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::UnitId;
///
/// let a = UnitId::new(1);
/// let b = UnitId::new(2);
///
/// assert!(a < b);
/// assert_eq!(a.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u64);

impl UnitId {
    /// Creates a new `UnitId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UnitId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<UnitId> for u64 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

/// Unique identifier for an item.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates a new `ItemId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod unit_id_tests {
        use super::*;

        #[test]
        fn ordering_follows_value() {
            let mut ids = vec![UnitId::new(5), UnitId::new(1), UnitId::new(3)];
            ids.sort();
            assert_eq!(ids, vec![UnitId::new(1), UnitId::new(3), UnitId::new(5)]);
        }

        #[test]
        fn debug_and_display() {
            let id = UnitId::new(42);
            assert_eq!(format!("{id:?}"), "UnitId(42)");
            assert_eq!(format!("{id}"), "42");
        }

        #[test]
        fn conversions() {
            let id: UnitId = 7.into();
            let raw: u64 = id.into();
            assert_eq!(raw, 7);
        }

        #[test]
        fn serialization_roundtrip() {
            let id = UnitId::new(9);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "9");
            let deserialized: UnitId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, deserialized);
        }
    }

    mod item_id_tests {
        use super::*;

        #[test]
        fn debug_and_display() {
            let id = ItemId::from(3);
            assert_eq!(format!("{id:?}"), "ItemId(3)");
            assert_eq!(id.to_string(), "3");
        }
    }
}
