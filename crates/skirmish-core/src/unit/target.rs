//! What a unit is moving towards, and what it becomes on arrival.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{ItemId, UnitId};
use crate::world::World;

/// Items closer than this can be picked up.
pub const PICKUP_RADIUS: f32 = 2.0;

/// Movement, attack or pickup order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Walk to a fixed map point, then idle.
    Point(Vec2),
    /// Chase a unit, then attack it.
    Unit(UnitId),
    /// Walk to an item, then pick it up (heroes only).
    Item(ItemId),
}

impl Target {
    /// Current destination, re-sampled from the world.
    ///
    /// `None` means the target is lost: the unit died or was removed, or the
    /// item is gone.
    #[must_use]
    pub fn destination(&self, world: &dyn World) -> Option<Vec2> {
        match *self {
            Self::Point(point) => Some(point),
            Self::Unit(id) => world
                .unit(id)
                .filter(|unit| !unit.is_dead())
                .map(super::Unit::position),
            Self::Item(id) => world.item(id).map(|item| item.position),
        }
    }
}
