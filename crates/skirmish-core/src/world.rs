//! The surroundings a unit ticks against.
//!
//! During its own tick a unit is held outside the world's unit table, so
//! [`World::unit`] never returns the unit that is currently ticking. Every
//! cross-unit lookup goes through an id and tolerates the id being gone.

use glam::{IVec2, Vec2};
use waypoint::{Path, Pathfinder};

use crate::entity::{Item, ItemId, Projectile, StaticEffect, UnitId};
use crate::unit::Unit;

/// Services a unit needs from the battlefield.
pub trait World {
    /// Whether a grid cell can be walked on.
    fn is_passable(&self, cell: IVec2) -> bool;

    /// Plan a path over this world's passability.
    fn find_path(&self, start: Vec2, goal: Vec2) -> Path {
        Pathfinder::default().find_path(|cell| self.is_passable(cell), start, goal)
    }

    /// Look up a unit.
    fn unit(&self, id: UnitId) -> Option<&Unit>;

    /// Look up a unit for mutation.
    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit>;

    /// Ids of all units in the table, ascending.
    fn unit_ids(&self) -> Vec<UnitId>;

    /// Look up an item lying on the map.
    fn item(&self, id: ItemId) -> Option<&Item>;

    /// Remove an item from the map and hand it over.
    fn take_item(&mut self, id: ItemId) -> Option<Item>;

    /// Launch a projectile.
    fn add_projectile(&mut self, projectile: Projectile);

    /// Show a visual effect.
    fn add_static_entity(&mut self, effect: StaticEffect);

    /// A unit's death animation has finished.
    fn on_entity_death(&mut self, id: UnitId);
}
