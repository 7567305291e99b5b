//! Non-unit battlefield entities.
//!
//! These are owned by the battlefield and carry no behaviour beyond simple
//! movement and expiry:
//!
//! - [`Projectile`]: damage in flight from a ranged attack
//! - [`StaticEffect`]: short-lived visual such as a heal sparkle
//! - [`DeadMarker`]: what remains of a unit after its death animation
//! - [`Item`]: a usable lying on the map, waiting for a hero

use glam::Vec2;
use serde::{Deserialize, Serialize};
use waypoint::MapSize;

use super::{ItemId, UnitId};
use crate::archetype::UnitType;
use crate::team::Team;
use crate::timer::Countdown;
use crate::usable::Usable;

/// Homing projectile fired by a ranged unit.
///
/// Damage is fixed at launch; the shooter may die while it is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Unit that fired it
    pub source: UnitId,
    /// Unit it is homing on
    pub target: UnitId,
    /// Current map position
    pub position: Vec2,
    /// Damage dealt on hit
    pub damage: f32,
}

impl Projectile {
    /// Create a projectile leaving `position` towards `target`.
    #[must_use]
    pub const fn aimed(source: UnitId, target: UnitId, position: Vec2, damage: f32) -> Self {
        Self {
            source,
            target,
            position,
            damage,
        }
    }

    /// Fly towards `aim` for `dt` milliseconds at `speed` units per second.
    ///
    /// Returns true when the projectile ends within `hit_radius` of `aim`.
    pub fn advance_towards(&mut self, aim: Vec2, dt: u32, speed: f32, hit_radius: f32) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let budget = speed * dt as f32 / 1000.0;
        let offset = aim - self.position;
        let distance = offset.length();
        if distance <= budget {
            self.position = aim;
        } else {
            self.position += offset / distance * budget;
        }
        self.position.distance(aim) <= hit_radius
    }
}

/// Kind of a [`StaticEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticEffectKind {
    /// Shown on a healed unit
    Heal,
    /// Shown where a lightning bolt struck
    Lightning,
}

/// Short-lived visual effect pinned to a map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticEffect {
    /// What to draw
    pub kind: StaticEffectKind,
    /// Centre on the map
    pub position: Vec2,
    /// Extent on the map
    pub size: MapSize,
    /// Time left before removal
    pub remaining: Countdown,
}

impl StaticEffect {
    /// Create a running effect that lasts `lifetime_ms`.
    #[must_use]
    pub const fn new(kind: StaticEffectKind, position: Vec2, size: MapSize, lifetime_ms: u32) -> Self {
        Self {
            kind,
            position,
            size,
            remaining: Countdown::started(lifetime_ms),
        }
    }

    /// Advance its lifetime. Returns true once it should be removed.
    pub fn tick(&mut self, dt: u32) -> bool {
        self.remaining.tick(dt);
        self.remaining.is_finished()
    }
}

/// Corpse left behind once a unit's death animation has played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadMarker {
    /// Unit that died
    pub unit: UnitId,
    /// Its archetype, for choosing the sprite
    pub unit_type: UnitType,
    /// Its team
    pub team: Team,
    /// Centre at the moment of death
    pub position: Vec2,
    /// Size at the moment of death
    pub size: MapSize,
}

/// Usable lying on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier
    pub id: ItemId,
    /// Map position
    pub position: Vec2,
    /// What using it does
    pub usable: Usable,
}

impl Item {
    /// Create an item at `position`.
    #[must_use]
    pub fn new(id: ItemId, position: Vec2, usable: Usable) -> Self {
        Self { id, position, usable }
    }
}
