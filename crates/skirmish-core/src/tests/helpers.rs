//! Factories for battlefields and units used across the scenario tests.

use glam::Vec2;
use waypoint::Grid;

use crate::archetype::UnitType;
use crate::battlefield::Battlefield;
use crate::config::BattlefieldConfig;
use crate::entity::UnitId;
use crate::team::Team;
use crate::unit::Unit;

// =============================================================================
// Battlefield Setup
// =============================================================================

/// Open battlefield of `size` x `size` cells with the default 50 ms tick.
pub fn open_field(size: u32) -> Battlefield {
    Battlefield::new(BattlefieldConfig::default(), Grid::open(size, size))
}

/// Spawn a unit that never picks fights on its own.
///
/// Used as a target dummy so that scenarios only contain the fights they set
/// up explicitly.
pub fn spawn_passive(field: &mut Battlefield, unit_type: UnitType, team: Team, position: Vec2) -> UnitId {
    field.spawn_with(|id| Unit::new(id, unit_type, team, position).with_auto_acquire(false))
}

/// Step the battlefield `ticks` times, failing the test on any error.
pub fn run(field: &mut Battlefield, ticks: usize) {
    for _ in 0..ticks {
        field.step().expect("tick failed");
    }
}

/// Step until `done` holds or `limit` ticks have run. Returns the ticks taken.
pub fn run_until(field: &mut Battlefield, limit: usize, mut done: impl FnMut(&Battlefield) -> bool) -> Option<usize> {
    for tick in 0..limit {
        if done(field) {
            return Some(tick);
        }
        field.step().expect("tick failed");
    }
    done(field).then_some(limit)
}

// =============================================================================
// Unit Queries
// =============================================================================

/// Health of a unit still on the battlefield.
pub fn health(field: &Battlefield, id: UnitId) -> f32 {
    field.unit(id).expect("unit not on battlefield").health()
}
