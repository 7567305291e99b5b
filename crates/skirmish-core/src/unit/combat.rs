//! Attack dispatch.
//!
//! Damage bookkeeping itself (kills, level-ups) lives on
//! [`Unit::take_damage`]; this module decides how an attack delivers it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::Unit;
use crate::archetype::AttackStyle;
use crate::entity::{Projectile, UnitId};
use crate::error::Result;
use crate::world::World;

/// Result of [`Unit::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// The unit was already dead.
    Ignored,
    /// Health dropped but the unit survived.
    Damaged,
    /// This hit killed the unit.
    Killed,
}

/// Deliver one impact of `attacker`'s attack on `target`.
///
/// Repeats as many times as the archetype says, stopping early if the
/// attacker has died or the target is dead or gone. Projectile archetypes
/// hand a projectile to the world; melee archetypes deal damage at once.
///
/// # Errors
///
/// Propagates errors from [`Unit::take_damage`].
pub fn perform_attack(attacker: &mut Unit, target: UnitId, world: &mut dyn World) -> Result<()> {
    let stats = attacker.unit_type().stats();
    for _ in 0..stats.attack_repeats {
        if attacker.is_dead() {
            break;
        }
        let damage = attacker.damage_amount();
        match stats.attack_style {
            AttackStyle::Projectile => {
                if world.unit(target).map_or(true, Unit::is_dead) {
                    break;
                }
                trace!(attacker = %attacker.id(), %target, damage, "projectile launched");
                world.add_projectile(Projectile::aimed(attacker.id(), target, attacker.position(), damage));
            }
            AttackStyle::Melee => {
                let Some(foe) = world.unit_mut(target) else {
                    break;
                };
                if foe.take_damage(damage, Some(&mut *attacker))? != DamageOutcome::Damaged {
                    break;
                }
            }
        }
    }
    Ok(())
}
