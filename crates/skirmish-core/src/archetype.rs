//! Unit archetypes and their base stats.
//!
//! Archetypes are a static data table. Everything that varies per unit
//! (level, effects, health) lives on [`crate::unit::Unit`] and is derived
//! from these values on demand.

use serde::{Deserialize, Serialize};

use crate::unit::StateKind;

/// Animation sequence a state plays.
///
/// The renderer maps `(sequence, frame)` to sprites; the core only needs the
/// frame count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sequence {
    /// Standing still
    Idle,
    /// Walking cycle
    Walk,
    /// Sword swing
    Slash,
    /// Spear thrust
    Thrust,
    /// Bow draw and release
    Shoot,
    /// Spell casting
    SpellCast,
    /// Death animation
    Dying,
    /// Corpse
    Dead,
}

impl Sequence {
    /// Number of frames in the sequence.
    #[must_use]
    pub const fn frame_count(self) -> u32 {
        match self {
            Self::Idle | Self::Dead => 1,
            Self::Walk => 9,
            Self::Slash | Self::Dying => 6,
            Self::Thrust => 8,
            Self::Shoot => 13,
            Self::SpellCast => 7,
        }
    }
}

/// How an attack delivers its damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Instant damage on the impact frame
    Melee,
    /// Spawns a projectile on the impact frame; damage lands on hit
    Projectile,
}

/// Base stats of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Maximum health at level 0
    pub starting_health: f32,
    /// Movement speed in map units per second at level 0
    pub moving_speed: f32,
    /// Line-of-sight radius in map units
    pub line_of_sight: f32,
    /// Damage per hit before effects
    pub baseline_damage: f32,
    /// Attack range in map units, measured between unit edges
    pub attack_range: f32,
    /// Sequence played while attacking
    pub attack_sequence: Sequence,
    /// Frame of the attack sequence on which the hit is dealt
    pub impact_frame: u32,
    /// Melee or projectile
    pub attack_style: AttackStyle,
    /// Hits dealt per impact
    pub attack_repeats: u32,
    /// Frame length of the attack sequence in milliseconds
    pub attack_frame_ms: u32,
}

/// Unit archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// Ranged projectile unit
    Archer,
    /// Sturdy melee unit
    Swordsman,
    /// Melee unit with a little reach
    Spearman,
    /// Fragile ranged caster
    Magician,
}

const ARCHER: UnitStats = UnitStats {
    starting_health: 100.0,
    moving_speed: 2.0,
    line_of_sight: 10.0,
    baseline_damage: 8.0,
    attack_range: 6.0,
    attack_sequence: Sequence::Shoot,
    impact_frame: 9,
    attack_style: AttackStyle::Projectile,
    attack_repeats: 1,
    attack_frame_ms: 50,
};

const SWORDSMAN: UnitStats = UnitStats {
    starting_health: 150.0,
    moving_speed: 1.6,
    line_of_sight: 6.0,
    baseline_damage: 12.0,
    attack_range: 0.5,
    attack_sequence: Sequence::Slash,
    impact_frame: 3,
    attack_style: AttackStyle::Melee,
    attack_repeats: 1,
    attack_frame_ms: 50,
};

const SPEARMAN: UnitStats = UnitStats {
    starting_health: 120.0,
    moving_speed: 1.8,
    line_of_sight: 6.0,
    baseline_damage: 10.0,
    attack_range: 1.0,
    attack_sequence: Sequence::Thrust,
    impact_frame: 4,
    attack_style: AttackStyle::Melee,
    attack_repeats: 1,
    attack_frame_ms: 50,
};

const MAGICIAN: UnitStats = UnitStats {
    starting_health: 80.0,
    moving_speed: 1.6,
    line_of_sight: 9.0,
    baseline_damage: 20.0,
    attack_range: 5.0,
    attack_sequence: Sequence::SpellCast,
    impact_frame: 5,
    attack_style: AttackStyle::Projectile,
    attack_repeats: 1,
    attack_frame_ms: 50,
};

/// Ranges below this are "short"; short-ranged units acquire targets by
/// sight instead of range.
const SHORT_RANGE: f32 = 2.0;

/// Fraction of line of sight used for short-ranged auto-acquisition.
const SIGHT_FRACTION: f32 = 0.7;

impl UnitType {
    /// All archetypes.
    pub const ALL: [UnitType; 4] = [
        UnitType::Archer,
        UnitType::Swordsman,
        UnitType::Spearman,
        UnitType::Magician,
    ];

    /// Base stats for this archetype.
    #[must_use]
    pub const fn stats(self) -> &'static UnitStats {
        match self {
            Self::Archer => &ARCHER,
            Self::Swordsman => &SWORDSMAN,
            Self::Spearman => &SPEARMAN,
            Self::Magician => &MAGICIAN,
        }
    }

    /// Sequence played in a state.
    #[must_use]
    pub const fn sequence_for(self, state: StateKind) -> Sequence {
        match state {
            StateKind::Idle | StateKind::PickingUp => Sequence::Idle,
            StateKind::Walking => Sequence::Walk,
            StateKind::Attacking => self.stats().attack_sequence,
            StateKind::Dying => Sequence::Dying,
        }
    }

    /// Radius within which an idle unit picks a target on its own.
    #[must_use]
    pub fn auto_attack_distance(self) -> f32 {
        let stats = self.stats();
        if stats.attack_range < SHORT_RANGE {
            stats.line_of_sight * SIGHT_FRACTION
        } else {
            stats.attack_range
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_frames_fit_their_sequences() {
        for unit_type in UnitType::ALL {
            let stats = unit_type.stats();
            assert!(stats.impact_frame < stats.attack_sequence.frame_count());
            assert!(stats.attack_repeats >= 1);
        }
    }

    #[test]
    fn ranged_units_fire_projectiles() {
        assert_eq!(UnitType::Archer.stats().attack_style, AttackStyle::Projectile);
        assert_eq!(UnitType::Magician.stats().attack_style, AttackStyle::Projectile);
        assert_eq!(UnitType::Swordsman.stats().attack_style, AttackStyle::Melee);
    }

    #[test]
    fn sequence_mapping() {
        assert_eq!(UnitType::Archer.sequence_for(StateKind::Attacking), Sequence::Shoot);
        assert_eq!(UnitType::Spearman.sequence_for(StateKind::Attacking), Sequence::Thrust);
        assert_eq!(UnitType::Archer.sequence_for(StateKind::Walking), Sequence::Walk);
        assert_eq!(UnitType::Magician.sequence_for(StateKind::Dying), Sequence::Dying);
        assert_eq!(UnitType::Swordsman.sequence_for(StateKind::PickingUp), Sequence::Idle);
    }

    #[test]
    fn auto_attack_distance_uses_sight_for_short_range() {
        assert!((UnitType::Swordsman.auto_attack_distance() - 4.2).abs() < 1e-5);
        assert!((UnitType::Archer.auto_attack_distance() - 6.0).abs() < 1e-5);
    }
}
