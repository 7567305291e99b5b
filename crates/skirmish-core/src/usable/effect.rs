//! Time-boxed stat modifiers.
//!
//! An [`Effect`] belongs to exactly one unit. It may mutate that unit once
//! when attached (start), continuously while active (tick), and it folds the
//! unit's damage, speed and range while it lives. Expired effects are purged
//! by the owning unit after every tick.

use serde::{Deserialize, Serialize};

use crate::entity::UnitId;
use crate::timer::Countdown;

/// Stats an effect can modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Damage per hit
    Damage,
    /// Movement speed
    Speed,
    /// Attack range
    Range,
}

/// What an effect does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Restore health once, on start.
    Heal {
        /// Health restored
        amount: f32,
    },
    /// Restore health continuously.
    Regenerate {
        /// Health restored per second of active time
        per_second: f32,
    },
    /// Add to damage per hit.
    DamageBonus {
        /// Added damage
        amount: f32,
    },
    /// Scale damage per hit.
    DamageMultiplier {
        /// Damage factor
        factor: f32,
    },
    /// Scale movement speed.
    SpeedMultiplier {
        /// Speed factor
        factor: f32,
    },
    /// Add to attack range.
    RangeBonus {
        /// Added range
        amount: f32,
    },
    /// Strike once for this much damage, credited to the caster. Applied
    /// through [`crate::unit::Unit::take_damage`] on use, never attached.
    Damage {
        /// Damage dealt
        amount: f32,
    },
}

impl EffectKind {
    /// Whether this kind heals its target.
    #[must_use]
    pub const fn is_heal(&self) -> bool {
        matches!(self, Self::Heal { .. } | Self::Regenerate { .. })
    }
}

/// Active modifier attached to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    target: UnitId,
    timer: Countdown,
    kind: EffectKind,
}

impl Effect {
    /// Create an effect for `target` lasting `duration_ms`.
    ///
    /// A zero duration makes a one-shot effect: it applies its start hook
    /// and expires immediately.
    #[must_use]
    pub const fn new(target: UnitId, duration_ms: u32, kind: EffectKind) -> Self {
        Self {
            target,
            timer: Countdown::new(duration_ms),
            kind,
        }
    }

    /// Unit the effect was built for.
    #[must_use]
    pub const fn target(&self) -> UnitId {
        self.target
    }

    /// Effect kind.
    #[must_use]
    pub const fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Time left in milliseconds.
    #[must_use]
    pub const fn remaining_ms(&self) -> u32 {
        self.timer.remaining_ms()
    }

    /// Start the countdown and return the health restored immediately.
    pub fn start(&mut self) -> f32 {
        self.timer.restart();
        match self.kind {
            EffectKind::Heal { amount } => amount,
            _ => 0.0,
        }
    }

    /// Advance by `dt` milliseconds and return the health restored over the
    /// active part of that interval.
    pub fn tick(&mut self, dt: u32) -> f32 {
        let active_ms = dt.min(self.timer.remaining_ms());
        self.timer.tick(dt);
        match self.kind {
            #[allow(clippy::cast_precision_loss)]
            EffectKind::Regenerate { per_second } => per_second * active_ms as f32 / 1000.0,
            _ => 0.0,
        }
    }

    /// Fold a stat value through this effect.
    #[must_use]
    pub fn modify(&self, stat: Stat, value: f32) -> f32 {
        match (stat, self.kind) {
            (Stat::Damage, EffectKind::DamageBonus { amount })
            | (Stat::Range, EffectKind::RangeBonus { amount }) => value + amount,
            (Stat::Damage, EffectKind::DamageMultiplier { factor })
            | (Stat::Speed, EffectKind::SpeedMultiplier { factor }) => value * factor,
            _ => value,
        }
    }

    /// True once the countdown has elapsed.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.timer.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> UnitId {
        UnitId::new(1)
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn zero_duration_heal_is_one_shot() {
            let mut effect = Effect::new(unit(), 0, EffectKind::Heal { amount: 25.0 });
            assert!((effect.start() - 25.0).abs() < f32::EPSILON);
            assert!(effect.is_expired());
        }

        #[test]
        fn timed_effect_expires_after_duration() {
            let mut effect = Effect::new(unit(), 300, EffectKind::DamageBonus { amount: 5.0 });
            effect.start();
            assert!(!effect.is_expired());
            effect.tick(200);
            assert!(!effect.is_expired());
            effect.tick(100);
            assert!(effect.is_expired());
        }

        #[test]
        fn regeneration_only_counts_active_time() {
            let mut effect = Effect::new(unit(), 1500, EffectKind::Regenerate { per_second: 10.0 });
            assert!(effect.start().abs() < f32::EPSILON);
            assert!((effect.tick(1000) - 10.0).abs() < 1e-5);
            // Only 500 ms of the next second are still active
            assert!((effect.tick(1000) - 5.0).abs() < 1e-5);
            assert!(effect.tick(1000).abs() < f32::EPSILON);
        }
    }

    mod modifier_tests {
        use super::*;

        #[test]
        fn modifiers_touch_only_their_stat() {
            let bonus = Effect::new(unit(), 100, EffectKind::DamageBonus { amount: 3.0 });
            assert!((bonus.modify(Stat::Damage, 10.0) - 13.0).abs() < f32::EPSILON);
            assert!((bonus.modify(Stat::Speed, 10.0) - 10.0).abs() < f32::EPSILON);

            let haste = Effect::new(unit(), 100, EffectKind::SpeedMultiplier { factor: 1.5 });
            assert!((haste.modify(Stat::Speed, 2.0) - 3.0).abs() < f32::EPSILON);
            assert!((haste.modify(Stat::Range, 2.0) - 2.0).abs() < f32::EPSILON);

            let reach = Effect::new(unit(), 100, EffectKind::RangeBonus { amount: 1.0 });
            assert!((reach.modify(Stat::Range, 0.5) - 1.5).abs() < f32::EPSILON);

            let rage = Effect::new(unit(), 100, EffectKind::DamageMultiplier { factor: 2.0 });
            assert!((rage.modify(Stat::Damage, 6.0) - 12.0).abs() < f32::EPSILON);
        }

        #[test]
        fn heal_kinds_do_not_modify_stats() {
            let heal = Effect::new(unit(), 0, EffectKind::Heal { amount: 10.0 });
            assert!((heal.modify(Stat::Damage, 7.0) - 7.0).abs() < f32::EPSILON);
            assert!(heal.kind().is_heal());
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let effect = Effect::new(unit(), 250, EffectKind::RangeBonus { amount: 2.0 });
        let json = serde_json::to_string(&effect).unwrap();
        let deserialized: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, deserialized);
    }
}
