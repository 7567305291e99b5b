//! Property tests for damage, healing and effect folding.

use glam::Vec2;
use proptest::prelude::*;

use crate::archetype::UnitType;
use crate::entity::UnitId;
use crate::team::Team;
use crate::unit::{DamageOutcome, StateKind, Unit};
use crate::usable::{Effect, EffectKind};

fn unit_type() -> impl Strategy<Value = UnitType> {
    prop::sample::select(UnitType::ALL.to_vec())
}

fn unit(unit_type: UnitType, level: u32) -> Unit {
    Unit::new(UnitId::new(1), unit_type, Team::Player, Vec2::ZERO).with_level(level)
}

proptest! {
    #[test]
    fn survivable_damage_subtracts_exactly(unit_type in unit_type(), level in 0_u32..5, fraction in 0.0_f32..0.99) {
        let mut victim = unit(unit_type, level);
        let before = victim.health();
        let amount = before * fraction;

        let outcome = victim.take_damage(amount, None).unwrap();

        prop_assert_eq!(outcome, DamageOutcome::Damaged);
        prop_assert!((victim.health() - (before - amount)).abs() < 1e-3);
        prop_assert_eq!(victim.state_kind(), StateKind::Idle);
    }

    #[test]
    fn lethal_damage_kills_and_levels_once(unit_type in unit_type(), excess in 0.0_f32..500.0, attacker_level in 0_u32..5) {
        let mut victim = unit(unit_type, 0);
        let mut attacker = Unit::new(UnitId::new(2), UnitType::Swordsman, Team::Enemy, Vec2::ONE)
            .with_level(attacker_level);
        let amount = victim.health() + excess;

        prop_assert_eq!(victim.take_damage(amount, Some(&mut attacker)).unwrap(), DamageOutcome::Killed);
        prop_assert_eq!(victim.health(), 0.0);
        prop_assert_eq!(victim.state_kind(), StateKind::Dying);
        prop_assert_eq!(attacker.level(), attacker_level + 1);

        // Further hits are ignored and level nobody up
        prop_assert_eq!(victim.take_damage(amount, Some(&mut attacker)).unwrap(), DamageOutcome::Ignored);
        prop_assert_eq!(attacker.level(), attacker_level + 1);
        prop_assert_eq!(victim.health(), 0.0);
    }

    #[test]
    fn healing_never_exceeds_the_level_cap(
        unit_type in unit_type(),
        level in 0_u32..10,
        damage in 0.0_f32..50.0,
        heals in prop::collection::vec(0.0_f32..200.0, 1..8),
    ) {
        let mut patient = unit(unit_type, level);
        patient.take_damage(damage, None).unwrap();
        let cap = unit_type.stats().starting_health * (1.0 + level as f32 / 10.0);

        for amount in heals {
            patient.gain_health(amount).unwrap();
            prop_assert!(patient.health() <= cap + 1e-3);
        }
    }

    #[test]
    fn additive_damage_bonuses_commute(bonuses in prop::collection::vec(-5.0_f32..20.0, 1..6)) {
        let mut forward = unit(UnitType::Spearman, 0);
        let mut backward = unit(UnitType::Spearman, 0);
        for &amount in &bonuses {
            forward.add_effect(Effect::new(forward.id(), 1000, EffectKind::DamageBonus { amount })).unwrap();
        }
        for &amount in bonuses.iter().rev() {
            backward.add_effect(Effect::new(backward.id(), 1000, EffectKind::DamageBonus { amount })).unwrap();
        }

        prop_assert!((forward.damage_amount() - backward.damage_amount()).abs() < 1e-3);
    }

    #[test]
    fn negative_amounts_are_always_rejected(amount in -1000.0_f32..-0.001) {
        let mut target = unit(UnitType::Archer, 0);
        prop_assert!(target.take_damage(amount, None).is_err());
        prop_assert!(target.gain_health(amount).is_err());
        prop_assert_eq!(target.health(), 100.0);
    }
}
