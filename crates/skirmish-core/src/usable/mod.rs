//! Abilities and items.
//!
//! A [`Usable`] is a cooldown-gated effect factory. Using it builds one
//! [`Effect`] per chosen unit, attaches it and restarts the cooldown. A
//! damaging usable strikes instead of attaching anything. Which units may be
//! chosen is described by [`CanAffect`]; checking eligibility is the
//! caller's job (see [`Usable::can_apply_to`]).
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::archetype::UnitType;
//! use skirmish_core::entity::UnitId;
//! use skirmish_core::team::Team;
//! use skirmish_core::unit::Unit;
//! use skirmish_core::usable::Usable;
//!
//! let mut heal = Usable::heal_ability(5_000, 30.0).unwrap();
//! let mut ally = Unit::new(UnitId::new(1), UnitType::Archer, Team::Player, Vec2::ZERO);
//! ally.take_damage(50.0, None).unwrap();
//!
//! assert_eq!(heal.use_on_units([&mut ally]).unwrap(), 1);
//! assert!((ally.health() - 80.0).abs() < 1e-4);
//! assert!(heal.use_on_units([&mut ally]).is_err());
//! ```

pub mod effect;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::UnitId;
use crate::error::{Result, SimError};
use crate::timer::Countdown;
use crate::unit::Unit;

pub use effect::{Effect, EffectKind, Stat};

bitflags! {
    /// Units a usable may be applied to, relative to its caster.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CanAffect: u8 {
        /// The caster itself
        const SELF = 0b001;
        /// Other units on the caster's team
        const ALLIES = 0b010;
        /// Units on other teams
        const ENEMIES = 0b100;
    }
}

/// Whether a usable is an innate ability or a carried item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsableKind {
    /// Innate hero ability
    Ability,
    /// Inventory item
    Item,
}

/// How targets are chosen when the usable is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSelection {
    /// The units the player selected
    Selected,
    /// Every eligible unit on the battlefield
    AllEligible,
    /// The first eligible unit the player selected
    FirstSelected,
}

/// Cooldown-gated effect factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usable {
    name: String,
    description: String,
    kind: UsableKind,
    cooldown: Countdown,
    effect_duration_ms: u32,
    effect: EffectKind,
    can_affect: CanAffect,
    selection: TargetSelection,
}

impl Usable {
    /// Create a usable that applies to the caster and allies it is used on.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidUsable`] if the cooldown is zero or a heal or
    /// damage amount is not positive.
    pub fn new(
        kind: UsableKind,
        name: impl Into<String>,
        cooldown_ms: u32,
        effect: EffectKind,
        effect_duration_ms: u32,
    ) -> Result<Self> {
        if cooldown_ms == 0 {
            return Err(SimError::InvalidUsable("cooldown must be positive"));
        }
        match effect {
            EffectKind::Heal { amount } if amount.is_nan() || amount <= 0.0 => {
                return Err(SimError::InvalidUsable("heal amount must be positive"));
            }
            EffectKind::Regenerate { per_second } if per_second.is_nan() || per_second <= 0.0 => {
                return Err(SimError::InvalidUsable("regeneration rate must be positive"));
            }
            EffectKind::Damage { amount } if amount.is_nan() || amount <= 0.0 => {
                return Err(SimError::InvalidUsable("damage amount must be positive"));
            }
            _ => {}
        }
        Ok(Self {
            name: name.into(),
            description: String::new(),
            kind,
            cooldown: Countdown::new(cooldown_ms),
            effect_duration_ms,
            effect,
            can_affect: CanAffect::SELF | CanAffect::ALLIES,
            selection: TargetSelection::Selected,
        })
    }

    /// Heal every living unit on the caster's team, caster included.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidUsable`] for a zero cooldown or non-positive amount.
    pub fn heal_ability(cooldown_ms: u32, amount: f32) -> Result<Self> {
        Ok(
            Self::new(UsableKind::Ability, "Heal", cooldown_ms, EffectKind::Heal { amount }, 0)?
                .with_description("Heals all allied units")
                .selecting(TargetSelection::AllEligible),
        )
    }

    /// Strike the first selected enemy with lightning.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidUsable`] for a zero cooldown or non-positive damage.
    pub fn lightning_bolt(cooldown_ms: u32, damage: f32) -> Result<Self> {
        Ok(Self::new(
            UsableKind::Ability,
            "Lightning Bolt",
            cooldown_ms,
            EffectKind::Damage { amount: damage },
            0,
        )?
        .with_description("Strikes an enemy unit")
        .affecting(CanAffect::ENEMIES)
        .selecting(TargetSelection::FirstSelected))
    }

    /// Item granting its holder bonus damage for a while.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidUsable`] for a zero cooldown.
    pub fn damage_buff_item(
        name: impl Into<String>,
        cooldown_ms: u32,
        bonus: f32,
        duration_ms: u32,
    ) -> Result<Self> {
        Ok(Self::new(
            UsableKind::Item,
            name,
            cooldown_ms,
            EffectKind::DamageBonus { amount: bonus },
            duration_ms,
        )?
        .affecting(CanAffect::SELF))
    }

    /// Set the description shown to the player.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set which units are eligible.
    #[must_use]
    pub fn affecting(mut self, can_affect: CanAffect) -> Self {
        self.can_affect = can_affect;
        self
    }

    /// Set how targets are chosen.
    #[must_use]
    pub fn selecting(mut self, selection: TargetSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Ability or item.
    #[must_use]
    pub const fn kind(&self) -> UsableKind {
        self.kind
    }

    /// Effect applied on use.
    #[must_use]
    pub const fn effect(&self) -> &EffectKind {
        &self.effect
    }

    /// Eligible units relative to the caster.
    #[must_use]
    pub const fn can_affect(&self) -> CanAffect {
        self.can_affect
    }

    /// Target selection mode.
    #[must_use]
    pub const fn selection(&self) -> TargetSelection {
        self.selection
    }

    /// True when the cooldown has elapsed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.cooldown.is_finished()
    }

    /// Fraction of the cooldown that has elapsed.
    #[must_use]
    pub fn cooldown_progress(&self) -> f32 {
        self.cooldown.progress()
    }

    /// Advance the cooldown by `dt` milliseconds.
    pub fn tick(&mut self, dt: u32) {
        self.cooldown.tick(dt);
    }

    /// Whether `target` is eligible when `caster` uses this.
    ///
    /// Dead units are never eligible.
    #[must_use]
    pub fn can_apply_to(&self, caster: &Unit, target: &Unit) -> bool {
        if target.is_dead() {
            return false;
        }
        let relation = if caster.id() == target.id() {
            CanAffect::SELF
        } else if caster.team() == target.team() {
            CanAffect::ALLIES
        } else {
            CanAffect::ENEMIES
        };
        self.can_affect.contains(relation)
    }

    /// Build the effect this usable attaches to `target`.
    #[must_use]
    pub fn create_effect_for(&self, target: UnitId) -> Effect {
        Effect::new(target, self.effect_duration_ms, self.effect)
    }

    /// Attach one effect to each unit and restart the cooldown.
    ///
    /// Returns the number of units affected. Damage from a damaging usable
    /// is credited to nobody; see [`Usable::use_from`].
    ///
    /// # Errors
    ///
    /// [`SimError::UsableNotReady`] while the cooldown is running.
    pub fn use_on_units<'a, I>(&mut self, units: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Unit>,
    {
        self.apply(None, units)
    }

    /// Like [`Usable::use_on_units`], with `caster` credited for kills.
    ///
    /// # Errors
    ///
    /// [`SimError::UsableNotReady`] while the cooldown is running.
    pub fn use_from<'a, I>(&mut self, caster: &mut Unit, units: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Unit>,
    {
        self.apply(Some(caster), units)
    }

    fn apply<'a, I>(&mut self, mut caster: Option<&mut Unit>, units: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Unit>,
    {
        if !self.is_ready() {
            return Err(SimError::UsableNotReady);
        }
        let mut affected = 0;
        for unit in units {
            if let EffectKind::Damage { amount } = self.effect {
                unit.take_damage(amount, caster.as_deref_mut())?;
            } else {
                let effect = self.create_effect_for(unit.id());
                unit.add_effect(effect)?;
            }
            affected += 1;
        }
        self.cooldown.restart();
        debug!(usable = %self.name, affected, "usable applied");
        Ok(affected)
    }
}
