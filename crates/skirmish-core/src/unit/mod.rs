//! The simulated unit.
//!
//! A [`Unit`] aggregates health and level bookkeeping, a behaviour
//! [`StateMachine`], active [`Effect`]s and, for heroes, a [`HeroLoadout`].
//! The world calls [`Unit::tick`] once per world tick; everything else is
//! either a query or one of the documented mutators.
//!
//! # Derived stats
//!
//! Nothing level- or effect-dependent is cached. Max health, size and speed
//! scale with `1 + level / 10` (size capped at [`MAX_SIZE`] per dimension,
//! speed at [`MAX_SPEED`]); damage, speed and attack range are then folded
//! through every active effect in the order the effects were added.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::archetype::UnitType;
//! use skirmish_core::entity::UnitId;
//! use skirmish_core::team::Team;
//! use skirmish_core::unit::{StateKind, Unit};
//!
//! let mut knight = Unit::new(UnitId::new(1), UnitType::Swordsman, Team::Player, Vec2::ZERO);
//! let mut raider = Unit::new(UnitId::new(2), UnitType::Archer, Team::Enemy, Vec2::ONE);
//!
//! raider.take_damage(100.0, Some(&mut knight)).unwrap();
//!
//! assert!(raider.is_dead());
//! assert_eq!(raider.state_kind(), StateKind::Dying);
//! assert_eq!(knight.level(), 1);
//! ```

pub mod combat;
pub mod hero;
pub mod state;
pub mod target;

use glam::Vec2;
use tracing::{debug, trace};
use waypoint::{Direction, MapRect, MapSize, Path};

use crate::archetype::UnitType;
use crate::entity::{DeadMarker, Item, UnitId};
use crate::error::{ensure_non_negative, Result, SimError};
use crate::notify::Broadcaster;
use crate::team::Team;
use crate::usable::{Effect, Stat, Usable};
use crate::world::World;

pub use combat::DamageOutcome;
pub use hero::HeroLoadout;
pub use state::{update_state, Phase, StateKind, StateMachine, UnitState};
pub use target::{Target, PICKUP_RADIUS};

/// Speed cap in map units per second.
pub const MAX_SPEED: f32 = 2.4;

/// Size cap per dimension in map units.
pub const MAX_SIZE: f32 = 1.0;

/// Size of a unit unless set otherwise.
pub const DEFAULT_SIZE: MapSize = MapSize::square(0.8);

/// Each level adds this fraction of the base value.
const LEVEL_DIVISOR: f32 = 10.0;

/// A simulated actor on the battlefield.
#[derive(Debug)]
pub struct Unit {
    id: UnitId,
    team: Team,
    unit_type: UnitType,
    level: u32,
    /// Centre on the map.
    position: Vec2,
    base_size: MapSize,
    health: f32,
    base_damage: f32,
    dead: bool,
    dead_marker_created: bool,
    machine: StateMachine,
    effects: Vec<Effect>,
    hero: Option<HeroLoadout>,
    auto_acquire: bool,
    damaged: Broadcaster<f32>,
    healed: Broadcaster<f32>,
}

impl Unit {
    /// Create a level-0 unit at full health, centred on `position`.
    #[must_use]
    pub fn new(id: UnitId, unit_type: UnitType, team: Team, position: Vec2) -> Self {
        let stats = unit_type.stats();
        Self {
            id,
            team,
            unit_type,
            level: 0,
            position,
            base_size: DEFAULT_SIZE,
            health: stats.starting_health,
            base_damage: stats.baseline_damage,
            dead: false,
            dead_marker_created: false,
            machine: StateMachine::new(UnitState::enter(unit_type, Phase::Idle, Direction::default())),
            effects: Vec::new(),
            hero: None,
            auto_acquire: true,
            damaged: Broadcaster::new(),
            healed: Broadcaster::new(),
        }
    }

    /// Create a player hero carrying `abilities`.
    ///
    /// Heroes only move when ordered to.
    #[must_use]
    pub fn hero(id: UnitId, unit_type: UnitType, position: Vec2, abilities: Vec<Usable>) -> Self {
        let mut unit = Self::new(id, unit_type, Team::Player, position);
        unit.hero = Some(HeroLoadout::with_abilities(abilities));
        unit.auto_acquire = false;
        unit
    }

    /// Start at `level`, at full health for that level.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self.health = self.max_health();
        self
    }

    /// Use a base size other than [`DEFAULT_SIZE`].
    #[must_use]
    pub fn with_size(mut self, size: MapSize) -> Self {
        self.base_size = size;
        self
    }

    /// Enable or disable picking fights while idle.
    #[must_use]
    pub fn with_auto_acquire(mut self, enabled: bool) -> Self {
        self.auto_acquire = enabled;
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Archetype.
    #[must_use]
    pub const fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Centre on the map.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the unit's centre.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[allow(clippy::cast_precision_loss)]
    fn level_multiplier(&self) -> f32 {
        1.0 + self.level as f32 / LEVEL_DIVISOR
    }

    fn fold(&self, stat: Stat, base: f32) -> f32 {
        self.effects
            .iter()
            .filter(|effect| !effect.is_expired())
            .fold(base, |value, effect| effect.modify(stat, value))
    }

    /// Current size, scaled by level.
    #[must_use]
    pub fn size(&self) -> MapSize {
        self.base_size.scaled_capped(self.level_multiplier(), MAX_SIZE)
    }

    /// Bounding rectangle on the map.
    #[must_use]
    pub fn rect(&self) -> MapRect {
        MapRect::from_centre(self.position, self.size())
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health cap at the current level.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.unit_type.stats().starting_health * self.level_multiplier()
    }

    /// Health as a percentage of the cap.
    #[must_use]
    pub fn health_percent(&self) -> f32 {
        self.health / self.max_health() * 100.0
    }

    /// True once health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Damage per hit, including effects. Never negative.
    #[must_use]
    pub fn damage_amount(&self) -> f32 {
        self.fold(Stat::Damage, self.base_damage).max(0.0)
    }

    /// Movement speed in map units per second, including level and effects.
    #[must_use]
    pub fn speed(&self) -> f32 {
        let base = self.unit_type.stats().moving_speed * self.level_multiplier();
        self.fold(Stat::Speed, base.min(MAX_SPEED)).clamp(0.0, MAX_SPEED)
    }

    /// Attack range between unit edges, including effects.
    #[must_use]
    pub fn attack_distance(&self) -> f32 {
        self.fold(Stat::Range, self.unit_type.stats().attack_range)
    }

    /// Gap between this unit's edge and `other`'s, along the centre line.
    #[must_use]
    pub fn edge_distance(&self, other: &Unit) -> f32 {
        self.position.distance(other.position) - (self.size().half_width() + other.size().half_width())
    }

    /// Whether `other` is close enough to hit.
    #[must_use]
    pub fn within_attack_distance(&self, other: &Unit) -> bool {
        self.edge_distance(other) <= self.attack_distance()
    }

    /// Active state.
    #[must_use]
    pub fn state(&self) -> &UnitState {
        self.machine.current()
    }

    /// Kind of the active state.
    #[must_use]
    pub fn state_kind(&self) -> StateKind {
        self.machine.current().kind()
    }

    /// Facing of the active state.
    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.machine.current().facing()
    }

    /// Active effects.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Whether the unit carries a hero loadout.
    #[must_use]
    pub const fn is_hero(&self) -> bool {
        self.hero.is_some()
    }

    /// Hero loadout, if any.
    #[must_use]
    pub const fn loadout(&self) -> Option<&HeroLoadout> {
        self.hero.as_ref()
    }

    /// Hero loadout for mutation, if any.
    pub fn loadout_mut(&mut self) -> Option<&mut HeroLoadout> {
        self.hero.as_mut()
    }

    /// Whether the unit picks fights while idle.
    #[must_use]
    pub const fn auto_acquire(&self) -> bool {
        self.auto_acquire
    }

    /// Enable or disable picking fights while idle.
    pub fn set_auto_acquire(&mut self, enabled: bool) {
        self.auto_acquire = enabled;
    }

    // =========================================================================
    // Health and level
    // =========================================================================

    /// Apply `amount` damage.
    ///
    /// A lethal hit sets health to zero, switches to dying at once and
    /// levels up `attacker`. A dead unit ignores further damage.
    ///
    /// # Errors
    ///
    /// [`SimError::NegativeAmount`] for a negative or NaN amount on a living
    /// unit.
    pub fn take_damage(&mut self, amount: f32, attacker: Option<&mut Unit>) -> Result<DamageOutcome> {
        if self.dead {
            return Ok(DamageOutcome::Ignored);
        }
        ensure_non_negative(amount)?;

        if self.health - amount <= 0.0 {
            self.health = 0.0;
            self.dead = true;
            let dying = UnitState::dying(self.unit_type, self.current_direction());
            self.machine.force(dying);
            debug!(unit = %self.id, amount, "unit killed");
            if let Some(attacker) = attacker {
                attacker.next_level();
            }
            return Ok(DamageOutcome::Killed);
        }

        self.health -= amount;
        self.damaged.broadcast(&amount);
        Ok(DamageOutcome::Damaged)
    }

    /// Restore `amount` health, capped at [`Unit::max_health`]. Ignored on a
    /// dead unit.
    ///
    /// # Errors
    ///
    /// [`SimError::NegativeAmount`] for a negative or NaN amount on a living
    /// unit.
    pub fn gain_health(&mut self, amount: f32) -> Result<()> {
        if self.dead {
            return Ok(());
        }
        ensure_non_negative(amount)?;
        self.health = (self.health + amount).min(self.max_health());
        self.healed.broadcast(&amount);
        Ok(())
    }

    /// Go up one level, keeping the same health percentage.
    pub fn next_level(&mut self) {
        let fraction = self.health / self.max_health();
        self.level += 1;
        self.health = fraction * self.max_health();
        debug!(unit = %self.id, level = self.level, "level up");
    }

    /// Set the base damage per hit.
    ///
    /// # Errors
    ///
    /// [`SimError::DamageOutOfRange`] unless `0 < amount < 100`.
    pub fn set_damage_amount(&mut self, amount: f32) -> Result<()> {
        if !(amount > 0.0 && amount < 100.0) {
            return Err(SimError::DamageOutOfRange { amount });
        }
        self.base_damage = amount;
        Ok(())
    }

    /// Produce the marker left behind on the map. Allowed once, after death.
    ///
    /// # Errors
    ///
    /// [`SimError::DeadMarkerUnavailable`] if the unit is alive or a marker
    /// was already created.
    pub fn create_dead_marker(&mut self) -> Result<DeadMarker> {
        if !self.dead || self.dead_marker_created {
            return Err(SimError::DeadMarkerUnavailable(self.id));
        }
        self.dead_marker_created = true;
        Ok(DeadMarker {
            unit: self.id,
            unit_type: self.unit_type,
            team: self.team,
            position: self.position,
            size: self.size(),
        })
    }

    /// Listeners told about non-lethal damage. They receive the amount.
    pub fn on_damaged(&mut self) -> &mut Broadcaster<f32> {
        &mut self.damaged
    }

    /// Listeners told about healing. They receive the amount requested.
    pub fn on_healed(&mut self) -> &mut Broadcaster<f32> {
        &mut self.healed
    }

    // =========================================================================
    // Effects and items
    // =========================================================================

    /// Attach an effect, running its start hook. One-shot effects are not
    /// kept. Ignored on a dead unit.
    ///
    /// # Errors
    ///
    /// [`SimError::EffectTargetMismatch`] if the effect was built for
    /// another unit.
    pub fn add_effect(&mut self, mut effect: Effect) -> Result<()> {
        if effect.target() != self.id {
            return Err(SimError::EffectTargetMismatch {
                effect_target: effect.target(),
                unit: self.id,
            });
        }
        if self.dead {
            return Ok(());
        }
        let restored = effect.start();
        if restored > 0.0 {
            self.gain_health(restored)?;
        }
        if !effect.is_expired() {
            self.effects.push(effect);
        }
        Ok(())
    }

    /// Put an item into the hero's inventory. Holding it already is a no-op.
    ///
    /// # Errors
    ///
    /// [`SimError::NotAHero`] for regular units and
    /// [`SimError::ItemOutOfRange`] if the item is [`PICKUP_RADIUS`] or
    /// further away.
    pub fn pick_up(&mut self, item: Item) -> Result<()> {
        let position = self.position;
        let Some(loadout) = self.hero.as_mut() else {
            return Err(SimError::NotAHero(self.id));
        };
        if loadout.has_item(item.id) {
            return Ok(());
        }
        if position.distance(item.position) >= PICKUP_RADIUS {
            return Err(SimError::ItemOutOfRange(item.id));
        }
        debug!(unit = %self.id, item = %item.id, "item picked up");
        loadout.inventory.push(item);
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Check that `target` is a legal order for this unit.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidAttackTarget`] for a dead, unknown or friendly unit
    /// target; [`SimError::NotAHero`] or [`SimError::UnknownItem`] for item
    /// targets.
    pub fn validate_target(&self, target: &Target, world: &dyn World) -> Result<()> {
        match *target {
            Target::Point(_) => Ok(()),
            Target::Unit(id) => {
                let attackable = world
                    .unit(id)
                    .is_some_and(|other| !other.is_dead() && self.team.can_attack(other.team()));
                if attackable {
                    Ok(())
                } else {
                    Err(SimError::InvalidAttackTarget {
                        attacker: self.id,
                        target: id,
                    })
                }
            }
            Target::Item(id) => {
                if !self.is_hero() {
                    return Err(SimError::NotAHero(self.id));
                }
                if world.item(id).is_none() {
                    return Err(SimError::UnknownItem(id));
                }
                Ok(())
            }
        }
    }

    /// Order the unit towards `target`, planning a fresh path from here.
    ///
    /// The order replaces any pending state request and takes effect on the
    /// unit's next tick. Dead units ignore orders.
    ///
    /// # Errors
    ///
    /// See [`Unit::validate_target`].
    pub fn set_target(&mut self, target: Target, world: &dyn World) -> Result<()> {
        self.validate_target(&target, world)?;
        let destination = target.destination(world).unwrap_or(self.position);
        let path = world.find_path(self.position, destination);
        self.set_target_with_path(target, destination, path);
        Ok(())
    }

    /// Order the unit towards `target` along an already planned path.
    ///
    /// No validation happens here; see [`Unit::validate_target`].
    pub fn set_target_with_path(&mut self, target: Target, destination: Vec2, path: Path) {
        if self.dead {
            return;
        }
        let walking = UnitState::walking(self.unit_type, self.current_direction(), target, destination, path);
        self.machine.order(walking);
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the unit by `dt` milliseconds.
    ///
    /// Runs the current state, commits at most one transition, ticks and
    /// purges effects, and ticks hero cooldowns.
    ///
    /// # Errors
    ///
    /// Propagates contract violations raised while resolving combat.
    pub fn tick(&mut self, dt: u32, world: &mut dyn World) -> Result<()> {
        let mut state = self.machine.take_current();
        state.advance_animation(dt);
        let outcome = state.tick(self, dt, world);
        self.machine.restore_current(state);
        if let Some(next) = outcome? {
            self.machine.request(next);
        }

        let before = self.state_kind();
        if self.machine.commit() {
            trace!(unit = %self.id, from = ?before, to = ?self.state_kind(), "state transition");
        }

        self.tick_effects(dt)?;
        if let Some(loadout) = self.hero.as_mut() {
            loadout.tick(dt);
        }
        Ok(())
    }

    fn tick_effects(&mut self, dt: u32) -> Result<()> {
        let restored: f32 = self.effects.iter_mut().map(|effect| effect.tick(dt)).sum();
        self.effects.retain(|effect| !effect.is_expired());
        if restored > 0.0 {
            self.gain_health(restored)?;
        }
        Ok(())
    }

    /// Walk along `path` for `dt` milliseconds, consuming reached waypoints.
    ///
    /// Returns the heading towards the waypoint being approached, if any.
    pub(crate) fn advance_along(&mut self, path: &mut Path, dt: u32) -> Option<Direction> {
        #[allow(clippy::cast_precision_loss)]
        let mut budget = self.speed() * dt as f32 / 1000.0;
        let mut heading = None;
        while let Some(waypoint) = path.front() {
            if waypoint != self.position {
                heading = Some(Direction::between(self.position, waypoint));
            }
            let distance = self.position.distance(waypoint);
            if distance <= budget {
                self.position = waypoint;
                budget -= distance;
                path.pop_front();
            } else {
                self.position += (waypoint - self.position) / distance * budget;
                break;
            }
        }
        heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::usable::EffectKind;
    use std::sync::{Arc, Mutex};

    fn swordsman(id: u64, team: Team) -> Unit {
        Unit::new(UnitId::new(id), UnitType::Swordsman, team, Vec2::new(id as f32, 0.0))
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn non_lethal_damage_reduces_health() {
            let mut unit = swordsman(1, Team::Player);
            let outcome = unit.take_damage(40.0, None).unwrap();
            assert_eq!(outcome, DamageOutcome::Damaged);
            assert!((unit.health() - 110.0).abs() < 1e-4);
            assert_eq!(unit.state_kind(), StateKind::Idle);
        }

        #[test]
        fn lethal_damage_kills_and_levels_attacker() {
            let mut attacker = swordsman(1, Team::Player);
            let mut victim = swordsman(2, Team::Enemy);
            let outcome = victim.take_damage(150.0, Some(&mut attacker)).unwrap();

            assert_eq!(outcome, DamageOutcome::Killed);
            assert!(victim.is_dead());
            assert_eq!(victim.health(), 0.0);
            assert_eq!(victim.state_kind(), StateKind::Dying);
            assert_eq!(attacker.level(), 1);
        }

        #[test]
        fn dead_units_ignore_damage() {
            let mut attacker = swordsman(1, Team::Player);
            let mut victim = swordsman(2, Team::Enemy);
            victim.take_damage(500.0, Some(&mut attacker)).unwrap();
            let outcome = victim.take_damage(10.0, Some(&mut attacker)).unwrap();

            assert_eq!(outcome, DamageOutcome::Ignored);
            assert_eq!(attacker.level(), 1);
        }

        #[test]
        fn negative_damage_is_invalid() {
            let mut unit = swordsman(1, Team::Player);
            let err = unit.take_damage(-1.0, None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!((unit.health() - 150.0).abs() < 1e-4);
        }

        #[test]
        fn dead_units_ignore_even_negative_damage() {
            let mut unit = swordsman(1, Team::Enemy);
            unit.take_damage(500.0, None).unwrap();
            assert_eq!(unit.take_damage(-1.0, None), Ok(DamageOutcome::Ignored));
            assert_eq!(unit.gain_health(-1.0), Ok(()));
            assert_eq!(unit.health(), 0.0);
        }

        #[test]
        fn damage_listener_sees_amount() {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&seen);
            let mut unit = swordsman(1, Team::Player);
            unit.on_damaged().subscribe(move |amount| sink.lock().unwrap().push(*amount));

            unit.take_damage(7.0, None).unwrap();
            unit.take_damage(500.0, None).unwrap();

            assert_eq!(*seen.lock().unwrap(), vec![7.0]);
        }
    }

    mod heal_tests {
        use super::*;

        #[test]
        fn heal_is_capped_at_max_health() {
            let mut unit = swordsman(1, Team::Player);
            unit.take_damage(20.0, None).unwrap();
            unit.gain_health(50.0).unwrap();
            assert!((unit.health() - 150.0).abs() < 1e-4);
        }

        #[test]
        fn dead_units_are_not_healed() {
            let mut unit = swordsman(1, Team::Player);
            unit.take_damage(1000.0, None).unwrap();
            unit.gain_health(50.0).unwrap();
            assert_eq!(unit.health(), 0.0);
        }

        #[test]
        fn negative_heal_is_invalid() {
            let mut unit = swordsman(1, Team::Player);
            assert_eq!(
                unit.gain_health(-3.0).unwrap_err().kind(),
                ErrorKind::InvalidArgument
            );
        }

        #[test]
        fn heal_listener_can_be_removed() {
            let seen = Arc::new(Mutex::new(0_u32));
            let sink = Arc::clone(&seen);
            let mut unit = swordsman(1, Team::Player);
            let id = unit.on_healed().subscribe(move |_| *sink.lock().unwrap() += 1);

            unit.gain_health(1.0).unwrap();
            assert!(unit.on_healed().unsubscribe(id));
            unit.gain_health(1.0).unwrap();

            assert_eq!(*seen.lock().unwrap(), 1);
        }
    }

    mod level_tests {
        use super::*;

        #[test]
        fn next_level_preserves_health_percentage() {
            let mut unit = swordsman(1, Team::Player);
            unit.take_damage(75.0, None).unwrap();
            unit.next_level();

            assert_eq!(unit.level(), 1);
            assert!((unit.max_health() - 165.0).abs() < 1e-3);
            assert!((unit.health() - 82.5).abs() < 1e-3);
            assert!((unit.health_percent() - 50.0).abs() < 1e-3);
        }

        #[test]
        fn size_and_speed_are_capped() {
            let unit = swordsman(1, Team::Player).with_level(10);
            assert_eq!(unit.size(), MapSize::square(MAX_SIZE));
            assert!((unit.speed() - MAX_SPEED).abs() < 1e-5);

            let fresh = swordsman(2, Team::Player);
            assert_eq!(fresh.size(), DEFAULT_SIZE);
            assert!((fresh.speed() - 1.6).abs() < 1e-5);
        }

        #[test]
        fn with_level_starts_at_full_health() {
            let unit = swordsman(1, Team::Player).with_level(2);
            assert!((unit.health() - 180.0).abs() < 1e-3);
        }
    }

    mod damage_amount_tests {
        use super::*;

        #[test]
        fn set_damage_amount_bounds() {
            let mut unit = swordsman(1, Team::Player);
            assert!(unit.set_damage_amount(0.0).is_err());
            assert!(unit.set_damage_amount(100.0).is_err());
            assert!(unit.set_damage_amount(f32::NAN).is_err());
            unit.set_damage_amount(42.0).unwrap();
            assert!((unit.damage_amount() - 42.0).abs() < 1e-5);
        }

        #[test]
        fn effects_fold_in_insertion_order() {
            let mut unit = swordsman(1, Team::Player);
            let id = unit.id();
            unit.add_effect(Effect::new(id, 1000, EffectKind::DamageBonus { amount: 3.0 }))
                .unwrap();
            unit.add_effect(Effect::new(id, 1000, EffectKind::DamageMultiplier { factor: 2.0 }))
                .unwrap();
            // (12 + 3) * 2
            assert!((unit.damage_amount() - 30.0).abs() < 1e-5);
        }

        #[test]
        fn range_bonus_extends_attack_distance() {
            let mut unit = swordsman(1, Team::Player);
            let id = unit.id();
            unit.add_effect(Effect::new(id, 1000, EffectKind::RangeBonus { amount: 1.5 }))
                .unwrap();
            assert!((unit.attack_distance() - 2.0).abs() < 1e-5);
        }
    }

    mod effect_tests {
        use super::*;

        #[test]
        fn effect_for_other_unit_is_rejected() {
            let mut unit = swordsman(1, Team::Player);
            let effect = Effect::new(UnitId::new(9), 100, EffectKind::DamageBonus { amount: 1.0 });
            let err = unit.add_effect(effect).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!(unit.effects().is_empty());
        }

        #[test]
        fn one_shot_heal_is_applied_but_not_kept() {
            let mut unit = swordsman(1, Team::Player);
            unit.take_damage(30.0, None).unwrap();
            unit.add_effect(Effect::new(unit.id(), 0, EffectKind::Heal { amount: 20.0 }))
                .unwrap();
            assert!((unit.health() - 140.0).abs() < 1e-4);
            assert!(unit.effects().is_empty());
        }

        #[test]
        fn dead_units_ignore_effects() {
            let mut unit = swordsman(1, Team::Player);
            unit.take_damage(1000.0, None).unwrap();
            unit.add_effect(Effect::new(unit.id(), 500, EffectKind::DamageBonus { amount: 1.0 }))
                .unwrap();
            assert!(unit.effects().is_empty());
        }
    }

    mod dead_marker_tests {
        use super::*;

        #[test]
        fn living_unit_has_no_marker() {
            let mut unit = swordsman(1, Team::Player);
            assert_eq!(
                unit.create_dead_marker(),
                Err(SimError::DeadMarkerUnavailable(UnitId::new(1)))
            );
        }

        #[test]
        fn marker_is_created_once() {
            let mut unit = swordsman(1, Team::Enemy);
            unit.take_damage(1000.0, None).unwrap();

            let marker = unit.create_dead_marker().unwrap();
            assert_eq!(marker.unit, unit.id());
            assert_eq!(marker.team, Team::Enemy);
            assert_eq!(unit.create_dead_marker().unwrap_err().kind(), ErrorKind::InvalidState);
        }
    }

    mod pick_up_tests {
        use super::*;
        use crate::entity::ItemId;

        fn whetstone(id: u64, position: Vec2) -> Item {
            Item::new(
                ItemId::new(id),
                position,
                Usable::damage_buff_item("Whetstone", 1000, 5.0, 2000).unwrap(),
            )
        }

        #[test]
        fn regular_units_cannot_pick_up() {
            let mut unit = swordsman(1, Team::Player);
            let err = unit.pick_up(whetstone(1, Vec2::new(1.0, 0.0))).unwrap_err();
            assert_eq!(err, SimError::NotAHero(UnitId::new(1)));
        }

        #[test]
        fn hero_picks_up_in_range_once() {
            let mut hero = Unit::hero(UnitId::new(1), UnitType::Magician, Vec2::ZERO, Vec::new());
            hero.pick_up(whetstone(1, Vec2::new(1.0, 1.0))).unwrap();
            hero.pick_up(whetstone(1, Vec2::new(1.0, 1.0))).unwrap();
            assert_eq!(hero.loadout().map(|l| l.inventory.len()), Some(1));
        }

        #[test]
        fn out_of_range_item_is_rejected() {
            let mut hero = Unit::hero(UnitId::new(1), UnitType::Magician, Vec2::ZERO, Vec::new());
            let err = hero.pick_up(whetstone(2, Vec2::new(2.0, 0.0))).unwrap_err();
            assert_eq!(err, SimError::ItemOutOfRange(ItemId::new(2)));
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn advance_carries_budget_across_waypoints() {
            // Swordsman: 1.6 units/s, so 1.6 units per second of dt
            let mut unit = Unit::new(UnitId::new(1), UnitType::Swordsman, Team::Player, Vec2::ZERO);
            let mut path = Path::from(vec![Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)]);

            let heading = unit.advance_along(&mut path, 1000);

            assert_eq!(path.len(), 1);
            assert!((unit.position() - Vec2::new(1.0, 0.6)).length() < 1e-5);
            assert_eq!(heading, Some(Direction::Down));
        }

        #[test]
        fn edge_distance_subtracts_half_widths() {
            let a = Unit::new(UnitId::new(1), UnitType::Swordsman, Team::Player, Vec2::ZERO);
            let b = Unit::new(UnitId::new(2), UnitType::Swordsman, Team::Enemy, Vec2::new(2.0, 0.0));
            assert!((a.edge_distance(&b) - 1.2).abs() < 1e-5);
            assert!(!a.within_attack_distance(&b));
        }
    }
}
