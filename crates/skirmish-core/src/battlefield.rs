//! The concrete world: a grid map holding units, items and transient
//! entities, advanced by a fixed-step loop.
//!
//! # Tick order
//!
//! One [`Battlefield::tick`] runs these phases in order:
//!
//! 1. **UNITS**: every unit ticks in ascending id order. A unit is taken out
//!    of the table for the duration of its own tick and put back afterwards,
//!    so lookups through [`World`] never alias the ticking unit.
//! 2. **DESPAWN**: units whose death animation finished during phase 1 are
//!    removed and leave a [`DeadMarker`].
//! 3. **PROJECTILES**: projectiles home on their target's current centre.
//!    A hit applies damage with the shooter as attacker; a projectile whose
//!    target is gone or dead fizzles.
//! 4. **EFFECTS**: visual effects age and expire.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::archetype::UnitType;
//! use skirmish_core::battlefield::Battlefield;
//! use skirmish_core::config::BattlefieldConfig;
//! use skirmish_core::team::Team;
//! use waypoint::Grid;
//!
//! let mut field = Battlefield::new(BattlefieldConfig::default(), Grid::open(16, 16));
//! field.spawn_unit(UnitType::Archer, Team::Player, Vec2::new(2.0, 2.0));
//! field.step().unwrap();
//!
//! assert_eq!(field.current_tick(), 1);
//! assert_eq!(field.elapsed_ms(), 50);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::{IVec2, Vec2};
use rayon::prelude::*;
use tracing::{debug, trace};
use waypoint::{Grid, MapSize, Path, Pathfinder};

use crate::archetype::UnitType;
use crate::config::BattlefieldConfig;
use crate::entity::{DeadMarker, Item, ItemId, Projectile, StaticEffect, StaticEffectKind, UnitId};
use crate::error::{Result, SimError};
use crate::team::Team;
use crate::unit::{Target, Unit};
use crate::usable::{EffectKind, TargetSelection, Usable, UsableKind};
use crate::world::World;

// =============================================================================
// Battlefield
// =============================================================================

/// Grid map plus everything that lives on it.
#[derive(Debug)]
pub struct Battlefield {
    config: BattlefieldConfig,
    pathfinder: Pathfinder,
    grid: Grid,
    /// Units by id; iteration order is tick order.
    units: BTreeMap<UnitId, Unit>,
    items: BTreeMap<ItemId, Item>,
    projectiles: Vec<Projectile>,
    static_effects: Vec<StaticEffect>,
    dead_markers: Vec<DeadMarker>,
    /// Units that reported the end of their death animation this tick.
    pending_despawn: Vec<UnitId>,
    next_unit_id: u64,
    next_item_id: u64,
    tick: u64,
    elapsed_ms: u64,
}

impl Battlefield {
    /// Create an empty battlefield over `grid`.
    #[must_use]
    pub fn new(config: BattlefieldConfig, grid: Grid) -> Self {
        Self {
            pathfinder: Pathfinder::new(config.pathfinder()),
            config,
            grid,
            units: BTreeMap::new(),
            items: BTreeMap::new(),
            projectiles: Vec::new(),
            static_effects: Vec::new(),
            dead_markers: Vec::new(),
            pending_despawn: Vec::new(),
            next_unit_id: 0,
            next_item_id: 0,
            tick: 0,
            elapsed_ms: 0,
        }
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawn a regular unit and return its id.
    pub fn spawn_unit(&mut self, unit_type: UnitType, team: Team, position: Vec2) -> UnitId {
        self.spawn_with(|id| Unit::new(id, unit_type, team, position))
    }

    /// Spawn a player hero with `abilities` and return its id.
    pub fn spawn_hero(&mut self, unit_type: UnitType, position: Vec2, abilities: Vec<Usable>) -> UnitId {
        self.spawn_with(|id| Unit::hero(id, unit_type, position, abilities))
    }

    /// Spawn a unit built by `build` from a freshly allocated id.
    ///
    /// The builder must construct the unit with the id it is given.
    pub fn spawn_with(&mut self, build: impl FnOnce(UnitId) -> Unit) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;
        let unit = build(id);
        debug_assert_eq!(unit.id(), id, "unit built with a foreign id");
        debug!(unit = %id, unit_type = ?unit.unit_type(), team = ?unit.team(), "unit spawned");
        self.units.insert(id, unit);
        id
    }

    /// Drop an item on the map and return its id.
    pub fn spawn_item(&mut self, position: Vec2, usable: Usable) -> ItemId {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id += 1;
        self.items.insert(id, Item::new(id, position, usable));
        id
    }

    // =========================================================================
    // Simulation loop
    // =========================================================================

    /// Advance by the configured tick length.
    ///
    /// # Errors
    ///
    /// See [`Battlefield::tick`].
    pub fn step(&mut self) -> Result<()> {
        self.tick(self.config.tick_ms)
    }

    /// Advance everything by `dt` milliseconds.
    ///
    /// # Errors
    ///
    /// Propagates the first contract violation raised by a unit. The unit
    /// table is left consistent: the failing unit is back in place.
    pub fn tick(&mut self, dt: u32) -> Result<()> {
        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        for id in ids {
            // Despawned or removed by an earlier unit's tick
            let Some(mut unit) = self.units.remove(&id) else {
                continue;
            };
            let outcome = unit.tick(dt, self);
            self.units.insert(id, unit);
            outcome?;
        }

        self.despawn_dead()?;
        self.step_projectiles(dt)?;
        self.static_effects.retain_mut(|effect| !effect.tick(dt));

        self.tick += 1;
        self.elapsed_ms += u64::from(dt);
        Ok(())
    }

    fn despawn_dead(&mut self) -> Result<()> {
        for id in std::mem::take(&mut self.pending_despawn) {
            let Some(mut unit) = self.units.remove(&id) else {
                continue;
            };
            let marker = unit.create_dead_marker()?;
            debug!(unit = %id, position = ?marker.position, "unit despawned");
            self.dead_markers.push(marker);
        }
        Ok(())
    }

    fn step_projectiles(&mut self, dt: u32) -> Result<()> {
        let speed = self.config.projectile_speed;
        let hit_radius = self.config.projectile_hit_radius;
        let mut in_flight = Vec::with_capacity(self.projectiles.len());

        for mut projectile in std::mem::take(&mut self.projectiles) {
            let aim = self
                .units
                .get(&projectile.target)
                .filter(|unit| !unit.is_dead())
                .map(Unit::position);
            let Some(aim) = aim else {
                trace!(source = %projectile.source, target = %projectile.target, "projectile fizzled");
                continue;
            };
            if projectile.advance_towards(aim, dt, speed, hit_radius) {
                self.resolve_hit(&projectile)?;
            } else {
                in_flight.push(projectile);
            }
        }

        self.projectiles = in_flight;
        Ok(())
    }

    fn resolve_hit(&mut self, projectile: &Projectile) -> Result<()> {
        let Some(mut target) = self.units.remove(&projectile.target) else {
            return Ok(());
        };
        let mut source = if projectile.source == projectile.target {
            None
        } else {
            self.units.remove(&projectile.source)
        };

        let attacker = source.as_mut().filter(|shooter| !shooter.is_dead());
        let outcome = target.take_damage(projectile.damage, attacker);
        debug!(
            source = %projectile.source,
            target = %projectile.target,
            damage = projectile.damage,
            "projectile hit"
        );

        if let Some(source) = source {
            self.units.insert(source.id(), source);
        }
        self.units.insert(target.id(), target);
        outcome.map(|_| ())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Order a group of units towards `target`.
    ///
    /// Every unit is validated before any is ordered, so an error leaves all
    /// of them untouched. Paths are planned in parallel over the grid and
    /// assigned afterwards in id order. Dead units are skipped.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownUnit`] for an id that is not on the battlefield,
    /// otherwise see [`Unit::validate_target`].
    pub fn order(&mut self, ids: &[UnitId], target: Target) -> Result<()> {
        let mut plans = Vec::with_capacity(ids.len());
        {
            let world: &dyn World = &*self;
            for &id in ids {
                let unit = world.unit(id).ok_or(SimError::UnknownUnit(id))?;
                unit.validate_target(&target, world)?;
                if unit.is_dead() {
                    continue;
                }
                let destination = target.destination(world).unwrap_or(unit.position());
                plans.push((id, unit.position(), destination));
            }
        }

        let pathfinder = self.pathfinder;
        let grid = &self.grid;
        let paths: Vec<Path> = plans
            .par_iter()
            .map(|&(_, start, goal)| pathfinder.find_path(|cell| grid.is_passable(cell), start, goal))
            .collect();

        for ((id, _, destination), path) in plans.into_iter().zip(paths) {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.set_target_with_path(target, destination, path);
            }
        }
        debug!(units = ids.len(), ?target, "group order issued");
        Ok(())
    }

    /// Use the hero ability in `slot`.
    ///
    /// `selected` names the targets for abilities that act on a selection;
    /// abilities that act on every eligible unit ignore it. Returns the number
    /// of units affected.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownUnit`], [`SimError::NotAHero`],
    /// [`SimError::CasterDead`], [`SimError::UnknownSlot`] or
    /// [`SimError::UsableNotReady`].
    pub fn use_ability(&mut self, hero: UnitId, slot: usize, selected: &[UnitId]) -> Result<usize> {
        self.use_usable(hero, UsableKind::Ability, slot, selected)
    }

    /// Use the inventory item in `slot`. Same contract as
    /// [`Battlefield::use_ability`].
    ///
    /// # Errors
    ///
    /// See [`Battlefield::use_ability`].
    pub fn use_item(&mut self, hero: UnitId, slot: usize, selected: &[UnitId]) -> Result<usize> {
        self.use_usable(hero, UsableKind::Item, slot, selected)
    }

    fn use_usable(&mut self, hero_id: UnitId, kind: UsableKind, slot: usize, selected: &[UnitId]) -> Result<usize> {
        let mut hero = self.units.remove(&hero_id).ok_or(SimError::UnknownUnit(hero_id))?;
        let outcome = self.apply_usable(&mut hero, kind, slot, selected);
        self.units.insert(hero_id, hero);
        outcome
    }

    fn apply_usable(&mut self, hero: &mut Unit, kind: UsableKind, slot: usize, selected: &[UnitId]) -> Result<usize> {
        let loadout = hero.loadout().ok_or(SimError::NotAHero(hero.id()))?;
        if hero.is_dead() {
            return Err(SimError::CasterDead(hero.id()));
        }
        let mut usable = match kind {
            UsableKind::Ability => loadout.abilities.get(slot),
            UsableKind::Item => loadout.inventory.get(slot).map(|item| &item.usable),
        }
        .cloned()
        .ok_or(SimError::UnknownSlot(slot))?;
        if !usable.is_ready() {
            return Err(SimError::UsableNotReady);
        }

        let eligible_id = |id: UnitId| {
            if id == hero.id() {
                usable.can_apply_to(hero, hero)
            } else {
                self.units.get(&id).is_some_and(|unit| usable.can_apply_to(hero, unit))
            }
        };
        let chosen: BTreeSet<UnitId> = match usable.selection() {
            TargetSelection::Selected => selected.iter().copied().filter(|&id| eligible_id(id)).collect(),
            TargetSelection::FirstSelected => {
                selected.iter().copied().find(|&id| eligible_id(id)).into_iter().collect()
            }
            TargetSelection::AllEligible => self
                .units
                .keys()
                .copied()
                .chain([hero.id()])
                .filter(|&id| eligible_id(id))
                .collect(),
        };
        let strikes = matches!(usable.effect(), EffectKind::Damage { .. });
        // A caster never strikes itself
        let include_hero = chosen.contains(&hero.id()) && !strikes;

        let spots: Vec<_> = chosen
            .iter()
            .filter_map(|id| self.units.get(id))
            .map(|unit| (unit.position(), unit.size()))
            .chain(include_hero.then(|| (hero.position(), hero.size())))
            .collect();

        let targets = self.units.values_mut().filter(|unit| chosen.contains(&unit.id()));
        let affected = if strikes {
            usable.use_from(hero, targets)?
        } else {
            usable.use_on_units(targets.chain(include_hero.then_some(&mut *hero)))?
        };

        let lifetime = self.config.static_effect_ms;
        if strikes {
            for (position, _) in spots {
                let flash = StaticEffect::new(StaticEffectKind::Lightning, position, MapSize::square(2.0), lifetime);
                self.add_static_entity(flash);
            }
        } else if usable.effect().is_heal() {
            for (position, size) in spots {
                self.add_static_entity(StaticEffect::new(StaticEffectKind::Heal, position, size, lifetime));
            }
        }

        if let Some(loadout) = hero.loadout_mut() {
            let stored = match kind {
                UsableKind::Ability => loadout.abilities.get_mut(slot),
                UsableKind::Item => loadout.inventory.get_mut(slot).map(|item| &mut item.usable),
            };
            if let Some(stored) = stored {
                *stored = usable;
            }
        }
        debug!(hero = %hero.id(), ?kind, slot, affected, "usable used");
        Ok(affected)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &BattlefieldConfig {
        &self.config
    }

    /// Passability grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Passability grid for editing.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Look up a unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Look up a unit for mutation.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// All units, ascending by id.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Items lying on the map.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Active visual effects.
    #[must_use]
    pub fn static_effects(&self) -> &[StaticEffect] {
        &self.static_effects
    }

    /// Markers of despawned units, in despawn order.
    #[must_use]
    pub fn dead_markers(&self) -> &[DeadMarker] {
        &self.dead_markers
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time in milliseconds.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Living units on `team`.
    #[must_use]
    pub fn living_count(&self, team: Team) -> usize {
        self.units
            .values()
            .filter(|unit| unit.team() == team && !unit.is_dead())
            .count()
    }
}

impl World for Battlefield {
    fn is_passable(&self, cell: IVec2) -> bool {
        self.grid.is_passable(cell)
    }

    fn find_path(&self, start: Vec2, goal: Vec2) -> Path {
        self.pathfinder
            .find_path(|cell| self.grid.is_passable(cell), start, goal)
    }

    fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    fn unit_ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    fn take_item(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    fn add_static_entity(&mut self, effect: StaticEffect) {
        self.static_effects.push(effect);
    }

    fn on_entity_death(&mut self, id: UnitId) {
        self.pending_despawn.push(id);
    }
}
