//! Unit behaviour states and the two-phase state machine.
//!
//! # Update discipline
//!
//! Each world tick a unit first runs its current state's tick, which may
//! move the unit, deal damage and request a next state. It then commits:
//! [`update_state`] picks either the current state or the requested one.
//! Exactly one transition (or none) is committed per tick.
//!
//! Requests coming out of a state's own tick never overwrite a pending
//! request. External orders ([`StateMachine::order`]) always do. A kill
//! bypasses the slot entirely ([`StateMachine::force`]), and once a unit is
//! dying nothing else is ever committed.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;
use waypoint::{snap_to_cell, Direction, Path};

use super::combat;
use super::target::{Target, PICKUP_RADIUS};
use super::Unit;
use crate::animation::AnimationClock;
use crate::archetype::UnitType;
use crate::entity::{ItemId, UnitId};
use crate::error::Result;
use crate::world::World;

/// Discriminant of a [`UnitState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Standing still, possibly scanning for enemies
    Idle,
    /// Following a path towards a target
    Walking,
    /// Hitting or shooting a unit
    Attacking,
    /// Playing the death animation
    Dying,
    /// Collecting an item (heroes only)
    PickingUp,
}

/// Variant-specific data of a state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    /// Standing still.
    #[default]
    Idle,
    /// Walking towards `target` along `path`.
    Walking {
        /// Where the walk ends
        target: Target,
        /// Remaining waypoints
        path: Path,
        /// Cell of a tracked unit when the path was last planned
        tracked_cell: Option<IVec2>,
    },
    /// Attacking a unit.
    Attacking {
        /// Unit under attack
        target: UnitId,
    },
    /// Dying; `notified` once the world has been told.
    Dying {
        /// Whether `on_entity_death` has been sent
        notified: bool,
    },
    /// Picking up an item.
    PickingUp {
        /// Item being collected
        item: ItemId,
    },
}

impl Phase {
    /// Discriminant.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Idle => StateKind::Idle,
            Self::Walking { .. } => StateKind::Walking,
            Self::Attacking { .. } => StateKind::Attacking,
            Self::Dying { .. } => StateKind::Dying,
            Self::PickingUp { .. } => StateKind::PickingUp,
        }
    }
}

/// One behaviour state: its data, animation progress and facing.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitState {
    phase: Phase,
    clock: AnimationClock,
    facing: Direction,
}

impl Default for UnitState {
    fn default() -> Self {
        Self::enter(UnitType::Swordsman, Phase::Idle, Direction::default())
    }
}

impl UnitState {
    /// Enter `phase` with a fresh animation for `unit_type`.
    #[must_use]
    pub fn enter(unit_type: UnitType, phase: Phase, facing: Direction) -> Self {
        let kind = phase.kind();
        let sequence = unit_type.sequence_for(kind);
        let clock = if kind == StateKind::Attacking {
            AnimationClock::with_frame_ms(sequence, unit_type.stats().attack_frame_ms)
        } else {
            AnimationClock::new(sequence)
        };
        Self { phase, clock, facing }
    }

    /// Idle state.
    #[must_use]
    pub fn idle(unit: &Unit) -> Self {
        Self::enter(unit.unit_type(), Phase::Idle, unit.current_direction())
    }

    /// Dying state.
    #[must_use]
    pub fn dying(unit_type: UnitType, facing: Direction) -> Self {
        Self::enter(unit_type, Phase::Dying { notified: false }, facing)
    }

    /// Walking state with a precomputed path towards `destination`.
    #[must_use]
    pub fn walking(unit_type: UnitType, facing: Direction, target: Target, destination: Vec2, path: Path) -> Self {
        let tracked_cell = match target {
            Target::Unit(_) => Some(snap_to_cell(destination)),
            Target::Point(_) | Target::Item(_) => None,
        };
        Self::enter(
            unit_type,
            Phase::Walking {
                target,
                path,
                tracked_cell,
            },
            facing,
        )
    }

    /// Discriminant.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        self.phase.kind()
    }

    /// Variant data.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Animation progress.
    #[must_use]
    pub const fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Advance the animation by `dt` milliseconds.
    pub(crate) fn advance_animation(&mut self, dt: u32) {
        self.clock.advance(dt);
    }

    /// Run this state's behaviour for one tick.
    ///
    /// `unit` is the owner, held outside the world's unit table. Returns the
    /// requested next state, if any. The requested state starts with the
    /// facing this state ended the tick with.
    pub(crate) fn tick(&mut self, unit: &mut Unit, dt: u32, world: &mut dyn World) -> Result<Option<UnitState>> {
        let next = match &mut self.phase {
            Phase::Idle => tick_idle(unit, world),
            Phase::Walking {
                target,
                path,
                tracked_cell,
            } => tick_walking(unit, dt, world, *target, path, tracked_cell, &mut self.facing),
            Phase::Attacking { target } => {
                let target = *target;
                tick_attacking(unit, world, target, &self.clock, &mut self.facing)?
            }
            Phase::Dying { notified } => {
                if !*notified && self.clock.reached_last_frame() {
                    *notified = true;
                    debug!(unit = %unit.id(), "death animation finished");
                    world.on_entity_death(unit.id());
                }
                None
            }
            Phase::PickingUp { item } => {
                let item = *item;
                tick_picking_up(unit, world, item)?
            }
        };
        let facing = self.facing;
        Ok(next.map(|mut next| {
            next.facing = facing;
            next
        }))
    }
}

/// Pick the state to hold after a tick.
///
/// Pure: a dying unit stays dying, otherwise a requested state wins.
#[must_use]
pub fn update_state(current: UnitState, requested: Option<UnitState>) -> UnitState {
    if current.kind() == StateKind::Dying {
        return current;
    }
    requested.unwrap_or(current)
}

fn walk_to(unit: &Unit, target: Target, world: &dyn World) -> Option<UnitState> {
    let destination = target.destination(world)?;
    let path = world.find_path(unit.position(), destination);
    Some(UnitState::walking(
        unit.unit_type(),
        unit.current_direction(),
        target,
        destination,
        path,
    ))
}

fn tick_idle(unit: &Unit, world: &dyn World) -> Option<UnitState> {
    if !unit.auto_acquire() {
        return None;
    }
    let radius = unit.unit_type().auto_attack_distance();
    let nearest = world
        .unit_ids()
        .into_iter()
        .filter_map(|id| world.unit(id))
        .filter(|other| !other.is_dead() && unit.team().can_attack(other.team()))
        .map(|other| (other.id(), unit.position().distance(other.position())))
        .filter(|(_, distance)| *distance <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    debug!(unit = %unit.id(), target = %nearest.0, "acquired target");
    walk_to(unit, Target::Unit(nearest.0), world)
}

/// Whether `unit` has reached the end condition of `target`.
fn has_arrived(unit: &Unit, target: Target, destination: Vec2, world: &dyn World) -> bool {
    match target {
        Target::Point(_) => false,
        Target::Unit(id) => world
            .unit(id)
            .is_some_and(|other| !other.is_dead() && unit.within_attack_distance(other)),
        Target::Item(_) => unit.position().distance(destination) < PICKUP_RADIUS,
    }
}

fn arrival_state(unit: &Unit, target: Target) -> UnitState {
    let phase = match target {
        Target::Unit(id) => Phase::Attacking { target: id },
        Target::Item(item) if unit.is_hero() => Phase::PickingUp { item },
        Target::Point(_) | Target::Item(_) => Phase::Idle,
    };
    UnitState::enter(unit.unit_type(), phase, unit.current_direction())
}

fn tick_walking(
    unit: &mut Unit,
    dt: u32,
    world: &dyn World,
    target: Target,
    path: &mut Path,
    tracked_cell: &mut Option<IVec2>,
    facing: &mut Direction,
) -> Option<UnitState> {
    let Some(destination) = target.destination(world) else {
        debug!(unit = %unit.id(), ?target, "target lost");
        return Some(UnitState::idle(unit));
    };

    if let Target::Unit(_) = target {
        let cell = snap_to_cell(destination);
        if *tracked_cell != Some(cell) {
            *path = world.find_path(unit.position(), destination);
            *tracked_cell = Some(cell);
        }
    }

    if has_arrived(unit, target, destination, world) {
        return Some(arrival_state(unit, target));
    }

    if let Some(heading) = unit.advance_along(path, dt) {
        *facing = heading;
    }

    if has_arrived(unit, target, destination, world) {
        return Some(arrival_state(unit, target));
    }

    if !path.is_empty() {
        return None;
    }

    match target {
        Target::Unit(_) => {
            // Path ran out short of the target: plan again from here.
            *path = world.find_path(unit.position(), destination);
            if path.is_empty() {
                Some(UnitState::idle(unit))
            } else {
                None
            }
        }
        Target::Point(_) | Target::Item(_) => Some(UnitState::idle(unit)),
    }
}

fn tick_attacking(
    unit: &mut Unit,
    world: &mut dyn World,
    target: UnitId,
    clock: &AnimationClock,
    facing: &mut Direction,
) -> Result<Option<UnitState>> {
    let Some(foe) = world.unit(target).filter(|foe| !foe.is_dead()) else {
        return Ok(Some(UnitState::idle(unit)));
    };
    *facing = Direction::between(unit.position(), foe.position());

    if !unit.within_attack_distance(foe) {
        return Ok(walk_to(unit, Target::Unit(target), world).or_else(|| Some(UnitState::idle(unit))));
    }

    if clock.entered_frame(unit.unit_type().stats().impact_frame) {
        combat::perform_attack(unit, target, world)?;
        if world.unit(target).map_or(true, Unit::is_dead) {
            return Ok(Some(UnitState::idle(unit)));
        }
    }
    Ok(None)
}

fn tick_picking_up(unit: &mut Unit, world: &mut dyn World, item: ItemId) -> Result<Option<UnitState>> {
    let Some(position) = world.item(item).map(|item| item.position) else {
        return Ok(Some(UnitState::idle(unit)));
    };
    if unit.position().distance(position) >= PICKUP_RADIUS {
        return Ok(walk_to(unit, Target::Item(item), world));
    }
    if let Some(taken) = world.take_item(item) {
        unit.pick_up(taken)?;
    }
    Ok(Some(UnitState::idle(unit)))
}

/// Current state plus the pending request slot.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: UnitState,
    requested: Option<UnitState>,
}

impl StateMachine {
    /// Start in `initial`.
    #[must_use]
    pub fn new(initial: UnitState) -> Self {
        Self {
            current: initial,
            requested: None,
        }
    }

    /// Active state.
    #[must_use]
    pub const fn current(&self) -> &UnitState {
        &self.current
    }

    /// Pending request, if any.
    #[must_use]
    pub const fn requested(&self) -> Option<&UnitState> {
        self.requested.as_ref()
    }

    /// Request a state from inside a tick. Never replaces a pending request.
    pub fn request(&mut self, next: UnitState) {
        if self.requested.is_none() {
            self.requested = Some(next);
        }
    }

    /// External order. Replaces any pending request.
    pub fn order(&mut self, next: UnitState) {
        self.requested = Some(next);
    }

    /// Switch immediately and drop any pending request.
    pub fn force(&mut self, next: UnitState) {
        self.current = next;
        self.requested = None;
    }

    /// Commit the pending request. Returns true if the state kind changed or
    /// a new state of the same kind replaced the old one.
    pub fn commit(&mut self) -> bool {
        let Some(requested) = self.requested.take() else {
            return false;
        };
        let current = std::mem::take(&mut self.current);
        let dying = current.kind() == StateKind::Dying;
        self.current = update_state(current, Some(requested));
        !dying
    }

    pub(crate) fn take_current(&mut self) -> UnitState {
        std::mem::take(&mut self.current)
    }

    pub(crate) fn restore_current(&mut self, state: UnitState) {
        self.current = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walking_phase() -> Phase {
        Phase::Walking {
            target: Target::Point(Vec2::new(1.0, 1.0)),
            path: Path::empty(),
            tracked_cell: None,
        }
    }

    fn state(phase: Phase) -> UnitState {
        UnitState::enter(UnitType::Archer, phase, Direction::Down)
    }

    mod update_state_tests {
        use super::*;

        #[test]
        fn no_request_keeps_current() {
            let current = state(Phase::Idle);
            assert_eq!(update_state(current.clone(), None), current);
        }

        #[test]
        fn request_wins() {
            let next = update_state(state(Phase::Idle), Some(state(walking_phase())));
            assert_eq!(next.kind(), StateKind::Walking);
        }

        #[test]
        fn dying_ignores_requests() {
            let next = update_state(
                state(Phase::Dying { notified: false }),
                Some(state(Phase::Idle)),
            );
            assert_eq!(next.kind(), StateKind::Dying);
        }
    }

    mod machine_tests {
        use super::*;

        #[test]
        fn request_does_not_overwrite() {
            let mut machine = StateMachine::default();
            machine.request(state(walking_phase()));
            machine.request(state(Phase::Attacking { target: UnitId::new(2) }));
            assert_eq!(machine.requested().map(UnitState::kind), Some(StateKind::Walking));
        }

        #[test]
        fn order_overwrites() {
            let mut machine = StateMachine::default();
            machine.request(state(Phase::Attacking { target: UnitId::new(2) }));
            machine.order(state(walking_phase()));
            assert!(machine.commit());
            assert_eq!(machine.current().kind(), StateKind::Walking);
            assert!(machine.requested().is_none());
        }

        #[test]
        fn force_clears_request() {
            let mut machine = StateMachine::default();
            machine.order(state(walking_phase()));
            machine.force(state(Phase::Dying { notified: false }));
            assert!(machine.requested().is_none());
            assert!(!machine.commit());
            assert_eq!(machine.current().kind(), StateKind::Dying);
        }

        #[test]
        fn commit_without_request_is_a_no_op() {
            let mut machine = StateMachine::default();
            assert!(!machine.commit());
            assert_eq!(machine.current().kind(), StateKind::Idle);
        }
    }

    mod animation_tests {
        use super::*;
        use crate::archetype::Sequence;

        #[test]
        fn attacking_uses_attack_sequence() {
            let attacking = UnitState::enter(
                UnitType::Spearman,
                Phase::Attacking { target: UnitId::new(1) },
                Direction::Left,
            );
            assert_eq!(attacking.clock().sequence(), Sequence::Thrust);
            assert_eq!(attacking.facing(), Direction::Left);
        }

        #[test]
        fn walking_uses_walk_sequence() {
            assert_eq!(state(walking_phase()).clock().sequence(), Sequence::Walk);
        }
    }
}
