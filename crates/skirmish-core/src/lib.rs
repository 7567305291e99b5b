//! # Skirmish Core
//!
//! Unit simulation engine for a real-time battlefield.
//!
//! Units with health, team, level and position move, fight and die under a
//! fixed-tick update loop. Each unit runs a small state machine
//! (idle, walking, attacking, dying, picking up) that is advanced exactly once
//! per world tick and commits at most one transition.
//!
//! ## Architecture
//!
//! - **Units**: [`unit::Unit`] aggregates state machine, targeting, effects
//!   and an optional hero loadout
//! - **Combat**: damage, kills, level-ups and projectile/melee dispatch
//!   ([`unit::combat`])
//! - **Usables**: cooldown-gated abilities and items that attach time-boxed
//!   [`usable::Effect`]s
//! - **World**: the [`world::World`] trait is everything a unit needs from its
//!   surroundings; [`battlefield::Battlefield`] is the concrete implementation
//! - **Pathfinding**: provided by the `waypoint` crate
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::battlefield::Battlefield;
//! use skirmish_core::config::BattlefieldConfig;
//! use skirmish_core::team::Team;
//! use skirmish_core::archetype::UnitType;
//! use skirmish_core::unit::Target;
//! use waypoint::Grid;
//!
//! let mut field = Battlefield::new(BattlefieldConfig::default(), Grid::open(10, 10));
//! let id = field.spawn_unit(UnitType::Swordsman, Team::Player, Vec2::new(1.0, 1.0));
//! field.order(&[id], Target::Point(Vec2::new(3.0, 1.0))).unwrap();
//!
//! for _ in 0..40 {
//!     field.step().unwrap();
//! }
//! assert_eq!(field.unit(id).unwrap().position(), Vec2::new(3.0, 1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod archetype;
pub mod battlefield;
pub mod config;
pub mod entity;
pub mod error;
pub mod notify;
pub mod team;
pub mod timer;
pub mod unit;
pub mod usable;
pub mod world;

#[cfg(test)]
mod tests;

// Re-export the pathfinding crate for world implementors
pub use waypoint;

pub use error::{ErrorKind, Result, SimError};
