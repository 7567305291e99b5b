//! # Waypoint
//!
//! Grid geometry and best-effort pathfinding for battlefield units.
//!
//! Map coordinates are continuous (`glam::Vec2`); the navigation graph is the
//! integer grid underneath them, where cell `(x, y)` is centred on the map
//! point `(x, y)`. This crate provides:
//!
//! - **Geometry**: [`MapSize`], [`MapRect`] and [`Direction`] value types
//! - **Grid**: a bounded passability [`Grid`] usable as a pathfinding oracle
//! - **Path**: a front-consumable waypoint sequence ([`Path`])
//! - **Pathfinder**: an 8-connected best-first search that never fails
//!   ([`Pathfinder`])
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use waypoint::{find_path, Grid};
//!
//! let grid = Grid::open(8, 8);
//! let path = find_path(|cell| grid.is_passable(cell), Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0));
//!
//! assert_eq!(path.to_vec(), vec![Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geometry;
pub mod grid;
pub mod path;
pub mod pathfinder;

// Re-exports for convenience
pub use geometry::{cell_centre, snap_to_cell, Direction, MapRect, MapSize};
pub use grid::Grid;
pub use path::Path;
pub use pathfinder::{find_path, Pathfinder, PathfinderConfig, DEFAULT_MAX_EXPANSIONS};

pub use glam::{IVec2, Vec2};
