//! Immutable 2D value types for positions, extents and facing.
//!
//! Points are plain [`Vec2`] values; distance queries come from `glam`
//! (`Vec2::distance`). The types here add the extent and rectangle semantics
//! the simulation needs on top of that.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Width and height of an entity in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    /// Extent along x
    pub width: f32,
    /// Extent along y
    pub height: f32,
}

impl MapSize {
    /// Create a size from its two extents.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a square size.
    #[must_use]
    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// Scale both extents by `factor`, clamping each to `max`.
    #[must_use]
    pub fn scaled_capped(self, factor: f32, max: f32) -> Self {
        Self::new((self.width * factor).min(max), (self.height * factor).min(max))
    }

    /// Half of the width.
    #[must_use]
    pub fn half_width(self) -> f32 {
        self.width * 0.5
    }

    /// Half extents as a vector.
    #[must_use]
    pub fn half_extents(self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// Axis-aligned rectangle on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRect {
    /// Top-left corner (minimum x and y)
    pub top_left: Vec2,
    /// Extents
    pub size: MapSize,
}

impl MapRect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(top_left: Vec2, size: MapSize) -> Self {
        Self { top_left, size }
    }

    /// Create a rectangle centred on `centre`.
    #[must_use]
    pub fn from_centre(centre: Vec2, size: MapSize) -> Self {
        Self::new(centre - size.half_extents(), size)
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn centre(&self) -> Vec2 {
        self.top_left + self.size.half_extents()
    }

    /// Bottom-right corner (maximum x and y).
    #[must_use]
    pub fn bottom_right(&self) -> Vec2 {
        self.top_left + Vec2::new(self.size.width, self.size.height)
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.bottom_right();
        point.x >= self.top_left.x
            && point.x <= max.x
            && point.y >= self.top_left.y
            && point.y <= max.y
    }

    /// Check if two rectangles overlap (touching edges count).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let a_max = self.bottom_right();
        let b_max = other.bottom_right();
        self.top_left.x <= b_max.x
            && other.top_left.x <= a_max.x
            && self.top_left.y <= b_max.y
            && other.top_left.y <= a_max.y
    }

    /// Return a copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.top_left + delta, self.size)
    }
}

/// Facing of a unit, as consumed by sprite selection.
///
/// The y axis grows downwards (screen convention), so a target with a larger
/// y than the viewer is [`Direction::Down`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards negative y
    Up,
    /// Towards positive y
    #[default]
    Down,
    /// Towards negative x
    Left,
    /// Towards positive x
    Right,
}

impl Direction {
    /// Facing from `from` towards `to`.
    ///
    /// The dominant axis wins; exact diagonals resolve to the horizontal
    /// facing. Identical points face [`Direction::Down`].
    #[must_use]
    pub fn between(from: Vec2, to: Vec2) -> Self {
        let delta = to - from;
        if delta == Vec2::ZERO {
            return Self::Down;
        }
        if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 {
                Self::Left
            } else {
                Self::Right
            }
        } else if delta.y < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Snap a map point to the grid cell it belongs to (nearest integer point).
#[must_use]
pub fn snap_to_cell(point: Vec2) -> IVec2 {
    point.round().as_ivec2()
}

/// Map point at the centre of a grid cell.
#[must_use]
pub fn cell_centre(cell: IVec2) -> Vec2 {
    cell.as_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod size_tests {
        use super::*;

        #[test]
        fn scaled_capped_applies_cap_per_dimension() {
            let size = MapSize::new(0.5, 0.9).scaled_capped(1.5, 1.0);
            assert!((size.width - 0.75).abs() < 1e-6);
            assert_eq!(size.height, 1.0);
        }

        #[test]
        fn half_extents() {
            let size = MapSize::new(2.0, 4.0);
            assert_eq!(size.half_extents(), Vec2::new(1.0, 2.0));
            assert_eq!(size.half_width(), 1.0);
        }
    }

    mod rect_tests {
        use super::*;

        #[test]
        fn from_centre_round_trips_centre() {
            let rect = MapRect::from_centre(Vec2::new(3.0, 4.0), MapSize::square(2.0));
            assert_eq!(rect.top_left, Vec2::new(2.0, 3.0));
            assert_eq!(rect.centre(), Vec2::new(3.0, 4.0));
        }

        #[test]
        fn contains_is_edge_inclusive() {
            let rect = MapRect::new(Vec2::ZERO, MapSize::square(1.0));
            assert!(rect.contains(Vec2::new(0.0, 0.0)));
            assert!(rect.contains(Vec2::new(1.0, 1.0)));
            assert!(rect.contains(Vec2::new(0.5, 0.25)));
            assert!(!rect.contains(Vec2::new(1.01, 0.5)));
            assert!(!rect.contains(Vec2::new(0.5, -0.01)));
        }

        #[test]
        fn intersects() {
            let a = MapRect::new(Vec2::ZERO, MapSize::square(2.0));
            let b = MapRect::new(Vec2::new(1.5, 1.5), MapSize::square(2.0));
            let c = MapRect::new(Vec2::new(5.0, 5.0), MapSize::square(1.0));
            assert!(a.intersects(&b));
            assert!(b.intersects(&a));
            assert!(!a.intersects(&c));
        }

        #[test]
        fn translated_keeps_size() {
            let rect = MapRect::new(Vec2::ZERO, MapSize::new(1.0, 2.0));
            let moved = rect.translated(Vec2::new(3.0, -1.0));
            assert_eq!(moved.top_left, Vec2::new(3.0, -1.0));
            assert_eq!(moved.size, rect.size);
        }
    }

    mod direction_tests {
        use super::*;

        #[test]
        fn dominant_axis_wins() {
            let origin = Vec2::new(5.0, 5.0);
            assert_eq!(Direction::between(origin, Vec2::new(9.0, 6.0)), Direction::Right);
            assert_eq!(Direction::between(origin, Vec2::new(1.0, 4.0)), Direction::Left);
            assert_eq!(Direction::between(origin, Vec2::new(5.5, 1.0)), Direction::Up);
            assert_eq!(Direction::between(origin, Vec2::new(4.0, 9.0)), Direction::Down);
        }

        #[test]
        fn same_point_faces_down() {
            let p = Vec2::new(1.0, 1.0);
            assert_eq!(Direction::between(p, p), Direction::Down);
        }
    }

    mod cell_tests {
        use super::*;

        #[test]
        fn snap_rounds_to_nearest() {
            assert_eq!(snap_to_cell(Vec2::new(1.1, 1.1)), IVec2::new(1, 1));
            assert_eq!(snap_to_cell(Vec2::new(3.45, 1.234)), IVec2::new(3, 1));
            assert_eq!(snap_to_cell(Vec2::new(2.5, 0.6)), IVec2::new(3, 1));
        }

        #[test]
        fn cell_centre_is_integer_point() {
            assert_eq!(cell_centre(IVec2::new(4, -2)), Vec2::new(4.0, -2.0));
        }
    }
}
