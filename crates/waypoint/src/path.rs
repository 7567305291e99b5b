//! Front-consumable waypoint sequence.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ordered waypoints a unit walks through, consumed from the front.
///
/// A path is owned by the unit following it and is never shared; retargeting
/// replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    waypoints: VecDeque<Vec2>,
}

impl Path {
    /// Create an empty path.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Next waypoint, if any.
    #[must_use]
    pub fn front(&self) -> Option<Vec2> {
        self.waypoints.front().copied()
    }

    /// Final waypoint, if any.
    #[must_use]
    pub fn destination(&self) -> Option<Vec2> {
        self.waypoints.back().copied()
    }

    /// Remove and return the next waypoint.
    pub fn pop_front(&mut self) -> Option<Vec2> {
        self.waypoints.pop_front()
    }

    /// Number of remaining waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True once every waypoint has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Iterate over the remaining waypoints in order.
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.waypoints.iter().copied()
    }

    /// Copy the remaining waypoints into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Vec2> {
        self.iter().collect()
    }
}

impl From<Vec<Vec2>> for Path {
    fn from(waypoints: Vec<Vec2>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }
}

impl FromIterator<Vec2> for Path {
    fn from_iter<I: IntoIterator<Item = Vec2>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}
