//! Best-effort grid pathfinding.
//!
//! Searches the 8-connected integer grid underneath the map. Every step costs
//! one, diagonal or not, so the expansion is ordered by `steps + chessboard
//! distance to goal`, with ties going to the cell nearer the goal in a
//! straight line and then to the earlier discovery. A cell rediscovered at
//! the same step count takes the newer parent. The search never reports
//! failure: when the goal cannot be reached (walled off, or the expansion
//! budget runs out) the path leads to the expanded cell closest to the goal
//! instead.
//!
//! # Snapping
//!
//! Start and goal are rounded to their nearest cells for the search only. The
//! returned path excludes the start and, when the goal cell was reached, its
//! last waypoint is the goal's exact fractional position.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use waypoint::{Grid, Pathfinder};
//!
//! let grid = Grid::from_ascii(
//!     ".....\n\
//!      ..#..\n\
//!      ..#..\n\
//!      .....",
//! );
//! let pathfinder = Pathfinder::default();
//! let path = pathfinder.find_path(|cell| grid.is_passable(cell), Vec2::new(0.0, 1.0), Vec2::new(4.0, 1.0));
//!
//! assert_eq!(path.destination(), Some(Vec2::new(4.0, 1.0)));
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::geometry::{cell_centre, snap_to_cell};
use crate::path::Path;

/// Default cap on expanded cells per search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 4096;

/// 8-connected neighbourhood, orthogonal moves first.
const NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
];

/// Pathfinder tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Maximum number of cells expanded before the search gives up and
    /// returns the best partial path.
    pub max_expansions: usize,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Open-list entry.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed: the entry with the
/// lowest `f`, then lowest straight-line `distance`, then earliest insertion
/// compares greatest.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    cell: IVec2,
    f: u32,
    distance: f32,
    seq: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.distance.total_cmp(&self.distance))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Grid pathfinder with a bounded expansion budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathfinder {
    config: PathfinderConfig,
}

impl Pathfinder {
    /// Create a pathfinder with the given configuration.
    #[must_use]
    pub const fn new(config: PathfinderConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Find a path from `start` to `goal`.
    ///
    /// `passable` answers whether a grid cell can be entered. The start cell
    /// is never tested, so a unit standing on a blocked cell can still walk
    /// out of it.
    ///
    /// The result is empty when `start == goal`, or when no cell closer to
    /// the goal than the start could be reached.
    pub fn find_path<F>(&self, passable: F, start: Vec2, goal: Vec2) -> Path
    where
        F: Fn(IVec2) -> bool,
    {
        if start == goal {
            return Path::empty();
        }

        let start_cell = snap_to_cell(start);
        let goal_cell = snap_to_cell(goal);
        if start_cell == goal_cell {
            return Path::from(vec![goal]);
        }

        let remaining = |cell: IVec2| (goal_cell - cell).abs().max_element().unsigned_abs();
        let distance = |cell: IVec2| cell.as_vec2().distance(goal_cell.as_vec2());

        let mut open = BinaryHeap::new();
        let mut closed: HashSet<IVec2> = HashSet::new();
        let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
        let mut steps: HashMap<IVec2, u32> = HashMap::new();
        let mut seq = 0_u64;

        let start_distance = distance(start_cell);
        open.push(OpenNode {
            cell: start_cell,
            f: remaining(start_cell),
            distance: start_distance,
            seq,
        });
        steps.insert(start_cell, 0);

        let mut best = (start_cell, start_distance);
        let mut reached = false;
        let mut expansions = 0_usize;

        while let Some(node) = open.pop() {
            if !closed.insert(node.cell) {
                continue;
            }
            if node.distance < best.1 {
                best = (node.cell, node.distance);
            }
            if node.cell == goal_cell {
                reached = true;
                break;
            }

            expansions += 1;
            if expansions > self.config.max_expansions {
                warn!(
                    start = ?start_cell,
                    goal = ?goal_cell,
                    max_expansions = self.config.max_expansions,
                    "pathfinder expansion budget exhausted, using closest cell"
                );
                break;
            }

            let node_steps = steps.get(&node.cell).copied().unwrap_or(0);
            for offset in NEIGHBOURS {
                let next = node.cell + offset;
                if closed.contains(&next) || !passable(next) {
                    continue;
                }
                let next_steps = node_steps + 1;
                if steps.get(&next).is_some_and(|&known| known < next_steps) {
                    continue;
                }
                steps.insert(next, next_steps);
                came_from.insert(next, node.cell);

                seq += 1;
                open.push(OpenNode {
                    cell: next,
                    f: next_steps + remaining(next),
                    distance: distance(next),
                    seq,
                });
            }
        }

        let end = if reached { goal_cell } else { best.0 };
        if end == start_cell {
            trace!(start = ?start_cell, goal = ?goal_cell, "no progress possible");
            return Path::empty();
        }

        let mut cells = vec![end];
        let mut cursor = end;
        while let Some(&previous) = came_from.get(&cursor) {
            if previous == start_cell {
                break;
            }
            cells.push(previous);
            cursor = previous;
        }
        cells.reverse();

        let mut waypoints: Vec<Vec2> = cells.into_iter().map(cell_centre).collect();
        if reached {
            if let Some(last) = waypoints.last_mut() {
                *last = goal;
            }
        }

        trace!(
            start = ?start_cell,
            goal = ?goal_cell,
            reached,
            waypoints = waypoints.len(),
            expansions,
            "path planned"
        );
        Path::from(waypoints)
    }
}

/// Find a path with the default configuration.
///
/// See [`Pathfinder::find_path`].
pub fn find_path<F>(passable: F, start: Vec2, goal: Vec2) -> Path
where
    F: Fn(IVec2) -> bool,
{
    Pathfinder::default().find_path(passable, start, goal)
}
