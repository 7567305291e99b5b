//! Bounded passability grid.
//!
//! The grid is the usual passability oracle handed to the pathfinder. Cells
//! outside the bounds are never passable, so a search over a grid always
//! terminates even when the goal cannot be reached.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Width x height grid of passable/blocked cells.
///
/// # Example
///
/// ```
/// use glam::IVec2;
/// use waypoint::Grid;
///
/// let grid = Grid::from_ascii(
///     "...\n\
///      .#.\n\
///      ...",
/// );
/// assert!(grid.is_passable(IVec2::new(0, 0)));
/// assert!(!grid.is_passable(IVec2::new(1, 1)));
/// assert!(!grid.is_passable(IVec2::new(3, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    /// Row-major, `true` for blocked cells.
    blocked: Vec<bool>,
}

impl Grid {
    /// Create a grid with every cell passable.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; width as usize * height as usize],
        }
    }

    /// Parse a grid from rows of text: `#` is blocked, anything else is open.
    ///
    /// Leading and trailing whitespace on each row is ignored, blank rows are
    /// skipped, and short rows are padded with open cells.
    #[must_use]
    pub fn from_ascii(text: &str) -> Self {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);

        #[allow(clippy::cast_possible_truncation)]
        let mut grid = Self::open(width as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.blocked[y * width + x] = true;
                }
            }
        }
        grid
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index_of(&self, cell: IVec2) -> Option<usize> {
        let x = u32::try_from(cell.x).ok()?;
        let y = u32::try_from(cell.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Check if a cell is inside the grid and not blocked.
    #[must_use]
    pub fn is_passable(&self, cell: IVec2) -> bool {
        self.index_of(cell)
            .is_some_and(|index| !self.blocked[index])
    }

    /// Block a cell. Returns false if the cell is outside the grid.
    pub fn block(&mut self, cell: IVec2) -> bool {
        self.set_blocked(cell, true)
    }

    /// Unblock a cell. Returns false if the cell is outside the grid.
    pub fn unblock(&mut self, cell: IVec2) -> bool {
        self.set_blocked(cell, false)
    }

    fn set_blocked(&mut self, cell: IVec2, value: bool) -> bool {
        match self.index_of(cell) {
            Some(index) => {
                self.blocked[index] = value;
                true
            }
            None => false,
        }
    }

    /// Number of blocked cells.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|blocked| **blocked).count()
    }
}
