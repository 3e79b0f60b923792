//! The [`Pather`] adapter between the search engine and the grid model.

use flowgrid_core::{GridMap, Point};
use flowgrid_paths::Pather;

/// Yields the in-bounds, passable neighbors of a cell, in the canonical
/// up, down, left, right order.
///
/// Passability is re-read from the live grid on every call rather than
/// cached, so obstacle cells are never admitted to the frontier and
/// obstacle edits made while an animation is suspended between ticks take
/// effect on the next relaxation.
pub struct GridPather<'a> {
    grid: &'a GridMap,
}

impl<'a> GridPather<'a> {
    /// Create a pather over `grid`.
    pub fn new(grid: &'a GridMap) -> Self {
        Self { grid }
    }
}

impl Pather for GridPather<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        // A cell made impassable after admission is a dead end: nothing
        // routes through it.
        if !self.grid.passable(p) {
            return;
        }
        for n in p.neighbors_4() {
            if self.grid.passable(n) {
                buf.push(n);
            }
        }
    }
}
