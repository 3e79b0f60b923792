//! Undo histories for painted runs.
//!
//! Two independent stacks track what each run painted: path computations
//! and flow animations undo separately, each in last-in-first-out order.

use flowgrid_core::{GridMap, Highlight, Point};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// An ordered sequence of cells from start to end inclusive, produced by
/// one successful path computation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRecord {
    cells: Vec<Point>,
}

impl PathRecord {
    pub(crate) fn new(cells: Vec<Point>) -> Self {
        Self { cells }
    }

    /// The path cells, in start→end order.
    #[inline]
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// Number of cells in the path (steps + 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The cells given the flow highlight by one animation run, in visitation
/// order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowRecord {
    cells: Vec<Point>,
}

impl FlowRecord {
    pub(crate) fn new(cells: Vec<Point>) -> Self {
        Self { cells }
    }

    /// The shaded cells, in the order they were finalized.
    #[inline]
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ---------------------------------------------------------------------------
// HighlightHistory
// ---------------------------------------------------------------------------

/// Two independent LIFO stacks of painted runs.
///
/// Undo resets every cell named in the popped record to no highlight,
/// regardless of what later runs may have painted over it (last-writer-wins
/// reset): undoing run X can blank a cell that run Y repainted in the
/// meantime. Callers wanting stricter behavior must avoid overlapping runs.
#[derive(Debug, Default)]
pub struct HighlightHistory {
    path_stack: Vec<PathRecord>,
    flow_stack: Vec<FlowRecord>,
}

impl HighlightHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path run.
    pub fn push_path(&mut self, record: PathRecord) {
        self.path_stack.push(record);
    }

    /// Append a flow run.
    pub fn push_flow(&mut self, record: FlowRecord) {
        self.flow_stack.push(record);
    }

    /// Number of undoable path runs.
    #[inline]
    pub fn path_depth(&self) -> usize {
        self.path_stack.len()
    }

    /// Number of undoable flow runs.
    #[inline]
    pub fn flow_depth(&self) -> usize {
        self.flow_stack.len()
    }

    /// Pop the most recent path run and blank every cell it painted.
    /// Returns `None` when there is nothing to undo.
    pub fn undo_path(&mut self, grid: &GridMap) -> Option<PathRecord> {
        let record = self.path_stack.pop()?;
        for &p in record.cells() {
            grid.set_highlight(p, Highlight::None);
        }
        Some(record)
    }

    /// Pop the most recent flow run and blank every cell it painted.
    /// Returns `None` when there is nothing to undo.
    pub fn undo_flow(&mut self, grid: &GridMap) -> Option<FlowRecord> {
        let record = self.flow_stack.pop()?;
        for &p in record.cells() {
            grid.set_highlight(p, Highlight::None);
        }
        Some(record)
    }

    /// Drop both stacks without touching the grid. Used when the grid
    /// itself is being rebuilt.
    pub fn clear(&mut self) {
        self.path_stack.clear();
        self.flow_stack.clear();
    }

    /// Clear both stacks and every cell highlight.
    pub fn reset_all(&mut self, grid: &GridMap) {
        self.clear();
        grid.clear_highlights();
    }
}
