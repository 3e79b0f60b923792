//! The [`GridMap`] type — the authoritative map of cell positions to their
//! passability, endpoint role, and highlight.
//!
//! A `GridMap` is a *view* into a shared backing buffer. Cloning a `GridMap`
//! yields another view of the **same** storage, so a long-running animation
//! can hold a live view while the session keeps ownership.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cell::{CellState, Endpoint, Highlight, Role};
use crate::geom::{Point, Range};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reported by grid model operations. All are recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A grid extent was not a positive integer.
    InvalidDimensions { width: i32, height: i32 },
    /// A cell coordinate was outside the grid bounds.
    InvalidCell { pos: Point },
    /// The requested endpoint role is already assigned to a cell.
    EndpointAlreadySet { which: Endpoint },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::InvalidCell { pos } => write!(f, "cell {pos} is out of bounds"),
            Self::EndpointAlreadySet { which } => {
                write!(f, "{which} point is already set")
            }
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct GridBuffer {
    cells: Vec<CellState>,
    width: i32,
    start: Option<Point>,
    end: Option<Point>,
}

impl GridBuffer {
    #[inline]
    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }
}

// ---------------------------------------------------------------------------
// GridMap
// ---------------------------------------------------------------------------

/// A `height × width` grid of [`CellState`]s backed by shared storage, plus
/// the two endpoint slots.
///
/// Cloning produces another view into the same buffer. Dimensions are fixed
/// for the lifetime of the map; resizing means building a fresh `GridMap`,
/// which discards all cell state, highlights, and endpoints.
#[derive(Debug, Clone)]
pub struct GridMap {
    buf: Rc<RefCell<GridBuffer>>,
    bounds: Range,
}

impl GridMap {
    /// Create an all-passable, highlight-free grid with no endpoints.
    ///
    /// Fails with [`GridError::InvalidDimensions`] unless both extents are
    /// at least 1.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width < 1 || height < 1 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let cells = vec![CellState::default(); (width * height) as usize];
        let buf = Rc::new(RefCell::new(GridBuffer {
            cells,
            width,
            start: None,
            end: None,
        }));
        Ok(Self {
            buf,
            bounds: Range::new(0, 0, width, height),
        })
    }

    /// The bounding range of the grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size as a `Point` (width = x, height = y).
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width of the grid.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the grid.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside the grid bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Read the cell at `p`, or `None` if out of bounds.
    pub fn cell(&self, p: Point) -> Option<CellState> {
        if !self.bounds.contains(p) {
            return None;
        }
        let buf = self.buf.borrow();
        let idx = buf.index(p);
        Some(buf.cells[idx])
    }

    /// Whether the search may traverse `p`. Out-of-bounds cells are not
    /// passable.
    #[inline]
    pub fn passable(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| c.passable)
    }

    // -----------------------------------------------------------------------
    // Obstacles
    // -----------------------------------------------------------------------

    /// Mark `p` as an obstacle (`flag = true`) or clear it (`flag = false`).
    ///
    /// A cell holding the start or end point is never made an obstacle; the
    /// call is accepted but changes nothing. Returns whether passability
    /// actually changed.
    pub fn set_obstacle(&self, p: Point, flag: bool) -> Result<bool, GridError> {
        if !self.bounds.contains(p) {
            return Err(GridError::InvalidCell { pos: p });
        }
        if self.role(p).is_some() {
            return Ok(false);
        }
        let mut buf = self.buf.borrow_mut();
        let idx = buf.index(p);
        let changed = buf.cells[idx].passable == flag;
        buf.cells[idx].passable = !flag;
        Ok(changed)
    }

    /// Flip the obstacle state of `p`, returning the new obstacle flag.
    ///
    /// Same endpoint policy as [`set_obstacle`](Self::set_obstacle): a
    /// start/end cell stays passable and `false` is returned.
    pub fn toggle_obstacle(&self, p: Point) -> Result<bool, GridError> {
        if !self.bounds.contains(p) {
            return Err(GridError::InvalidCell { pos: p });
        }
        if self.role(p).is_some() {
            return Ok(false);
        }
        let mut buf = self.buf.borrow_mut();
        let idx = buf.index(p);
        buf.cells[idx].passable = !buf.cells[idx].passable;
        Ok(!buf.cells[idx].passable)
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// Assign the start or end role to `p`.
    ///
    /// Fails with [`GridError::EndpointAlreadySet`] if that role is already
    /// assigned, or if `p` already holds the other role (start and end must
    /// be distinct cells). Placing an endpoint on an obstacle cell clears
    /// the obstacle: a cell is never simultaneously endpoint and obstacle.
    pub fn set_endpoint(&self, which: Endpoint, p: Point) -> Result<(), GridError> {
        if !self.bounds.contains(p) {
            return Err(GridError::InvalidCell { pos: p });
        }
        if self.endpoint(which).is_some() {
            return Err(GridError::EndpointAlreadySet { which });
        }
        if self.endpoint(which.other()) == Some(p) {
            return Err(GridError::EndpointAlreadySet {
                which: which.other(),
            });
        }
        let mut buf = self.buf.borrow_mut();
        let idx = buf.index(p);
        buf.cells[idx].passable = true;
        match which {
            Endpoint::Start => buf.start = Some(p),
            Endpoint::End => buf.end = Some(p),
        }
        Ok(())
    }

    /// Reset both endpoint roles without touching passability or highlights.
    pub fn clear_endpoints(&self) {
        let mut buf = self.buf.borrow_mut();
        buf.start = None;
        buf.end = None;
    }

    /// The cell currently holding `which`, if any.
    pub fn endpoint(&self, which: Endpoint) -> Option<Point> {
        let buf = self.buf.borrow();
        match which {
            Endpoint::Start => buf.start,
            Endpoint::End => buf.end,
        }
    }

    /// The start cell, if set.
    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.endpoint(Endpoint::Start)
    }

    /// The end cell, if set.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.endpoint(Endpoint::End)
    }

    /// The endpoint role held by `p`, if any.
    pub fn role(&self, p: Point) -> Role {
        let buf = self.buf.borrow();
        if buf.start == Some(p) {
            Some(Endpoint::Start)
        } else if buf.end == Some(p) {
            Some(Endpoint::End)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Highlights
    // -----------------------------------------------------------------------

    /// The highlight at `p`. Out-of-bounds cells report no highlight.
    pub fn highlight(&self, p: Point) -> Highlight {
        self.cell(p).map_or(Highlight::None, |c| c.highlight)
    }

    /// Set the highlight at `p` (last write wins). No-op if out of bounds.
    pub fn set_highlight(&self, p: Point, highlight: Highlight) {
        if !self.bounds.contains(p) {
            return;
        }
        let mut buf = self.buf.borrow_mut();
        let idx = buf.index(p);
        buf.cells[idx].highlight = highlight;
    }

    /// Reset every cell's highlight to none.
    pub fn clear_highlights(&self) {
        let mut buf = self.buf.borrow_mut();
        for cell in buf.cells.iter_mut() {
            cell.highlight = Highlight::None;
        }
    }

    // -----------------------------------------------------------------------
    // Neighbors
    // -----------------------------------------------------------------------

    /// Append the ≤4 axis-adjacent in-bounds neighbors of `p` into `buf`,
    /// in up, down, left, right order. The caller clears `buf` beforehand.
    pub fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_4() {
            if self.bounds.contains(n) {
                buf.push(n);
            }
        }
    }
}
