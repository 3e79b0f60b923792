//! The [`Session`] — the explicit owner of all mutable state.
//!
//! A session composes the grid model, the undo histories, a reusable
//! search range for synchronous queries, and the animation driver. The
//! presentation adapter calls into it and owns nothing but rendering,
//! input, and the tick timer.

use std::fmt;

use flowgrid_core::{Endpoint, GridError, GridMap, Highlight, Point};
use flowgrid_paths::SearchRange;

use crate::anim::{AnimationConfig, AnimationDriver, FlowMode, TickEvent};
use crate::history::{FlowRecord, HighlightHistory, PathRecord};
use crate::pather::GridPather;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reported by session operations. All are recoverable and expected:
/// "no path" and "nothing to undo" are ordinary outcomes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A grid model operation was rejected.
    Grid(GridError),
    /// A search run was requested before both endpoints were set.
    EndpointsRequired,
    /// An animation was started while another run is active.
    AnimationAlreadyRunning,
    /// The frontier emptied before the target was finalized.
    NoPathFound,
    /// The requested undo stack is empty.
    NothingToUndo,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => e.fmt(f),
            Self::EndpointsRequired => f.write_str("both start and end points must be set"),
            Self::AnimationAlreadyRunning => f.write_str("an animation is already running"),
            Self::NoPathFound => f.write_str("no path found"),
            Self::NothingToUndo => f.write_str("nothing to undo"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owns the grid, the histories, the synchronous search caches, and the
/// animation driver.
///
/// Single-threaded, cooperative: synchronous searches run to completion
/// within one call; the animation advances only when [`tick`](Session::tick)
/// is called. Obstacle and endpoint edits between ticks are honored by the
/// next relaxation; other grid mutation during an active run is the
/// caller's responsibility.
pub struct Session {
    grid: GridMap,
    history: HighlightHistory,
    search: SearchRange,
    anim: AnimationDriver,
}

impl Session {
    /// Create a session over a fresh `width × height` grid.
    pub fn new(width: i32, height: i32, config: AnimationConfig) -> Result<Self, SessionError> {
        let grid = GridMap::new(width, height)?;
        Ok(Self {
            search: SearchRange::new(grid.bounds()),
            grid,
            history: HighlightHistory::new(),
            anim: AnimationDriver::new(config),
        })
    }

    /// The grid model.
    #[inline]
    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    /// The undo histories.
    #[inline]
    pub fn history(&self) -> &HighlightHistory {
        &self.history
    }

    /// The animation driver (status / interval queries).
    #[inline]
    pub fn animation(&self) -> &AnimationDriver {
        &self.anim
    }

    /// Replace the grid with a fresh `width × height` one, discarding all
    /// cell state, highlights, endpoints, and both histories. Any active
    /// animation is cancelled.
    pub fn rebuild(&mut self, width: i32, height: i32) -> Result<(), SessionError> {
        let grid = GridMap::new(width, height)?;
        self.anim.cancel();
        self.grid = grid;
        self.search.set_range(self.grid.bounds());
        self.history.clear();
        log::debug!("grid rebuilt to {width}x{height}");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Grid edits
    // -----------------------------------------------------------------------

    /// Mark or clear an obstacle. See [`GridMap::set_obstacle`].
    pub fn set_obstacle(&mut self, p: Point, flag: bool) -> Result<bool, SessionError> {
        Ok(self.grid.set_obstacle(p, flag)?)
    }

    /// Flip a cell's obstacle state. See [`GridMap::toggle_obstacle`].
    pub fn toggle_obstacle(&mut self, p: Point) -> Result<bool, SessionError> {
        Ok(self.grid.toggle_obstacle(p)?)
    }

    /// Assign the start or end role. See [`GridMap::set_endpoint`].
    pub fn set_endpoint(&mut self, which: Endpoint, p: Point) -> Result<(), SessionError> {
        Ok(self.grid.set_endpoint(which, p)?)
    }

    /// Reset both endpoint roles.
    pub fn clear_endpoints(&mut self) {
        self.grid.clear_endpoints();
    }

    // -----------------------------------------------------------------------
    // Synchronous path computation
    // -----------------------------------------------------------------------

    /// Compute and paint the shortest path between the two endpoints.
    ///
    /// Early-stop search; on success the path cells receive the path
    /// highlight, the record is pushed onto the path stack, and the
    /// endpoint selection is cleared so the next pair can be placed. On
    /// [`SessionError::NoPathFound`] nothing is painted and the endpoints
    /// stay set.
    pub fn compute_path(&mut self) -> Result<PathRecord, SessionError> {
        let (Some(start), Some(end)) = (self.grid.start(), self.grid.end()) else {
            return Err(SessionError::EndpointsRequired);
        };
        let path = {
            let pather = GridPather::new(&self.grid);
            self.search.find_path(&pather, start, end)
        };
        let Some(cells) = path else {
            log::debug!("no path from {start} to {end}");
            return Err(SessionError::NoPathFound);
        };
        for &p in &cells {
            self.grid.set_highlight(p, Highlight::Path);
        }
        log::debug!("path of {} cells from {start} to {end}", cells.len());
        let record = PathRecord::new(cells);
        self.history.push_path(record.clone());
        self.grid.clear_endpoints();
        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Animation
    // -----------------------------------------------------------------------

    /// Start an animated run between the two endpoints.
    pub fn start_flow(&mut self, mode: FlowMode) -> Result<(), SessionError> {
        self.anim.start(&self.grid, mode)
    }

    /// Advance the active animation by one tick.
    pub fn tick(&mut self) -> Result<Option<TickEvent>, SessionError> {
        self.anim.tick(&mut self.history)
    }

    /// Abort the active animation, clearing its shading.
    pub fn cancel_flow(&mut self) {
        self.anim.cancel();
    }

    // -----------------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------------

    /// Undo the most recent path run.
    pub fn undo_path(&mut self) -> Result<PathRecord, SessionError> {
        self.history
            .undo_path(&self.grid)
            .ok_or(SessionError::NothingToUndo)
    }

    /// Undo the most recent flow run. Also clears the endpoint selection,
    /// returning the board to the pick-a-pair state.
    pub fn undo_flow(&mut self) -> Result<FlowRecord, SessionError> {
        let record = self
            .history
            .undo_flow(&self.grid)
            .ok_or(SessionError::NothingToUndo)?;
        self.grid.clear_endpoints();
        Ok(record)
    }

    /// Clear both histories and every cell highlight, leaving obstacles
    /// and endpoints in place.
    pub fn reset_highlights(&mut self) {
        self.history.reset_all(&self.grid);
    }
}
