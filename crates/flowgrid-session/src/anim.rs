//! The animation driver — paces one search run across discrete ticks.
//!
//! The driver owns the lifecycle of a run (`Idle → Running → {Completed,
//! Cancelled}`). Each tick finalizes exactly one frontier cell; the adapter
//! owns the timer that spaces the ticks at [`AnimationDriver::interval`].
//! Ticks are strictly sequential — the tick cadence is a presentation
//! concern and never affects the visitation order.

use std::time::Duration;

use flowgrid_core::{GridMap, Highlight, Point};
use flowgrid_paths::SearchRange;

use crate::history::{FlowRecord, HighlightHistory, PathRecord};
use crate::pather::GridPather;
use crate::session::SessionError;

/// What an animated run does once its search stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    /// Reveal the frontier until the end cell is finalized (or the
    /// reachable region is exhausted); the shaded cells become one
    /// undoable flow run.
    Flow,
    /// Exhaust the reachable region, then compute and paint the shortest
    /// path; the path becomes one undoable path run.
    ExplorePath,
}

/// Lifecycle state of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Configuration for creating an [`AnimationDriver`].
#[derive(Debug, Clone, Copy)]
pub struct AnimationConfig {
    /// Wall-clock spacing between ticks. Pacing metadata for the adapter's
    /// timer; correctness never depends on it.
    pub interval: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
        }
    }
}

/// The per-tick observer payload: the newly finalized cell and the
/// highlight applied to it (`None` when the cell was made impassable after
/// admission and received no shading).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub pos: Point,
    pub highlight: Option<Highlight>,
}

struct RunState {
    /// Live view of the session's grid (shared storage).
    grid: GridMap,
    search: SearchRange,
    source: Point,
    target: Point,
    mode: FlowMode,
    /// Cells shaded so far by this run, in visitation order.
    shaded: Vec<Point>,
}

/// Paces a single search run across discrete time steps, exposing one
/// frontier finalization per tick. At most one run is active at a time;
/// starting a second while one is `Running` is a usage error, not a queue.
pub struct AnimationDriver {
    interval: Duration,
    status: AnimStatus,
    run: Option<RunState>,
}

impl AnimationDriver {
    /// Create an idle driver.
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            interval: config.interval,
            status: AnimStatus::Idle,
            run: None,
        }
    }

    /// The configured tick spacing.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current lifecycle state.
    #[inline]
    pub fn status(&self) -> AnimStatus {
        self.status
    }

    /// Begin a run over `grid` from its start endpoint toward its end
    /// endpoint.
    ///
    /// Fails with [`SessionError::EndpointsRequired`] if either endpoint is
    /// unset and with [`SessionError::AnimationAlreadyRunning`] while a
    /// prior run is still `Running`. A driver whose last run completed or
    /// was cancelled can be started again.
    pub fn start(&mut self, grid: &GridMap, mode: FlowMode) -> Result<(), SessionError> {
        if self.status == AnimStatus::Running {
            return Err(SessionError::AnimationAlreadyRunning);
        }
        let (Some(source), Some(target)) = (grid.start(), grid.end()) else {
            return Err(SessionError::EndpointsRequired);
        };

        let mut search = SearchRange::new(grid.bounds());
        search.begin(source);
        self.run = Some(RunState {
            grid: grid.clone(),
            search,
            source,
            target,
            mode,
            shaded: Vec::new(),
        });
        self.status = AnimStatus::Running;
        log::debug!("animation started ({mode:?}): {source} -> {target}");
        Ok(())
    }

    /// Advance the run by one tick: finalize one frontier cell, shade it
    /// if it is still passable, then check the mode's stop condition.
    ///
    /// Returns the tick's observer event, `Ok(None)` when no cell was
    /// finalized (the driver is not running, or this tick only detected
    /// exhaustion), and `Err(NoPathFound)` from the completing tick of an
    /// [`FlowMode::ExplorePath`] run whose target is unreachable — the run
    /// still transitions to `Completed` and its exploration shading
    /// remains.
    pub fn tick(&mut self, history: &mut HighlightHistory) -> Result<Option<TickEvent>, SessionError> {
        if self.status != AnimStatus::Running {
            return Ok(None);
        }
        let Some(run) = self.run.as_mut() else {
            return Ok(None);
        };

        let finalized = {
            let pather = GridPather::new(&run.grid);
            run.search.step(&pather)
        };

        // Passability is re-checked against the live grid: a cell made
        // impassable after admission is finalized without shading.
        let event = finalized.map(|node| {
            let highlight = if run.grid.passable(node.pos) {
                run.grid.set_highlight(node.pos, Highlight::Flow);
                run.shaded.push(node.pos);
                Some(Highlight::Flow)
            } else {
                None
            };
            TickEvent {
                pos: node.pos,
                highlight,
            }
        });

        let stop = match run.mode {
            FlowMode::Flow => finalized.is_none() || run.search.finalized(run.target),
            FlowMode::ExplorePath => finalized.is_none(),
        };
        if !stop {
            return Ok(event);
        }

        self.status = AnimStatus::Completed;
        let Some(run) = self.run.take() else {
            return Ok(event);
        };
        match run.mode {
            FlowMode::Flow => {
                log::debug!("flow run completed, {} cells shaded", run.shaded.len());
                history.push_flow(FlowRecord::new(run.shaded));
                Ok(event)
            }
            FlowMode::ExplorePath => {
                let mut search = run.search;
                let path = {
                    let pather = GridPather::new(&run.grid);
                    search.find_path(&pather, run.source, run.target)
                };
                match path {
                    Some(cells) => {
                        for &p in &cells {
                            run.grid.set_highlight(p, Highlight::Path);
                        }
                        log::debug!("exploration completed, path of {} cells", cells.len());
                        history.push_path(PathRecord::new(cells));
                        Ok(event)
                    }
                    None => {
                        log::debug!("exploration completed, no path to {}", run.target);
                        Err(SessionError::NoPathFound)
                    }
                }
            }
        }
    }

    /// Abort a `Running` run: clears every highlight it applied so far and
    /// transitions to `Cancelled` without pushing a history entry. No-op in
    /// any other state.
    pub fn cancel(&mut self) {
        if self.status != AnimStatus::Running {
            return;
        }
        if let Some(run) = self.run.take() {
            for &p in &run.shaded {
                run.grid.set_highlight(p, Highlight::None);
            }
        }
        self.status = AnimStatus::Cancelled;
        log::debug!("animation cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgrid_core::Endpoint;

    fn grid_with_endpoints(width: i32, height: i32, start: Point, end: Point) -> GridMap {
        let g = GridMap::new(width, height).unwrap();
        g.set_endpoint(Endpoint::Start, start).unwrap();
        g.set_endpoint(Endpoint::End, end).unwrap();
        g
    }

    fn driver() -> AnimationDriver {
        AnimationDriver::new(AnimationConfig::default())
    }

    /// Tick until the driver leaves `Running`, collecting the events.
    fn drain(
        d: &mut AnimationDriver,
        h: &mut HighlightHistory,
    ) -> (Vec<TickEvent>, Result<(), SessionError>) {
        let mut events = Vec::new();
        loop {
            match d.tick(h) {
                Ok(Some(ev)) => events.push(ev),
                Ok(None) => {}
                Err(e) => {
                    assert_ne!(d.status(), AnimStatus::Running);
                    return (events, Err(e));
                }
            }
            if d.status() != AnimStatus::Running {
                return (events, Ok(()));
            }
        }
    }

    #[test]
    fn start_requires_endpoints() {
        let g = GridMap::new(3, 3).unwrap();
        let mut d = driver();
        assert!(matches!(
            d.start(&g, FlowMode::Flow),
            Err(SessionError::EndpointsRequired)
        ));
        g.set_endpoint(Endpoint::Start, Point::ZERO).unwrap();
        assert!(matches!(
            d.start(&g, FlowMode::Flow),
            Err(SessionError::EndpointsRequired)
        ));
        assert_eq!(d.status(), AnimStatus::Idle);
    }

    #[test]
    fn single_running_instance() {
        let g = grid_with_endpoints(3, 3, Point::ZERO, Point::new(2, 2));
        let mut d = driver();
        d.start(&g, FlowMode::Flow).unwrap();
        assert!(matches!(
            d.start(&g, FlowMode::Flow),
            Err(SessionError::AnimationAlreadyRunning)
        ));
        assert_eq!(d.status(), AnimStatus::Running);
    }

    #[test]
    fn flow_stops_when_target_finalized() {
        let g = grid_with_endpoints(3, 3, Point::ZERO, Point::new(2, 2));
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::Flow).unwrap();

        let (events, result) = drain(&mut d, &mut h);
        result.unwrap();
        assert_eq!(d.status(), AnimStatus::Completed);
        // On an open 3x3 grid the corner-to-corner frontier reaches the
        // target after every cell has been finalized.
        assert_eq!(events.len(), 9);
        assert_eq!(events.last().unwrap().pos, Point::new(2, 2));
        assert_eq!(h.flow_depth(), 1);
        assert_eq!(h.path_depth(), 0);
        for ev in &events {
            assert_eq!(ev.highlight, Some(Highlight::Flow));
            assert_eq!(g.highlight(ev.pos), Highlight::Flow);
        }
    }

    #[test]
    fn flow_exhausts_when_target_unreachable() {
        let g = grid_with_endpoints(3, 1, Point::ZERO, Point::new(2, 0));
        g.set_obstacle(Point::new(1, 0), true).unwrap();
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::Flow).unwrap();

        let (events, result) = drain(&mut d, &mut h);
        result.unwrap();
        assert_eq!(d.status(), AnimStatus::Completed);
        // Only the source is reachable; the record is still pushed.
        assert_eq!(events.len(), 1);
        assert_eq!(h.flow_depth(), 1);
        assert_eq!(g.highlight(Point::new(2, 0)), Highlight::None);
    }

    #[test]
    fn explore_then_path_paints_both() {
        let g = grid_with_endpoints(3, 3, Point::ZERO, Point::new(2, 2));
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::ExplorePath).unwrap();

        let (events, result) = drain(&mut d, &mut h);
        result.unwrap();
        assert_eq!(d.status(), AnimStatus::Completed);
        assert_eq!(events.len(), 9);
        assert_eq!(h.path_depth(), 1);
        assert_eq!(h.flow_depth(), 0);
        // Path cells are repainted over the flow shading.
        assert_eq!(g.highlight(Point::ZERO), Highlight::Path);
        assert_eq!(g.highlight(Point::new(2, 2)), Highlight::Path);
        let path_cells = g
            .bounds()
            .iter()
            .filter(|&p| g.highlight(p) == Highlight::Path)
            .count();
        let flow_cells = g
            .bounds()
            .iter()
            .filter(|&p| g.highlight(p) == Highlight::Flow)
            .count();
        assert_eq!(path_cells, 5);
        assert_eq!(flow_cells, 4);
    }

    #[test]
    fn explore_without_route_reports_no_path() {
        let g = grid_with_endpoints(3, 1, Point::ZERO, Point::new(2, 0));
        g.set_obstacle(Point::new(1, 0), true).unwrap();
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::ExplorePath).unwrap();

        let (events, result) = drain(&mut d, &mut h);
        assert!(matches!(result, Err(SessionError::NoPathFound)));
        assert_eq!(d.status(), AnimStatus::Completed);
        assert_eq!(h.path_depth(), 0);
        assert_eq!(h.flow_depth(), 0);
        // The exploration shading remains.
        assert_eq!(events.len(), 1);
        assert_eq!(g.highlight(Point::ZERO), Highlight::Flow);
    }

    #[test]
    fn cancel_clears_this_runs_shading_only() {
        let g = grid_with_endpoints(3, 3, Point::ZERO, Point::new(2, 2));
        g.set_highlight(Point::new(2, 0), Highlight::Path);
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::Flow).unwrap();
        d.tick(&mut h).unwrap();
        d.tick(&mut h).unwrap();
        assert_eq!(g.highlight(Point::ZERO), Highlight::Flow);

        d.cancel();
        assert_eq!(d.status(), AnimStatus::Cancelled);
        assert_eq!(h.flow_depth(), 0);
        assert_eq!(g.highlight(Point::ZERO), Highlight::None);
        // Unrelated highlights are untouched.
        assert_eq!(g.highlight(Point::new(2, 0)), Highlight::Path);
        // Ticking after cancellation is a no-op.
        assert_eq!(d.tick(&mut h).unwrap(), None);
    }

    #[test]
    fn cancel_outside_running_is_noop() {
        let mut d = driver();
        d.cancel();
        assert_eq!(d.status(), AnimStatus::Idle);
    }

    #[test]
    fn driver_is_restartable_after_completion() {
        let g = grid_with_endpoints(2, 1, Point::ZERO, Point::new(1, 0));
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::Flow).unwrap();
        drain(&mut d, &mut h).1.unwrap();
        assert_eq!(d.status(), AnimStatus::Completed);

        d.start(&g, FlowMode::Flow).unwrap();
        assert_eq!(d.status(), AnimStatus::Running);
        drain(&mut d, &mut h).1.unwrap();
        assert_eq!(h.flow_depth(), 2);
    }

    #[test]
    fn mid_run_obstacle_blocks_unfinalized_cells() {
        // A corridor: the far cells are admitted but not yet finalized
        // when the wall drops; they must finalize nothing beyond it.
        let g = grid_with_endpoints(5, 1, Point::ZERO, Point::new(4, 0));
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::Flow).unwrap();

        // Tick 1 finalizes the source and admits (1,0).
        let ev = d.tick(&mut h).unwrap().unwrap();
        assert_eq!(ev.pos, Point::ZERO);

        // Drop a wall on the admitted-but-unfinalized cell.
        g.set_obstacle(Point::new(1, 0), true).unwrap();

        let (events, result) = drain(&mut d, &mut h);
        result.unwrap();
        assert_eq!(d.status(), AnimStatus::Completed);
        // (1,0) is finalized (it was already in the frontier) but is no
        // longer passable: no shading, no record entry, no expansion past it.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pos, Point::new(1, 0));
        assert_eq!(events[0].highlight, None);
        assert_eq!(g.highlight(Point::new(1, 0)), Highlight::None);
        let record = h.undo_flow(&g).unwrap();
        assert_eq!(record.cells(), &[Point::ZERO]);
        assert_eq!(g.highlight(Point::new(2, 0)), Highlight::None);
    }

    #[test]
    fn obstacles_never_receive_flow() {
        let g = grid_with_endpoints(3, 3, Point::ZERO, Point::new(2, 2));
        g.set_obstacle(Point::new(1, 1), true).unwrap();
        let mut d = driver();
        let mut h = HighlightHistory::new();
        d.start(&g, FlowMode::Flow).unwrap();
        drain(&mut d, &mut h).1.unwrap();
        assert_eq!(g.highlight(Point::new(1, 1)), Highlight::None);
    }
}
