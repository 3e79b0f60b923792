use flowgrid_core::Point;

/// Neighbor enumeration — the seam between the search and the grid model.
///
/// Implementors must re-read passability on every call rather than caching
/// it: obstacle cells are never yielded, hence never admitted to the
/// frontier, and obstacle edits made while a run is suspended take effect
/// on the next relaxation.
pub trait Pather {
    /// Append the traversable neighbors of `p` into `buf`. The caller
    /// clears `buf` before calling. Push order must be stable — it fixes
    /// the deterministic tie-break of the search.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}
