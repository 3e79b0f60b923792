use std::collections::BinaryHeap;

use flowgrid_core::{Point, Range};

use crate::traits::Pather;

/// Sentinel value meaning "not discovered" in distance queries.
pub const UNREACHABLE: i32 = i32::MAX;

/// A finalized position with its definitive step-count from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub pos: Point,
    pub cost: i32,
}

// ---------------------------------------------------------------------------
// Internal node storage
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Node {
    dist: i32,
    parent: usize,
    generation: u32,
    open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            dist: 0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered for use in `BinaryHeap`:
/// smallest distance first, ties broken by earliest admission (`seq`),
/// which makes extraction order deterministic and reproducible.
#[derive(Clone, Copy, Eq, PartialEq)]
struct OpenRef {
    idx: usize,
    dist: i32,
    seq: u64,
}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest dist, then
        // smallest seq.
        other
            .dist
            .cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// SearchRange
// ---------------------------------------------------------------------------

/// Central coordinator for uniform-cost search on a grid rectangle.
///
/// `SearchRange` owns all internal caches (node array, frontier heap,
/// results, neighbor scratch buffer) so that repeated runs incur no
/// allocations after the first use. One run is active at a time: [`begin`]
/// seeds it, [`step`] finalizes one frontier cell per call, and the
/// [`find_path`]/[`flood`] drains apply the two termination policies.
///
/// [`begin`]: SearchRange::begin
/// [`step`]: SearchRange::step
/// [`find_path`]: SearchRange::find_path
/// [`flood`]: SearchRange::flood
pub struct SearchRange {
    rng: Range,
    width: usize,
    nodes: Vec<Node>,
    generation: u32,
    frontier: BinaryHeap<OpenRef>,
    seq: u64,
    results: Vec<PathNode>,
    // shared scratch buffer for neighbor queries
    nbuf: Vec<Point>,
}

impl SearchRange {
    /// Create a new `SearchRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let len = rng.len();
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![Node::default(); len],
            generation: 0,
            frontier: BinaryHeap::new(),
            seq: 0,
            results: Vec::new(),
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Replace the underlying range, discarding any in-progress run.
    ///
    /// If the new size fits within existing capacity the node cache is
    /// preserved and only the generation counter is bumped so stale
    /// entries are ignored; otherwise it is reallocated.
    pub fn set_range(&mut self, rng: Range) {
        self.frontier.clear();
        self.results.clear();
        self.seq = 0;

        let new_len = rng.len();
        let old_capacity = self.nodes.len();
        self.rng = rng;
        self.width = rng.width().max(0) as usize;

        if new_len <= old_capacity {
            self.generation = self.generation.wrapping_add(1);
            return;
        }
        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.generation = 0;
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }

    // -----------------------------------------------------------------------
    // Step-wise run
    // -----------------------------------------------------------------------

    /// Begin a new run from `source`, discarding any previous run.
    ///
    /// The source starts at distance 0. A source outside the range leaves
    /// the frontier empty, so the first [`step`](Self::step) reports
    /// exhaustion.
    pub fn begin(&mut self, source: Point) {
        // Bump generation to lazily invalidate all nodes.
        self.generation = self.generation.wrapping_add(1);
        self.frontier.clear();
        self.results.clear();
        self.seq = 0;

        if let Some(si) = self.idx(source) {
            let n = &mut self.nodes[si];
            n.dist = 0;
            n.parent = usize::MAX;
            n.generation = self.generation;
            n.open = true;
            self.frontier.push(OpenRef {
                idx: si,
                dist: 0,
                seq: 0,
            });
        }
    }

    /// Finalize the next frontier cell and relax its neighbors.
    ///
    /// Extraction takes the frontier member with minimum distance, ties
    /// broken by earliest admission. Duplicate admissions are skipped when
    /// popped if the cell was already finalized. Returns `None` once the
    /// frontier is empty.
    pub fn step<P: Pather>(&mut self, pather: &P) -> Option<PathNode> {
        let (ci, current) = loop {
            let open_ref = self.frontier.pop()?;
            let n = &self.nodes[open_ref.idx];
            if n.generation != self.generation || !n.open {
                continue;
            }
            break (open_ref.idx, n.dist);
        };

        self.nodes[ci].open = false;
        let node = PathNode {
            pos: self.point(ci),
            cost: current,
        };
        self.results.push(node);

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        pather.neighbors(node.pos, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = self.idx(np) else {
                continue;
            };
            let tentative = current + 1;

            let n = &mut self.nodes[ni];
            if n.generation == self.generation {
                if tentative >= n.dist {
                    continue;
                }
            } else {
                n.generation = self.generation;
                n.dist = UNREACHABLE;
            }

            n.dist = tentative;
            n.parent = ci;
            n.open = true;
            self.seq += 1;
            self.frontier.push(OpenRef {
                idx: ni,
                dist: tentative,
                seq: self.seq,
            });
        }

        self.nbuf = nbuf;
        Some(node)
    }

    /// Whether `p` has been finalized in the current run.
    pub fn finalized(&self, p: Point) -> bool {
        self.idx(p)
            .is_some_and(|i| self.nodes[i].generation == self.generation && !self.nodes[i].open)
    }

    /// The discovered step-count to `p` in the current run, tentative or
    /// final. Returns [`UNREACHABLE`] for cells not yet discovered or
    /// outside the range.
    pub fn distance(&self, p: Point) -> i32 {
        match self.idx(p) {
            Some(i) if self.nodes[i].generation == self.generation => self.nodes[i].dist,
            _ => UNREACHABLE,
        }
    }

    /// The cells finalized so far in the current run, in finalization
    /// order.
    #[inline]
    pub fn visited(&self) -> &[PathNode] {
        &self.results
    }

    /// Reconstruct the path from the run's source to `target` by walking
    /// predecessors backward, reversed into source→target order.
    ///
    /// `Some` only once `target` has been finalized; a run whose source
    /// equals `target` yields the single-cell path.
    pub fn path_to(&self, target: Point) -> Option<Vec<Point>> {
        let ti = self.idx(target)?;
        if !self.finalized(target) {
            return None;
        }
        let mut path = Vec::new();
        let mut ci = ti;
        while ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        Some(path)
    }

    // -----------------------------------------------------------------------
    // Drains
    // -----------------------------------------------------------------------

    /// Compute the shortest path from `from` to `to`, early-stop policy:
    /// the run terminates as soon as `to` is finalized.
    ///
    /// Returns the full path including both endpoints, or `None` if the
    /// frontier empties first (no obstacle-avoiding route exists).
    pub fn find_path<P: Pather>(&mut self, pather: &P, from: Point, to: Point) -> Option<Vec<Point>> {
        self.begin(from);
        while let Some(node) = self.step(pather) {
            if node.pos == to {
                return self.path_to(to);
            }
        }
        None
    }

    /// Exhaustive policy: finalize every cell reachable from `source`,
    /// returning them in finalization order.
    pub fn flood<P: Pather>(&mut self, pather: &P, source: Point) -> &[PathNode] {
        self.begin(source);
        while self.step(pather).is_some() {}
        &self.results
    }
}
