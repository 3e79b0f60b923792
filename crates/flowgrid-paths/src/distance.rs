use flowgrid_core::Point;

/// Manhattan (L1) distance between two points — the minimum step count
/// between them on an obstacle-free 4-way grid.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
