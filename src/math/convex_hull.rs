use super::polygon_2d::leftmost_bottom;
use super::{Point2, TOLERANCE};

/// Z component of `(a - o) × (b - o)`. Positive for a counter-clockwise turn.
#[must_use]
pub fn cross(o: &Point2, a: &Point2, b: &Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Computes the convex hull of a point set with a Graham scan.
///
/// Returns the hull vertices in counter-clockwise order starting at the
/// leftmost-bottommost point. Collinear boundary points are dropped. Inputs
/// with fewer than three points are returned unchanged.
#[must_use]
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let Some(pivot_idx) = leftmost_bottom(points) else {
        return Vec::new();
    };
    let pivot = points[pivot_idx];

    let mut rest: Vec<Point2> = points
        .iter()
        .enumerate()
        .filter(|&(i, p)| i != pivot_idx && (p - pivot).norm() > TOLERANCE)
        .map(|(_, p)| *p)
        .collect();

    // Polar sort around the pivot; nearer points first on ties so the scan
    // pops them as collinear. Every point lies in the half-plane x >= pivot.x,
    // so the angle is monotone over (-π/2, π/2].
    rest.sort_by(|a, b| {
        let angle_a = (a.y - pivot.y).atan2(a.x - pivot.x);
        let angle_b = (b.y - pivot.y).atan2(b.x - pivot.x);
        angle_a.total_cmp(&angle_b).then_with(|| {
            (a - pivot)
                .norm_squared()
                .total_cmp(&(b - pivot).norm_squared())
        })
    });

    let mut hull: Vec<Point2> = Vec::with_capacity(rest.len() + 1);
    hull.push(pivot);
    for p in rest {
        while hull.len() >= 2 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &p) <= TOLERANCE
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull
}
