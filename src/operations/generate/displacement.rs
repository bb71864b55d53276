use crate::math::{perpendicular, Point2, TOLERANCE};
use crate::rng::TrackRng;

/// Fractal roughening of a closed polygon.
///
/// Each pass inserts the midpoint of every edge (including the closing edge),
/// pushed along the edge's unit perpendicular by a value in
/// `[-r, r)` where `r = roughness / (pass + 1)`. The point count doubles per
/// pass.
#[derive(Debug, Clone)]
pub struct MidpointDisplacement {
    iterations: usize,
    roughness: f64,
}

impl MidpointDisplacement {
    #[must_use]
    pub fn new(iterations: usize, roughness: f64) -> Self {
        Self {
            iterations,
            roughness,
        }
    }

    /// Runs every pass over `points`.
    ///
    /// One draw is consumed per inserted midpoint, including midpoints of
    /// zero-length edges, which are inserted undisplaced.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, points: &[Point2], rng: &mut TrackRng) -> Vec<Point2> {
        let mut current = points.to_vec();
        if current.len() < 2 {
            return current;
        }

        for pass in 0..self.iterations {
            let magnitude = self.roughness / (pass + 1) as f64;
            let n = current.len();
            let mut next = Vec::with_capacity(n * 2);
            for i in 0..n {
                let a = current[i];
                let b = current[(i + 1) % n];
                let offset = rng.symmetric(magnitude);
                let edge = b - a;
                let len = edge.norm();
                let mid = nalgebra::center(&a, &b);
                next.push(a);
                if len < TOLERANCE {
                    next.push(mid);
                } else {
                    next.push(mid + perpendicular(&edge) / len * offset);
                }
            }
            current = next;
        }
        current
    }
}
