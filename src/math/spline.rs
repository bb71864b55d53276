use super::{normalize_or, Point2, Vector2};

/// A closed, periodic interpolating curve through a control polygon.
///
/// Both methods return `points.len() * segments_per_point` samples, and
/// tangent `i` belongs to position `i`. Tangents are unit length.
pub trait ClosedSpline {
    /// Samples positions along the closed curve.
    fn positions(&self, points: &[Point2], segments_per_point: usize) -> Vec<Point2>;

    /// Samples unit tangents parallel to [`ClosedSpline::positions`].
    fn tangents(&self, points: &[Point2], segments_per_point: usize) -> Vec<Vector2>;
}

/// Uniform Catmull-Rom spline, closed by wrapping control-point indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatmullRom;

impl CatmullRom {
    fn quad(points: &[Point2], seg: usize) -> [Point2; 4] {
        let n = points.len();
        [
            points[(seg + n - 1) % n],
            points[seg],
            points[(seg + 1) % n],
            points[(seg + 2) % n],
        ]
    }

    fn point(q: &[Point2; 4], t: f64) -> Point2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let [p0, p1, p2, p3] = q.map(|p| p.coords);
        let v = 0.5
            * ((2.0 * p1)
                + (-p0 + p2) * t
                + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3);
        Point2::from(v)
    }

    fn derivative(q: &[Point2; 4], t: f64) -> Vector2 {
        let t2 = t * t;
        let [p0, p1, p2, p3] = q.map(|p| p.coords);
        0.5 * ((-p0 + p2)
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * (2.0 * t)
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * (3.0 * t2))
    }

    #[allow(clippy::cast_precision_loss)]
    fn param(step: usize, segments_per_point: usize) -> f64 {
        step as f64 / segments_per_point as f64
    }
}

impl ClosedSpline for CatmullRom {
    fn positions(&self, points: &[Point2], segments_per_point: usize) -> Vec<Point2> {
        let n = points.len();
        if n == 0 || segments_per_point == 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(n * segments_per_point);
        for seg in 0..n {
            let q = Self::quad(points, seg);
            for step in 0..segments_per_point {
                out.push(Self::point(&q, Self::param(step, segments_per_point)));
            }
        }
        out
    }

    fn tangents(&self, points: &[Point2], segments_per_point: usize) -> Vec<Vector2> {
        let n = points.len();
        if n == 0 || segments_per_point == 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(n * segments_per_point);
        for seg in 0..n {
            let q = Self::quad(points, seg);
            // Degenerate derivative (coincident controls) falls back to the chord.
            let chord = normalize_or(&(q[2] - q[1]), Vector2::new(1.0, 0.0));
            for step in 0..segments_per_point {
                let d = Self::derivative(&q, Self::param(step, segments_per_point));
                out.push(normalize_or(&d, chord));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn output_lengths_match_contract() {
        let pts = square();
        let spline = CatmullRom;
        assert_eq!(spline.positions(&pts, 5).len(), 20);
        assert_eq!(spline.tangents(&pts, 5).len(), 20);
    }

    #[test]
    fn interpolates_control_points() {
        let pts = square();
        let samples = CatmullRom.positions(&pts, 4);
        for (i, p) in pts.iter().enumerate() {
            assert_abs_diff_eq!(samples[i * 4].x, p.x, epsilon = 1e-9);
            assert_abs_diff_eq!(samples[i * 4].y, p.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn tangents_are_unit_and_forward() {
        let pts = square();
        let spline = CatmullRom;
        let pos = spline.positions(&pts, 8);
        let tan = spline.tangents(&pts, 8);
        let n = pos.len();
        for i in 0..n {
            assert_abs_diff_eq!(tan[i].norm(), 1.0, epsilon = 1e-9);
            let step = pos[(i + 1) % n] - pos[i];
            assert!(tan[i].dot(&step) > 0.0, "tangent {i} points backward");
        }
    }

    #[test]
    fn coincident_controls_fall_back() {
        let pts = vec![Point2::new(1.0, 1.0); 3];
        let tan = CatmullRom.tangents(&pts, 2);
        for t in tan {
            assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_input() {
        assert!(CatmullRom.positions(&[], 4).is_empty());
        assert!(CatmullRom.tangents(&square(), 0).is_empty());
    }
}
