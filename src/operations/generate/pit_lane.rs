use crate::math::polygon_2d::vertex_centroid;
use crate::math::ring::Ring;
use crate::math::Point2;
use crate::track::{IndexSpan, PitLane, TrackPoint};

/// Clearance between the pavement edge and the pit lane.
pub const PIT_GAP: f64 = 10.0;

/// Width of the pit lane itself.
pub const PIT_WIDTH: f64 = 24.0;

/// Fraction of the straight trimmed from each end.
const PIT_MARGIN_FRACTION: f64 = 0.15;

/// Builds the pit lane beside the front straight.
///
/// The lane follows the straight minus a 15% margin at each end and sits on
/// the infield side: the side whose normal at index `0` faces the loop's
/// centroid.
#[derive(Debug, Clone)]
pub struct BuildPitLane {
    straight: IndexSpan,
}

impl BuildPitLane {
    #[must_use]
    pub fn new(straight: IndexSpan) -> Self {
        Self { straight }
    }

    /// Returns an empty lane when the trimmed straight has fewer than two points.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self, points: &[TrackPoint]) -> PitLane {
        let ring = Ring::new(points.len());
        let margin = (self.straight.len as f64 * PIT_MARGIN_FRACTION).floor() as usize;
        let count = self.straight.len.saturating_sub(2 * margin);
        if ring.is_empty() || count < 2 {
            return PitLane::default();
        }

        let positions: Vec<Point2> = points.iter().map(|p| p.position).collect();
        let centroid = vertex_centroid(&positions).unwrap_or_else(Point2::origin);
        let side = if points[0].normal.dot(&(centroid - points[0].position)) >= 0.0 {
            1.0
        } else {
            -1.0
        };

        let (inner, outer): (Vec<Point2>, Vec<Point2>) = ring
            .span(self.straight.start + margin, count)
            .map(|i| {
                let p = &points[i];
                let toward = p.normal * side;
                let gap = p.half_width() + PIT_GAP;
                (p.position + toward * gap, p.position + toward * (gap + PIT_WIDTH))
            })
            .unzip();

        PitLane::from_edges(inner, &outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::point_in_polygon;
    use crate::track::tests::circle_points;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lane_sits_on_the_infield() {
        // CCW circle: +normal faces the centre.
        let points = circle_points(200, 500.0, 40.0);
        let pit = BuildPitLane::new(IndexSpan::new(190, 20)).execute(&points);
        // Margin 3 at each end: 14 points per edge.
        assert_eq!(pit.polygon.len(), 28);
        assert_abs_diff_eq!(pit.polygon[0].coords.norm(), 500.0 - 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pit.polygon[27].coords.norm(), 500.0 - 54.0, epsilon = 1e-9);
        assert!(point_in_polygon(&Point2::new(458.0, 0.0), &pit.polygon));
        assert!(!point_in_polygon(&Point2::new(500.0, 0.0), &pit.polygon));
    }

    #[test]
    fn lane_flips_for_clockwise_loops() {
        let mut points = circle_points(200, 500.0, 40.0);
        points.reverse();
        for p in &mut points {
            p.set_tangent(-p.tangent);
        }
        let pit = BuildPitLane::new(IndexSpan::new(190, 20)).execute(&points);
        assert!(pit.centroid.coords.norm() < 500.0);
    }

    #[test]
    fn short_straights_have_no_lane() {
        let points = circle_points(50, 500.0, 40.0);
        assert!(BuildPitLane::new(IndexSpan::new(0, 1)).execute(&points).is_empty());
        assert!(BuildPitLane::new(IndexSpan::default()).execute(&points).is_empty());
        assert!(BuildPitLane::new(IndexSpan::new(0, 10)).execute(&[]).is_empty());
    }
}
