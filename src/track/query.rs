use super::{Track, TrackPoint};
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{Point2, TOLERANCE};

/// Friction coefficient of the grass verge.
pub const GRASS_FRICTION: f64 = 0.45;

/// Distance beyond the pavement edge over which friction blends to grass.
pub const OFF_TRACK_FALLOFF: f64 = 40.0;

/// Grip multiplier anywhere off the pavement.
pub const OFF_TRACK_GRIP: f64 = 0.6;

/// Indices scanned on each side of a hint.
const HINT_RADIUS: isize = 10;
const HINT_WINDOW: usize = 21;

/// Fraction of the lap between the spawn point and the start line.
const SPAWN_OFFSET_FRACTION: f64 = 0.15;

/// Result of a closest track point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestTrackPoint {
    /// Index into [`Track::track_points`].
    pub index: usize,
    /// Euclidean distance from the query point to the point's position.
    pub distance: f64,
    /// Copy of the matched point.
    pub point: TrackPoint,
}

impl Track {
    /// Finds the track point nearest to `point`.
    ///
    /// With a `hint` (the last known index of a moving car), only the ±10
    /// indices around it are scanned, wrapping across the seam. Without one,
    /// the spatial index cell containing `point` is scanned, falling back to
    /// every point when that cell is empty. Returns `None` on an empty track.
    #[must_use]
    pub fn closest_track_point(&self, point: &Point2, hint: Option<usize>) -> Option<ClosestTrackPoint> {
        if self.is_empty() {
            return None;
        }
        match hint {
            Some(hint) => {
                let ring = self.ring();
                let start = ring.offset(hint, -HINT_RADIUS);
                self.nearest_of(point, ring.span(start, HINT_WINDOW.min(ring.len())))
            }
            None => match self.spatial_index().candidates(point) {
                Some(cell) => self.nearest_of(point, cell.iter().copied()),
                None => self.nearest_of(point, 0..self.len()),
            },
        }
    }

    fn nearest_of<I>(&self, point: &Point2, indices: I) -> Option<ClosestTrackPoint>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut best: Option<(usize, f64)> = None;
        for i in indices {
            let d = (self.track_points()[i].position - point).norm_squared();
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(index, d2)| ClosestTrackPoint {
            index,
            distance: d2.sqrt(),
            point: self.track_points()[index],
        })
    }

    /// Whether `point` lies within half the width of its nearest track point.
    #[must_use]
    pub fn is_point_on_track(&self, point: &Point2) -> bool {
        self.closest_track_point(point, None)
            .is_some_and(|c| c.distance <= c.point.half_width())
    }

    /// Surface friction at `point`.
    ///
    /// The metadata surface's friction on the pavement, blending linearly to
    /// [`GRASS_FRICTION`] over [`OFF_TRACK_FALLOFF`] units past the edge.
    /// Empty tracks and zero-width points are all grass.
    #[must_use]
    pub fn surface_friction(&self, point: &Point2) -> f64 {
        let base = self.metadata().surface.friction();
        let Some(closest) = self.closest_track_point(point, None) else {
            return GRASS_FRICTION;
        };
        if closest.point.half_width() < TOLERANCE {
            return GRASS_FRICTION;
        }
        let excess = closest.distance - closest.point.half_width();
        if excess <= 0.0 {
            return base;
        }
        let t = (excess / OFF_TRACK_FALLOFF).clamp(0.0, 1.0);
        base + (GRASS_FRICTION - base) * t
    }

    /// Grip multiplier at `point`: the surface's grip on track, [`OFF_TRACK_GRIP`] off it.
    #[must_use]
    pub fn surface_grip_multiplier(&self, point: &Point2) -> f64 {
        if self.is_point_on_track(point) {
            self.metadata().surface.grip()
        } else {
            OFF_TRACK_GRIP
        }
    }

    /// Banking felt at `point`.
    ///
    /// Zero at the inside edge, rising linearly to the stored per-point banking
    /// at the outside edge. Degenerate widths yield zero.
    #[must_use]
    pub fn banking_at_position(&self, point: &Point2) -> f64 {
        let Some(closest) = self.closest_track_point(point, None) else {
            return 0.0;
        };
        let tp = closest.point;
        let half = tp.half_width();
        if half < TOLERANCE || tp.banking == 0.0 {
            return 0.0;
        }
        let lateral = ((point - tp.position).dot(&tp.normal) / half).clamp(-1.0, 1.0);
        let t = ((lateral * tp.banking.signum() + 1.0) * 0.5).clamp(0.0, 1.0);
        tp.banking * t
    }

    fn spawn_index(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let offset = (self.len() as f64 * SPAWN_OFFSET_FRACTION).round() as usize;
        Some(self.ring().wrap(offset))
    }

    /// Rolling-start spawn point, 15% of the lap behind the start line.
    ///
    /// Racing runs toward decreasing index, so "behind" is a positive offset.
    #[must_use]
    pub fn spawn_position(&self) -> Option<Point2> {
        self.spawn_index().map(|i| self.track_points()[i].position)
    }

    /// Heading at the spawn point, in radians. Faces along the negated tangent.
    #[must_use]
    pub fn spawn_angle(&self) -> Option<f64> {
        self.spawn_index().map(|i| {
            let heading = -self.track_points()[i].tangent;
            heading.y.atan2(heading.x)
        })
    }

    /// Lap fraction in `[0, 1)` at the nearest track point, `0` on the start line.
    #[must_use]
    pub fn track_progress(&self, point: &Point2) -> Option<f64> {
        let closest = self.closest_track_point(point, None)?;
        let ring = self.ring();
        let travelled = ring.forward_distance(closest.index, 0);
        #[allow(clippy::cast_precision_loss)]
        let progress = travelled as f64 / ring.len() as f64;
        Some(progress)
    }

    /// Whether `point` lies inside the pit lane polygon.
    #[must_use]
    pub fn is_point_in_pit_zone(&self, point: &Point2) -> bool {
        point_in_polygon(point, &self.pit_lane().polygon)
    }

    /// Whether `point` lies inside any overlap zone.
    #[must_use]
    pub fn is_point_in_overlap_zone(&self, point: &Point2) -> bool {
        self.overlap_zones()
            .iter()
            .any(|zone| point_in_polygon(point, &zone.polygon))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Surface;
    use crate::math::Vector2;
    use crate::track::tests::{circle_points, circle_track, metadata};
    use crate::track::{IndexSpan, PitLane, TrackMetadata};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn exact_position_returns_its_index() {
        let track = circle_track(200, 300.0, 40.0);
        for (i, p) in track.track_points().iter().enumerate() {
            let c = track.closest_track_point(&p.position, None).unwrap();
            assert_eq!(c.index, i);
            assert_abs_diff_eq!(c.distance, 0.0);
        }
    }

    #[test]
    fn hint_scan_wraps_across_seam() {
        let track = circle_track(200, 300.0, 40.0);
        let target = track.track_points()[197].position;
        let c = track.closest_track_point(&target, Some(2)).unwrap();
        assert_eq!(c.index, 197);
        let target = track.track_points()[3].position;
        let c = track.closest_track_point(&target, Some(199)).unwrap();
        assert_eq!(c.index, 3);
    }

    #[test]
    fn hint_window_is_local() {
        let track = circle_track(200, 300.0, 40.0);
        let target = track.track_points()[100].position;
        let c = track.closest_track_point(&target, Some(0)).unwrap();
        assert!(track.ring().distance(c.index, 0) <= 10);
    }

    #[test]
    fn far_point_falls_back_to_linear_scan() {
        let track = circle_track(100, 300.0, 40.0);
        let c = track.closest_track_point(&Point2::new(5000.0, 0.0), None).unwrap();
        assert_eq!(c.index, 0);
        assert_abs_diff_eq!(c.distance, 4700.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_track_has_no_result() {
        let track = circle_track(0, 300.0, 40.0);
        let p = Point2::new(1.0, 1.0);
        assert!(track.closest_track_point(&p, None).is_none());
        assert!(track.closest_track_point(&p, Some(4)).is_none());
        assert!(!track.is_point_on_track(&p));
        assert!(track.spawn_position().is_none());
        assert!(track.track_progress(&p).is_none());
        assert_abs_diff_eq!(track.surface_friction(&p), GRASS_FRICTION);
        assert_abs_diff_eq!(track.banking_at_position(&p), 0.0);
    }

    #[test]
    fn on_track_boundary() {
        let track = circle_track(720, 300.0, 40.0);
        // Radial offsets from index 0 at (300, 0) keep it the nearest point.
        assert!(track.is_point_on_track(&Point2::new(319.9, 0.0)));
        assert!(track.is_point_on_track(&Point2::new(280.1, 0.0)));
        assert!(!track.is_point_on_track(&Point2::new(320.1, 0.0)));
        assert!(!track.is_point_on_track(&Point2::new(279.9, 0.0)));
    }

    #[test]
    fn friction_falls_off_past_edge() {
        let track = circle_track(720, 300.0, 40.0);
        assert_abs_diff_eq!(track.surface_friction(&Point2::new(300.0, 0.0)), 1.0);
        let halfway = track.surface_friction(&Point2::new(340.0, 0.0));
        assert_abs_diff_eq!(halfway, 1.0 + (GRASS_FRICTION - 1.0) * 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(track.surface_friction(&Point2::new(400.0, 0.0)), GRASS_FRICTION);
    }

    #[test]
    fn grip_uses_surface() {
        let dirt = TrackMetadata {
            surface: Surface::Dirt,
            ..metadata()
        };
        let track = Track::new(
            0,
            dirt,
            circle_points(360, 300.0, 40.0),
            IndexSpan::default(),
            PitLane::default(),
            Vec::new(),
        );
        assert_abs_diff_eq!(track.surface_grip_multiplier(&Point2::new(300.0, 0.0)), 0.8);
        assert_abs_diff_eq!(track.surface_grip_multiplier(&Point2::new(0.0, 0.0)), OFF_TRACK_GRIP);
        assert_abs_diff_eq!(track.surface_friction(&Point2::new(300.0, 0.0)), 0.7);
    }

    #[test]
    fn banking_rises_toward_outside_edge() {
        let mut points = circle_points(360, 300.0, 40.0);
        // CCW circle turns toward +normal, so the outside is -normal: negative banking.
        for p in &mut points {
            p.banking = -0.2;
        }
        let track = Track::new(0, metadata(), points, IndexSpan::default(), PitLane::default(), Vec::new());
        let outside = Point2::new(320.0, 0.0);
        let inside = Point2::new(280.0, 0.0);
        let middle = Point2::new(300.0, 0.0);
        assert_abs_diff_eq!(track.banking_at_position(&outside), -0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(track.banking_at_position(&inside), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(track.banking_at_position(&middle), -0.1, epsilon = 1e-9);
    }

    #[test]
    fn zero_width_banking_is_safe() {
        let mut points = circle_points(36, 300.0, 0.0);
        for p in &mut points {
            p.banking = 0.3;
        }
        let track = Track::new(0, metadata(), points, IndexSpan::default(), PitLane::default(), Vec::new());
        let b = track.banking_at_position(&Point2::new(300.0, 1.0));
        assert_abs_diff_eq!(b, 0.0);
        assert!(b.is_finite());
    }

    #[test]
    fn zero_width_friction_is_grass() {
        let track = circle_track(36, 300.0, 0.0);
        let p0 = track.track_points()[0].position;
        assert_abs_diff_eq!(track.surface_friction(&p0), GRASS_FRICTION);
        assert_abs_diff_eq!(track.surface_friction(&Point2::new(300.0, 5.0)), GRASS_FRICTION);
    }

    #[test]
    fn spawn_is_behind_start_facing_race_direction() {
        let track = circle_track(200, 300.0, 40.0);
        let spawn = track.spawn_position().unwrap();
        let expected = track.track_points()[30].position;
        assert_abs_diff_eq!((spawn - expected).norm(), 0.0);
        // Tangent at index 30 is CCW; heading is its negation.
        let angle = track.spawn_angle().unwrap();
        let t = track.track_points()[30].tangent;
        let heading = Vector2::new(angle.cos(), angle.sin());
        assert_abs_diff_eq!(heading.dot(&t), -1.0, epsilon = 1e-9);
        assert!(angle.abs() <= PI);
    }

    #[test]
    fn progress_runs_toward_decreasing_index() {
        let track = circle_track(100, 300.0, 40.0);
        let at = |i: usize| track.track_progress(&track.track_points()[i].position).unwrap();
        assert_abs_diff_eq!(at(0), 0.0);
        assert_abs_diff_eq!(at(99), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(at(50), 0.5, epsilon = 1e-12);
        assert!(at(1) > at(2));
    }

    #[test]
    fn pit_zone_containment() {
        let pit = PitLane::from_edges(
            vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
            &[Point2::new(0.0, 20.0), Point2::new(100.0, 20.0)],
        );
        let track = Track::new(0, metadata(), circle_points(36, 300.0, 40.0), IndexSpan::default(), pit, Vec::new());
        assert!(track.is_point_in_pit_zone(&Point2::new(50.0, 10.0)));
        assert!(!track.is_point_in_pit_zone(&Point2::new(50.0, 30.0)));
        assert!(!circle_track(36, 300.0, 40.0).is_point_in_pit_zone(&Point2::new(0.0, 0.0)));
    }

    #[test]
    fn overlap_zone_containment() {
        use crate::track::OverlapZone;
        let zone = OverlapZone {
            polygon: vec![
                Point2::new(-10.0, -10.0),
                Point2::new(10.0, -10.0),
                Point2::new(10.0, 10.0),
                Point2::new(-10.0, 10.0),
            ],
            index_pairs: vec![(0, 18)],
        };
        let track = Track::new(
            0,
            metadata(),
            circle_points(36, 300.0, 40.0),
            IndexSpan::default(),
            PitLane::default(),
            vec![zone],
        );
        assert!(track.is_point_in_overlap_zone(&Point2::new(0.0, 0.0)));
        assert!(!track.is_point_in_overlap_zone(&Point2::new(0.0, 50.0)));
        assert!(!circle_track(36, 300.0, 40.0).is_point_in_overlap_zone(&Point2::new(0.0, 0.0)));
    }
}
