use std::f64::consts::PI;

use crate::math::polygon_2d::vertex_centroid;
use crate::math::ring::{rotate_to, Ring};
use crate::math::{normalize_or, perpendicular, Point2, Vector2};
use crate::rng::TrackRng;
use crate::track::{IndexSpan, TrackPoint};

/// Dogleg peak position range, as a fraction of the straight.
const DOGLEG_POSITION_MIN: f64 = 0.3;
const DOGLEG_POSITION_SPAN: f64 = 0.4;

/// Fraction of the remaining loop that tapers back from the straight width.
const TAPER_FRACTION: f64 = 0.15;
const MAX_TAPER_POINTS: usize = 30;

/// Replaces one arc of the loop with a widened front straight.
///
/// The window of `length` consecutive points whose tangents best align with
/// `(0, -1)` is rebuilt as a straight line from its entry to its exit point,
/// widened to `max_width` and bowed sideways by a raised-cosine dogleg. The
/// dogleg always bows away from the loop's centroid. Tangents are central
/// differences of the laid positions, reaching one point past each end. The points after the
/// straight ease their width back to the original with a quadratic taper.
#[derive(Debug, Clone)]
pub struct InsertStraight {
    length: usize,
    max_width: f64,
    max_dogleg_angle: f64,
}

impl InsertStraight {
    #[must_use]
    pub fn new(length: usize, max_width: f64, max_dogleg_angle: f64) -> Self {
        Self {
            length,
            max_width,
            max_dogleg_angle,
        }
    }

    /// Rewrites `points` in place and returns the straight's span.
    ///
    /// Draws two values (dogleg position, then dogleg angle). A length below
    /// two or not shorter than the loop leaves the points untouched, draws
    /// nothing and returns an empty span.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, points: &mut [TrackPoint], rng: &mut TrackRng) -> IndexSpan {
        let ring = Ring::new(points.len());
        let len = self.length;
        if len < 2 || len >= ring.len() {
            return IndexSpan::default();
        }

        let start = best_aligned_window(points, len);
        let end = ring.wrap(start + len - 1);
        let entry = points[start].position;
        let exit = points[end].position;
        let chord = exit - entry;
        let direction = normalize_or(&chord, points[start].tangent);

        let positions: Vec<Point2> = points.iter().map(|p| p.position).collect();
        let centroid = vertex_centroid(&positions).unwrap_or_else(Point2::origin);
        let mut side = perpendicular(&direction);
        if side.dot(&(nalgebra::center(&entry, &exit) - centroid)) < 0.0 {
            side = -side;
        }

        let peak_at = DOGLEG_POSITION_MIN + DOGLEG_POSITION_SPAN * rng.next_f64();
        let angle = self.max_dogleg_angle * (0.5 + 0.5 * rng.next_f64());
        let peak = angle.tan() * peak_at.min(1.0 - peak_at) * chord.norm();

        let last = (len - 1) as f64;
        let laid: Vec<Point2> = (0..len)
            .map(|k| {
                let t = k as f64 / last;
                entry + chord * t + side * (peak * dogleg_ramp(t, peak_at))
            })
            .collect();

        // End tangents difference across the seam into the neighbouring curve.
        let before = points[ring.prev(start)].position;
        let after = points[ring.wrap(start + len)].position;
        for (k, i) in ring.span(start, len).enumerate() {
            let back = if k == 0 { before } else { laid[k - 1] };
            let ahead = if k == len - 1 { after } else { laid[k + 1] };
            let tangent = normalize_or(&(ahead - back), direction);
            let point = &mut points[i];
            point.position = laid[k];
            point.width = self.max_width;
            point.set_tangent(tangent);
        }

        self.taper_exit(points, ring.wrap(start + len), ring.len() - len);

        IndexSpan::new(start, len)
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn taper_exit(&self, points: &mut [TrackPoint], from: usize, remaining: usize) {
        let ring = Ring::new(points.len());
        let taper = ((remaining as f64 * TAPER_FRACTION).floor() as usize).min(MAX_TAPER_POINTS);
        for (k, i) in ring.span(from, taper).enumerate() {
            let t = (k + 1) as f64 / (taper + 1) as f64;
            let original = points[i].width;
            points[i].width = self.max_width + (original - self.max_width) * t * t;
        }
    }
}

/// Lateral dogleg profile on `t ∈ [0, 1]`: zero at both ends, one at `peak_at`.
fn dogleg_ramp(t: f64, peak_at: f64) -> f64 {
    if t <= peak_at {
        (1.0 - (PI * t / peak_at).cos()) * 0.5
    } else {
        (1.0 - (PI * (1.0 - t) / (1.0 - peak_at)).cos()) * 0.5
    }
}

/// Start of the `len`-point window whose tangents best align with "up",
/// `(0, -1)`. Ties keep the earliest start.
fn best_aligned_window(points: &[TrackPoint], len: usize) -> usize {
    let up = Vector2::new(0.0, -1.0);
    let ring = Ring::new(points.len());
    let mut best = (0, f64::NEG_INFINITY);
    for start in 0..ring.len() {
        let score: f64 = ring.span(start, len).map(|i| points[i].tangent.dot(&up)).sum();
        if score > best.1 {
            best = (start, score);
        }
    }
    best.0
}

/// Rotates `points` so the straight's middle point becomes index `0`.
///
/// Returns the straight's span in the rotated indexing.
pub fn rotate_to_start(points: &mut [TrackPoint], straight: IndexSpan) -> IndexSpan {
    let ring = Ring::new(points.len());
    if ring.is_empty() {
        return straight;
    }
    let middle = ring.wrap(straight.start + straight.len / 2);
    rotate_to(points, middle);
    IndexSpan::new(ring.forward_distance(middle, straight.start), straight.len)
}
