use std::f64::consts::PI;

use super::width::circular_moving_average;
use crate::math::ring::Ring;
use crate::math::signed_angle;
use crate::track::TrackPoint;

/// Curvature band, in radians per point, of a bankable sweeper.
pub const MIN_TURN_CURVATURE: f64 = 0.012;
pub const MAX_TURN_CURVATURE: f64 = 0.04;

/// Shortest bankable run, in points.
pub const MIN_TURN_LENGTH: usize = 35;

/// Narrowest average pavement width that may be banked.
pub const MIN_TURN_WIDTH: f64 = 70.0;

/// Curvature range mapped onto the intensity factor.
const INTENSITY_LOW: f64 = 0.008;
const INTENSITY_HIGH: f64 = 0.06;
const MIN_INTENSITY: f64 = 0.4;

/// Radius of the final loop-wide smoothing pass.
pub const BANKING_SMOOTH_RADIUS: usize = 5;

/// A maximal run of bankable points turning the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnSegment {
    pub start: usize,
    pub len: usize,
    /// `1.0` for a turn toward `+normal`, `-1.0` otherwise.
    pub direction: f64,
    pub mean_curvature: f64,
    pub mean_width: f64,
}

/// Signed curvature at every point: the angle from tangent `i` to tangent `i + 1`.
///
/// Positive when the track bends toward `+normal`.
#[must_use]
pub fn curvature(points: &[TrackPoint]) -> Vec<f64> {
    let ring = Ring::new(points.len());
    (0..ring.len())
        .map(|i| signed_angle(&points[i].tangent, &points[ring.next(i)].tangent))
        .collect()
}

fn bankable(c: f64) -> bool {
    (MIN_TURN_CURVATURE..=MAX_TURN_CURVATURE).contains(&c.abs())
}

/// Finds every turn segment eligible for banking.
///
/// `curvatures` must be parallel to `points`. Runs may wrap across the seam;
/// when every point is bankable and turns the same way, the whole loop is
/// one segment starting at `0`.
#[must_use]
pub fn find_turn_segments(points: &[TrackPoint], curvatures: &[f64]) -> Vec<TurnSegment> {
    let ring = Ring::new(points.len().min(curvatures.len()));
    if ring.len() < 3 {
        return Vec::new();
    }

    // Begin the scan where a run cannot continue from the previous point.
    let breaks_run = |i: usize| {
        let c = curvatures[i];
        let prev = curvatures[ring.prev(i)];
        !bankable(c) || !bankable(prev) || c.signum() != prev.signum()
    };
    let origin = (0..ring.len()).find(|&i| breaks_run(i)).unwrap_or(0);

    let mut segments = Vec::new();
    let mut run: Option<(usize, usize)> = None;
    for i in ring.span(origin, ring.len()) {
        let c = curvatures[i];
        if !bankable(c) {
            if let Some((start, len)) = run.take() {
                push_if_eligible(&mut segments, points, curvatures, start, len);
            }
            continue;
        }
        run = match run {
            Some((start, len)) if curvatures[start].signum() == c.signum() => Some((start, len + 1)),
            Some((start, len)) => {
                push_if_eligible(&mut segments, points, curvatures, start, len);
                Some((i, 1))
            }
            None => Some((i, 1)),
        };
    }
    if let Some((start, len)) = run {
        push_if_eligible(&mut segments, points, curvatures, start, len);
    }
    segments
}

#[allow(clippy::cast_precision_loss)]
fn push_if_eligible(
    segments: &mut Vec<TurnSegment>,
    points: &[TrackPoint],
    curvatures: &[f64],
    start: usize,
    len: usize,
) {
    if len < MIN_TURN_LENGTH {
        return;
    }
    let ring = Ring::new(points.len());
    let (sum_c, sum_w) = ring
        .span(start, len)
        .fold((0.0, 0.0), |(c, w), i| (c + curvatures[i].abs(), w + points[i].width));
    let mean_width = sum_w / len as f64;
    if mean_width < MIN_TURN_WIDTH {
        return;
    }
    segments.push(TurnSegment {
        start,
        len,
        direction: curvatures[start].signum(),
        mean_curvature: sum_c / len as f64,
        mean_width,
    });
}

/// Banks long, wide, gentle sweepers.
///
/// Each segment gets `max_angle · intensity · sin(π·k / (len − 1))`, signed
/// opposite to its curvature so the outside edge is raised. Intensity runs
/// from 0.4 to 1.0 across mean curvatures 0.008 to 0.06. A circular moving
/// average of radius [`BANKING_SMOOTH_RADIUS`] then softens the ramps over
/// the whole loop.
#[derive(Debug, Clone)]
pub struct AnalyzeBanking {
    max_angle: f64,
}

impl AnalyzeBanking {
    #[must_use]
    pub fn new(max_angle: f64) -> Self {
        Self { max_angle }
    }

    /// Writes banking into `points` and returns the segments found.
    ///
    /// Tracks with fewer than three points are left unbanked.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, points: &mut [TrackPoint]) -> Vec<TurnSegment> {
        if points.len() < 3 {
            return Vec::new();
        }
        let ring = Ring::new(points.len());
        let curvatures = curvature(points);
        let segments = find_turn_segments(points, &curvatures);

        let mut banking = vec![0.0; points.len()];
        for segment in &segments {
            let intensity = MIN_INTENSITY
                + (1.0 - MIN_INTENSITY)
                    * ((segment.mean_curvature - INTENSITY_LOW) / (INTENSITY_HIGH - INTENSITY_LOW))
                        .clamp(0.0, 1.0);
            let last = (segment.len - 1) as f64;
            for (k, i) in ring.span(segment.start, segment.len).enumerate() {
                let magnitude = self.max_angle * intensity * (PI * k as f64 / last).sin();
                banking[i] = -segment.direction * magnitude;
            }
        }

        let smoothed = circular_moving_average(&banking, BANKING_SMOOTH_RADIUS);
        for (point, b) in points.iter_mut().zip(smoothed) {
            point.banking = b;
        }
        segments
    }
}
