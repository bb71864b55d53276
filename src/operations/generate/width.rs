use crate::math::ring::Ring;
use crate::math::smoothstep;
use crate::rng::TrackRng;
use crate::track::TrackPoint;

/// Number of random width keys spread around the loop.
pub const NUM_WIDTH_POINTS: usize = 6;

/// Periodic width signal along the centerline.
///
/// Draws [`NUM_WIDTH_POINTS`] keys in `[min_width, max_width)` and blends
/// between neighbouring keys with a smoothstep. The last key blends back into
/// the first, so the signal has no seam.
#[derive(Debug, Clone)]
pub struct WidthProfile {
    min_width: f64,
    max_width: f64,
}

impl WidthProfile {
    #[must_use]
    pub fn new(min_width: f64, max_width: f64) -> Self {
        Self {
            min_width,
            max_width,
        }
    }

    /// Samples `count` widths.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self, count: usize, rng: &mut TrackRng) -> Vec<f64> {
        let keys: Vec<f64> = (0..NUM_WIDTH_POINTS)
            .map(|_| rng.between(self.min_width, self.max_width))
            .collect();

        (0..count)
            .map(|i| {
                let t = i as f64 / count as f64 * NUM_WIDTH_POINTS as f64;
                let idx = (t.floor() as usize).min(NUM_WIDTH_POINTS - 1);
                let frac = t - idx as f64;
                let a = keys[idx];
                let b = keys[(idx + 1) % NUM_WIDTH_POINTS];
                a + (b - a) * smoothstep(frac)
            })
            .collect()
    }
}

/// Circular moving average with a window of `2 * radius + 1` samples.
///
/// Windows longer than the sequence wrap around more than once.
#[must_use]
pub fn circular_moving_average(values: &[f64], radius: usize) -> Vec<f64> {
    let ring = Ring::new(values.len());
    if ring.is_empty() || radius == 0 {
        return values.to_vec();
    }
    let window = 2 * radius + 1;
    #[allow(clippy::cast_precision_loss)]
    let divisor = window as f64;
    let back = radius % ring.len();

    (0..ring.len())
        .map(|i| {
            let start = ring.wrap(i + ring.len() - back);
            ring.span(start, window).map(|j| values[j]).sum::<f64>() / divisor
        })
        .collect()
}

/// Smooths widths across the seams left by straight insertion.
///
/// Radius is `min(8, n / 10)`. Positions and tangents are untouched.
pub fn smooth_widths(points: &mut [TrackPoint]) {
    let radius = (points.len() / 10).min(8);
    let widths: Vec<f64> = points.iter().map(|p| p.width).collect();
    let smoothed = circular_moving_average(&widths, radius);
    for (point, width) in points.iter_mut().zip(smoothed) {
        point.width = width;
    }
}
