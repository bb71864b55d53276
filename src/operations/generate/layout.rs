use std::f64::consts::PI;

use crate::config::TrackShape;
use crate::math::Point2;
use crate::rng::TrackRng;

/// Places the sparse control polygon around the origin.
///
/// Points are evenly spaced in angle, counter-clockwise from `+x`, each with
/// its own radius drawn from `[min_radius, max_radius)`. The elongated shape
/// stretches the ring along `x` by an aspect ratio in `[1.5, 2.5)` and shrinks
/// both axes by `sqrt((1 + aspect) / 2)` so the perimeter stays comparable.
#[derive(Debug, Clone)]
pub struct ControlPointLayout {
    count: usize,
    min_radius: f64,
    max_radius: f64,
    shape: TrackShape,
}

impl ControlPointLayout {
    #[must_use]
    pub fn new(count: usize, min_radius: f64, max_radius: f64, shape: TrackShape) -> Self {
        Self {
            count,
            min_radius,
            max_radius,
            shape,
        }
    }

    /// Draws the control points. Elongated layouts consume one extra draw
    /// for the aspect ratio before the per-point radii.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self, rng: &mut TrackRng) -> Vec<Point2> {
        let (sx, sy) = match self.shape {
            TrackShape::Circular => (1.0, 1.0),
            TrackShape::Elongated => {
                let aspect = 1.5 + rng.next_f64();
                let compensation = ((1.0 + aspect) / 2.0).sqrt();
                (aspect / compensation, 1.0 / compensation)
            }
        };

        (0..self.count)
            .map(|i| {
                let angle = i as f64 / self.count as f64 * 2.0 * PI;
                let r = rng.between(self.min_radius, self.max_radius);
                Point2::new(r * sx * angle.cos(), r * sy * angle.sin())
            })
            .collect()
    }
}
