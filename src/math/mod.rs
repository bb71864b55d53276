pub mod convex_hull;
pub mod polygon_2d;
pub mod ring;
pub mod spline;

use std::f64::consts::PI;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `v` rotated 90° counter-clockwise: `(-y, x)`.
///
/// This is the single source of the track's normal convention. Every
/// `TrackPoint::normal`, boundary offset, banking sign and dogleg side is
/// derived from it.
#[must_use]
pub fn perpendicular(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Normalizes `v`, returning `fallback` when `v` is (near) zero-length.
#[must_use]
pub fn normalize_or(v: &Vector2, fallback: Vector2) -> Vector2 {
    let len = v.norm();
    if len < TOLERANCE || !len.is_finite() {
        fallback
    } else {
        v / len
    }
}

/// Wraps an angle into `(-π, π]`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Signed angle that rotates `from` onto `to`, in `(-π, π]`.
///
/// Positive when `to` lies on the [`perpendicular`] side of `from`.
#[must_use]
pub fn signed_angle(from: &Vector2, to: &Vector2) -> f64 {
    normalize_angle(to.y.atan2(to.x) - from.y.atan2(from.x))
}

/// Hermite smoothstep `3t² - 2t³` on `t ∈ [0, 1]`.
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
