use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the arithmetic mean of a point set, or `None` when empty.
#[must_use]
pub fn vertex_centroid(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let mut sx = 0.0;
    let mut sy = 0.0;
    for p in points {
        sx += p.x;
        sy += p.y;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    Some(Point2::new(sx / n, sy / n))
}

/// Ray-casting point-in-polygon test.
///
/// Casts a ray toward +x and counts edge crossings. Polygons with fewer than
/// three vertices contain nothing.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let dy = pj.y - pi.y;
            // Non-zero: the straddle check above excludes horizontal edges.
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / dy;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Axis-aligned extent `(min, max)` of a point set, or `None` when empty.
#[must_use]
pub fn bounds_2d<'a, I>(points: I) -> Option<(Point2, Point2)>
where
    I: IntoIterator<Item = &'a Point2>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut min = *first;
    let mut max = *first;
    for p in iter {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Returns the leftmost-bottommost vertex index of a point set.
#[must_use]
pub fn leftmost_bottom(points: &[Point2]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, pt) in points.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) => {
                let b = &points[b];
                if pt.x < b.x - TOLERANCE || ((pt.x - b.x).abs() < TOLERANCE && pt.y < b.y) {
                    best = Some(i);
                }
            }
        }
    }
    best
}
