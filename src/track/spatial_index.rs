use std::collections::HashMap;

use tracing::warn;

use super::TrackPoint;
use crate::math::Point2;

/// Edge length of one grid cell, in world units.
pub const CELL_SIZE: f64 = 50.0;

/// Footprint radius cap for a single point.
const MAX_FOOTPRINT: f64 = 500.0;

/// Points whose footprint would cover more cells than this per axis are not indexed.
const MAX_CELL_SPAN: i64 = 100;

/// Integer cell coordinate.
pub type CellKey = (i32, i32);

/// Uniform hash grid from cell to the track points whose footprint covers it.
///
/// Built once per [`super::Track`] and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cells: HashMap<CellKey, Vec<usize>>,
    skipped: usize,
}

#[allow(clippy::cast_possible_truncation)]
fn cell_coord(v: f64) -> i64 {
    (v / CELL_SIZE).floor() as i64
}

impl SpatialIndex {
    /// Indexes every point over the square `position ± min(width, 500)`.
    ///
    /// Points with non-finite coordinates, or a footprint spanning more than
    /// 100 cells per axis, are skipped; queries near them fall back to a
    /// linear scan.
    #[must_use]
    pub fn build(points: &[TrackPoint]) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let mut skipped = 0;

        for (index, point) in points.iter().enumerate() {
            let radius = point.width.min(MAX_FOOTPRINT).max(0.0);
            let p = point.position;
            if !(p.x.is_finite() && p.y.is_finite() && radius.is_finite()) {
                skipped += 1;
                continue;
            }
            let (x0, x1) = (cell_coord(p.x - radius), cell_coord(p.x + radius));
            let (y0, y1) = (cell_coord(p.y - radius), cell_coord(p.y + radius));
            let span_ok =
                x1.saturating_sub(x0) < MAX_CELL_SPAN && y1.saturating_sub(y0) < MAX_CELL_SPAN;
            let (Ok(x0), Ok(x1), Ok(y0), Ok(y1)) = (
                i32::try_from(x0),
                i32::try_from(x1),
                i32::try_from(y0),
                i32::try_from(y1),
            ) else {
                skipped += 1;
                continue;
            };
            if !span_ok {
                skipped += 1;
                continue;
            }
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    cells.entry((cx, cy)).or_default().push(index);
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "spatial index skipped points with runaway footprint");
        }
        Self { cells, skipped }
    }

    /// Cell containing `point`, or `None` outside the representable grid.
    #[must_use]
    pub fn cell_of(point: &Point2) -> Option<CellKey> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return None;
        }
        let cx = i32::try_from(cell_coord(point.x)).ok()?;
        let cy = i32::try_from(cell_coord(point.y)).ok()?;
        Some((cx, cy))
    }

    /// Point indices registered in the cell containing `point`, if any.
    #[must_use]
    pub fn candidates(&self, point: &Point2) -> Option<&[usize]> {
        let key = Self::cell_of(point)?;
        self.cells
            .get(&key)
            .map(Vec::as_slice)
            .filter(|c| !c.is_empty())
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of points left out by the footprint guard.
    #[must_use]
    pub fn skipped_points(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    fn point(x: f64, y: f64, width: f64) -> TrackPoint {
        TrackPoint::new(Point2::new(x, y), width, Vector2::new(1.0, 0.0))
    }

    #[test]
    fn footprint_covers_neighbor_cells() {
        let index = SpatialIndex::build(&[point(25.0, 25.0, 40.0)]);
        // [-15, 65] on both axes: cells -1..=1.
        assert_eq!(index.cell_count(), 9);
        assert_eq!(index.candidates(&Point2::new(-10.0, 60.0)).unwrap(), &[0]);
        assert!(index.candidates(&Point2::new(200.0, 0.0)).is_none());
    }

    #[test]
    fn negative_coordinates_floor_correctly() {
        assert_eq!(SpatialIndex::cell_of(&Point2::new(-0.5, -50.0)), Some((-1, -1)));
        assert_eq!(SpatialIndex::cell_of(&Point2::new(49.9, 50.0)), Some((0, 1)));
    }

    #[test]
    fn footprint_is_capped() {
        let index = SpatialIndex::build(&[point(0.0, 0.0, 10_000.0)]);
        // Radius capped at 500: cells -10..=10 per axis.
        assert_eq!(index.cell_count(), 21 * 21);
        assert_eq!(index.skipped_points(), 0);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let index = SpatialIndex::build(&[point(f64::NAN, 0.0, 10.0), point(0.0, 0.0, 10.0)]);
        assert_eq!(index.skipped_points(), 1);
        assert_eq!(index.candidates(&Point2::new(1.0, 1.0)).unwrap(), &[1]);
        assert!(SpatialIndex::cell_of(&Point2::new(f64::INFINITY, 0.0)).is_none());
    }

    #[test]
    fn out_of_grid_points_are_skipped() {
        let index = SpatialIndex::build(&[point(1e300, 0.0, 10.0)]);
        assert_eq!(index.skipped_points(), 1);
        assert_eq!(index.cell_count(), 0);
    }
}
