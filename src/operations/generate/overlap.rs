use std::collections::HashSet;

use crate::math::convex_hull::convex_hull;
use crate::math::ring::Ring;
use crate::math::Point2;
use crate::track::{OverlapZone, TrackPoint};

/// Pairs closer than this many indices apart (around the loop) are neighbours, not overlaps.
pub const MIN_SEPARATION: usize = 30;

/// Two points overlap below this multiple of their summed half-widths.
const PROXIMITY_FACTOR: f64 = 1.2;

/// Index bucket size used to drop near-duplicate pairs.
const DEDUPE_BUCKET: usize = 10;

/// Zones whose centroids lie closer than this are merged.
pub const MERGE_DISTANCE: f64 = 100.0;

/// Flags regions where two distant stretches of the loop come too close.
///
/// Every pair `i < j` at least [`MIN_SEPARATION`] apart around the loop whose
/// positions are within `1.2 × (w_i/2 + w_j/2)` yields a quad spanning both
/// cross-sections. One quad is kept per `(i / 10, j / 10)` bucket, and quads
/// whose centroids lie within [`MERGE_DISTANCE`] are merged into the convex
/// hull of their union.
#[derive(Debug, Clone, Default)]
pub struct DetectOverlapZones;

impl DetectOverlapZones {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the merged zones. Tracks with fewer than three points have none.
    pub fn execute(&self, points: &[TrackPoint]) -> Vec<OverlapZone> {
        let ring = Ring::new(points.len());
        if ring.len() < 3 {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut zones = Vec::new();
        for i in 0..ring.len() {
            for j in (i + MIN_SEPARATION)..ring.len() {
                if ring.distance(i, j) < MIN_SEPARATION {
                    continue;
                }
                let (a, b) = (&points[i], &points[j]);
                let reach = PROXIMITY_FACTOR * (a.half_width() + b.half_width());
                if (a.position - b.position).norm() >= reach {
                    continue;
                }
                if !seen.insert((i / DEDUPE_BUCKET, j / DEDUPE_BUCKET)) {
                    continue;
                }
                zones.push(OverlapZone {
                    polygon: convex_hull(&[
                        a.inner_edge(),
                        a.outer_edge(),
                        b.outer_edge(),
                        b.inner_edge(),
                    ]),
                    index_pairs: vec![(i, j)],
                });
            }
        }

        merge_nearby(zones)
    }
}

/// Repeatedly folds the first zone pair with centroids within [`MERGE_DISTANCE`].
///
/// Centroids are cached and only the grown zone's entry is recomputed. Rows
/// before the grown zone were already clear of every other zone, so the scan
/// resumes at the first of them now close to it, or at the grown zone itself.
fn merge_nearby(mut zones: Vec<OverlapZone>) -> Vec<OverlapZone> {
    let mut centroids: Vec<Point2> = zones.iter().map(OverlapZone::centroid).collect();
    let mut row = 0;
    while let Some((a, b)) = first_close_pair(&centroids, row) {
        let absorbed = zones.remove(b);
        centroids.remove(b);
        let target = &mut zones[a];
        let mut vertices = std::mem::take(&mut target.polygon);
        vertices.extend(absorbed.polygon);
        target.polygon = convex_hull(&vertices);
        target.index_pairs.extend(absorbed.index_pairs);
        centroids[a] = target.centroid();

        row = (0..a)
            .find(|&c| is_close(&centroids[c], &centroids[a]))
            .unwrap_or(a);
    }
    for zone in &mut zones {
        zone.index_pairs.sort_unstable();
    }
    zones
}

fn is_close(a: &Point2, b: &Point2) -> bool {
    (a - b).norm() < MERGE_DISTANCE
}

/// First close pair in row-major order, starting at row `from`.
fn first_close_pair(centroids: &[Point2], from: usize) -> Option<(usize, usize)> {
    (from..centroids.len()).find_map(|a| {
        ((a + 1)..centroids.len())
            .find(|&b| is_close(&centroids[a], &centroids[b]))
            .map(|b| (a, b))
    })
}
