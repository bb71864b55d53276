use crate::math::{Point2, Vector2, TOLERANCE};
use crate::track::{OverlapZone, PitLane, Track, TrackPoint};

/// Gap left between the origin and the track's bounding box.
pub const DEFAULT_PADDING: f64 = 50.0;

/// Shifts a track so its bounding box's minimum corner sits at `(padding, padding)`.
///
/// Produces a new [`Track`]; every coordinate-bearing field (points, pit lane,
/// overlap zones) is shifted and the derived boundaries and spatial index are
/// rebuilt. A track already in place is returned as a plain clone.
#[derive(Debug, Clone)]
pub struct TranslateToOrigin {
    padding: f64,
}

impl Default for TranslateToOrigin {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl TranslateToOrigin {
    #[must_use]
    pub fn new(padding: f64) -> Self {
        Self { padding }
    }

    /// Executes the translation.
    #[must_use]
    pub fn execute(&self, track: &Track) -> Track {
        let min = track.bounds().min;
        let offset = Vector2::new(self.padding - min.x, self.padding - min.y);
        if offset.norm() < TOLERANCE {
            return track.clone();
        }

        let shift = |p: &Point2| p + offset;
        let points: Vec<TrackPoint> = track
            .track_points()
            .iter()
            .map(|p| TrackPoint {
                position: shift(&p.position),
                ..*p
            })
            .collect();
        let pit_lane = PitLane {
            polygon: track.pit_lane().polygon.iter().map(shift).collect(),
            centroid: shift(&track.pit_lane().centroid),
        };
        let overlap_zones = track
            .overlap_zones()
            .iter()
            .map(|zone| OverlapZone {
                polygon: zone.polygon.iter().map(shift).collect(),
                index_pairs: zone.index_pairs.clone(),
            })
            .collect();

        Track::new(
            track.seed(),
            *track.metadata(),
            points,
            track.front_straight(),
            pit_lane,
            overlap_zones,
        )
    }
}
