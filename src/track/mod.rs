mod query;
mod spatial_index;

pub use query::{ClosestTrackPoint, GRASS_FRICTION, OFF_TRACK_FALLOFF, OFF_TRACK_GRIP};
pub use spatial_index::{SpatialIndex, CELL_SIZE};

use serde::{Deserialize, Serialize};

use crate::config::{SizeClass, Surface, TrackFamily, TrackShape};
use crate::math::polygon_2d::{bounds_2d, vertex_centroid};
use crate::math::ring::Ring;
use crate::math::{perpendicular, Point2, Vector2};

/// One centerline sample with its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: Point2,
    /// Full pavement width. Always positive.
    pub width: f64,
    /// Unit direction of increasing index.
    pub tangent: Vector2,
    /// `perpendicular(tangent)`.
    pub normal: Vector2,
    /// Lateral tilt in radians; its sign names the raised (outside) edge.
    pub banking: f64,
}

impl TrackPoint {
    /// Creates an unbanked point, deriving the normal from the tangent.
    #[must_use]
    pub fn new(position: Point2, width: f64, tangent: Vector2) -> Self {
        Self {
            position,
            width,
            tangent,
            normal: perpendicular(&tangent),
            banking: 0.0,
        }
    }

    /// Replaces the tangent and recomputes the normal.
    pub fn set_tangent(&mut self, tangent: Vector2) {
        self.tangent = tangent;
        self.normal = perpendicular(&tangent);
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Edge point on the `+normal` side.
    #[must_use]
    pub fn inner_edge(&self) -> Point2 {
        self.position + self.normal * self.half_width()
    }

    /// Edge point on the `-normal` side.
    #[must_use]
    pub fn outer_edge(&self) -> Point2 {
        self.position - self.normal * self.half_width()
    }
}

/// Contiguous run of centerline indices, possibly wrapping past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSpan {
    pub start: usize,
    pub len: usize,
}

impl IndexSpan {
    #[must_use]
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Whether `index` falls inside the span on a ring of `ring.len()` points.
    #[must_use]
    pub fn contains(&self, ring: Ring, index: usize) -> bool {
        ring.forward_distance(self.start, index) < self.len
    }
}

/// Pit lane polygon: inner-edge vertices followed by the reversed outer edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PitLane {
    pub polygon: Vec<Point2>,
    pub centroid: Point2,
}

impl PitLane {
    /// Builds a pit lane from its two edges, computing the centroid.
    #[must_use]
    pub fn from_edges(inner: Vec<Point2>, outer: &[Point2]) -> Self {
        let mut polygon = inner;
        polygon.extend(outer.iter().rev());
        let centroid = vertex_centroid(&polygon).unwrap_or_else(Point2::origin);
        Self { polygon, centroid }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygon.is_empty()
    }
}

/// Convex region where two non-adjacent stretches of track come too close.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapZone {
    /// Convex polygon, counter-clockwise.
    pub polygon: Vec<Point2>,
    /// Centerline index pairs `(i, j)`, `i < j`, that produced this zone.
    pub index_pairs: Vec<(usize, usize)>,
}

impl OverlapZone {
    /// Mean of the polygon vertices.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        vertex_centroid(&self.polygon).unwrap_or_else(Point2::origin)
    }
}

/// Descriptive labels carried alongside the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub family: TrackFamily,
    pub shape: TrackShape,
    pub size_class: SizeClass,
    pub surface: Surface,
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb {
    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// A generated closed-loop track.
///
/// Immutable once built: every derived view (boundaries, start line, spatial
/// index) is computed in [`Track::new`] from the point sequence. Index `0` is
/// the start/finish point and indices wrap.
#[derive(Debug, Clone)]
pub struct Track {
    seed: u64,
    metadata: TrackMetadata,
    track_points: Vec<TrackPoint>,
    centerline: Vec<Point2>,
    inner_boundary: Vec<Point2>,
    outer_boundary: Vec<Point2>,
    start_finish_line: Option<[Point2; 2]>,
    front_straight: IndexSpan,
    pit_lane: PitLane,
    overlap_zones: Vec<OverlapZone>,
    spatial_index: SpatialIndex,
}

impl Track {
    /// Assembles a track from its point sequence and derived polygons.
    #[must_use]
    pub fn new(
        seed: u64,
        metadata: TrackMetadata,
        track_points: Vec<TrackPoint>,
        front_straight: IndexSpan,
        pit_lane: PitLane,
        overlap_zones: Vec<OverlapZone>,
    ) -> Self {
        let centerline = track_points.iter().map(|p| p.position).collect();
        let inner_boundary = track_points.iter().map(TrackPoint::inner_edge).collect();
        let outer_boundary = track_points.iter().map(TrackPoint::outer_edge).collect();
        let start_finish_line = track_points
            .first()
            .map(|p| [p.inner_edge(), p.outer_edge()]);
        let spatial_index = SpatialIndex::build(&track_points);
        Self {
            seed,
            metadata,
            track_points,
            centerline,
            inner_boundary,
            outer_boundary,
            start_finish_line,
            front_straight,
            pit_lane,
            overlap_zones,
            spatial_index,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn metadata(&self) -> &TrackMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn track_points(&self) -> &[TrackPoint] {
        &self.track_points
    }

    #[must_use]
    pub fn centerline(&self) -> &[Point2] {
        &self.centerline
    }

    #[must_use]
    pub fn inner_boundary(&self) -> &[Point2] {
        &self.inner_boundary
    }

    #[must_use]
    pub fn outer_boundary(&self) -> &[Point2] {
        &self.outer_boundary
    }

    /// Inner and outer edge at index `0`; `None` for an empty track.
    #[must_use]
    pub fn start_finish_line(&self) -> Option<[Point2; 2]> {
        self.start_finish_line
    }

    /// Index span of the synthesized front straight. Contains index `0`.
    #[must_use]
    pub fn front_straight(&self) -> IndexSpan {
        self.front_straight
    }

    #[must_use]
    pub fn pit_lane(&self) -> &PitLane {
        &self.pit_lane
    }

    #[must_use]
    pub fn overlap_zones(&self) -> &[OverlapZone] {
        &self.overlap_zones
    }

    #[must_use]
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.track_points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.track_points.is_empty()
    }

    /// Wrap-aware index arithmetic over this track's points.
    #[must_use]
    pub fn ring(&self) -> Ring {
        Ring::new(self.track_points.len())
    }

    /// Extent of the centerline and both boundaries. Zero-size at the origin
    /// for an empty track.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let all = self
            .centerline
            .iter()
            .chain(&self.inner_boundary)
            .chain(&self.outer_boundary);
        match bounds_2d(all) {
            Some((min, max)) => Aabb { min, max },
            None => Aabb {
                min: Point2::origin(),
                max: Point2::origin(),
            },
        }
    }

    /// Center of [`Track::bounds`].
    #[must_use]
    pub fn center(&self) -> Point2 {
        self.bounds().center()
    }
}
