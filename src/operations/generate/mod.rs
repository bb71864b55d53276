//! The track generation pipeline.
//!
//! Stages run strictly forward over one [`TrackRng`] stream:
//!
//! 1. [`ControlPointLayout`] places the sparse control polygon
//! 2. [`MidpointDisplacement`] roughens it
//! 3. a [`ClosedSpline`] samples the dense centerline and tangents
//! 4. [`WidthProfile`] assigns widths
//! 5. [`InsertStraight`] lays the front straight, then [`smooth_widths`]
//!    blends its seams and [`rotate_to_start`] moves index `0` to its middle
//! 6. [`AnalyzeBanking`] banks the sweepers
//! 7. [`BuildPitLane`] and [`DetectOverlapZones`] derive the polygons
//!
//! Draw order is fixed: control points, displacement, width keys, straight
//! length, dogleg position, dogleg angle.

mod banking;
mod displacement;
mod layout;
mod overlap;
mod pit_lane;
mod straight;
mod width;

pub use banking::{
    curvature, find_turn_segments, AnalyzeBanking, TurnSegment, BANKING_SMOOTH_RADIUS,
    MAX_TURN_CURVATURE, MIN_TURN_CURVATURE, MIN_TURN_LENGTH, MIN_TURN_WIDTH,
};
pub use displacement::MidpointDisplacement;
pub use layout::ControlPointLayout;
pub use overlap::{DetectOverlapZones, MERGE_DISTANCE, MIN_SEPARATION};
pub use pit_lane::{BuildPitLane, PIT_GAP, PIT_WIDTH};
pub use straight::{rotate_to_start, InsertStraight};
pub use width::{circular_moving_average, smooth_widths, WidthProfile, NUM_WIDTH_POINTS};

use tracing::debug;

use crate::config::{TrackConfig, TrackParams};
use crate::error::{GeometryError, Result};
use crate::math::spline::{CatmullRom, ClosedSpline};
use crate::math::Point2;
use crate::rng::TrackRng;
use crate::track::{Track, TrackMetadata, TrackPoint};

/// Smallest front straight, in points.
const MIN_STRAIGHT_POINTS: usize = 3;

/// Generates a complete [`Track`] from a seed and a configuration.
///
/// The same seed and configuration always produce a bit-identical track.
#[derive(Debug, Clone)]
pub struct GenerateTrack<S = CatmullRom> {
    seed: u64,
    config: TrackConfig,
    spline: S,
}

impl GenerateTrack {
    /// Creates a generator using the Catmull-Rom centerline.
    #[must_use]
    pub fn new(seed: u64, config: TrackConfig) -> Self {
        Self {
            seed,
            config,
            spline: CatmullRom,
        }
    }

    /// Resolves the unset fields of `params` and generates the track.
    ///
    /// Equivalent to `GenerateTrack::new(params.seed, params.resolve()).execute()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved configuration fails validation.
    pub fn random(params: &TrackParams) -> Result<Track> {
        let config = params.resolve();
        debug!(
            seed = params.seed,
            size_class = ?config.size_class,
            shape = ?config.shape,
            "resolved random track parameters"
        );
        GenerateTrack::new(params.seed, config).execute()
    }
}

impl<S: ClosedSpline> GenerateTrack<S> {
    /// Creates a generator with a custom centerline spline.
    #[must_use]
    pub fn with_spline(seed: u64, config: TrackConfig, spline: S) -> Self {
        Self {
            seed,
            config,
            spline,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Runs the full pipeline.
    ///
    /// # Errors
    ///
    /// - `ConfigError` if the configuration fails [`TrackConfig::validate`]
    /// - `GeometryError::Degenerate` if the spline returns mismatched or too
    ///   few samples
    pub fn execute(&self) -> Result<Track> {
        let config = &self.config;
        config.validate()?;
        let mut rng = TrackRng::new(self.seed);

        let control = ControlPointLayout::new(
            config.num_control_points,
            config.min_radius,
            config.max_radius,
            config.shape,
        )
        .execute(&mut rng);
        let displaced = MidpointDisplacement::new(config.displacement_iterations, config.roughness)
            .execute(&control, &mut rng);
        debug!(
            control_points = control.len(),
            displaced_points = displaced.len(),
            "control polygon laid out"
        );

        let mut points = self.centerline(&displaced, &mut rng)?;
        let n = points.len();

        let straight_length = self.straight_length(n, &mut rng);
        let straight =
            InsertStraight::new(straight_length, config.max_width, config.max_dogleg_angle)
                .execute(&mut points, &mut rng);
        smooth_widths(&mut points);
        let front_straight = rotate_to_start(&mut points, straight);
        debug!(
            points = n,
            straight_start = front_straight.start,
            straight_len = front_straight.len,
            "front straight inserted"
        );

        if config.banking_enabled {
            let segments = AnalyzeBanking::new(config.max_banking_angle).execute(&mut points);
            debug!(segments = segments.len(), "banking applied");
        }

        let pit_lane = BuildPitLane::new(front_straight).execute(&points);
        let overlap_zones = DetectOverlapZones::new().execute(&points);
        debug!(
            pit_vertices = pit_lane.polygon.len(),
            overlap_zones = overlap_zones.len(),
            "track polygons derived"
        );

        let metadata = TrackMetadata {
            family: config.family,
            shape: config.shape,
            size_class: config.size_class,
            surface: config.surface(),
        };
        Ok(Track::new(
            self.seed,
            metadata,
            points,
            front_straight,
            pit_lane,
            overlap_zones,
        ))
    }

    fn centerline(
        &self,
        displaced: &[Point2],
        rng: &mut TrackRng,
    ) -> Result<Vec<TrackPoint>> {
        let spp = self.config.segments_per_point;
        let positions = self.spline.positions(displaced, spp);
        let tangents = self.spline.tangents(displaced, spp);
        if positions.len() != tangents.len() || positions.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "spline returned {} positions and {} tangents",
                positions.len(),
                tangents.len()
            ))
            .into());
        }

        let widths = WidthProfile::new(self.config.min_width, self.config.max_width)
            .execute(positions.len(), rng);
        Ok(positions
            .into_iter()
            .zip(tangents)
            .zip(widths)
            .map(|((position, tangent), width)| TrackPoint::new(position, width, tangent))
            .collect())
    }

    /// Draws the straight length, clamped to `[3, n / 3]`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn straight_length(&self, n: usize, rng: &mut TrackRng) -> usize {
        let drawn = rng
            .between(
                self.config.min_straight_length as f64,
                self.config.max_straight_length as f64,
            )
            .round() as usize;
        let longest = (n / 3).max(MIN_STRAIGHT_POINTS);
        drawn.clamp(MIN_STRAIGHT_POINTS, longest)
    }
}
