use std::f64::consts::PI;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::rng::TrackRng;

/// Upper bound on centerline samples. Keeps the pairwise overlap scan tractable.
pub const MAX_TRACK_POINTS: usize = 2000;

/// Lower bound on centerline samples. Leaves room for a three-point straight.
pub const MIN_TRACK_POINTS: usize = 12;

/// Upper bound on midpoint-displacement passes.
pub const MAX_DISPLACEMENT_ITERATIONS: usize = 4;

/// Track scale. Each class constrains every numeric generation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Park,
    Circuit,
    Autodrome,
}

impl SizeClass {
    /// All size classes, smallest first.
    pub const ALL: [SizeClass; 3] = [SizeClass::Park, SizeClass::Circuit, SizeClass::Autodrome];

    /// Returns the parameter ranges for this class.
    ///
    /// Circuit and autodrome sample densely with few displacement passes so
    /// that wide, gentle sweepers stay within the banking curvature band.
    /// Park widths keep the average below the bankable width.
    #[must_use]
    pub fn preset(self) -> SizeClassPreset {
        match self {
            SizeClass::Park => SizeClassPreset {
                num_control_points: 6..=8,
                displacement_iterations: 1..=2,
                segments_per_point: 10,
                min_radius: 250.0..=350.0,
                max_radius: 400.0..=500.0,
                min_width: 40.0..=50.0,
                max_width: 60.0..=75.0,
                roughness: 20.0..=50.0,
                straight_length: 20..=30,
                max_banking_angle: 0.10..=0.15,
                max_dogleg_angle: 0.03..=0.06,
            },
            SizeClass::Circuit => SizeClassPreset {
                num_control_points: 8..=11,
                displacement_iterations: 0..=1,
                segments_per_point: 20,
                min_radius: 550.0..=650.0,
                max_radius: 700.0..=850.0,
                min_width: 55.0..=65.0,
                max_width: 80.0..=95.0,
                roughness: 40.0..=90.0,
                straight_length: 30..=45,
                max_banking_angle: 0.12..=0.20,
                max_dogleg_angle: 0.04..=0.08,
            },
            SizeClass::Autodrome => SizeClassPreset {
                num_control_points: 8..=10,
                displacement_iterations: 0..=1,
                segments_per_point: 24,
                min_radius: 850.0..=950.0,
                max_radius: 1000.0..=1150.0,
                min_width: 70.0..=80.0,
                max_width: 100.0..=120.0,
                roughness: 50.0..=90.0,
                straight_length: 40..=60,
                max_banking_angle: 0.15..=0.26,
                max_dogleg_angle: 0.05..=0.10,
            },
        }
    }
}

/// Overall outline of the control polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackShape {
    Circular,
    Elongated,
}

impl TrackShape {
    /// All shapes.
    pub const ALL: [TrackShape; 2] = [TrackShape::Circular, TrackShape::Elongated];
}

/// Racing discipline the track is built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackFamily {
    #[default]
    Road,
    Rally,
}

impl TrackFamily {
    /// Surface used when the configuration does not name one.
    #[must_use]
    pub fn default_surface(self) -> Surface {
        match self {
            TrackFamily::Road => Surface::Asphalt,
            TrackFamily::Rally => Surface::Dirt,
        }
    }
}

/// Pavement material of the racing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Asphalt,
    Dirt,
}

impl Surface {
    /// Friction coefficient on the racing surface.
    #[must_use]
    pub fn friction(self) -> f64 {
        match self {
            Surface::Asphalt => 1.0,
            Surface::Dirt => 0.7,
        }
    }

    /// Tyre grip multiplier on the racing surface.
    #[must_use]
    pub fn grip(self) -> f64 {
        match self {
            Surface::Asphalt => 1.0,
            Surface::Dirt => 0.8,
        }
    }
}

/// Inclusive parameter ranges for one [`SizeClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct SizeClassPreset {
    pub num_control_points: RangeInclusive<usize>,
    pub displacement_iterations: RangeInclusive<usize>,
    pub segments_per_point: usize,
    pub min_radius: RangeInclusive<f64>,
    pub max_radius: RangeInclusive<f64>,
    pub min_width: RangeInclusive<f64>,
    pub max_width: RangeInclusive<f64>,
    pub roughness: RangeInclusive<f64>,
    /// Front straight length in centerline points.
    pub straight_length: RangeInclusive<usize>,
    pub max_banking_angle: RangeInclusive<f64>,
    pub max_dogleg_angle: RangeInclusive<f64>,
}

fn mid_f64(range: &RangeInclusive<f64>) -> f64 {
    (range.start() + range.end()) * 0.5
}

fn mid_usize(range: &RangeInclusive<usize>) -> usize {
    (range.start() + range.end()) / 2
}

/// Complete parameter record for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub size_class: SizeClass,
    pub shape: TrackShape,
    pub family: TrackFamily,
    /// Overrides the family's default surface.
    pub surface: Option<Surface>,
    pub num_control_points: usize,
    pub displacement_iterations: usize,
    pub segments_per_point: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub roughness: f64,
    /// Shortest front straight, in centerline points.
    pub min_straight_length: usize,
    /// Longest front straight, in centerline points.
    pub max_straight_length: usize,
    pub banking_enabled: bool,
    /// Radians.
    pub max_banking_angle: f64,
    /// Radians.
    pub max_dogleg_angle: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self::for_size_class(SizeClass::Circuit, TrackShape::Circular)
    }
}

impl TrackConfig {
    /// Mid-range configuration for a size class.
    #[must_use]
    pub fn for_size_class(size_class: SizeClass, shape: TrackShape) -> Self {
        let p = size_class.preset();
        Self {
            size_class,
            shape,
            family: TrackFamily::default(),
            surface: None,
            num_control_points: mid_usize(&p.num_control_points),
            displacement_iterations: mid_usize(&p.displacement_iterations),
            segments_per_point: p.segments_per_point,
            min_radius: mid_f64(&p.min_radius),
            max_radius: mid_f64(&p.max_radius),
            min_width: mid_f64(&p.min_width),
            max_width: mid_f64(&p.max_width),
            roughness: mid_f64(&p.roughness),
            min_straight_length: *p.straight_length.start(),
            max_straight_length: *p.straight_length.end(),
            banking_enabled: true,
            max_banking_angle: mid_f64(&p.max_banking_angle),
            max_dogleg_angle: mid_f64(&p.max_dogleg_angle),
        }
    }

    /// Surface after applying the family default.
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface.unwrap_or_else(|| self.family.default_surface())
    }

    /// Number of centerline samples this configuration produces.
    #[must_use]
    pub fn total_points(&self) -> usize {
        let iterations = u32::try_from(self.displacement_iterations).unwrap_or(u32::MAX);
        self.num_control_points
            .saturating_mul(2_usize.saturating_pow(iterations))
            .saturating_mul(self.segments_per_point)
    }

    /// Checks every parameter for degenerate values.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ParameterOutOfRange` for counts, lengths or angles outside
    ///   their admissible range, or a roughness above `min_radius`
    /// - `ConfigError::InvertedRange` when a `min_*` exceeds its `max_*`
    /// - `ConfigError::TooManyPoints` when the sample count exceeds
    ///   [`MAX_TRACK_POINTS`]
    /// - `ConfigError::TooFewPoints` when it falls below [`MIN_TRACK_POINTS`]
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<()> {
        check_count("num_control_points", self.num_control_points, 3, 64)?;
        check_count(
            "displacement_iterations",
            self.displacement_iterations,
            0,
            MAX_DISPLACEMENT_ITERATIONS,
        )?;
        check_count("segments_per_point", self.segments_per_point, 1, 64)?;
        check_count("min_straight_length", self.min_straight_length, 2, MAX_TRACK_POINTS)?;

        check_positive("min_radius", self.min_radius)?;
        check_positive("min_width", self.min_width)?;
        check_scalar("roughness", self.roughness, 0.0, self.min_radius)?;
        check_scalar("max_banking_angle", self.max_banking_angle, 0.0, PI / 4.0)?;
        check_scalar("max_dogleg_angle", self.max_dogleg_angle, 0.0, PI / 6.0)?;

        check_order("radius", self.min_radius, self.max_radius)?;
        check_order("width", self.min_width, self.max_width)?;
        check_order(
            "straight_length",
            self.min_straight_length as f64,
            self.max_straight_length as f64,
        )?;

        let points = self.total_points();
        if points > MAX_TRACK_POINTS {
            return Err(ConfigError::TooManyPoints {
                points,
                limit: MAX_TRACK_POINTS,
            }
            .into());
        }
        if points < MIN_TRACK_POINTS {
            return Err(ConfigError::TooFewPoints {
                points,
                minimum: MIN_TRACK_POINTS,
            }
            .into());
        }
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn check_count(parameter: &'static str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(ConfigError::ParameterOutOfRange {
            parameter,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        }
        .into());
    }
    Ok(())
}

fn check_scalar(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::ParameterOutOfRange {
            parameter,
            value,
            min,
            max,
        }
        .into());
    }
    Ok(())
}

fn check_positive(parameter: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::ParameterOutOfRange {
            parameter,
            value,
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
        }
        .into());
    }
    Ok(())
}

fn check_order(parameter: &'static str, min: f64, max: f64) -> Result<()> {
    if !max.is_finite() || min > max {
        return Err(ConfigError::InvertedRange {
            parameter,
            min,
            max,
        }
        .into());
    }
    Ok(())
}

/// Partial parameter record. Unset fields are sampled from the size class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    pub seed: u64,
    pub size_class: Option<SizeClass>,
    pub shape: Option<TrackShape>,
    pub family: Option<TrackFamily>,
    pub surface: Option<Surface>,
    pub num_control_points: Option<usize>,
    pub displacement_iterations: Option<usize>,
    pub segments_per_point: Option<usize>,
    pub min_radius: Option<f64>,
    pub max_radius: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub roughness: Option<f64>,
    pub min_straight_length: Option<usize>,
    pub max_straight_length: Option<usize>,
    pub banking_enabled: Option<bool>,
    pub max_banking_angle: Option<f64>,
    pub max_dogleg_angle: Option<f64>,
}

impl TrackParams {
    /// Creates a record with only the seed set.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Fills every unset field from a generator seeded with `self.seed`.
    ///
    /// One draw is consumed per field whether or not it is set, so pinning
    /// one field never changes the sampled value of another.
    #[must_use]
    pub fn resolve(&self) -> TrackConfig {
        let mut rng = TrackRng::new(self.seed);

        let sampled_class = SizeClass::ALL[rng.gen_range(0..SizeClass::ALL.len())];
        let sampled_shape = TrackShape::ALL[rng.gen_range(0..TrackShape::ALL.len())];
        let size_class = self.size_class.unwrap_or(sampled_class);
        let shape = self.shape.unwrap_or(sampled_shape);
        let p = size_class.preset();

        let mut pick_usize = |set: Option<usize>, range: &RangeInclusive<usize>| {
            let sampled = rng.gen_range(range.clone());
            set.unwrap_or(sampled)
        };
        let num_control_points = pick_usize(self.num_control_points, &p.num_control_points);
        let displacement_iterations =
            pick_usize(self.displacement_iterations, &p.displacement_iterations);
        let min_straight_length = pick_usize(
            self.min_straight_length,
            &(*p.straight_length.start()..=mid_usize(&p.straight_length)),
        );
        let max_straight_length = pick_usize(
            self.max_straight_length,
            &(mid_usize(&p.straight_length)..=*p.straight_length.end()),
        );

        let mut pick_f64 = |set: Option<f64>, range: &RangeInclusive<f64>| {
            let sampled = rng.gen_range(range.clone());
            set.unwrap_or(sampled)
        };
        let min_radius = pick_f64(self.min_radius, &p.min_radius);
        let max_radius = pick_f64(self.max_radius, &p.max_radius);
        let min_width = pick_f64(self.min_width, &p.min_width);
        let max_width = pick_f64(self.max_width, &p.max_width);
        let roughness = pick_f64(self.roughness, &p.roughness);
        let max_banking_angle = pick_f64(self.max_banking_angle, &p.max_banking_angle);
        let max_dogleg_angle = pick_f64(self.max_dogleg_angle, &p.max_dogleg_angle);

        TrackConfig {
            size_class,
            shape,
            family: self.family.unwrap_or_default(),
            surface: self.surface,
            num_control_points,
            displacement_iterations,
            segments_per_point: self.segments_per_point.unwrap_or(p.segments_per_point),
            min_radius,
            max_radius,
            min_width,
            max_width,
            roughness,
            min_straight_length,
            max_straight_length,
            banking_enabled: self.banking_enabled.unwrap_or(true),
            max_banking_angle,
            max_dogleg_angle,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrackError;

    #[test]
    fn presets_are_valid_at_both_ends() {
        for class in SizeClass::ALL {
            let p = class.preset();
            for shape in TrackShape::ALL {
                let mut config = TrackConfig::for_size_class(class, shape);
                config.validate().unwrap();
                config.num_control_points = *p.num_control_points.end();
                config.displacement_iterations = *p.displacement_iterations.end();
                config.validate().unwrap();
                assert!(config.total_points() <= MAX_TRACK_POINTS);
            }
        }
    }

    #[test]
    fn preset_widths_do_not_overlap_within_class() {
        for class in SizeClass::ALL {
            let p = class.preset();
            assert!(p.min_width.end() <= p.max_width.start());
            assert!(p.min_radius.end() <= p.max_radius.start());
            assert!(p.roughness.end() <= p.min_radius.start());
        }
    }

    #[test]
    fn rejects_too_few_control_points() {
        let config = TrackConfig {
            num_control_points: 2,
            ..TrackConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            TrackError::Config(ConfigError::ParameterOutOfRange {
                parameter: "num_control_points",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_width() {
        let config = TrackConfig {
            min_width: 90.0,
            max_width: 60.0,
            ..TrackConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            TrackError::Config(ConfigError::InvertedRange {
                parameter: "width",
                ..
            })
        ));
    }

    #[test]
    fn rejects_runaway_point_count() {
        let config = TrackConfig {
            num_control_points: 14,
            displacement_iterations: 4,
            segments_per_point: 20,
            ..TrackConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            TrackError::Config(ConfigError::TooManyPoints { .. })
        ));
    }

    #[test]
    fn rejects_too_few_samples() {
        let config = TrackConfig {
            num_control_points: 3,
            displacement_iterations: 0,
            segments_per_point: 2,
            ..TrackConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            TrackError::Config(ConfigError::TooFewPoints { points: 6, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let config = TrackConfig {
            roughness: f64::NAN,
            ..TrackConfig::default()
        };
        assert!(config.validate().is_err());
        let config = TrackConfig {
            min_radius: 0.0,
            ..TrackConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_roughness_beyond_min_radius() {
        let config = TrackConfig {
            roughness: 1e200,
            ..TrackConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            TrackError::Config(ConfigError::ParameterOutOfRange {
                parameter: "roughness",
                ..
            })
        ));
        let config = TrackConfig {
            roughness: TrackConfig::default().min_radius,
            ..TrackConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn family_selects_surface() {
        let mut config = TrackConfig::default();
        assert_eq!(config.surface(), Surface::Asphalt);
        config.family = TrackFamily::Rally;
        assert_eq!(config.surface(), Surface::Dirt);
        config.surface = Some(Surface::Asphalt);
        assert_eq!(config.surface(), Surface::Asphalt);
    }

    #[test]
    fn resolve_is_reproducible() {
        let params = TrackParams::new(1234);
        assert_eq!(params.resolve(), params.resolve());
    }

    #[test]
    fn resolve_respects_set_fields_and_class_ranges() {
        for seed in 0..50 {
            let params = TrackParams {
                size_class: Some(SizeClass::Autodrome),
                roughness: Some(10.0),
                ..TrackParams::new(seed)
            };
            let config = params.resolve();
            let p = SizeClass::Autodrome.preset();
            assert_eq!(config.size_class, SizeClass::Autodrome);
            assert!((config.roughness - 10.0).abs() < f64::EPSILON);
            assert!(p.num_control_points.contains(&config.num_control_points));
            assert!(p.min_width.contains(&config.min_width));
            assert!(p.max_width.contains(&config.max_width));
            assert!(config.min_straight_length <= config.max_straight_length);
            config.validate().unwrap();
        }
    }

    #[test]
    fn pinning_a_field_keeps_the_others() {
        let free = TrackParams {
            size_class: Some(SizeClass::Circuit),
            ..TrackParams::new(77)
        }
        .resolve();
        let pinned = TrackParams {
            size_class: Some(SizeClass::Circuit),
            num_control_points: Some(9),
            ..TrackParams::new(77)
        }
        .resolve();
        assert_eq!(pinned.num_control_points, 9);
        assert_eq!(free.min_width.to_bits(), pinned.min_width.to_bits());
        assert_eq!(free.shape, pinned.shape);
    }

    #[test]
    fn params_deserialize_from_partial_json() {
        let params: TrackParams =
            serde_json::from_str(r#"{"seed": 42, "size_class": "circuit", "shape": "elongated"}"#)
                .unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.size_class, Some(SizeClass::Circuit));
        assert_eq!(params.shape, Some(TrackShape::Elongated));
        assert!(params.roughness.is_none());
    }

    #[test]
    fn config_serde_round_trip_preserves_fields() {
        let config = TrackConfig::for_size_class(SizeClass::Park, TrackShape::Elongated);
        let json = serde_json::to_string(&config).unwrap();
        let back: TrackConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
