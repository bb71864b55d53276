use thiserror::Error;

/// Top-level error type for track generation.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors raised while validating a generation parameter record.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("range {parameter} is inverted: min {min} > max {max}")]
    InvertedRange {
        parameter: &'static str,
        min: f64,
        max: f64,
    },

    #[error("configuration produces {points} centerline points, limit is {limit}")]
    TooManyPoints { points: usize, limit: usize },

    #[error("configuration produces {points} centerline points, minimum is {minimum}")]
    TooFewPoints { points: usize, minimum: usize },
}

/// Errors related to geometric computations.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Convenience type alias for results using [`TrackError`].
pub type Result<T> = std::result::Result<T, TrackError>;
