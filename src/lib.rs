pub mod config;
pub mod error;
pub mod math;
pub mod operations;
pub mod rng;
pub mod track;

pub use config::{TrackConfig, TrackParams};
pub use error::{Result, TrackError};
pub use operations::generate::GenerateTrack;
pub use operations::transform::TranslateToOrigin;
pub use rng::TrackRng;
pub use track::{Track, TrackPoint};
