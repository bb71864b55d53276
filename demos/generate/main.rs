//! Generates a track and prints a summary of its geometry.
//!
//! Usage:
//! ```text
//! cargo run --example generate                      # seed 42, random parameters
//! cargo run --example generate -- 7                 # another seed
//! cargo run --example generate -- 7 '{"size_class": "park"}'
//! RUST_LOG=racetrack=debug cargo run --example generate
//! ```

use racetrack::config::TrackParams;
use racetrack::math::Point2;
use racetrack::{GenerateTrack, TrackError, TranslateToOrigin};

fn main() -> Result<(), TrackError> {
    // Default: WARN for everything, INFO for racetrack.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("generate=info".parse().unwrap_or_default())
        .add_directive("racetrack=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let mut params: TrackParams = match args.next() {
        Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring unparsable parameters");
            TrackParams::default()
        }),
        None => TrackParams::default(),
    };
    params.seed = seed;

    let track = TranslateToOrigin::default().execute(&GenerateTrack::random(&params)?);
    let meta = track.metadata();
    let bounds = track.bounds();
    let banked = track
        .track_points()
        .iter()
        .filter(|p| p.banking != 0.0)
        .count();

    println!("seed          {}", track.seed());
    println!("class         {:?} / {:?}", meta.size_class, meta.shape);
    println!("surface       {:?} ({:?})", meta.surface, meta.family);
    println!("points        {}", track.len());
    println!(
        "bounds        ({:.1}, {:.1}) .. ({:.1}, {:.1})",
        bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
    );
    println!(
        "straight      {} points from index {}",
        track.front_straight().len,
        track.front_straight().start
    );
    println!("banked points {banked}");
    println!("pit vertices  {}", track.pit_lane().polygon.len());
    println!("overlaps      {}", track.overlap_zones().len());

    if let (Some(spawn), Some(angle)) = (track.spawn_position(), track.spawn_angle()) {
        println!(
            "spawn         ({:.1}, {:.1}) heading {:.3} rad",
            spawn.x, spawn.y, angle
        );
    }
    let center: Point2 = track.center();
    println!(
        "center        ({:.1}, {:.1}) on track: {}",
        center.x,
        center.y,
        track.is_point_on_track(&center)
    );
    Ok(())
}
