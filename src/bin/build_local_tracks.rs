//!
//! src/bin/build_local_tracks.rs
//!
//! Rebuilds the local track list with extracted cover art and
//! modification-time release dates
//!

use catalog_sync::{config, covers, logging, scan, sink, tracks, types};
use catalog_sync::CatalogError;
use tracing::info;

fn main() -> Result<(), CatalogError> {
    let cfg = config::load_config()?;
    let _guard = logging::init_logging(&cfg.logging)?;

    info!(version = %env!("CARGO_PKG_VERSION"), "tracks.start");

    // this variant refuses to run against a missing library
    scan::require_dir(&cfg.paths.audio_dir)?;
    std::fs::create_dir_all(&cfg.paths.covers_dir)?;

    let extractor = covers::FfmpegExtractor::new(&cfg.covers);
    let built = tracks::build_local_tracks(
        &cfg.paths.audio_dir,
        &cfg.paths.covers_dir,
        &cfg.audio_exts,
        &extractor,
        &cfg.paths.fallback_cover,
    );

    let payload = types::LocalTracksPayload {
        generated_at: sink::local_stamp(),
        count: built.len(),
        tracks: built,
    };
    sink::write_json(&cfg.paths.local_tracks, &payload)?;
    info!(
        count = payload.count,
        path = %cfg.paths.local_tracks.display(),
        covers = %cfg.paths.covers_dir.display(),
        "tracks.written"
    );

    Ok(())
}
