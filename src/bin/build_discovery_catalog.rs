//!
//! src/bin/build_discovery_catalog.rs
//!
//! Rebuilds the discovery track list, pairing file stems with the
//! optional release-date map
//!

use catalog_sync::{config, logging, sink, tracks, types};
use catalog_sync::CatalogError;
use tracing::info;

fn main() -> Result<(), CatalogError> {
    let cfg = config::load_config()?;
    let _guard = logging::init_logging(&cfg.logging)?;

    info!(version = %env!("CARGO_PKG_VERSION"), "discovery.start");

    let release_map = tracks::load_release_map(&cfg.paths.release_dates);
    info!(entries = release_map.len(), "discovery.release_map");

    let built = tracks::build_discovery_tracks(
        &cfg.paths.audio_dir,
        &cfg.audio_exts,
        &release_map,
    );

    let payload = types::DiscoveryPayload {
        generated_at: sink::utc_stamp(),
        tracks: built,
    };
    sink::write_json(&cfg.paths.discovery_catalog, &payload)?;
    info!(
        count = payload.tracks.len(),
        path = %cfg.paths.discovery_catalog.display(),
        "discovery.written"
    );

    Ok(())
}
