//!
//! src/bin/sync_catalog.rs
//!
//! Refreshes the plain local track list and the remote release
//! catalog in one run
//!

use catalog_sync::{catalog, config, fetch, logging, sink, tracks, types};
use catalog_sync::CatalogError;
use tracing::info;

fn main() -> Result<(), CatalogError> {
    let cfg = config::load_config()?;
    let _guard = logging::init_logging(&cfg.logging)?;

    info!(version = %env!("CARGO_PKG_VERSION"), "sync.start");

    // local list first; a missing audio dir just means no tracks yet
    let local = tracks::build_sync_tracks(&cfg.paths.audio_dir, &cfg.audio_exts);
    let payload = types::LocalTracksPayload {
        generated_at: sink::utc_stamp(),
        count: local.len(),
        tracks: local,
    };
    sink::write_json(&cfg.paths.local_tracks, &payload)?;
    info!(
        count = payload.count,
        path = %cfg.paths.local_tracks.display(),
        "sync.local.written"
    );

    // remote catalog; failed artist ids were already logged and skipped
    let client = fetch::ItunesClient::new(&cfg.http, &cfg.itunes)?;
    let releases = catalog::collect_releases(&client, &cfg.itunes.artist_ids);
    let releases = catalog::dedupe_releases(releases);
    let payload = types::ReleasesPayload {
        generated_at: sink::utc_stamp(),
        artist_ids: cfg.itunes.artist_ids.clone(),
        releases,
    };
    sink::write_json(&cfg.paths.apple_catalog, &payload)?;
    info!(
        count = payload.releases.len(),
        path = %cfg.paths.apple_catalog.display(),
        "sync.releases.written"
    );

    Ok(())
}
