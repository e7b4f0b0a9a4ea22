//!
//! src/tracks.rs
//!
//! Builds the local track lists backing the three catalog files
//!

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::covers::CoverProvider;
use crate::scan::{audio_files, title_from_filename};
use crate::types::{DiscoveryTrack, LocalTrack};

pub const LOCAL_NOTE: &str = "Local master";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Modification date of the file, local time
fn file_date(path: &Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Plain variant used by the sync run: no covers, blank release dates.
pub fn build_sync_tracks(audio_dir: &Path, exts: &[String]) -> Vec<LocalTrack> {
    let tracks: Vec<LocalTrack> = audio_files(audio_dir, exts)
        .map(|path| {
            let name = file_name(&path);
            LocalTrack {
                title: title_from_filename(&name),
                release: String::new(),
                file: format!("audio/{name}"),
                cover: None,
                note: LOCAL_NOTE.to_string(),
            }
        })
        .collect();
    info!(count = tracks.len(), "tracks.sync.built");
    tracks
}

/// Rich variant: release date from file mtime, cover extracted per file
/// with the fallback artwork standing in when extraction fails.
pub fn build_local_tracks(
    audio_dir: &Path,
    covers_dir: &Path,
    exts: &[String],
    covers: &dyn CoverProvider,
    fallback_cover: &str,
) -> Vec<LocalTrack> {
    let mut tracks = Vec::new();
    for path in audio_files(audio_dir, exts) {
        let name = file_name(&path);
        let stem = file_stem(&path);

        let target = covers_dir.join(format!("{stem}.jpg"));
        let cover = if covers.extract(&path, &target) {
            format!("img/covers/{stem}.jpg")
        } else {
            debug!(file = %name, "cover.fallback");
            fallback_cover.to_string()
        };

        tracks.push(LocalTrack {
            title: title_from_filename(&name),
            release: file_date(&path),
            file: format!("audio/{name}"),
            cover: Some(cover),
            note: LOCAL_NOTE.to_string(),
        });
    }
    info!(count = tracks.len(), "tracks.local.built");
    tracks
}

/// Optional stem -> release date map. Missing or unreadable means empty.
pub fn load_release_map(path: &Path) -> HashMap<String, String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return HashMap::new(),
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(map) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "release_map.unreadable");
            HashMap::new()
        }
    }
}

/// Discovery rows keep the raw trimmed stem as title so it lines up with
/// the release-map keys. Url and artwork stay blank in this revision.
pub fn build_discovery_tracks(
    audio_dir: &Path,
    exts: &[String],
    release_map: &HashMap<String, String>,
) -> Vec<DiscoveryTrack> {
    let tracks: Vec<DiscoveryTrack> = audio_files(audio_dir, exts)
        .map(|path| {
            let stem = file_stem(&path);
            let release = release_map
                .get(&stem)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            DiscoveryTrack {
                title: stem.trim().to_string(),
                release,
                url: String::new(),
                artwork: String::new(),
            }
        })
        .collect();
    info!(count = tracks.len(), "tracks.discovery.built");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        crate::config::AUDIO_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sync_tracks_are_titled_and_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Track One.mp3"), b"x").unwrap();
        fs::write(dir.path().join("track_two.wav"), b"x").unwrap();

        let tracks = build_sync_tracks(dir.path(), &exts());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "Track One");
        assert_eq!(tracks[0].file, "audio/Track One.mp3");
        assert_eq!(tracks[0].release, "");
        assert_eq!(tracks[0].cover, None);
        assert_eq!(tracks[1].title, "track two");
        assert_eq!(tracks[1].note, "Local master");
    }

    #[test]
    fn sync_tracks_tolerate_missing_dir() {
        let dir = tempdir().unwrap();
        let tracks = build_sync_tracks(&dir.path().join("nope"), &exts());
        assert!(tracks.is_empty());
    }

    struct AlwaysCover;
    impl CoverProvider for AlwaysCover {
        fn extract(&self, _audio: &Path, _target: &Path) -> bool { true }
    }

    struct NeverCover;
    impl CoverProvider for NeverCover {
        fn extract(&self, _audio: &Path, _target: &Path) -> bool { false }
    }

    #[test]
    fn local_tracks_carry_cover_paths_and_dates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("deep_cut.mp3"), b"x").unwrap();

        let tracks = build_local_tracks(
            dir.path(),
            &dir.path().join("covers"),
            &exts(),
            &AlwaysCover,
            "img/default-cover.png",
        );
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "deep cut");
        assert_eq!(tracks[0].cover.as_deref(), Some("img/covers/deep_cut.jpg"));
        // mtime of a file written just now
        assert_eq!(tracks[0].release.len(), 10);
        assert!(tracks[0].release.starts_with("20"));
    }

    #[test]
    fn failed_covers_fall_back_per_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();

        let tracks = build_local_tracks(
            dir.path(),
            &dir.path().join("covers"),
            &exts(),
            &NeverCover,
            "img/default-cover.png",
        );
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t|
            t.cover.as_deref() == Some("img/default-cover.png")
        ));
    }

    #[test]
    fn release_map_missing_or_malformed_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_release_map(&dir.path().join("nope.json")).is_empty());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, b"{ not json").unwrap();
        assert!(load_release_map(&bad).is_empty());
    }

    #[test]
    fn discovery_tracks_join_stems_with_the_map() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("first_song.mp3"), b"x").unwrap();
        fs::write(dir.path().join("second.flac"), b"x").unwrap();

        let mut map = HashMap::new();
        map.insert("first_song".to_string(), " 2024-05-05 ".to_string());

        let tracks = build_discovery_tracks(dir.path(), &exts(), &map);
        assert_eq!(tracks.len(), 2);
        // stems stay raw so they keep matching the map keys
        assert_eq!(tracks[0].title, "first_song");
        assert_eq!(tracks[0].release, "2024-05-05");
        assert_eq!(tracks[1].title, "second");
        assert_eq!(tracks[1].release, "");
        assert_eq!(tracks[1].url, "");
        assert_eq!(tracks[1].artwork, "");
    }
}
