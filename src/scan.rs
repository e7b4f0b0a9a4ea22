//!
//! src/scan.rs
//!
//! Enumerates audio files in the library directory and derives
//! display titles from their filenames
//!

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::CatalogError;

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Audio files directly inside `dir`, sorted by file name. Subdirectories
/// and unrecognized extensions are skipped; a missing directory yields
/// nothing. Call again to restart the walk.
pub fn audio_files<'a>(dir: &Path, exts: &'a [String]) ->
    impl Iterator<Item = PathBuf> + 'a {

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(move |p| is_audio_file(p, exts))
}

/// Fatal variant for the track builder: the audio directory must exist.
pub fn require_dir(dir: &Path) -> Result<(), CatalogError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(CatalogError::Config(
            format!("missing audio dir: {}", dir.display())
        ))
    }
}

/// Strip the extension, turn separators into spaces, collapse runs of
/// whitespace and trim. Total over any input and idempotent.
pub fn title_from_filename(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
