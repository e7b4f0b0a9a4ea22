//!
//! src/sink.rs
//!
//! Atomic JSON output: readers of a catalog file never see a
//! half-written state
//!

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{Local, SecondsFormat, Utc};
use serde::Serialize;

use crate::errors::CatalogError;

/// Generation timestamp for the UTC-stamped payloads
pub fn utc_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Generation timestamp for the local-tracks payload
pub fn local_stamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Pretty JSON plus trailing newline, staged in a temp file beside the
/// destination and renamed over it.
pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<(), CatalogError> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent).map_err(|e|
        CatalogError::Write(format!("create dir {}: {e}", parent.display()))
    )?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| CatalogError::Write(
            format!("tempfile in {}: {e}", parent.display())
        ))?;

    serde_json::to_writer_pretty(&mut temp, payload)
        .map_err(|e| CatalogError::Write(format!("serialize json: {e}")))?;
    temp.write_all(b"\n")
        .map_err(|e| CatalogError::Write(format!("write {}: {e}", path.display())))?;

    temp.persist(path).map_err(|e|
        CatalogError::Write(format!("persist {}: {e}", path.display()))
    )?;

    Ok(())
}
