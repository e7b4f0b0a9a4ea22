//!
//! src/covers.rs
//!
//! Pulls embedded cover art out of audio files through an external
//! media tool. Failure is an expected outcome here, never an error.
//!

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::config::CoverConfig;

/// Capability seam so track building can run without a media tool.
pub trait CoverProvider {
    /// true when a usable cover image exists at `target` on return
    fn extract(&self, audio: &Path, target: &Path) -> bool;
}

pub struct FfmpegExtractor {
    bin: String,
    min_bytes: u64,
}

impl FfmpegExtractor {
    pub fn new(cfg: &CoverConfig) -> Self {
        Self {
            bin: cfg.ffmpeg_bin.clone(),
            min_bytes: cfg.min_bytes,
        }
    }
}

/// Tiny outputs are decoder noise, not artwork
fn usable(target: &Path, min_bytes: u64) -> bool {
    fs::metadata(target)
        .map(|m| m.is_file() && m.len() > min_bytes)
        .unwrap_or(false)
}

impl CoverProvider for FfmpegExtractor {
    fn extract(&self, audio: &Path, target: &Path) -> bool {
        // already extracted on an earlier run
        if usable(target, self.min_bytes) {
            return true;
        }

        // -y overwrite, -an no audio, single mjpeg frame from the
        // attached picture stream
        let status = Command::new(&self.bin)
            .arg("-y")
            .arg("-i").arg(audio)
            .arg("-an")
            .arg("-vcodec").arg("mjpeg")
            .arg("-vframes").arg("1")
            .arg(target)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = status {
            debug!(tool = %self.bin, error = %e, "cover.tool.spawn");
        }

        // only the resulting file decides, never the exit code
        if usable(target, self.min_bytes) {
            return true;
        }
        if target.exists() {
            let _ = fs::remove_file(target);
        }
        false
    }
}
