//! Fire-and-forget artifact logging.
//!
//! Extraction results can be dumped to a directory for later inspection.
//! Each call writes one new file named
//! `{prefix}_{UTC timestamp}_{uuid}.{txt|json}`, so concurrent writers never
//! collide. Write failures are logged and swallowed: an artifact is a
//! debugging aid and must never change what the caller gets back.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use uuid::Uuid;

/// A directory that receives artifact files.
#[derive(Debug, Clone)]
pub struct ArtifactLog {
    dir: PathBuf,
}

impl ArtifactLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `text` verbatim. Returns the file path on success.
    pub fn save_text(&self, prefix: &str, text: &str) -> Option<PathBuf> {
        let path = self.artifact_path(prefix, "txt");
        self.write(path, text.as_bytes())
    }

    /// Write `value` as pretty-printed JSON. Returns the file path on success.
    pub fn save_json<T: Serialize + ?Sized>(&self, prefix: &str, value: &T) -> Option<PathBuf> {
        let body = match serde_json::to_vec_pretty(value) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialise {prefix} artifact: {e}");
                return None;
            }
        };
        let path = self.artifact_path(prefix, "json");
        self.write(path, &body)
    }

    fn artifact_path(&self, prefix: &str, ext: &str) -> PathBuf {
        let ts = Utc::now().format("%Y%m%dT%H%M%S%6fZ");
        self.dir
            .join(format!("{prefix}_{ts}_{}.{ext}", Uuid::new_v4().simple()))
    }

    fn write(&self, path: PathBuf, body: &[u8]) -> Option<PathBuf> {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            error!("Failed to create artifact dir {}: {e}", self.dir.display());
            return None;
        }
        match std::fs::write(&path, body) {
            Ok(()) => {
                debug!("Artifact written: {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("Failed to write artifact {}: {e}", path.display());
                None
            }
        }
    }
}
