//! Scoped grayscale copies handed to the recognition engine.

use crate::io::{grayscale, load_image, save_jpeg, ImageError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TEMP_SUFFIX: &str = ".jpeg";

/// A temporary image file removed when the guard is dropped.
///
/// Removal happens on every exit path, including early returns on error.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// Write a grayscale JPEG copy of `source` into `dir`.
    ///
    /// `key` becomes the file name prefix; a random suffix keeps concurrent
    /// callers sharing a directory from colliding.
    pub fn grayscale_copy(source: &Path, dir: &Path, key: &str) -> Result<Self, ImageError> {
        let img = load_image(source)?;

        // Guard first so a partially written file is still removed.
        let guard = Self {
            path: temp_file_name(dir, key),
        };
        save_jpeg(&grayscale(&img), &guard.path)?;

        tracing::debug!(source = %source.display(), temp = %guard.path.display(), "grayscale copy written");
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::trace!(temp = %self.path.display(), "temp image removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(temp = %self.path.display(), error = %e, "failed to remove temp image"),
        }
    }
}

/// `<dir>/<sanitized key><32 hex chars>.jpeg`
fn temp_file_name(dir: &Path, key: &str) -> PathBuf {
    let prefix: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{prefix}{}{TEMP_SUFFIX}", Uuid::new_v4().simple()))
}
