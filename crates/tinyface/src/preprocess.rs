//! Turns a caller's image path into the path the engine reads.

use std::path::{Path, PathBuf};
use tinyface_image::{ImageError, TempImage};

/// Image handed to the engine for one call.
///
/// A grayscale copy is deleted when this value is dropped, whatever the
/// outcome of the call.
#[derive(Debug)]
pub enum PreparedImage<'a> {
    Original(&'a Path),
    Gray(TempImage),
}

impl PreparedImage<'_> {
    pub fn path(&self) -> &Path {
        match self {
            PreparedImage::Original(path) => path,
            PreparedImage::Gray(temp) => temp.path(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    temp_dir: PathBuf,
}

impl Preprocessor {
    pub fn new(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }

    /// Return `source` untouched, or a grayscale temp copy named after `key` when `gray` is set.
    pub fn prepare<'a>(&self, source: &'a Path, key: &str, gray: bool) -> Result<PreparedImage<'a>, ImageError> {
        if !gray {
            return Ok(PreparedImage::Original(source));
        }
        TempImage::grayscale_copy(source, &self.temp_dir, key).map(PreparedImage::Gray)
    }
}
