//! Decode, encode and grayscale conversion.

use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load and decode an image file, sniffing the format from its contents.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| ImageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    reader.decode().map_err(|source| ImageError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode an image as JPEG.
///
/// JPEG has no alpha or 16-bit support, so other layouts are narrowed to
/// 8-bit luma or RGB first.
pub fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<(), ImageError> {
    let write_err = |source| ImageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    let encoded = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img.write_to(&mut writer, ImageFormat::Jpeg),
        other if other.color().has_color() => {
            DynamicImage::ImageRgb8(other.to_rgb8()).write_to(&mut writer, ImageFormat::Jpeg)
        }
        other => DynamicImage::ImageLuma8(other.to_luma8()).write_to(&mut writer, ImageFormat::Jpeg),
    };
    encoded.map_err(|source| ImageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(write_err)
}

/// Convert to 8-bit grayscale.
pub fn grayscale(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(img.to_luma8())
}
