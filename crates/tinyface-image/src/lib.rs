//! tinyface-image: Image boundary for the recognition pipeline.
//!
//! Decodes and encodes images, converts them to grayscale, produces
//! short-lived grayscale copies for the engine and draws face outlines.

pub mod annotate;
pub mod io;
pub mod temp;

pub use annotate::{draw_labeled, draw_outlines, LabelPainter, OUTLINE_COLOR};
pub use io::{grayscale, load_image, save_jpeg, ImageError};
pub use temp::TempImage;
