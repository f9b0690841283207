//! tinyface: label the faces on an image against a database of known samples.
//!
//! A [`Recognizer`] owns a recognition engine and an in-memory sample
//! database. Samples are added one photo at a time or loaded through a
//! [`SampleLoader`]; recognition returns every face with its descriptor, and
//! classification resolves faces to the nearest sample within the configured
//! tolerance.
//!
//! ```no_run
//! use tinyface::{OnnxRecognizer, RecognizerConfig};
//!
//! let config = RecognizerConfig::builder().model_path("/opt/tinyface/models").build();
//! let mut rec = OnnxRecognizer::new(config)?;
//! rec.add_image_to_samples("photos/alice.jpg", "alice")?;
//! let face = rec.classify("photos/unknown.jpg")?;
//! println!("{} at {:?}", face.id(), face.rect);
//! # Ok::<(), tinyface::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod preprocess;
pub mod recognizer;

#[cfg(test)]
mod testing;

pub use config::{RecognizerConfig, RecognizerConfigBuilder, Settings, DEFAULT_TOLERANCE};
pub use error::{Error, Result};
pub use recognizer::Recognizer;
pub use tinyface_core::{
    ClassifiedFace, DetectedFace, Descriptor, DetectorMode, EngineError, RecognitionEngine, Rect,
    SampleLoader, SampleRecord, SampleSaver, StorageError,
};
pub use tinyface_image::{load_image, save_jpeg, ImageError, LabelPainter};

#[cfg(feature = "onnx")]
pub use tinyface_onnx::OnnxEngine;

/// Recognizer backed by the ONNX Runtime engine.
#[cfg(feature = "onnx")]
pub type OnnxRecognizer = Recognizer<OnnxEngine>;
