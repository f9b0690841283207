//! Recognition engine boundary.
//!
//! The engine owns face detection, descriptor extraction and the distance
//! metric. The core only drives it and interprets the indices it reports.

use crate::types::{DetectedFace, Descriptor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Which detector the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorMode {
    /// Fast detector.
    #[default]
    Standard,
    /// Slower, more accurate CNN detector.
    Cnn,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("image unreadable: {0}")]
    ImageUnreadable(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("engine has been released")]
    Released,
}

/// Opaque face recognition engine.
///
/// A handle is exclusively owned and not safe for concurrent use; callers
/// serialize access or hold one engine per worker.
pub trait RecognitionEngine {
    /// Load the engine's models from a model directory.
    fn initialize(model_dir: &Path) -> Result<Self, EngineError>
    where
        Self: Sized;

    /// Detect every face on an image file.
    fn detect(&mut self, image: &Path, mode: DetectorMode) -> Result<Vec<DetectedFace>, EngineError>;

    /// Detect the face on an image that is expected to hold exactly one.
    ///
    /// Returns `None` when there are zero faces or more than one.
    fn detect_single(
        &mut self,
        image: &Path,
        mode: DetectorMode,
    ) -> Result<Option<DetectedFace>, EngineError> {
        let mut faces = self.detect(image, mode)?;
        if faces.len() == 1 {
            Ok(faces.pop())
        } else {
            Ok(None)
        }
    }

    /// Replace the searchable sample set. `categories[i]` labels `descriptors[i]`.
    fn set_samples(&mut self, descriptors: Vec<Descriptor>, categories: Vec<usize>);

    /// Category of the nearest sample within `tolerance`, or `None`.
    fn classify(&self, descriptor: &Descriptor, tolerance: f32) -> Option<usize>;

    /// Free the engine's resources. Idempotent.
    fn release(&mut self);
}
