//! tinyface-onnx: Recognition engine backed by ONNX Runtime.
//!
//! SCRFD finds faces and their landmarks, ArcFace turns each aligned face
//! into a descriptor. Both run on CPU.

pub mod alignment;
pub mod detector;
pub mod embedder;
pub mod engine;

use thiserror::Error;
use tinyface_core::EngineError;

pub use engine::{OnnxEngine, CNN_INPUT_SIZE, DETECTOR_MODEL_FILE, EMBEDDER_MODEL_FILE, STANDARD_INPUT_SIZE};

#[derive(Error, Debug)]
pub enum OnnxError {
    #[error("model file not found: {0}; download from insightface and place in the model directory")]
    ModelNotFound(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

impl From<OnnxError> for EngineError {
    fn from(err: OnnxError) -> Self {
        match err {
            OnnxError::ModelNotFound(path) => EngineError::ModelNotFound(path),
            other => EngineError::InferenceFailed(other.to_string()),
        }
    }
}
