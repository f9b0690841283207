//! Errors returned by the recognizer and its configuration.

use thiserror::Error;
use tinyface_core::{EngineError, StorageError};
use tinyface_image::ImageError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("the model is not available: no model path configured")]
    ModelPathMissing,
    #[error("no face on the image")]
    NoFaceOnImage,
    #[error("not a single face on the image")]
    NotASingleFaceOnImage,
    #[error("can't classify: no sample within tolerance")]
    ClassificationFailed,
    /// Detection failed while recognizing.
    #[error("can't recognize: {0}")]
    Recognize(#[source] EngineError),
    /// Engine failure outside recognition, e.g. initialization.
    #[error(transparent)]
    Engine(EngineError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("recognizer has been closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
