//! tinyface-core: Sample database and matching primitives.
//!
//! Defines the face data model, the append-only sample database, the
//! distance-threshold matcher and the boundary traits implemented by
//! recognition engines and sample storage backends.

pub mod engine;
pub mod matcher;
pub mod samples;
pub mod types;

pub use engine::{DetectorMode, EngineError, RecognitionEngine};
pub use matcher::{EuclideanMatcher, Match, Matcher, SampleIndex};
pub use samples::{SampleDatabase, SampleLoader, SampleSaver, StorageError};
pub use types::{ClassifiedFace, DetectedFace, Descriptor, Rect, SampleRecord};
