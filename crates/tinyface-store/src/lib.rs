//! tinyface-store: Sample storage backends.
//!
//! Both stores implement `SampleLoader` and `SampleSaver`; a locator is a
//! file path.

pub mod json;
pub mod sqlite;

pub use json::JsonSampleStore;
pub use sqlite::SqliteSampleStore;
