//! Sample database and the pluggable storage contract.

use crate::types::{Descriptor, SampleRecord};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no storage locator given")]
    NoLocator,
    #[error("I/O error on {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed sample data in {locator}: {reason}")]
    Malformed { locator: String, reason: String },
    #[error("storage backend failed for {locator}: {reason}")]
    Backend { locator: String, reason: String },
}

/// Loads a sample set from zero or more storage locators.
pub trait SampleLoader: Send {
    fn load(&self, locators: &[&str]) -> Result<Vec<SampleRecord>, StorageError>;
}

/// Persists a sample set to zero or more storage locators.
pub trait SampleSaver: Send {
    fn save(&self, records: &[Arc<SampleRecord>], locators: &[&str]) -> Result<(), StorageError>;
}

impl<F> SampleLoader for F
where
    F: Fn(&[&str]) -> Result<Vec<SampleRecord>, StorageError> + Send,
{
    fn load(&self, locators: &[&str]) -> Result<Vec<SampleRecord>, StorageError> {
        self(locators)
    }
}

impl<F> SampleSaver for F
where
    F: Fn(&[Arc<SampleRecord>], &[&str]) -> Result<(), StorageError> + Send,
{
    fn save(&self, records: &[Arc<SampleRecord>], locators: &[&str]) -> Result<(), StorageError> {
        self(records, locators)
    }
}

/// Ordered, index-addressable collection of labeled descriptors.
///
/// A record's position is the identifier engines report back on classification,
/// so records are only ever appended or replaced wholesale; nothing is reordered
/// or compacted. Duplicate ids are allowed and each is an eligible match.
#[derive(Debug, Clone, Default)]
pub struct SampleDatabase {
    records: Vec<Arc<SampleRecord>>,
}

impl SampleDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its position.
    pub fn push(&mut self, record: SampleRecord) -> usize {
        self.records.push(Arc::new(record));
        self.records.len() - 1
    }

    /// Replace the whole database, e.g. after loading from storage.
    pub fn replace(&mut self, records: Vec<SampleRecord>) {
        self.records = records.into_iter().map(Arc::new).collect();
    }

    pub fn get(&self, index: usize) -> Option<&Arc<SampleRecord>> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<SampleRecord>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().map(|r| r.as_ref())
    }

    /// Descriptors and their positions, in database order, ready for an engine's sample set.
    pub fn searchable_set(&self) -> (Vec<Descriptor>, Vec<usize>) {
        let descriptors = self.records.iter().map(|r| r.descriptor.clone()).collect();
        let categories = (0..self.records.len()).collect();
        (descriptors, categories)
    }
}
