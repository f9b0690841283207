//! JSON file sample store: one array of `{id, descriptor}` objects per file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::sync::Arc;
use tinyface_core::{SampleLoader, SampleRecord, SampleSaver, StorageError};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSampleStore {
    pretty: bool,
}

impl JsonSampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output, easier to diff by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

fn io_error(locator: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        locator: locator.to_string(),
        source,
    }
}

impl SampleLoader for JsonSampleStore {
    /// Concatenates every locator's records, in locator order.
    fn load(&self, locators: &[&str]) -> Result<Vec<SampleRecord>, StorageError> {
        if locators.is_empty() {
            return Err(StorageError::NoLocator);
        }

        let mut records = Vec::new();
        for &locator in locators {
            let file = File::open(locator).map_err(io_error(locator))?;
            let mut batch: Vec<SampleRecord> =
                serde_json::from_reader(BufReader::new(file)).map_err(|e| StorageError::Malformed {
                    locator: locator.to_string(),
                    reason: e.to_string(),
                })?;
            tracing::debug!(locator, count = batch.len(), "samples read");
            records.append(&mut batch);
        }
        Ok(records)
    }
}

impl SampleSaver for JsonSampleStore {
    /// Writes the full set to every locator.
    fn save(&self, records: &[Arc<SampleRecord>], locators: &[&str]) -> Result<(), StorageError> {
        if locators.is_empty() {
            return Err(StorageError::NoLocator);
        }

        let plain: Vec<&SampleRecord> = records.iter().map(|r| r.as_ref()).collect();
        for &locator in locators {
            let mut writer = BufWriter::new(File::create(locator).map_err(io_error(locator))?);
            let written = if self.pretty {
                serde_json::to_writer_pretty(&mut writer, &plain)
            } else {
                serde_json::to_writer(&mut writer, &plain)
            };
            written.map_err(|e| StorageError::Backend {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?;
            writer.flush().map_err(io_error(locator))?;
            tracing::debug!(locator, count = plain.len(), "samples written");
        }
        Ok(())
    }
}
