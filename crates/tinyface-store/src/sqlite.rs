//! SQLite sample store.
//!
//! Schema: `samples(position INTEGER PRIMARY KEY, label TEXT, descriptor BLOB)`,
//! descriptors packed as little-endian `f32`.

use rusqlite::{params, Connection};
use std::sync::Arc;
use tinyface_core::{Descriptor, SampleLoader, SampleRecord, SampleSaver, StorageError};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS samples (
    position   INTEGER PRIMARY KEY,
    label      TEXT NOT NULL,
    descriptor BLOB NOT NULL
)";

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteSampleStore;

impl SqliteSampleStore {
    pub fn new() -> Self {
        Self
    }
}

fn backend(locator: &str) -> impl FnOnce(rusqlite::Error) -> StorageError + '_ {
    move |e| StorageError::Backend {
        locator: locator.to_string(),
        reason: e.to_string(),
    }
}

pub fn encode_descriptor(descriptor: &Descriptor) -> Vec<u8> {
    descriptor.values().iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn decode_descriptor(blob: &[u8]) -> Option<Descriptor> {
    if blob.len() % 4 != 0 {
        return None;
    }
    let values = blob
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Some(Descriptor::new(values))
}

fn load_one(locator: &str) -> Result<Vec<SampleRecord>, StorageError> {
    let conn = Connection::open(locator).map_err(backend(locator))?;
    let mut stmt = conn
        .prepare("SELECT label, descriptor FROM samples ORDER BY position")
        .map_err(backend(locator))?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)))
        .map_err(backend(locator))?;

    let mut records = Vec::new();
    for row in rows {
        let (label, blob) = row.map_err(backend(locator))?;
        let descriptor = decode_descriptor(&blob).ok_or_else(|| StorageError::Malformed {
            locator: locator.to_string(),
            reason: format!("descriptor for {label:?} is {} bytes, not a multiple of 4", blob.len()),
        })?;
        records.push(SampleRecord::new(label, descriptor));
    }
    Ok(records)
}

fn save_one(records: &[Arc<SampleRecord>], locator: &str) -> Result<(), StorageError> {
    let mut conn = Connection::open(locator).map_err(backend(locator))?;
    conn.execute(CREATE_TABLE, []).map_err(backend(locator))?;

    let tx = conn.transaction().map_err(backend(locator))?;
    tx.execute("DELETE FROM samples", []).map_err(backend(locator))?;
    {
        let mut insert = tx
            .prepare("INSERT INTO samples (position, label, descriptor) VALUES (?1, ?2, ?3)")
            .map_err(backend(locator))?;
        for (position, record) in records.iter().enumerate() {
            insert
                .execute(params![position as i64, record.id, encode_descriptor(&record.descriptor)])
                .map_err(backend(locator))?;
        }
    }
    tx.commit().map_err(backend(locator))
}

impl SampleLoader for SqliteSampleStore {
    /// Concatenates every database's records, in locator order.
    fn load(&self, locators: &[&str]) -> Result<Vec<SampleRecord>, StorageError> {
        if locators.is_empty() {
            return Err(StorageError::NoLocator);
        }
        let mut records = Vec::new();
        for &locator in locators {
            let mut batch = load_one(locator)?;
            tracing::debug!(locator, count = batch.len(), "samples read");
            records.append(&mut batch);
        }
        Ok(records)
    }
}

impl SampleSaver for SqliteSampleStore {
    /// Replaces each database's sample table with the full set, one transaction per database.
    fn save(&self, records: &[Arc<SampleRecord>], locators: &[&str]) -> Result<(), StorageError> {
        if locators.is_empty() {
            return Err(StorageError::NoLocator);
        }
        for &locator in locators {
            save_one(records, locator)?;
            tracing::debug!(locator, count = records.len(), "samples written");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, values: &[f32]) -> Arc<SampleRecord> {
        Arc::new(SampleRecord::new(id, Descriptor::new(values.to_vec())))
    }

    #[test]
    fn test_descriptor_blob_layout() {
        let blob = encode_descriptor(&Descriptor::new(vec![1.0, -2.5]));
        assert_eq!(blob.len(), 8);
        assert_eq!(&blob[..4], &1.0f32.to_le_bytes());
        assert_eq!(decode_descriptor(&blob), Some(Descriptor::new(vec![1.0, -2.5])));
        assert_eq!(decode_descriptor(&blob[..5]), None);
    }

    #[test]
    fn test_saved_database_loads_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.db");
        let locator = path.to_str().unwrap();
        let store = SqliteSampleStore::new();

        store
            .save(&[record("carol", &[0.1, 0.2]), record("alice", &[0.3, 0.4])], &[locator])
            .unwrap();
        let loaded = store.load(&[locator]).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "carol");
        assert_eq!(loaded[1].descriptor, Descriptor::new(vec![0.3, 0.4]));
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.db");
        let locator = path.to_str().unwrap();
        let store = SqliteSampleStore::new();

        store
            .save(&[record("a", &[1.0]), record("b", &[2.0]), record("c", &[3.0])], &[locator])
            .unwrap();
        store.save(&[record("d", &[4.0])], &[locator]).unwrap();

        let loaded = store.load(&[locator]).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "d");
    }

    #[test]
    fn test_load_without_table_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        let err = SqliteSampleStore::new().load(&[path.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, StorageError::Backend { .. }));
    }

    #[test]
    fn test_corrupt_blob_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute(CREATE_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO samples (position, label, descriptor) VALUES (0, 'x', ?1)",
            params![vec![1u8, 2, 3]],
        )
        .unwrap();
        drop(conn);

        let err = SqliteSampleStore::new().load(&[path.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_no_locator() {
        assert!(matches!(SqliteSampleStore::new().load(&[]), Err(StorageError::NoLocator)));
    }
}
