//! # Whole-File JSON Index
//!
//! The index is one JSON object mapping lowercase `0x` content-hash keys to
//! metadata records:
//!
//! ```json
//! { "0x5f1c…": { "name": "…", "description": "…", "attributes": [ … ] } }
//! ```
//!
//! Every `put` reads the whole file, inserts, and writes the whole file back
//! through a temp file and rename. There is no locking: two writers racing
//! between read and rename lose one update. Keys are matched exactly first,
//! then case-insensitively.

use crate::errors::StoreError;
use crate::ports::{MetadataStore, PutOutcome};
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared_types::{hash_key, Hash, MetadataRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

type Index = Map<String, Value>;

/// File-backed metadata index.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: &std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Reads the whole index. Missing, empty or malformed files read as empty.
    async fn load(&self) -> Result<Index, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "[cc-03] No metadata index yet");
                return Ok(Index::new());
            }
            Err(err) => return Err(self.io_error(&err)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Index::new());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(index)) => Ok(index),
            Ok(_) => {
                warn!(path = %self.path.display(), "[cc-03] Metadata index is not a JSON object, treating as empty");
                Ok(Index::new())
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "[cc-03] Malformed metadata index, treating as empty");
                Ok(Index::new())
            }
        }
    }

    /// Writes the whole index atomically via a temp file.
    async fn save(&self, index: &Index) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(&e))?;
        }

        let bytes = serde_json::to_vec_pretty(index)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &bytes)
            .await
            .map_err(|e| self.io_error(&e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(&e))?;
        Ok(())
    }
}

fn find<'a>(index: &'a Index, key: &str) -> Option<&'a Value> {
    index.get(key).or_else(|| {
        index
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

#[async_trait]
impl MetadataStore for JsonFileStore {
    async fn get(&self, hash: &Hash) -> Result<Option<MetadataRecord>, StoreError> {
        let index = self.load().await?;
        let key = hash_key(hash);
        let Some(value) = find(&index, &key) else {
            return Ok(None);
        };
        match serde_json::from_value::<MetadataRecord>(value.clone()) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(key = %key, error = %err, "[cc-03] Index entry is not a metadata record");
                Ok(None)
            }
        }
    }

    async fn put(&self, hash: &Hash, record: &MetadataRecord) -> Result<PutOutcome, StoreError> {
        let mut index = self.load().await?;
        let key = hash_key(hash);
        if find(&index, &key).is_some() {
            debug!(key = %key, "[cc-03] Metadata already indexed");
            return Ok(PutOutcome::AlreadyPresent);
        }

        let value =
            serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        index.insert(key.clone(), value);
        self.save(&index).await?;

        info!(
            key = %key,
            entries = index.len(),
            path = %self.path.display(),
            "[cc-03] Metadata indexed"
        );
        Ok(PutOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::{keccak256, Attribute};

    fn record(name: &str) -> MetadataRecord {
        MetadataRecord::new(name, "desc", vec![Attribute::text("Category", "E")])
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("metadata.json"));
        assert!(store.get(&Hash::zero()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/metadata.json"));
        let hash = keccak256(b"ipfs://a");

        assert_eq!(store.put(&hash, &record("A")).await.unwrap(), PutOutcome::Inserted);
        assert_eq!(store.get(&hash).await.unwrap(), Some(record("A")));

        // A second handle on the same file sees the entry
        let reopened = JsonFileStore::new(store.path());
        assert_eq!(reopened.get(&hash).await.unwrap(), Some(record("A")));
    }

    #[tokio::test]
    async fn test_existing_entry_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("metadata.json"));
        let hash = keccak256(b"ipfs://a");

        store.put(&hash, &record("first")).await.unwrap();
        let outcome = store.put(&hash, &record("second")).await.unwrap();

        assert_eq!(outcome, PutOutcome::AlreadyPresent);
        assert_eq!(store.get(&hash).await.unwrap(), Some(record("first")));
    }

    #[tokio::test]
    async fn test_malformed_file_reads_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        let hash = keccak256(b"ipfs://b");

        assert!(store.get(&hash).await.unwrap().is_none());
        store.put(&hash, &record("B")).await.unwrap();
        assert_eq!(store.get(&hash).await.unwrap(), Some(record("B")));
    }

    #[tokio::test]
    async fn test_empty_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "\n").unwrap();
        assert!(JsonFileStore::new(&path).get(&Hash::zero()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_uppercase_key_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let hash = keccak256(b"ipfs://c");
        let upper = format!("0x{}", hash_key(&hash)[2..].to_uppercase());
        std::fs::write(
            &path,
            serde_json::to_vec(&json!({ upper: record("C") })).unwrap(),
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get(&hash).await.unwrap(), Some(record("C")));
        assert_eq!(
            store.put(&hash, &record("other")).await.unwrap(),
            PutOutcome::AlreadyPresent
        );
    }

    #[tokio::test]
    async fn test_file_layout_is_hash_keyed_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let store = JsonFileStore::new(&path);
        let hash = keccak256(b"ipfs://d");
        store.put(&hash, &record("D")).await.unwrap();

        let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk[hash_key(&hash)]["name"], "D");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_concurrent_writers_can_lose_an_update() {
        // Two handles interleave read-modify-write by hand: both read the
        // empty index, then both write. The second write wins.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let writer_a = JsonFileStore::new(&path);
        let writer_b = JsonFileStore::new(&path);
        let (hash_a, hash_b) = (keccak256(b"a"), keccak256(b"b"));

        let mut index_a = writer_a.load().await.unwrap();
        let mut index_b = writer_b.load().await.unwrap();
        index_a.insert(hash_key(&hash_a), serde_json::to_value(record("A")).unwrap());
        index_b.insert(hash_key(&hash_b), serde_json::to_value(record("B")).unwrap());
        writer_a.save(&index_a).await.unwrap();
        writer_b.save(&index_b).await.unwrap();

        assert!(writer_a.get(&hash_a).await.unwrap().is_none());
        assert!(writer_a.get(&hash_b).await.unwrap().is_some());
    }
}
