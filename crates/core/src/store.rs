//! Key→JSON-array record storage.
//!
//! Each collection is a single JSON array persisted as `<key>.json` inside
//! the configured data directory. This mirrors the storage contract the rest
//! of the system was built against:
//!
//! - A read returns the persisted array, or an empty one when the file is
//!   absent **or unparseable**. Corrupt content must never crash a caller;
//!   it is logged and treated as empty.
//! - A write replaces the whole collection. There is no append primitive and
//!   no partial-write protection: two processes racing on the same key lose
//!   one of the updates (last writer wins). This is a documented limitation
//!   of the system, not something the store papers over.
//!
//! Within one process, a read-modify-write sequence runs to completion
//! without suspension, so callers that own their service instance get
//! call-ordered writes.

use crate::config::CoreConfig;
use crate::validation::validate_collection_key_safe_for_path;
use crate::{WorkflowError, WorkflowResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage for named JSON collections under the data directory.
#[derive(Clone, Debug)]
pub struct RecordStore {
    cfg: Arc<CoreConfig>,
}

impl RecordStore {
    /// Creates a store rooted at the configured data directory.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn collection_path(&self, key: &str) -> WorkflowResult<PathBuf> {
        validate_collection_key_safe_for_path(key)?;
        Ok(self.cfg.care_data_dir().join(format!("{key}.json")))
    }

    /// Reads the collection stored under `key`.
    ///
    /// Returns an empty vector when the file does not exist, cannot be read,
    /// or does not contain a JSON array. Records inside a valid array that
    /// fail to deserialise individually are skipped with a warning rather
    /// than discarding the rest of the collection.
    ///
    /// This method never fails: storage problems on the read path degrade to
    /// "nothing persisted yet", which is the behaviour the polling observer
    /// and the dashboards rely on.
    pub fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = match self.collection_path(key) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("refusing to read collection '{}': {}", key, e);
                return Vec::new();
            }
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read collection file {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Array(values)) => values,
            Ok(_) => {
                tracing::warn!(
                    "collection file {} does not contain a JSON array; treating as empty",
                    path.display()
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    "collection file {} is not valid JSON; treating as empty: {}",
                    path.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "skipping malformed record in collection '{}': {}",
                        key,
                        e
                    );
                }
            }
        }

        records
    }

    /// Replaces the collection stored under `key` with `records`.
    ///
    /// The whole array is serialised and written in one call. Concurrent
    /// writers from other processes are not detected; the later write wins.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` if:
    /// - the collection key is invalid,
    /// - the data directory cannot be created,
    /// - serialisation fails,
    /// - the file cannot be written.
    pub fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> WorkflowResult<()> {
        let path = self.collection_path(key)?;

        fs::create_dir_all(self.cfg.care_data_dir())
            .map_err(WorkflowError::StorageDirCreation)?;

        let json = serde_json::to_string_pretty(records).map_err(WorkflowError::Serialization)?;
        fs::write(&path, json).map_err(WorkflowError::FileWrite)?;

        Ok(())
    }
}
