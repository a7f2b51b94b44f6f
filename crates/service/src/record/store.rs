use std::collections::HashMap;

use async_trait::async_trait;

use models::record::Record;

use crate::errors::ServiceError;

/// Name of the single hash collection holding every record.
pub const COLLECTION: &str = "USER";

/// Store abstraction for record persistence.
///
/// One hash-structured collection keyed by record id. Implementations own
/// the serialization discipline; callers only see `Record`s. `get` reports
/// absence as `Ok(None)` so that "not found" stays distinct from store
/// failure and from corrupt payloads.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write `record` under `id`, unconditionally overwriting any existing
    /// entry (last-writer-wins, no version check). Returns the stored record.
    async fn put(&self, id: &str, record: &Record) -> Result<Record, ServiceError>;

    /// Read the record at `id`; `Ok(None)` when the key does not exist.
    async fn get(&self, id: &str) -> Result<Option<Record>, ServiceError>;

    /// Read every entry in one logical call. Cost grows with collection
    /// size; no pagination is provided. Enumeration order is undefined.
    async fn get_all(&self) -> Result<HashMap<String, Record>, ServiceError>;

    /// Remove the entry if present; an absent key is a no-op, not an error.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use models::record;
    use std::sync::Mutex;

    /// Keeps serialized payloads, mirroring what the backing hash holds, so
    /// tests exercise the same round-trip discipline as the real store.
    #[derive(Default)]
    pub struct MemoryRecordStore {
        entries: Mutex<HashMap<String, String>>, // key: record id
    }

    #[async_trait]
    impl RecordStore for MemoryRecordStore {
        async fn put(&self, id: &str, rec: &Record) -> Result<Record, ServiceError> {
            let payload = record::serialize(rec)?;
            let mut entries = self.entries.lock().unwrap();
            entries.insert(id.to_string(), payload);
            Ok(rec.clone())
        }

        async fn get(&self, id: &str) -> Result<Option<Record>, ServiceError> {
            let entries = self.entries.lock().unwrap();
            match entries.get(id) {
                Some(payload) => Ok(Some(record::deserialize(payload)?)),
                None => Ok(None),
            }
        }

        async fn get_all(&self) -> Result<HashMap<String, Record>, ServiceError> {
            let entries = self.entries.lock().unwrap();
            let mut records = HashMap::with_capacity(entries.len());
            for (id, payload) in entries.iter() {
                records.insert(id.clone(), record::deserialize(payload)?);
            }
            Ok(records)
        }

        async fn delete(&self, id: &str) -> Result<(), ServiceError> {
            let mut entries = self.entries.lock().unwrap();
            entries.remove(id);
            Ok(())
        }
    }
}
