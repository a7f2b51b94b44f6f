use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::record::{Record, RecordInput};

use crate::errors::ServiceError;
use crate::record::store::RecordStore;

/// Record business service independent of web framework and store backend.
///
/// The store handle is injected at construction, so tests run against the
/// in-memory mock and production against Redis with the same code path.
pub struct RecordService<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> RecordService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a record under a freshly minted id.
    ///
    /// The id is a random UUID v4 (128 bits of randomness); the service does
    /// not check for pre-existing collisions. Caller-sent ids are never
    /// honored: `RecordInput` carries only the mutable fields, and an `id`
    /// key in a request body is dropped during deserialization.
    ///
    /// # Examples
    /// ```
    /// use service::record::{service::RecordService, store::mock::MemoryRecordStore};
    /// use models::record::RecordInput;
    /// use std::sync::Arc;
    /// let svc = RecordService::new(Arc::new(MemoryRecordStore::default()));
    /// let input = RecordInput { name: "Ann".into(), email: "a@x.com".into(), about: "hi".into(), secret: "p1".into() };
    /// let record = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert!(!record.id.is_empty());
    /// assert_eq!(record.name, "Ann");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: RecordInput) -> Result<Record, ServiceError> {
        let id = Uuid::new_v4().to_string();
        let record = Record::from_input(id, input);
        let stored = self.store.put(&record.id, &record).await?;
        info!(record_id = %stored.id, "record_created");
        Ok(stored)
    }

    /// Get a record by id; `Ok(None)` when it was never created or has been
    /// deleted, kept distinct from store failure.
    pub async fn get_one(&self, id: &str) -> Result<Option<Record>, ServiceError> {
        self.store.get(id).await
    }

    /// All records keyed by id, in one full-collection read. Cost grows with
    /// collection size and there is no pagination; acceptable for the small
    /// collections this service targets.
    pub async fn get_all(&self) -> Result<HashMap<String, Record>, ServiceError> {
        self.store.get_all().await
    }

    /// Replace every mutable field of an existing record with `patch`.
    ///
    /// This is a full-field replace, not a sparse merge: a field the caller
    /// leaves empty overwrites the stored value with that empty value.
    /// Returns `NotFound` without writing when no record exists at `id`.
    ///
    /// The read and the write are two separate store round-trips with no
    /// version check between them, so two concurrent updates to the same id
    /// can interleave and silently drop the first writer's fields (last
    /// writer wins). Callers retrying a failed update must re-read first.
    ///
    /// # Examples
    /// ```
    /// use service::record::{service::RecordService, store::mock::MemoryRecordStore};
    /// use models::record::RecordInput;
    /// use std::sync::Arc;
    /// let svc = RecordService::new(Arc::new(MemoryRecordStore::default()));
    /// let input = RecordInput { name: "Ann".into(), email: "a@x.com".into(), about: "hi".into(), secret: "p1".into() };
    /// let created = tokio_test::block_on(svc.create(input.clone())).unwrap();
    /// let patch = RecordInput { name: "Ann2".into(), ..input };
    /// let updated = tokio_test::block_on(svc.update(&created.id, patch)).unwrap();
    /// assert_eq!(updated.name, "Ann2");
    /// assert_eq!(updated.id, created.id);
    /// ```
    #[instrument(skip(self, patch), fields(record_id = %id))]
    pub async fn update(&self, id: &str, patch: RecordInput) -> Result<Record, ServiceError> {
        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("record"))?;
        let merged = Record::from_input(existing.id, patch);
        let stored = self.store.put(&merged.id, &merged).await?;
        info!(record_id = %stored.id, "record_updated");
        Ok(stored)
    }

    /// Delete the record at `id`. An absent id is deleted silently; callers
    /// get no signal distinguishing "deleted" from "was already absent".
    #[instrument(skip(self), fields(record_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        info!(record_id = %id, "record_deleted");
        Ok(())
    }
}
