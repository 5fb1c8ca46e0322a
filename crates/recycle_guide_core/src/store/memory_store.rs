//! In-memory document store.
//!
//! Same semantics as the SQLite store with no persistence. Used by tests and
//! by callers that only need a scratch guide.

use super::document_store::{
    validate_field, validate_key, CollectionPath, Document, DocumentStore, Fields, StoreError,
    StoreResult,
};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Collections = BTreeMap<CollectionPath, BTreeMap<String, Fields>>;

/// Thread-safe in-memory store; all data is lost on drop.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across all collections.
    pub fn document_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.values().map(BTreeMap::len).sum())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get_collection(&self, collection: &CollectionPath) -> StoreResult<Vec<String>> {
        Ok(self
            .read()?
            .get(collection)
            .map(|documents| documents.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get_document(
        &self,
        collection: &CollectionPath,
        key: &str,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|documents| documents.get(key))
            .map(|fields| Document {
                key: key.to_string(),
                fields: fields.clone(),
            }))
    }

    fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>> {
        validate_field(field)?;
        let collections = self.read()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .filter(|(_, fields)| fields.get(field).and_then(|v| v.as_str()) == Some(value))
            .map(|(key, fields)| Document {
                key: key.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    fn set_document(
        &self,
        collection: &CollectionPath,
        key: &str,
        fields: Fields,
    ) -> StoreResult<()> {
        validate_key(key)?;
        self.write()?
            .entry(collection.clone())
            .or_default()
            .insert(key.to_string(), fields);
        Ok(())
    }

    fn delete_document(&self, collection: &CollectionPath, key: &str) -> StoreResult<()> {
        let mut collections = self.write()?;
        if let Some(documents) = collections.get_mut(collection) {
            documents.remove(key);
            if documents.is_empty() {
                collections.remove(collection);
            }
        }
        Ok(())
    }
}
