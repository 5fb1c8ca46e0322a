//! Document store contract shared by all storage backends.
//!
//! # Responsibility
//! - Name collections with slash-separated paths (`guides/plastic/items`).
//! - Define the read/query/write/delete operations over field maps.
//!
//! # Invariants
//! - Document keys are non-empty and never contain `/`.
//! - Queried field names are non-empty and never contain `"`.
//! - `set_document` replaces the full field map of one document.
//! - `delete_document` on a missing key is a no-op.

use crate::db::DbError;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Field map stored in one document.
pub type Fields = Map<String, Value>;

/// Error for document store operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Document key is empty or contains the path separator.
    InvalidKey(String),
    /// Queried field name is empty or contains a double quote.
    InvalidField(String),
    /// Persisted document cannot be decoded.
    InvalidData(String),
    /// Backend cannot serve requests (e.g. poisoned lock, injected outage).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid document key `{key}`"),
            Self::InvalidField(field) => write!(f, "invalid query field `{field}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::Unavailable(message) => write!(f, "document store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_)
            | Self::InvalidField(_)
            | Self::InvalidData(_)
            | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Slash-separated address of a collection.
///
/// Top-level collections are single segments; a sub-collection nests under a
/// document as `parent/key/name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Top-level collection.
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Sub-collection `name` owned by document `key` of this collection.
    pub fn child(&self, key: &str, name: &str) -> Self {
        Self(format!("{}/{key}/{name}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored document: its key within the collection plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub fields: Fields,
}

impl Document {
    /// Returns a string field, or `None` when absent or not a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Storage operations consumed by the guide service.
pub trait DocumentStore {
    /// Lists document keys in `collection`, sorted ascending.
    fn get_collection(&self, collection: &CollectionPath) -> StoreResult<Vec<String>>;
    /// Reads one document.
    fn get_document(&self, collection: &CollectionPath, key: &str)
        -> StoreResult<Option<Document>>;
    /// Returns documents whose string field `field` equals `value`, sorted by key.
    ///
    /// `field` names a top-level member; names that are empty or contain `"`
    /// fail with `InvalidField`.
    fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>>;
    /// Creates or replaces one document.
    fn set_document(&self, collection: &CollectionPath, key: &str, fields: Fields)
        -> StoreResult<()>;
    /// Removes one document if present.
    fn delete_document(&self, collection: &CollectionPath, key: &str) -> StoreResult<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn get_collection(&self, collection: &CollectionPath) -> StoreResult<Vec<String>> {
        (**self).get_collection(collection)
    }

    fn get_document(
        &self,
        collection: &CollectionPath,
        key: &str,
    ) -> StoreResult<Option<Document>> {
        (**self).get_document(collection, key)
    }

    fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>> {
        (**self).query_by_field(collection, field, value)
    }

    fn set_document(
        &self,
        collection: &CollectionPath,
        key: &str,
        fields: Fields,
    ) -> StoreResult<()> {
        (**self).set_document(collection, key, fields)
    }

    fn delete_document(&self, collection: &CollectionPath, key: &str) -> StoreResult<()> {
        (**self).delete_document(collection, key)
    }
}

/// Rejects keys that would break collection path addressing.
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() || key.contains('/') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Rejects field names that cannot be expressed as a quoted JSON path label.
pub(crate) fn validate_field(field: &str) -> StoreResult<()> {
    if field.is_empty() || field.contains('"') {
        return Err(StoreError::InvalidField(field.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_field, validate_key, CollectionPath, StoreError};

    #[test]
    fn child_path_nests_under_parent_document() {
        let guides = CollectionPath::root("guides");
        assert_eq!(guides.child("plastic", "items").as_str(), "guides/plastic/items");
    }

    #[test]
    fn validate_key_rejects_empty_and_separator() {
        assert!(matches!(validate_key(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(validate_key("a/b"), Err(StoreError::InvalidKey(_))));
        assert!(validate_key("plastic bottle").is_ok());
    }

    #[test]
    fn validate_field_rejects_empty_and_quote() {
        assert!(matches!(validate_field(""), Err(StoreError::InvalidField(_))));
        assert!(matches!(
            validate_field("say\"hi"),
            Err(StoreError::InvalidField(_))
        ));
        assert!(validate_field("a.b").is_ok());
    }
}
