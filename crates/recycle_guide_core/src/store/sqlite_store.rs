//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist documents in the `documents` table as JSON field maps.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - The connection must be migrated before construction (`try_new` checks).
//! - Read paths reject undecodable rows instead of masking them.

use super::document_store::{
    validate_field, validate_key, CollectionPath, Document, DocumentStore, Fields, StoreError,
    StoreResult,
};
use crate::db::migrations::has_documents_table;
use rusqlite::{params, Connection, Row};
use serde_json::Value;

/// Document store over a borrowed, migrated SQLite connection.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - Returns `InvalidData` when the `documents` table is missing.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        if !has_documents_table(conn)? {
            return Err(StoreError::InvalidData(
                "documents table missing; open the database through db::open_db".to_string(),
            ));
        }
        Ok(Self { conn })
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn get_collection(&self, collection: &CollectionPath) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_key FROM documents
             WHERE collection = ?1
             ORDER BY doc_key ASC;",
        )?;
        let keys = stmt
            .query_map([collection.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn get_document(
        &self,
        collection: &CollectionPath,
        key: &str,
    ) -> StoreResult<Option<Document>> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_key, fields FROM documents
             WHERE collection = ?1 AND doc_key = ?2;",
        )?;
        let mut rows = stmt.query(params![collection.as_str(), key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }
        Ok(None)
    }

    fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> StoreResult<Vec<Document>> {
        validate_field(field)?;
        let mut stmt = self.conn.prepare(
            "SELECT doc_key, fields FROM documents
             WHERE collection = ?1
               AND json_type(fields, ?2) = 'text'
               AND json_extract(fields, ?2) = ?3
             ORDER BY doc_key ASC;",
        )?;
        let mut rows = stmt.query(params![collection.as_str(), json_path(field), value])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }

    fn set_document(
        &self,
        collection: &CollectionPath,
        key: &str,
        fields: Fields,
    ) -> StoreResult<()> {
        validate_key(key)?;
        let encoded = serde_json::to_string(&fields)?;
        self.conn.execute(
            "INSERT INTO documents (collection, doc_key, fields)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, doc_key) DO UPDATE SET
                fields = excluded.fields,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![collection.as_str(), key, encoded],
        )?;
        Ok(())
    }

    fn delete_document(&self, collection: &CollectionPath, key: &str) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_key = ?2;",
            params![collection.as_str(), key],
        )?;
        Ok(())
    }
}

fn parse_document_row(row: &Row<'_>) -> StoreResult<Document> {
    let key: String = row.get("doc_key")?;
    let raw: String = row.get("fields")?;
    let fields = match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::InvalidData(format!(
                "document `{key}` holds non-object fields `{other}`"
            )));
        }
    };
    Ok(Document { key, fields })
}

/// Builds a JSON path selecting one top-level member. The label is quoted so
/// dots or spaces are not path syntax; `field` must not contain `"`.
fn json_path(field: &str) -> String {
    format!("$.\"{field}\"")
}

#[cfg(test)]
mod tests {
    use super::json_path;

    #[test]
    fn json_path_quotes_member_name() {
        assert_eq!(json_path("item"), "$.\"item\"");
        assert_eq!(json_path("a.b"), "$.\"a.b\"");
    }
}
