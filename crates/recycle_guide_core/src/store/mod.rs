//! Hierarchical document store contracts and implementations.
//!
//! # Responsibility
//! - Define the document operations the guide service depends on.
//! - Isolate SQLite and in-memory storage details from business logic.
//!
//! # Invariants
//! - Documents are addressed by `(collection path, key)`.
//! - Writes are upserts that replace all fields of one document.
//! - Each single-document write is atomic; nothing spans documents.

pub mod document_store;
pub mod memory_store;
pub mod sqlite_store;

pub use document_store::{
    CollectionPath, Document, DocumentStore, Fields, StoreError, StoreResult,
};
pub use memory_store::MemoryDocumentStore;
pub use sqlite_store::SqliteDocumentStore;
