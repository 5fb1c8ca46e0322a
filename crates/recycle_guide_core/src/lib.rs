//! Core domain logic for the recycling guide.
//! This crate is the single source of truth for guide invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::GuideConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::guide::RecycleGuide;
pub use service::guide_service::{GuideError, GuideResult, GuideService};
pub use store::{
    CollectionPath, Document, DocumentStore, Fields, MemoryDocumentStore, SqliteDocumentStore,
    StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
