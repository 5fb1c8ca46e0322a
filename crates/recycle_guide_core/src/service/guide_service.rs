//! Recycle guide use-case service.
//!
//! # Responsibility
//! - Provide add/list/get/update/delete entry points over the guide store.
//! - Auto-provision a material record the first time it receives an item.
//! - Translate store outcomes into the closed `GuideError` vocabulary.
//!
//! # Invariants
//! - Guidelines and document keys are validated before any store access.
//! - An item is written only after its material record has been written.
//! - Store failures, including failures while checking that a material
//!   exists, surface as `GuideError::Database`.
//! - Deleting the last item of a material keeps the material record.

use crate::model::guide::RecycleGuide;
use crate::store::document_store::validate_key;
use crate::store::{CollectionPath, Document, DocumentStore, Fields, StoreError};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Top-level collection holding one document per material.
pub const GUIDES_COLLECTION: &str = "guides";
/// Sub-collection under each material document holding its items.
pub const ITEMS_SUBCOLLECTION: &str = "items";

const MATERIAL_FIELD: &str = "material";
const ITEM_FIELD: &str = "item";
const GUIDELINE_FIELD: &str = "guideline";

pub type GuideResult<T> = Result<T, GuideError>;

/// Closed error vocabulary returned to the calling layer.
#[derive(Debug)]
pub enum GuideError {
    /// Guideline missing or empty.
    EmptyGuideline,
    /// Material has no record.
    NoSuchMaterial(String),
    /// Item absent under an existing material.
    NoSuchItem { material: String, item: String },
    /// Store call failed.
    Database(StoreError),
}

impl GuideError {
    /// Stable error code used in responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyGuideline => "EMPTY_GUIDELINE",
            Self::NoSuchMaterial(_) => "NO_SUCH_MATERIAL",
            Self::NoSuchItem { .. } => "NO_SUCH_ITEM",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl Display for GuideError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGuideline => write!(f, "guideline must not be empty"),
            Self::NoSuchMaterial(material) => write!(f, "no such material: `{material}`"),
            Self::NoSuchItem { material, item } => {
                write!(f, "no such item `{item}` under material `{material}`")
            }
            Self::Database(err) => write!(f, "guide store failure: {err}"),
        }
    }
}

impl Error for GuideError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for GuideError {
    fn from(value: StoreError) -> Self {
        Self::Database(value)
    }
}

/// Guide service over an injected document store.
///
/// Holds no state besides the store handle, so one instance can serve the
/// whole process.
pub struct GuideService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> GuideService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds or overwrites the guideline for `(material, item)`.
    ///
    /// # Contract
    /// - Missing/empty guideline returns `EmptyGuideline` without touching
    ///   the store.
    /// - Names unusable as document keys fail with `Database` before any
    ///   write, so no material is provisioned for a rejected item.
    /// - An unseen material is created (and the write awaited) before the
    ///   item document is written.
    /// - Re-adding the same triple overwrites; it never duplicates.
    pub fn add_guide(&self, guide: &RecycleGuide) -> GuideResult<()> {
        let started_at = Instant::now();
        let result = self.add_guide_inner(guide);
        log_outcome("guide_add", &guide.material, started_at, &result);
        result
    }

    fn add_guide_inner(&self, guide: &RecycleGuide) -> GuideResult<()> {
        let guideline = guide.guideline_text().ok_or(GuideError::EmptyGuideline)?;
        validate_key(&guide.material)?;
        validate_key(&guide.item)?;

        if !self.material_exists(&guide.material)? {
            self.create_material(&guide.material)?;
        }

        let mut fields = Fields::new();
        fields.insert(ITEM_FIELD.to_string(), Value::from(guide.item.as_str()));
        fields.insert(GUIDELINE_FIELD.to_string(), Value::from(guideline));
        self.store
            .set_document(&items_path(&guide.material), &guide.item, fields)?;
        debug!(
            "event=guide_item_write module=service status=ok guideline_len={}",
            guideline.len()
        );
        Ok(())
    }

    /// Lists all material names, sorted by the store's key order.
    pub fn get_materials(&self) -> GuideResult<Vec<String>> {
        let started_at = Instant::now();
        let result = self
            .store
            .get_collection(&guides_path())
            .map_err(GuideError::from);
        log_outcome("guide_list_materials", "-", started_at, &result);
        result
    }

    /// Lists item names under `material`.
    pub fn get_items(&self, material: &str) -> GuideResult<Vec<String>> {
        let started_at = Instant::now();
        let result = self.require_material(material).and_then(|()| {
            self.store
                .get_collection(&items_path(material))
                .map_err(GuideError::from)
        });
        log_outcome("guide_list_items", material, started_at, &result);
        result
    }

    /// Returns the guideline text for `(material, item)`.
    pub fn get_guideline(&self, material: &str, item: &str) -> GuideResult<String> {
        let started_at = Instant::now();
        let result = self.find_item(material, item).and_then(|document| {
            document
                .str_field(GUIDELINE_FIELD)
                .map(str::to_string)
                .ok_or_else(|| {
                    GuideError::Database(StoreError::InvalidData(format!(
                        "item `{}` has no string `{GUIDELINE_FIELD}` field",
                        document.key
                    )))
                })
        });
        log_outcome("guide_get", material, started_at, &result);
        result
    }

    /// Replaces the guideline of an existing item, keeping its other fields.
    ///
    /// The text is stored as given; only creation requires a guideline.
    pub fn update_guideline(
        &self,
        material: &str,
        item: &str,
        new_guideline: &str,
    ) -> GuideResult<()> {
        let started_at = Instant::now();
        let result = self.update_guideline_inner(material, item, new_guideline);
        log_outcome("guide_update", material, started_at, &result);
        result
    }

    fn update_guideline_inner(
        &self,
        material: &str,
        item: &str,
        new_guideline: &str,
    ) -> GuideResult<()> {
        let Document { key, mut fields } = self.find_item(material, item)?;
        fields.insert(GUIDELINE_FIELD.to_string(), Value::from(new_guideline));
        self.store.set_document(&items_path(material), &key, fields)?;
        Ok(())
    }

    /// Deletes the item document. The material record is left in place.
    pub fn delete_guide(&self, material: &str, item: &str) -> GuideResult<()> {
        let started_at = Instant::now();
        let result = self.find_item(material, item).and_then(|document| {
            self.store
                .delete_document(&items_path(material), &document.key)
                .map_err(GuideError::from)
        });
        log_outcome("guide_delete", material, started_at, &result);
        result
    }

    fn material_exists(&self, material: &str) -> GuideResult<bool> {
        let matches = self
            .store
            .query_by_field(&guides_path(), MATERIAL_FIELD, material)?;
        Ok(!matches.is_empty())
    }

    fn require_material(&self, material: &str) -> GuideResult<()> {
        if self.material_exists(material)? {
            Ok(())
        } else {
            Err(GuideError::NoSuchMaterial(material.to_string()))
        }
    }

    fn create_material(&self, material: &str) -> GuideResult<()> {
        let mut fields = Fields::new();
        fields.insert(MATERIAL_FIELD.to_string(), Value::from(material));
        self.store.set_document(&guides_path(), material, fields)?;
        info!("event=material_create module=service status=ok material={material}");
        Ok(())
    }

    /// Resolves the first item document whose `item` field matches.
    fn find_item(&self, material: &str, item: &str) -> GuideResult<Document> {
        self.require_material(material)?;
        self.store
            .query_by_field(&items_path(material), ITEM_FIELD, item)?
            .into_iter()
            .next()
            .ok_or_else(|| GuideError::NoSuchItem {
                material: material.to_string(),
                item: item.to_string(),
            })
    }
}

fn guides_path() -> CollectionPath {
    CollectionPath::root(GUIDES_COLLECTION)
}

fn items_path(material: &str) -> CollectionPath {
    guides_path().child(material, ITEMS_SUBCOLLECTION)
}

fn log_outcome<T>(event: &str, material: &str, started_at: Instant, result: &GuideResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={event} module=service status=ok material={material} duration_ms={duration_ms}"
        ),
        Err(GuideError::Database(err)) => error!(
            "event={event} module=service status=error material={material} duration_ms={duration_ms} error_code=DATABASE_ERROR error={err}"
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected material={material} duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
}
