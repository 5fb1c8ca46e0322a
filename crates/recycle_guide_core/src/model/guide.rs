//! Recycle guide request model.
//!
//! # Responsibility
//! - Carry one `(material, item, guideline)` triple into the service layer.
//! - Decide whether a guideline is present enough to be stored.
//!
//! # Invariants
//! - A guideline that is absent or empty is never persisted.

use serde::{Deserialize, Serialize};

/// Disposal instructions for one item of one material.
///
/// `guideline` is optional so that request bodies missing the field can still
/// be decoded and rejected by the service with a domain error instead of a
/// decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycleGuide {
    /// Top-level grouping key, e.g. `plastic`.
    pub material: String,
    /// Item name, unique within `material`.
    pub item: String,
    /// Free-text recycling instructions.
    #[serde(default)]
    pub guideline: Option<String>,
}

impl RecycleGuide {
    /// Creates a guide with guideline text.
    pub fn new(
        material: impl Into<String>,
        item: impl Into<String>,
        guideline: impl Into<String>,
    ) -> Self {
        Self {
            material: material.into(),
            item: item.into(),
            guideline: Some(guideline.into()),
        }
    }

    /// Creates a guide without guideline text.
    pub fn without_guideline(material: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            item: item.into(),
            guideline: None,
        }
    }

    /// Returns the guideline when it is present and non-empty.
    pub fn guideline_text(&self) -> Option<&str> {
        self.guideline
            .as_deref()
            .filter(|text| is_storable_guideline(text))
    }
}

/// Returns whether `text` may be stored as a guideline.
pub fn is_storable_guideline(text: &str) -> bool {
    !text.is_empty()
}
