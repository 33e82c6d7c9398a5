use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName};

/// Canonical category record.
///
/// `deleted_at` is only ever set by a soft delete; readers outside the store
/// never see a record with it populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Category {
    /// Returns `true` when the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Category state handed to the store for an upsert.
///
/// Without an `id` the store inserts a new row and assigns one; with an `id`
/// it updates the existing live row. Timestamps are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub id: Option<CategoryId>,
    pub name: CategoryName,
}

impl CategoryDraft {
    /// Draft for a category that does not exist yet.
    pub fn new(name: CategoryName) -> Self {
        Self { id: None, name }
    }

    /// Draft carrying the full current state of an existing category.
    pub fn existing(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
        }
    }

    /// Replace the name, keeping the identity.
    pub fn rename(mut self, name: CategoryName) -> Self {
        self.name = name;
        self
    }
}
