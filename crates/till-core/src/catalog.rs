//! # Catalog Snapshot
//!
//! The list of items a register works from, read once from the store.
//! The snapshot is eventually consistent: quantities shown here may lag
//! the store, and the ledger never writes back to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CatalogItem;

/// A read-only snapshot of one shop's catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    items: Vec<CatalogItem>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Wraps a freshly loaded item list.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Catalog {
            items,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Finds an item by scan code, ignoring case.
    pub fn find_by_code(&self, code: &str) -> Option<&CatalogItem> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let code = code.to_lowercase();
        self.items.iter().find(|item| {
            item.code
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == code)
        })
    }

    /// Finds an item by its exact display name (as picked from a list).
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Finds an item by store identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items whose name contains `query` (case-insensitive), for pick lists.
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let query = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| query.is_empty() || item.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// When the snapshot was taken (`None` for an empty default catalog).
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}
