use std::collections::HashMap;

use parking_lot::RwLock;

use super::error::StoreResult;
use super::{ComponentStore, VectorSearch};
use crate::model::ProfileItem;

/// In-process store keyed by owner, with no vector index.
///
/// `vector_search` always reports [`VectorSearch::Unsupported`], so retrieval
/// goes straight to the brute-force scan.
#[derive(Debug, Default)]
pub struct MemoryComponentStore {
    items: RwLock<HashMap<String, Vec<ProfileItem>>>,
}

impl MemoryComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding `items` for a single owner.
    pub fn with_items(owner_id: impl Into<String>, items: Vec<ProfileItem>) -> Self {
        let store = Self::new();
        store.items.write().insert(owner_id.into(), items);
        store
    }

    /// Appends an item to the owner's list.
    pub fn insert(&self, owner_id: &str, item: ProfileItem) {
        self.items
            .write()
            .entry(owner_id.to_string())
            .or_default()
            .push(item);
    }

    pub fn item_count(&self, owner_id: &str) -> usize {
        self.items.read().get(owner_id).map_or(0, Vec::len)
    }
}

impl ComponentStore for MemoryComponentStore {
    async fn vector_search(
        &self,
        _owner_id: &str,
        _query: &[f32],
        _k: usize,
    ) -> StoreResult<VectorSearch> {
        Ok(VectorSearch::Unsupported)
    }

    async fn list_all(&self, owner_id: &str) -> StoreResult<Vec<ProfileItem>> {
        Ok(self.items.read().get(owner_id).cloned().unwrap_or_default())
    }
}
