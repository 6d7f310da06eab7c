//! Scriptable in-memory store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use super::error::{StoreError, StoreResult};
use super::{ComponentStore, VectorSearch};
use crate::embedding::cosine_similarity;
use crate::model::ProfileItem;

/// How [`MockComponentStore::vector_search`] answers.
#[derive(Debug, Clone)]
pub enum SearchBehavior {
    /// Ranks the owner's embedded items by cosine similarity, like a real index.
    Indexed,
    /// Returns exactly these items regardless of the query.
    Fixed(Vec<ProfileItem>),
    /// Reports that no index exists.
    Unsupported,
    /// Fails with this error.
    Failing(StoreError),
}

/// Store whose search and listing outcomes are set per test.
pub struct MockComponentStore {
    items: RwLock<HashMap<String, Vec<ProfileItem>>>,
    search: Mutex<SearchBehavior>,
    list_failure: Mutex<Option<StoreError>>,
    next_list_failure: Mutex<Option<StoreError>>,
    search_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl Default for MockComponentStore {
    fn default() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            search: Mutex::new(SearchBehavior::Indexed),
            list_failure: Mutex::new(None),
            next_list_failure: Mutex::new(None),
            search_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }
}

impl MockComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(self, owner_id: &str, items: Vec<ProfileItem>) -> Self {
        self.items.write().insert(owner_id.to_string(), items);
        self
    }

    pub fn with_search(self, behavior: SearchBehavior) -> Self {
        self.set_search(behavior);
        self
    }

    pub fn set_search(&self, behavior: SearchBehavior) {
        *self.search.lock() = behavior;
    }

    /// Makes every `list_all` call fail with `error`.
    pub fn fail_listing(&self, error: StoreError) {
        *self.list_failure.lock() = Some(error);
    }

    /// Makes only the next `list_all` call fail with `error`.
    pub fn fail_next_listing(&self, error: StoreError) {
        *self.next_list_failure.lock() = Some(error);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn indexed(&self, owner_id: &str, query: &[f32], k: usize) -> Vec<ProfileItem> {
        let items = self.items.read();
        let Some(owned) = items.get(owner_id) else {
            return Vec::new();
        };

        let mut ranked: Vec<(f32, &ProfileItem)> = owned
            .iter()
            .filter_map(|item| {
                let embedding = item.embedding.as_deref()?;
                let similarity = cosine_similarity(query, embedding).ok()?;
                similarity.is_finite().then_some((similarity, item))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.into_iter().take(k).map(|(_, item)| item.clone()).collect()
    }
}

impl ComponentStore for MockComponentStore {
    async fn vector_search(
        &self,
        owner_id: &str,
        query: &[f32],
        k: usize,
    ) -> StoreResult<VectorSearch> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self.search.lock().clone();
        match behavior {
            SearchBehavior::Indexed => Ok(VectorSearch::Ranked(self.indexed(owner_id, query, k))),
            SearchBehavior::Fixed(items) => Ok(VectorSearch::Ranked(items)),
            SearchBehavior::Unsupported => Ok(VectorSearch::Unsupported),
            SearchBehavior::Failing(err) => Err(err),
        }
    }

    async fn list_all(&self, owner_id: &str) -> StoreResult<Vec<ProfileItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.next_list_failure.lock().take() {
            return Err(err);
        }

        if let Some(err) = self.list_failure.lock().clone() {
            return Err(err);
        }

        Ok(self.items.read().get(owner_id).cloned().unwrap_or_default())
    }
}
