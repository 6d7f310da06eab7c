//! Read access to an owner's profile items.
//!
//! A [`ComponentStore`] answers two questions: "which of this owner's items are
//! nearest to a vector" and "what are all of this owner's items". A store
//! without a vector index says so with [`VectorSearch::Unsupported`] instead of
//! failing, so callers can fall back without inspecting error text.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod qdrant;


pub use error::{StoreError, StoreResult};
pub use memory::MemoryComponentStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockComponentStore, SearchBehavior};
pub use qdrant::{ITEM_PAYLOAD_KEY, OWNER_PAYLOAD_KEY, QdrantComponentStore};

use std::future::Future;
use std::sync::Arc;

use crate::model::ProfileItem;

/// Outcome of an indexed search.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorSearch {
    /// Items ordered by decreasing similarity. May be empty.
    Ranked(Vec<ProfileItem>),
    /// The store has no vector index for this owner.
    Unsupported,
}

/// Minimal async interface the retriever needs from persistent storage.
pub trait ComponentStore: Send + Sync {
    /// Returns up to `k` of the owner's items nearest to `query`.
    fn vector_search(
        &self,
        owner_id: &str,
        query: &[f32],
        k: usize,
    ) -> impl Future<Output = StoreResult<VectorSearch>> + Send;

    /// Returns every item the owner has, in storage order.
    fn list_all(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<ProfileItem>>> + Send;
}

impl<S: ComponentStore> ComponentStore for Arc<S> {
    fn vector_search(
        &self,
        owner_id: &str,
        query: &[f32],
        k: usize,
    ) -> impl Future<Output = StoreResult<VectorSearch>> + Send {
        (**self).vector_search(owner_id, query, k)
    }

    fn list_all(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<ProfileItem>>> + Send {
        (**self).list_all(owner_id)
    }
}
