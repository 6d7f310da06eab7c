use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointId, PointStruct,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use tracing::{debug, warn};

use super::error::{StoreError, StoreResult};
use super::{ComponentStore, VectorSearch};
use crate::hashing::hash_text;
use crate::model::ProfileItem;

/// Payload field holding the owning user's id.
pub const OWNER_PAYLOAD_KEY: &str = "owner_id";

/// Payload field holding the JSON-encoded [`ProfileItem`].
pub const ITEM_PAYLOAD_KEY: &str = "item";

const SCROLL_PAGE_SIZE: u32 = 256;

#[derive(Clone)]
/// Profile items stored as points in a Qdrant collection.
///
/// Each point's vector is the item embedding; the payload carries the owner id
/// and the item serialized as JSON. A missing collection means no index, so
/// searches report [`VectorSearch::Unsupported`].
pub struct QdrantComponentStore {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantComponentStore {
    /// Creates a store for `collection` at `url`.
    pub fn new(url: &str, collection: impl Into<String>) -> StoreResult<Self> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| StoreError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns `true` if the collection exists.
    pub async fn collection_exists(&self) -> StoreResult<bool> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| StoreError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })
    }

    /// Creates the collection with cosine distance if it is missing.
    pub async fn ensure_collection(&self, vector_size: u64) -> StoreResult<()> {
        if self.collection_exists().await? {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
            .map_err(|e| StoreError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Writes the owner's embedded items. Items without an embedding are
    /// skipped. Returns the number of points written.
    pub async fn upsert_items(&self, owner_id: &str, items: &[ProfileItem]) -> StoreResult<usize> {
        let points = items
            .iter()
            .filter_map(|item| {
                let vector = item.embedding.clone().filter(|e| !e.is_empty())?;
                Some(self.point_for(owner_id, item, vector))
            })
            .collect::<StoreResult<Vec<PointStruct>>>()?;

        let skipped = items.len() - points.len();
        if skipped > 0 {
            debug!(owner_id, skipped, "Skipping profile items without embeddings");
        }
        if points.is_empty() {
            return Ok(0);
        }

        let written = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| StoreError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(written)
    }

    fn point_for(
        &self,
        owner_id: &str,
        item: &ProfileItem,
        vector: Vec<f32>,
    ) -> StoreResult<PointStruct> {
        let encoded = serde_json::to_string(item).map_err(|e| StoreError::UpsertFailed {
            collection: self.collection.clone(),
            message: format!("failed to encode item {}: {e}", item.id),
        })?;

        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(OWNER_PAYLOAD_KEY.to_string(), owner_id.to_string().into());
        payload.insert(ITEM_PAYLOAD_KEY.to_string(), encoded.into());

        Ok(PointStruct::new(point_id(owner_id, &item.id), vector, payload))
    }

    fn owner_filter(owner_id: &str) -> Filter {
        Filter::must([Condition::matches(OWNER_PAYLOAD_KEY, owner_id.to_string())])
    }
}

impl std::fmt::Debug for QdrantComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantComponentStore")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .finish()
    }
}

impl ComponentStore for QdrantComponentStore {
    async fn vector_search(
        &self,
        owner_id: &str,
        query: &[f32],
        k: usize,
    ) -> StoreResult<VectorSearch> {
        if !self.collection_exists().await? {
            return Ok(VectorSearch::Unsupported);
        }

        let request = SearchPointsBuilder::new(&self.collection, query.to_vec(), k as u64)
            .filter(Self::owner_filter(owner_id))
            .with_payload(true);

        let response =
            self.client
                .search_points(request)
                .await
                .map_err(|e| StoreError::SearchFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;

        let items = response
            .result
            .into_iter()
            .filter_map(|point| decode_or_skip(point.id.as_ref(), &point.payload))
            .collect();

        Ok(VectorSearch::Ranked(items))
    }

    async fn list_all(&self, owner_id: &str) -> StoreResult<Vec<ProfileItem>> {
        let list_error = |message: String| StoreError::ListFailed {
            owner_id: owner_id.to_string(),
            message,
        };

        if !self
            .collection_exists()
            .await
            .map_err(|e| list_error(e.to_string()))?
        {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut request = ScrollPointsBuilder::new(&self.collection)
                .filter(Self::owner_filter(owner_id))
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(true);
            if let Some(offset) = offset.take() {
                request = request.offset(offset);
            }

            let page = self
                .client
                .scroll(request)
                .await
                .map_err(|e| list_error(e.to_string()))?;

            items.extend(
                page.result
                    .iter()
                    .filter_map(|point| decode_or_skip(point.id.as_ref(), &point.payload)),
            );

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(items)
    }
}

/// Stable numeric point id for an owner's item.
pub fn point_id(owner_id: &str, item_id: &str) -> u64 {
    let hash = hash_text(&format!("{owner_id}:{item_id}"));
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(bytes)
}

/// Decodes the JSON item stored in a point payload.
pub fn item_from_payload(
    point: &str,
    payload: &HashMap<String, Value>,
) -> StoreResult<ProfileItem> {
    let raw = payload
        .get(ITEM_PAYLOAD_KEY)
        .and_then(|v| v.as_str())
        .ok_or_else(|| StoreError::InvalidPayload {
            point: point.to_string(),
            reason: format!("missing '{ITEM_PAYLOAD_KEY}' field"),
        })?;

    serde_json::from_str(raw).map_err(|e| StoreError::InvalidPayload {
        point: point.to_string(),
        reason: e.to_string(),
    })
}

fn decode_or_skip(id: Option<&PointId>, payload: &HashMap<String, Value>) -> Option<ProfileItem> {
    let label = point_label(id);
    match item_from_payload(&label, payload) {
        Ok(item) => Some(item),
        Err(err) => {
            warn!(point = %label, error = %err, "Skipping undecodable profile item");
            None
        }
    }
}

fn point_label(id: Option<&PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options.as_ref()) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(uuid)) => uuid.clone(),
        None => "<unknown>".to_string(),
    }
}
