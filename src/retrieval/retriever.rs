use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::constants::{DEFAULT_CANDIDATE_LIMIT, DEFAULT_SCAN_THRESHOLD};
use crate::embedding::cosine_similarity;
use crate::model::ProfileItem;
use crate::store::{ComponentStore, StoreError, VectorSearch};

use super::error::{RetrievalError, RetrievalResult};

/// Retrieval tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalConfig {
    /// Brute-force keeps items with similarity strictly above this. Default: `0.7`.
    pub scan_threshold: f32,
    /// Default number of candidates per requirement. Default: `5`.
    pub limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            scan_threshold: DEFAULT_SCAN_THRESHOLD,
            limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

/// Which tier produced the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RetrievalTier {
    Indexed,
    BruteForce,
    Unranked,
}

impl RetrievalTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RetrievalTier::Indexed => "indexed",
            RetrievalTier::BruteForce => "brute_force",
            RetrievalTier::Unranked => "unranked",
        }
    }
}

/// Candidates plus the tier that found them.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    pub items: Vec<ProfileItem>,
    pub tier: RetrievalTier,
}

/// Outcome of one ranked tier.
#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    /// Non-empty candidates; retrieval stops here.
    Found(Vec<ProfileItem>),
    /// The tier ran and nothing qualified.
    Empty,
    /// The store cannot perform this tier.
    Unsupported,
    /// The tier failed outright.
    Failed(StoreError),
}

impl TierOutcome {
    fn from_items(items: Vec<ProfileItem>) -> Self {
        if items.is_empty() {
            TierOutcome::Empty
        } else {
            TierOutcome::Found(items)
        }
    }
}

/// Finds candidate profile items for a query vector.
pub struct CandidateRetriever<S: ComponentStore> {
    store: S,
    config: RetrievalConfig,
}

impl<S: ComponentStore> std::fmt::Debug for CandidateRetriever<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateRetriever")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: ComponentStore> CandidateRetriever<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, RetrievalConfig::default())
    }

    pub fn with_config(store: S, config: RetrievalConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> RetrievalConfig {
        self.config
    }

    /// Candidate items for `query`, best first when a ranked tier answered.
    pub async fn find_candidates(
        &self,
        owner_id: &str,
        query: &[f32],
        limit: usize,
    ) -> RetrievalResult<Vec<ProfileItem>> {
        Ok(self.retrieve(owner_id, query, limit).await?.items)
    }

    /// Runs the tiers in order and reports which one answered.
    ///
    /// Only the final unranked tier can fail, and only when the store cannot
    /// list the owner's items.
    #[instrument(skip(self, query), fields(query_dim = query.len()))]
    pub async fn retrieve(
        &self,
        owner_id: &str,
        query: &[f32],
        limit: usize,
    ) -> RetrievalResult<Retrieval> {
        if query.is_empty() {
            debug!("Empty query vector, skipping ranked tiers");
            return self.unranked(owner_id, limit, None).await;
        }

        match self.indexed(owner_id, query, limit).await {
            TierOutcome::Found(items) => {
                return Ok(Retrieval {
                    items,
                    tier: RetrievalTier::Indexed,
                });
            }
            TierOutcome::Failed(_) => return self.unranked(owner_id, limit, None).await,
            TierOutcome::Empty | TierOutcome::Unsupported => {}
        }

        let (outcome, listed) = self.brute_force(owner_id, query, limit).await;
        match outcome {
            TierOutcome::Found(items) => Ok(Retrieval {
                items,
                tier: RetrievalTier::BruteForce,
            }),
            _ => self.unranked(owner_id, limit, listed).await,
        }
    }

    async fn indexed(&self, owner_id: &str, query: &[f32], limit: usize) -> TierOutcome {
        match self.store.vector_search(owner_id, query, limit).await {
            Ok(VectorSearch::Ranked(mut items)) => {
                items.truncate(limit);
                let outcome = TierOutcome::from_items(items);
                match &outcome {
                    TierOutcome::Found(items) => {
                        debug!(count = items.len(), "Indexed search returned candidates")
                    }
                    _ => debug!("Indexed search returned no candidates"),
                }
                outcome
            }
            Ok(VectorSearch::Unsupported) => {
                debug!("Indexed search unsupported by store");
                TierOutcome::Unsupported
            }
            Err(err) => {
                warn!(error = %err, "Indexed search failed");
                TierOutcome::Failed(err)
            }
        }
    }

    /// Scores every embedded item of the owner against `query`.
    ///
    /// Also hands back the listed items so the unranked tier can reuse them.
    async fn brute_force(
        &self,
        owner_id: &str,
        query: &[f32],
        limit: usize,
    ) -> (TierOutcome, Option<Vec<ProfileItem>>) {
        let all = match self.store.list_all(owner_id).await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "Brute-force scan failed to list items");
                return (TierOutcome::Failed(err), None);
            }
        };

        let mut scored: Vec<(f32, &ProfileItem)> = all
            .iter()
            .filter_map(|item| {
                let embedding = item.embedding.as_deref()?;
                if embedding.len() != query.len() {
                    return None;
                }
                let similarity = cosine_similarity(query, embedding).ok()?;
                (similarity.is_finite() && similarity > self.config.scan_threshold)
                    .then_some((similarity, item))
            })
            .collect();

        // Stable sort keeps input order among equal similarities.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let items: Vec<ProfileItem> = scored
            .into_iter()
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect();

        if items.is_empty() {
            debug!(
                scanned = all.len(),
                threshold = self.config.scan_threshold,
                "Brute-force scan found nothing above threshold"
            );
        } else {
            debug!(
                scanned = all.len(),
                count = items.len(),
                "Brute-force scan returned candidates"
            );
        }

        (TierOutcome::from_items(items), Some(all))
    }

    async fn unranked(
        &self,
        owner_id: &str,
        limit: usize,
        listed: Option<Vec<ProfileItem>>,
    ) -> RetrievalResult<Retrieval> {
        info!("Falling back to unranked owner items");

        let mut items = match listed {
            Some(items) => items,
            None => self.store.list_all(owner_id).await.map_err(|source| {
                RetrievalError::StoreUnavailable {
                    owner_id: owner_id.to_string(),
                    source,
                }
            })?,
        };
        items.truncate(limit);

        Ok(Retrieval {
            items,
            tier: RetrievalTier::Unranked,
        })
    }
}
