use std::borrow::Cow;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::embedding::{EmbeddingClient, EmbeddingProvider};
use crate::model::{
    AggregateScore, FocusArea, MatchResult, ProfileItem, RequirementItem, Variant,
};
use crate::retrieval::CandidateRetriever;
use crate::scoring::PairScorer;
use crate::store::ComponentStore;
use crate::variants::{VariantComparison, VariantRanker, compare_variants};

use super::builder::MatchingEngineBuilder;
use super::error::EngineResult;

/// Everything produced for one posting against one profile owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub owner_id: String,
    pub matches: Vec<MatchResult>,
    pub aggregate: AggregateScore,
    pub variants: Vec<Variant>,
    pub comparisons: Vec<VariantComparison>,
}

/// Matches requirements to profile items, scores the result and builds variants.
pub struct MatchingEngine<P: EmbeddingProvider, S: ComponentStore> {
    embeddings: Arc<EmbeddingClient<P>>,
    retriever: CandidateRetriever<S>,
    scorer: PairScorer<P>,
    aggregator: Aggregator,
    ranker: VariantRanker,
    max_concurrency: usize,
}

impl<P: EmbeddingProvider, S: ComponentStore> std::fmt::Debug for MatchingEngine<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("embeddings", &self.embeddings)
            .field("retriever", &self.retriever)
            .field("scorer", &self.scorer)
            .field("aggregator", &self.aggregator)
            .field("ranker", &self.ranker)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

impl<P: EmbeddingProvider, S: ComponentStore> MatchingEngine<P, S> {
    /// Engine with every stage at its defaults.
    pub fn new(provider: P, store: S) -> Self {
        MatchingEngineBuilder::new(provider, store).build()
    }

    pub fn builder(provider: P, store: S) -> MatchingEngineBuilder<P, S> {
        MatchingEngineBuilder::new(provider, store)
    }

    pub fn from_config(config: &Config, provider: P, store: S) -> EngineResult<Self> {
        Ok(MatchingEngineBuilder::from_config(config, provider, store)?.build())
    }

    pub(super) fn from_parts(
        embeddings: Arc<EmbeddingClient<P>>,
        retriever: CandidateRetriever<S>,
        scorer: PairScorer<P>,
        aggregator: Aggregator,
        ranker: VariantRanker,
        max_concurrency: usize,
    ) -> Self {
        Self {
            embeddings,
            retriever,
            scorer,
            aggregator,
            ranker,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn embeddings(&self) -> &EmbeddingClient<P> {
        &self.embeddings
    }

    pub fn retriever(&self) -> &CandidateRetriever<S> {
        &self.retriever
    }

    pub fn scorer(&self) -> &PairScorer<P> {
        &self.scorer
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// One [`MatchResult`] per requirement, in input order.
    ///
    /// Requirements are processed with at most `max_concurrency` in flight.
    /// A requirement that cannot be embedded or matched yields the no-match
    /// sentinel; only a store outage fails the whole call.
    #[instrument(skip(self, requirements), fields(requirements = requirements.len()))]
    pub async fn match_all(
        &self,
        requirements: &[RequirementItem],
        owner_id: &str,
    ) -> EngineResult<Vec<MatchResult>> {
        let matches: Vec<MatchResult> = stream::iter(requirements)
            .map(|requirement| self.match_one(requirement, owner_id))
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        info!(
            matched = matches.iter().filter(|m| m.is_match()).count(),
            unmatched = matches.iter().filter(|m| !m.is_match()).count(),
            "Matched requirements"
        );

        Ok(matches)
    }

    /// Best match for a single requirement.
    pub async fn match_one(
        &self,
        requirement: &RequirementItem,
        owner_id: &str,
    ) -> EngineResult<MatchResult> {
        let Some(embedded) = self.embedded_requirement(requirement).await else {
            return Ok(MatchResult::no_match(requirement.clone()));
        };

        let retrieval = self
            .retriever
            .retrieve(owner_id, &embedded.embedding, self.retriever.config().limit)
            .await?;
        debug!(
            requirement_id = %requirement.id,
            tier = retrieval.tier.as_str(),
            candidates = retrieval.items.len(),
            "Retrieved candidates"
        );

        let mut result = self.scorer.score_match(&embedded, &retrieval.items).await;
        result.requirement = requirement.clone();
        Ok(result)
    }

    /// The requirement with a usable embedding, computing one from its text
    /// when the stored vector is empty or of the wrong dimension.
    async fn embedded_requirement<'a>(
        &self,
        requirement: &'a RequirementItem,
    ) -> Option<Cow<'a, RequirementItem>> {
        if self.embeddings.dims().accepts(&requirement.embedding) {
            return Some(Cow::Borrowed(requirement));
        }

        match self.embeddings.embed(&requirement.text()).await {
            Ok(vector) => Some(Cow::Owned(requirement.clone().with_embedding(vector))),
            Err(err) => {
                warn!(
                    requirement_id = %requirement.id,
                    error = %err,
                    "Requirement could not be embedded"
                );
                None
            }
        }
    }

    /// Fills in embeddings for items that lack a usable one.
    ///
    /// Items whose text fails to embed are returned unchanged, so brute-force
    /// retrieval skips them and the scorer retries them lazily.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn embed_profile_items(&self, items: Vec<ProfileItem>) -> Vec<ProfileItem> {
        let dims = self.embeddings.dims();
        let missing: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.usable_embedding(&dims).is_none())
            .map(|(index, _)| index)
            .collect();
        if missing.is_empty() {
            return items;
        }

        let texts: Vec<String> = missing.iter().map(|&i| items[i].text()).collect();
        let vectors = self.embeddings.batch_embed_default(&texts).await;

        let mut items = items;
        let mut embedded = 0usize;
        for (index, vector) in missing.into_iter().zip(vectors) {
            if dims.accepts(&vector) {
                items[index].embedding = Some(vector);
                embedded += 1;
            }
        }
        debug!(embedded, "Embedded profile items");

        items
    }

    pub fn score_and_suggest(&self, matches: &[MatchResult]) -> AggregateScore {
        self.aggregator.aggregate(matches)
    }

    pub async fn build_variants(
        &self,
        matches: &[MatchResult],
        focus_areas: &[FocusArea],
    ) -> Vec<Variant> {
        self.ranker.rank_variants(matches, focus_areas).await
    }

    pub fn compare(&self, variants: &[Variant]) -> Vec<VariantComparison> {
        compare_variants(variants)
    }

    /// Runs every stage and collects the results.
    ///
    /// An empty `focus_areas` builds variants for all of them.
    #[instrument(skip(self, requirements, focus_areas), fields(requirements = requirements.len()))]
    pub async fn run(
        &self,
        owner_id: &str,
        requirements: &[RequirementItem],
        focus_areas: &[FocusArea],
    ) -> EngineResult<MatchReport> {
        let matches = self.match_all(requirements, owner_id).await?;
        let aggregate = self.score_and_suggest(&matches);

        let all = FocusArea::ALL;
        let focus_areas: &[FocusArea] = if focus_areas.is_empty() {
            &all
        } else {
            focus_areas
        };
        let variants = self.build_variants(&matches, focus_areas).await;
        let comparisons = self.compare(&variants);

        info!(
            overall = aggregate.overall,
            variants = variants.len(),
            best_variant = variants.first().map(|v| v.focus_area.as_str()),
            "Match run complete"
        );

        Ok(MatchReport {
            owner_id: owner_id.to_string(),
            matches,
            aggregate,
            variants,
            comparisons,
        })
    }
}
