use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::embedding::{EmbeddingClient, EmbeddingProvider, cosine_similarity};
use crate::model::{MatchResult, ProfileItem, QualityTier, RequirementItem};

use super::explain::{ExplanationGenerator, fallback_reasoning};
use super::keywords::KeywordTables;
use super::types::{ScoredCandidate, ScoringConfig};

/// Scores a requirement against candidate profile items and keeps the best.
pub struct PairScorer<P: EmbeddingProvider> {
    embeddings: Arc<EmbeddingClient<P>>,
    keywords: Arc<KeywordTables>,
    explainer: Arc<dyn ExplanationGenerator>,
    config: ScoringConfig,
}

impl<P: EmbeddingProvider> std::fmt::Debug for PairScorer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairScorer")
            .field("embeddings", &self.embeddings)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: EmbeddingProvider> PairScorer<P> {
    pub fn new(
        embeddings: Arc<EmbeddingClient<P>>,
        keywords: Arc<KeywordTables>,
        explainer: Arc<dyn ExplanationGenerator>,
    ) -> Self {
        Self {
            embeddings,
            keywords,
            explainer,
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> ScoringConfig {
        self.config
    }

    pub fn keywords(&self) -> &KeywordTables {
        &self.keywords
    }

    /// Scores every candidate that has, or can be given, an embedding.
    ///
    /// Candidates without a usable embedding are embedded in one batch bounded
    /// by the client's concurrency; those that still fail are dropped. Output
    /// follows input order.
    pub async fn score_candidates(
        &self,
        requirement: &RequirementItem,
        candidates: &[ProfileItem],
    ) -> Vec<ScoredCandidate> {
        let dims = self.embeddings.dims();
        if !dims.accepts(&requirement.embedding) {
            debug!(
                requirement_id = %requirement.id,
                actual = requirement.embedding.len(),
                "Requirement has no usable embedding"
            );
            return Vec::new();
        }

        let missing: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, item)| item.usable_embedding(&dims).is_none())
            .map(|(index, _)| index)
            .collect();

        let mut computed: HashMap<usize, Vec<f32>> = if missing.is_empty() {
            HashMap::new()
        } else {
            let texts: Vec<String> = missing.iter().map(|&i| candidates[i].text()).collect();
            let vectors = self.embeddings.batch_embed_default(&texts).await;
            missing.into_iter().zip(vectors).collect()
        };

        let requirement_text = requirement.text();
        let mut scored = Vec::with_capacity(candidates.len());

        for (index, item) in candidates.iter().enumerate() {
            let item = match item.usable_embedding(&dims) {
                Some(_) => item.clone(),
                None => match computed.remove(&index) {
                    Some(vector) if dims.accepts(&vector) => item.clone().with_embedding(vector),
                    _ => {
                        warn!(item_id = %item.id, "Excluding candidate without embedding");
                        continue;
                    }
                },
            };

            let embedding = item.embedding.as_deref().unwrap_or_default();
            let similarity = match cosine_similarity(&requirement.embedding, embedding) {
                Ok(similarity) if similarity.is_finite() => similarity,
                _ => {
                    debug!(item_id = %item.id, "Excluding candidate with undefined similarity");
                    continue;
                }
            };

            let bonus = self.keywords.keyword_bonus(&requirement_text, &item.text());
            scored.push(ScoredCandidate::new(item, similarity, bonus));
        }

        scored
    }

    /// Best match for `requirement` among `candidates`, or the no-match sentinel.
    ///
    /// Ties go to the earliest candidate. Never fails: explanation errors fall
    /// back to templated reasoning.
    #[instrument(skip_all, fields(requirement_id = %requirement.id, candidates = candidates.len()))]
    pub async fn score_match(
        &self,
        requirement: &RequirementItem,
        candidates: &[ProfileItem],
    ) -> MatchResult {
        let mut best: Option<ScoredCandidate> = None;
        for candidate in self.score_candidates(requirement, candidates).await {
            if best
                .as_ref()
                .is_none_or(|current| candidate.combined > current.combined)
            {
                best = Some(candidate);
            }
        }

        let Some(best) = best else {
            debug!("No scorable candidates");
            return MatchResult::no_match(requirement.clone());
        };

        if !best.meets_threshold(self.config.match_threshold) {
            debug!(
                combined = best.combined,
                threshold = self.config.match_threshold,
                "Best candidate below match threshold"
            );
            return MatchResult::no_match(requirement.clone());
        }

        let score = best.score();
        let quality_tier = QualityTier::from_score(score);

        let reasoning = match self.explainer.explain(requirement, &best.item, score).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => fallback_reasoning(score, quality_tier),
            Err(err) => {
                warn!(error = %err, "Explanation failed, using template reasoning");
                fallback_reasoning(score, quality_tier)
            }
        };

        debug!(
            item_id = %best.item.id,
            similarity = best.similarity,
            keyword_bonus = best.keyword_bonus,
            score,
            tier = %quality_tier,
            "Scored best candidate"
        );

        MatchResult {
            requirement: requirement.clone(),
            profile_item: Some(best.item),
            score,
            quality_tier,
            reasoning,
        }
    }
}
