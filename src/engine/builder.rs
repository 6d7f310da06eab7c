use std::sync::Arc;

use tracing::debug;

use crate::aggregate::{Aggregator, AggregatorConfig};
use crate::config::Config;
use crate::constants::{DEFAULT_MAX_CONCURRENCY, DimConfig};
use crate::embedding::{EmbeddingCacheHandle, EmbeddingClient, EmbeddingProvider, RetryPolicy};
use crate::retrieval::{CandidateRetriever, RetrievalConfig};
use crate::scoring::{
    ExplanationGenerator, KeywordTables, PairScorer, ScoringConfig, TemplateExplainer,
};
use crate::store::ComponentStore;
use crate::variants::{CoverageEvaluator, VariantConfig, VariantEvaluator, VariantRanker};

use super::error::EngineResult;
use super::matcher::MatchingEngine;

/// Assembles a [`MatchingEngine`] from a provider, a store and optional overrides.
///
/// Every stage starts from its defaults: a private embedding cache, the
/// built-in keyword tables, [`TemplateExplainer`] and [`CoverageEvaluator`].
pub struct MatchingEngineBuilder<P: EmbeddingProvider, S: ComponentStore> {
    provider: P,
    store: S,
    dims: DimConfig,
    cache: Option<EmbeddingCacheHandle>,
    retry: RetryPolicy,
    max_concurrency: usize,
    keywords: Arc<KeywordTables>,
    explainer: Arc<dyn ExplanationGenerator>,
    evaluator: Option<Arc<dyn VariantEvaluator>>,
    retrieval: RetrievalConfig,
    scoring: ScoringConfig,
    aggregation: AggregatorConfig,
    variants: VariantConfig,
}

impl<P: EmbeddingProvider, S: ComponentStore> MatchingEngineBuilder<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self {
            provider,
            store,
            dims: DimConfig::default(),
            cache: Some(EmbeddingCacheHandle::new()),
            retry: RetryPolicy::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            keywords: Arc::new(KeywordTables::default()),
            explainer: Arc::new(TemplateExplainer),
            evaluator: None,
            retrieval: RetrievalConfig::default(),
            scoring: ScoringConfig::default(),
            aggregation: AggregatorConfig::default(),
            variants: VariantConfig::default(),
        }
    }

    /// Applies a validated [`Config`], loading keyword tables from
    /// `keywords_path` when one is set.
    pub fn from_config(config: &Config, provider: P, store: S) -> EngineResult<Self> {
        config.validate()?;

        let keywords = match &config.keywords_path {
            Some(path) => {
                debug!(path = %path.display(), "Loading keyword tables");
                KeywordTables::from_path(path)?
            }
            None => KeywordTables::default(),
        };

        Ok(Self::new(provider, store)
            .dims(config.dim_config())
            .cache(EmbeddingCacheHandle::with_config(config.cache_config()))
            .retry_policy(config.retry_policy())
            .max_concurrency(config.max_concurrency)
            .keywords(keywords)
            .retrieval(config.retrieval_config())
            .scoring(config.scoring_config()))
    }

    pub fn dims(mut self, dims: DimConfig) -> Self {
        self.dims = dims;
        self
    }

    /// Shares `cache` with whoever else holds a clone of the handle.
    pub fn cache(mut self, cache: EmbeddingCacheHandle) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Bounds concurrent requirements per `match_all` and concurrent provider calls.
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn keywords(mut self, keywords: KeywordTables) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    pub fn explainer(mut self, explainer: Arc<dyn ExplanationGenerator>) -> Self {
        self.explainer = explainer;
        self
    }

    pub fn evaluator(mut self, evaluator: Arc<dyn VariantEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn aggregation(mut self, aggregation: AggregatorConfig) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn variants(mut self, variants: VariantConfig) -> Self {
        self.variants = variants;
        self
    }

    pub fn build(self) -> MatchingEngine<P, S> {
        let client = EmbeddingClient::new(self.provider, self.dims)
            .with_retry_policy(self.retry)
            .with_max_concurrency(self.max_concurrency);
        let client = match self.cache {
            Some(cache) => client.with_cache(cache),
            None => client.without_cache(),
        };
        let embeddings = Arc::new(client);

        let evaluator: Arc<dyn VariantEvaluator> = match self.evaluator {
            Some(evaluator) => evaluator,
            None => Arc::new(CoverageEvaluator::new(Arc::clone(&self.keywords))),
        };

        let scorer = PairScorer::new(
            Arc::clone(&embeddings),
            Arc::clone(&self.keywords),
            self.explainer,
        )
        .with_config(self.scoring);

        MatchingEngine::from_parts(
            embeddings,
            CandidateRetriever::with_config(self.store, self.retrieval),
            scorer,
            Aggregator::new(self.aggregation),
            VariantRanker::new(self.keywords, evaluator).with_config(self.variants),
            self.max_concurrency,
        )
    }
}
