//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CVMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_CANDIDATE_LIMIT, DEFAULT_EMBEDDING_DIM,
    DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_CONCURRENCY, DEFAULT_RETRY_ATTEMPTS,
    DEFAULT_RETRY_BASE_DELAY, DEFAULT_SCAN_THRESHOLD, DimConfig,
};
use crate::embedding::{CacheConfig, RetryPolicy};
use crate::retrieval::RetrievalConfig;
use crate::scoring::ScoringConfig;

/// Default embedding endpoint (a local OpenAI-compatible server).
pub const DEFAULT_PROVIDER_URL: &str = "http://localhost:11434/v1/embeddings";

/// Default embedding model name sent to the provider.
pub const DEFAULT_PROVIDER_MODEL: &str = "nomic-embed-text";

/// Default Qdrant collection holding profile items.
pub const DEFAULT_QDRANT_COLLECTION: &str = "profile_items";

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CVMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedding dimension `D`. Default: `768`.
    pub embedding_dim: usize,

    /// Max cached embeddings. Default: `1000`.
    pub cache_capacity: u64,

    /// Age after which a cached embedding is dropped. Default: 24h.
    pub cache_ttl: Duration,

    /// Max provider calls in flight across the engine, and max requirements
    /// matched at once. Default: `10`.
    pub max_concurrency: usize,

    /// Total provider attempts per text. Default: `3`.
    pub retry_attempts: u32,

    /// First backoff delay; doubles per attempt. Default: 300ms.
    pub retry_base_delay: Duration,

    /// Candidates returned per requirement. Default: `5`.
    pub candidate_limit: usize,

    /// Minimum similarity kept by the brute-force scan. Default: `0.7`.
    pub scan_threshold: f32,

    /// Minimum combined score for a match. Default: `0.3`.
    pub match_threshold: f32,

    /// OpenAI-compatible embeddings endpoint.
    pub provider_url: String,

    pub provider_model: String,

    pub provider_api_key: Option<String>,

    /// Qdrant endpoint. When unset the binary uses an in-memory store.
    pub qdrant_url: Option<String>,

    pub qdrant_collection: String,

    /// JSON keyword tables. When unset the built-in tables are used.
    pub keywords_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            scan_threshold: DEFAULT_SCAN_THRESHOLD,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            provider_model: DEFAULT_PROVIDER_MODEL.to_string(),
            provider_api_key: None,
            qdrant_url: None,
            qdrant_collection: DEFAULT_QDRANT_COLLECTION.to_string(),
            keywords_path: None,
        }
    }
}

impl Config {
    const ENV_EMBEDDING_DIM: &'static str = "CVMATCH_EMBEDDING_DIM";
    const ENV_CACHE_CAPACITY: &'static str = "CVMATCH_CACHE_CAPACITY";
    const ENV_CACHE_TTL_SECS: &'static str = "CVMATCH_CACHE_TTL_SECS";
    const ENV_MAX_CONCURRENCY: &'static str = "CVMATCH_MAX_CONCURRENCY";
    const ENV_RETRY_ATTEMPTS: &'static str = "CVMATCH_RETRY_ATTEMPTS";
    const ENV_RETRY_BASE_DELAY_MS: &'static str = "CVMATCH_RETRY_BASE_DELAY_MS";
    const ENV_CANDIDATE_LIMIT: &'static str = "CVMATCH_CANDIDATE_LIMIT";
    const ENV_SCAN_THRESHOLD: &'static str = "CVMATCH_SCAN_THRESHOLD";
    const ENV_MATCH_THRESHOLD: &'static str = "CVMATCH_MATCH_THRESHOLD";
    const ENV_PROVIDER_URL: &'static str = "CVMATCH_PROVIDER_URL";
    const ENV_PROVIDER_MODEL: &'static str = "CVMATCH_PROVIDER_MODEL";
    const ENV_PROVIDER_API_KEY: &'static str = "CVMATCH_PROVIDER_API_KEY";
    const ENV_QDRANT_URL: &'static str = "CVMATCH_QDRANT_URL";
    const ENV_QDRANT_COLLECTION: &'static str = "CVMATCH_QDRANT_COLLECTION";
    const ENV_KEYWORDS_PATH: &'static str = "CVMATCH_KEYWORDS_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// A variable that is set but unparsable is an error rather than silently
    /// replaced by its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let embedding_dim =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let cache_capacity =
            Self::parse_number_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;
        let cache_ttl = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        )?);
        let max_concurrency =
            Self::parse_number_from_env(Self::ENV_MAX_CONCURRENCY, defaults.max_concurrency)?;
        let retry_attempts =
            Self::parse_number_from_env(Self::ENV_RETRY_ATTEMPTS, defaults.retry_attempts)?;
        let retry_base_delay = Duration::from_millis(Self::parse_number_from_env(
            Self::ENV_RETRY_BASE_DELAY_MS,
            defaults.retry_base_delay.as_millis() as u64,
        )?);
        let candidate_limit =
            Self::parse_number_from_env(Self::ENV_CANDIDATE_LIMIT, defaults.candidate_limit)?;
        let scan_threshold =
            Self::parse_number_from_env(Self::ENV_SCAN_THRESHOLD, defaults.scan_threshold)?;
        let match_threshold =
            Self::parse_number_from_env(Self::ENV_MATCH_THRESHOLD, defaults.match_threshold)?;

        let provider_url =
            Self::parse_string_from_env(Self::ENV_PROVIDER_URL, defaults.provider_url);
        let provider_model =
            Self::parse_string_from_env(Self::ENV_PROVIDER_MODEL, defaults.provider_model);
        let provider_api_key = Self::parse_optional_string_from_env(Self::ENV_PROVIDER_API_KEY);
        let qdrant_url = Self::parse_optional_string_from_env(Self::ENV_QDRANT_URL);
        let qdrant_collection =
            Self::parse_string_from_env(Self::ENV_QDRANT_COLLECTION, defaults.qdrant_collection);
        let keywords_path =
            Self::parse_optional_string_from_env(Self::ENV_KEYWORDS_PATH).map(PathBuf::from);

        Ok(Self {
            embedding_dim,
            cache_capacity,
            cache_ttl,
            max_concurrency,
            retry_attempts,
            retry_base_delay,
            candidate_limit,
            scan_threshold,
            match_threshold,
            provider_url,
            provider_model,
            provider_api_key,
            qdrant_url,
            qdrant_collection,
            keywords_path,
        })
    }

    /// Checks ranges and paths (does not read the keyword file).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("embedding_dim", self.embedding_dim as u64),
            ("cache_capacity", self.cache_capacity),
            ("max_concurrency", self.max_concurrency as u64),
            ("retry_attempts", u64::from(self.retry_attempts)),
            ("candidate_limit", self.candidate_limit as u64),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::ZeroValue { name });
            }
        }

        for (name, value) in [
            ("scan_threshold", self.scan_threshold),
            ("match_threshold", self.match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if let Some(ref path) = self.keywords_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn dim_config(&self) -> DimConfig {
        DimConfig::new(self.embedding_dim)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache_capacity,
            ttl: self.cache_ttl,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_base_delay)
    }

    pub fn retrieval_config(&self) -> RetrievalConfig {
        RetrievalConfig {
            scan_threshold: self.scan_threshold,
            limit: self.candidate_limit,
        }
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            match_threshold: self.match_threshold,
        }
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    reason: e.to_string(),
                    value,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
