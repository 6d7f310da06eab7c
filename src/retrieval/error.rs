use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by candidate retrieval.
///
/// Only a store outage on the final tier surfaces here; earlier tier failures
/// are logged and absorbed by the fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    #[error("store unavailable while listing items for owner '{owner_id}': {source}")]
    StoreUnavailable {
        owner_id: String,
        #[source]
        source: StoreError,
    },
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
