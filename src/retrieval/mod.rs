//! Candidate retrieval with three-tier fallback.
//!
//! 1. Indexed vector search in the store.
//! 2. Brute-force cosine scan over the owner's embedded items.
//! 3. The owner's items unranked, truncated to the limit.

mod error;
mod retriever;

#[cfg(test)]
mod tests;

pub use error::{RetrievalError, RetrievalResult};
pub use retriever::{CandidateRetriever, Retrieval, RetrievalConfig, RetrievalTier, TierOutcome};
