//! The matching pipeline wired end to end.
//!
//! [`MatchingEngine`] owns one instance of each stage (embedding client,
//! retriever, scorer, aggregator and variant ranker) and exposes the
//! operations callers run against a posting and a profile owner.

mod builder;
mod error;
mod matcher;


pub use builder::MatchingEngineBuilder;
pub use error::{EngineError, EngineResult};
pub use matcher::{MatchReport, MatchingEngine};
