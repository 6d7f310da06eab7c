//! Pair scoring: cosine similarity plus a keyword bonus.
//!
//! For each candidate the scorer computes
//! `combined = min(cosine + keyword_bonus / 100, 1.0)` and keeps the highest.
//! A best score under the match threshold, or no candidate with a usable
//! embedding, produces [`MatchResult::no_match`](crate::model::MatchResult::no_match).
//!
//! Reasoning text comes from an [`ExplanationGenerator`]; when it fails the
//! scorer substitutes [`fallback_reasoning`] instead of failing the match.

pub mod error;
pub mod explain;
pub mod keywords;
pub mod scorer;
pub mod types;


pub use error::{ExplanationError, KeywordTableError};
pub use explain::{ExplanationGenerator, TemplateExplainer, fallback_reasoning};
pub use keywords::{KeywordTables, contains_keyword};
pub use scorer::PairScorer;
pub use types::{ScoredCandidate, ScoringConfig};
