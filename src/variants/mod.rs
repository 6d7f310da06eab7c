//! Alternate CV variants built under focus areas.
//!
//! Each focus area re-selects the matched profile items per CV section,
//! preferring items whose text hits that area's keyword list, then an
//! evaluator scores the selection. Variants are returned best first.

mod compare;
mod error;
mod evaluator;
mod ranker;


pub use compare::{NO_MAJOR_WEAKNESSES, VariantComparison, compare_variants};
pub use error::EvaluationError;
pub use evaluator::{CoverageEvaluator, FOCUS_COVERAGE_BONUS, VariantEvaluator};
pub use ranker::{DEFAULT_ITEMS_PER_CATEGORY, VariantConfig, VariantRanker};
