use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::EvaluationError;
use crate::model::{CategorySelection, FocusArea, MatchResult};
use crate::scoring::KeywordTables;

/// Bonus added when every selected item hits the focus area's keywords.
pub const FOCUS_COVERAGE_BONUS: f64 = 10.0;

/// Scores a variant's selection. Results are clamped to `[0, 100]` by the ranker.
#[async_trait]
pub trait VariantEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        focus_area: FocusArea,
        selection: &CategorySelection,
        matches: &[MatchResult],
    ) -> Result<f64, EvaluationError>;
}

/// Mean match score of the selected items plus a focus coverage bonus.
///
/// The bonus is [`FOCUS_COVERAGE_BONUS`] scaled by the share of selected items
/// whose text hits the focus area's keywords. An empty selection scores 0.
#[derive(Debug, Clone)]
pub struct CoverageEvaluator {
    keywords: Arc<KeywordTables>,
}

impl CoverageEvaluator {
    pub fn new(keywords: Arc<KeywordTables>) -> Self {
        Self { keywords }
    }
}

#[async_trait]
impl VariantEvaluator for CoverageEvaluator {
    async fn evaluate(
        &self,
        focus_area: FocusArea,
        selection: &CategorySelection,
        matches: &[MatchResult],
    ) -> Result<f64, EvaluationError> {
        if selection.is_empty() {
            return Ok(0.0);
        }

        let mut best_by_item: HashMap<&str, u8> = HashMap::new();
        for m in matches.iter().filter(|m| m.is_match()) {
            if let Some(item) = &m.profile_item {
                let best = best_by_item.entry(item.id.as_str()).or_insert(0);
                *best = (*best).max(m.score);
            }
        }

        let mut total = 0u64;
        let mut focused = 0usize;
        for item in selection.iter() {
            total += u64::from(best_by_item.get(item.id.as_str()).copied().unwrap_or(0));
            if self.keywords.focus_hits(focus_area, &item.text()) > 0 {
                focused += 1;
            }
        }

        let count = selection.len() as f64;
        let mean = total as f64 / count;
        let coverage = focused as f64 / count;

        Ok((mean + FOCUS_COVERAGE_BONUS * coverage).min(100.0))
    }
}
