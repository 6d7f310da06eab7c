use async_trait::async_trait;

use super::error::ExplanationError;
use crate::model::{ProfileItem, QualityTier, RequirementItem};

/// Produces human-readable reasoning for a scored pair.
///
/// Typically backed by a language model. The scorer never lets a failure here
/// abort a match; it substitutes [`fallback_reasoning`].
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    async fn explain(
        &self,
        requirement: &RequirementItem,
        item: &ProfileItem,
        score: u8,
    ) -> Result<String, ExplanationError>;
}

/// Deterministic reasoning used when the generator fails.
pub fn fallback_reasoning(score: u8, tier: QualityTier) -> String {
    let adjective = tier.adjective();
    let mut chars = adjective.chars();
    let capitalized: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    format!("{capitalized} match based on a semantic similarity score of {score}/100.")
}

/// Explanation generator that fills a fixed template. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateExplainer;

#[async_trait]
impl ExplanationGenerator for TemplateExplainer {
    async fn explain(
        &self,
        requirement: &RequirementItem,
        item: &ProfileItem,
        score: u8,
    ) -> Result<String, ExplanationError> {
        let tier = QualityTier::from_score(score);
        let source = match item.organization.as_deref() {
            Some(org) if !org.is_empty() => format!("\"{}\" at {org}", item.title),
            _ => format!("\"{}\"", item.title),
        };

        Ok(format!(
            "{source} matches \"{}\" with a score of {score}/100 ({} match).",
            requirement.title,
            tier.adjective()
        ))
    }
}
