use tracing::debug;

use crate::constants::{CATEGORY_SUGGESTION_THRESHOLD, OPTIONAL_WEIGHT, REQUIRED_WEIGHT};
use crate::model::{AggregateScore, CategoryScores, MatchResult, ProfileCategory, RequirementItem};

use super::suggestions::build_suggestions;

/// Aggregation weights and the per-category suggestion cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorConfig {
    /// Weight of the required average when optional matches also exist. Default: `0.7`.
    pub required_weight: f64,
    /// Weight of the optional average when required matches also exist. Default: `0.3`.
    pub optional_weight: f64,
    /// Categories scoring below this get a suggestion. Default: `60`.
    pub suggestion_threshold: u8,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            required_weight: REQUIRED_WEIGHT,
            optional_weight: OPTIONAL_WEIGHT,
            suggestion_threshold: CATEGORY_SUGGESTION_THRESHOLD,
        }
    }
}

/// Turns a resolved list of matches into an [`AggregateScore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

/// Mean and contributor count for one group of matches.
#[derive(Debug, Clone, Copy, Default)]
struct GroupAverage {
    mean: f64,
    count: usize,
}

impl GroupAverage {
    fn of<'a>(scores: impl Iterator<Item = &'a MatchResult>) -> Self {
        let (sum, count) = scores.fold((0u64, 0usize), |(sum, count), m| {
            (sum + u64::from(m.score), count + 1)
        });
        if count == 0 {
            Self::default()
        } else {
            Self {
                mean: sum as f64 / count as f64,
                count,
            }
        }
    }

    fn rounded(&self) -> u8 {
        round_score(self.mean)
    }
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> AggregatorConfig {
        self.config
    }

    /// Computes the overall score, category scores, unmatched list and suggestions.
    pub fn aggregate(&self, matches: &[MatchResult]) -> AggregateScore {
        let overall = self.overall(matches);

        let mut by_category = CategoryScores::default();
        let mut contributors = Vec::with_capacity(ProfileCategory::ALL.len());
        for category in ProfileCategory::ALL {
            let group = category_average(matches, category);
            by_category.set(category, group.rounded());
            contributors.push((category, group.count));
        }

        let unmatched: Vec<RequirementItem> = matches
            .iter()
            .filter(|m| m.profile_item.is_none())
            .map(|m| m.requirement.clone())
            .collect();

        let valid = matches.iter().filter(|m| m.is_match()).count();

        let suggestions = build_suggestions(
            &by_category,
            &contributors,
            &unmatched,
            valid,
            self.config.suggestion_threshold,
        );

        debug!(
            overall,
            matches = matches.len(),
            valid,
            unmatched = unmatched.len(),
            "Aggregated match results"
        );

        AggregateScore {
            overall,
            by_category,
            unmatched,
            suggestions,
        }
    }

    /// Weighted overall score.
    ///
    /// Group presence is decided over all matches, so an optional requirement
    /// that found nothing still pulls the blend toward zero.
    pub fn overall(&self, matches: &[MatchResult]) -> u8 {
        let has_required = matches.iter().any(|m| m.requirement.is_required);
        let has_optional = matches.iter().any(|m| !m.requirement.is_required);

        let required = GroupAverage::of(
            matches
                .iter()
                .filter(|m| m.requirement.is_required && m.is_match()),
        );
        let optional = GroupAverage::of(
            matches
                .iter()
                .filter(|m| !m.requirement.is_required && m.is_match()),
        );

        match (has_required, has_optional) {
            (true, false) => required.rounded(),
            (false, true) => optional.rounded(),
            (true, true) => round_score(
                self.config.required_weight * required.mean
                    + self.config.optional_weight * optional.mean,
            ),
            (false, false) => 0,
        }
    }
}

fn category_average(matches: &[MatchResult], category: ProfileCategory) -> GroupAverage {
    GroupAverage::of(matches.iter().filter(|m| {
        m.is_match()
            && m.profile_item
                .as_ref()
                .is_some_and(|item| item.category == category)
            && m.requirement.category.bridges_to(category)
    }))
}

fn round_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
