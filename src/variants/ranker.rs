use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use super::evaluator::VariantEvaluator;
use crate::model::{
    CategorySelection, FocusArea, MatchResult, ProfileCategory, ProfileItem, QualityTier, Variant,
};
use crate::scoring::KeywordTables;

/// Items kept per CV section in a variant. Default for [`VariantConfig`].
pub const DEFAULT_ITEMS_PER_CATEGORY: usize = 3;

const MAX_STRENGTHS_PER_VARIANT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    /// Max selected items per CV section.
    pub items_per_category: usize,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            items_per_category: DEFAULT_ITEMS_PER_CATEGORY,
        }
    }
}

/// A matched profile item with what the selection needs to rank it.
#[derive(Debug, Clone)]
struct Pick<'a> {
    item: &'a ProfileItem,
    score: u8,
    focus_hits: usize,
    position: usize,
}

/// Builds one [`Variant`] per focus area and orders them by score.
pub struct VariantRanker {
    keywords: Arc<KeywordTables>,
    evaluator: Arc<dyn VariantEvaluator>,
    config: VariantConfig,
}

impl std::fmt::Debug for VariantRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantRanker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VariantRanker {
    pub fn new(keywords: Arc<KeywordTables>, evaluator: Arc<dyn VariantEvaluator>) -> Self {
        Self {
            keywords,
            evaluator,
            config: VariantConfig::default(),
        }
    }

    pub fn with_config(mut self, config: VariantConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> VariantConfig {
        self.config
    }

    /// One variant per distinct focus area, sorted by score descending.
    ///
    /// Equal scores keep the order in which the focus areas were given.
    #[instrument(skip_all, fields(matches = matches.len(), focus_areas = focus_areas.len()))]
    pub async fn rank_variants(
        &self,
        matches: &[MatchResult],
        focus_areas: &[FocusArea],
    ) -> Vec<Variant> {
        let mut areas: Vec<FocusArea> = Vec::with_capacity(focus_areas.len());
        for &area in focus_areas {
            if !areas.contains(&area) {
                areas.push(area);
            }
        }

        let builds = areas
            .into_iter()
            .map(|area| self.build_variant(area, matches));
        let mut variants = join_all(builds).await;

        variants.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            variants = variants.len(),
            best = variants.first().map(|v| v.focus_area.as_str()),
            "Ranked variants"
        );

        variants
    }

    /// Selection for one focus area: per section, items with more focus
    /// keyword hits first, then higher match score, then input order.
    pub fn select(&self, focus_area: FocusArea, matches: &[MatchResult]) -> CategorySelection {
        self.select_picks(&self.picks(focus_area, matches))
    }

    fn select_picks(&self, picks: &[Pick<'_>]) -> CategorySelection {
        let mut selection = CategorySelection::default();

        for category in ProfileCategory::ALL {
            let mut in_category: Vec<&Pick<'_>> = picks
                .iter()
                .filter(|pick| pick.item.category == category)
                .collect();
            in_category.sort_by(|a, b| {
                b.focus_hits
                    .cmp(&a.focus_hits)
                    .then(b.score.cmp(&a.score))
                    .then(a.position.cmp(&b.position))
            });

            *selection.get_mut(category) = in_category
                .into_iter()
                .take(self.config.items_per_category)
                .map(|pick| pick.item.clone())
                .collect();
        }

        selection
    }

    async fn build_variant(&self, focus_area: FocusArea, matches: &[MatchResult]) -> Variant {
        let picks = self.picks(focus_area, matches);
        let selection = self.select_picks(&picks);

        let score = match self.evaluator.evaluate(focus_area, &selection, matches).await {
            Ok(raw) if raw.is_finite() => raw.round().clamp(0.0, 100.0) as u8,
            Ok(raw) => {
                warn!(focus_area = %focus_area, raw, "Evaluator returned a non-finite score");
                0
            }
            Err(err) => {
                warn!(focus_area = %focus_area, error = %err, "Variant evaluation failed");
                0
            }
        };

        let strengths = self.strengths(focus_area, &selection, &picks);
        let weaknesses = self.weaknesses(focus_area, &selection, matches);

        Variant {
            focus_area,
            score,
            selected_items: selection,
            strengths,
            weaknesses,
        }
    }

    /// Valid matches collapsed to one pick per profile item (best score, first position).
    fn picks<'a>(&self, focus_area: FocusArea, matches: &'a [MatchResult]) -> Vec<Pick<'a>> {
        let mut picks: Vec<Pick<'a>> = Vec::new();
        let mut index_by_id: HashMap<&str, usize> = HashMap::new();

        for m in matches.iter().filter(|m| m.is_match()) {
            let Some(item) = m.profile_item.as_ref() else {
                continue;
            };

            match index_by_id.get(item.id.as_str()) {
                Some(&existing) => {
                    let pick = &mut picks[existing];
                    pick.score = pick.score.max(m.score);
                }
                None => {
                    index_by_id.insert(item.id.as_str(), picks.len());
                    picks.push(Pick {
                        item,
                        score: m.score,
                        focus_hits: self.keywords.focus_hits(focus_area, &item.text()),
                        position: picks.len(),
                    });
                }
            }
        }

        picks
    }

    fn strengths(
        &self,
        focus_area: FocusArea,
        selection: &CategorySelection,
        picks: &[Pick<'_>],
    ) -> Vec<String> {
        let score_of = |id: &str| {
            picks
                .iter()
                .find(|pick| pick.item.id == id)
                .map_or(0, |pick| pick.score)
        };

        let mut strengths: Vec<String> = selection
            .iter()
            .filter_map(|item| {
                let score = score_of(&item.id);
                (QualityTier::from_score(score) == QualityTier::Excellent)
                    .then(|| format!("Strong match: {} ({score}/100)", item.title))
            })
            .take(MAX_STRENGTHS_PER_VARIANT)
            .collect();

        let focused = selection
            .iter()
            .filter(|item| self.keywords.focus_hits(focus_area, &item.text()) > 0)
            .count();
        if focused > 0 {
            let noun = if focused == 1 { "item highlights" } else { "items highlight" };
            strengths.push(format!("{focused} selected {noun} {focus_area} work"));
        }

        strengths
    }

    fn weaknesses(
        &self,
        focus_area: FocusArea,
        selection: &CategorySelection,
        matches: &[MatchResult],
    ) -> Vec<String> {
        let mut weaknesses = Vec::new();

        if selection.is_empty() {
            weaknesses.push("No matched profile items to select".to_string());
        } else {
            for category in ProfileCategory::ALL {
                if selection.get(category).is_empty() {
                    weaknesses.push(format!(
                        "Nothing selected for the {} section",
                        category.section_name()
                    ));
                }
            }

            let focused = selection
                .iter()
                .any(|item| self.keywords.focus_hits(focus_area, &item.text()) > 0);
            if !focused {
                weaknesses.push(format!("No selected items emphasize {focus_area} keywords"));
            }
        }

        let missing_required = matches
            .iter()
            .filter(|m| m.requirement.is_required && m.profile_item.is_none())
            .count();
        if missing_required > 0 {
            weaknesses.push(format!(
                "{missing_required} required requirement(s) remain unmatched"
            ));
        }

        weaknesses
    }
}
