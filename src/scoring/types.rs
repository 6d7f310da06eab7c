use crate::constants::DEFAULT_MATCH_THRESHOLD;
use crate::model::ProfileItem;

/// Pair scorer tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Best combined score below this yields the no-match sentinel. Default: `0.3`.
    pub match_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Candidate annotated with its similarity, keyword bonus and combined score.
pub struct ScoredCandidate {
    /// The candidate item.
    pub item: ProfileItem,
    /// Cosine similarity to the requirement.
    pub similarity: f32,
    /// Keyword bonus in `[0, 15]`.
    pub keyword_bonus: u32,
    /// `min(similarity + bonus / 100, 1.0)`.
    pub combined: f32,
}

impl ScoredCandidate {
    pub fn new(item: ProfileItem, similarity: f32, keyword_bonus: u32) -> Self {
        let combined = (similarity + keyword_bonus as f32 / 100.0).min(1.0);
        Self {
            item,
            similarity,
            keyword_bonus,
            combined,
        }
    }

    /// Combined score on the 0–100 scale.
    pub fn score(&self) -> u8 {
        (self.combined * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Returns `true` if `combined` reaches `threshold`.
    pub fn meets_threshold(&self, threshold: f32) -> bool {
        self.combined >= threshold
    }
}
