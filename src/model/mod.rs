//! Domain types shared by every stage of the matching pipeline.

mod items;
mod results;

#[cfg(test)]
mod tests;

pub use items::{ProfileCategory, ProfileItem, RequirementCategory, RequirementItem};
pub use results::{
    AggregateScore, CategoryScores, CategorySelection, FocusArea, MatchResult, NO_MATCH_REASONING,
    QualityTier, UnknownFocusArea, Variant,
};
