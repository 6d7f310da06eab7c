//! Output types: per-requirement matches, aggregate scores and CV variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::items::{ProfileCategory, ProfileItem, RequirementItem};

/// Discretization of a 0–100 match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[serde(rename = "none")]
    NoMatch,
    Weak,
    Fair,
    Good,
    Excellent,
}

impl QualityTier {
    /// Maps a score to its tier: ≥80 excellent, ≥60 good, ≥40 fair, ≥20 weak.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => QualityTier::Excellent,
            60..=79 => QualityTier::Good,
            40..=59 => QualityTier::Fair,
            20..=39 => QualityTier::Weak,
            _ => QualityTier::NoMatch,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Excellent => "excellent",
            QualityTier::Good => "good",
            QualityTier::Fair => "fair",
            QualityTier::Weak => "weak",
            QualityTier::NoMatch => "none",
        }
    }

    /// Adjective used in templated reasoning ("a good match").
    pub fn adjective(self) -> &'static str {
        match self {
            QualityTier::NoMatch => "no",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best profile item found for one requirement.
///
/// `profile_item == None`, `score == 0` and `quality_tier == NoMatch` together
/// form the no-match sentinel built by [`MatchResult::no_match`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub requirement: RequirementItem,
    pub profile_item: Option<ProfileItem>,
    pub score: u8,
    pub quality_tier: QualityTier,
    pub reasoning: String,
}

pub const NO_MATCH_REASONING: &str = "No matching profile item found for this requirement.";

impl MatchResult {
    pub fn no_match(requirement: RequirementItem) -> Self {
        Self {
            requirement,
            profile_item: None,
            score: 0,
            quality_tier: QualityTier::NoMatch,
            reasoning: NO_MATCH_REASONING.to_string(),
        }
    }

    /// Returns `true` for a resolved match with a positive score.
    pub fn is_match(&self) -> bool {
        self.profile_item.is_some() && self.score > 0
    }

    pub fn is_no_match(&self) -> bool {
        self.profile_item.is_none() && self.score == 0 && self.quality_tier == QualityTier::NoMatch
    }
}

/// Per-CV-section scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub experience: u8,
    pub education: u8,
    pub skills: u8,
    pub projects: u8,
}

impl CategoryScores {
    pub fn get(&self, category: ProfileCategory) -> u8 {
        match category {
            ProfileCategory::Experience => self.experience,
            ProfileCategory::Education => self.education,
            ProfileCategory::Skill => self.skills,
            ProfileCategory::Project => self.projects,
        }
    }

    pub fn set(&mut self, category: ProfileCategory, score: u8) {
        match category {
            ProfileCategory::Experience => self.experience = score,
            ProfileCategory::Education => self.education = score,
            ProfileCategory::Skill => self.skills = score,
            ProfileCategory::Project => self.projects = score,
        }
    }
}

/// Overall match summary for one posting/profile pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    pub overall: u8,
    pub by_category: CategoryScores,
    pub unmatched: Vec<RequirementItem>,
    pub suggestions: Vec<String>,
}

/// Emphasis used to build an alternate CV variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Technical,
    Leadership,
    Impact,
    Innovation,
}

impl FocusArea {
    pub const ALL: [FocusArea; 4] = [
        FocusArea::Technical,
        FocusArea::Leadership,
        FocusArea::Impact,
        FocusArea::Innovation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FocusArea::Technical => "technical",
            FocusArea::Leadership => "leadership",
            FocusArea::Impact => "impact",
            FocusArea::Innovation => "innovation",
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown focus area '{0}'")]
pub struct UnknownFocusArea(pub String);

impl FromStr for FocusArea {
    type Err = UnknownFocusArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        FocusArea::ALL
            .into_iter()
            .find(|area| area.as_str() == needle)
            .ok_or_else(|| UnknownFocusArea(s.to_string()))
    }
}

/// Profile items chosen for one variant, grouped by CV section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySelection {
    pub experience: Vec<ProfileItem>,
    pub education: Vec<ProfileItem>,
    pub skills: Vec<ProfileItem>,
    pub projects: Vec<ProfileItem>,
}

impl CategorySelection {
    pub fn get(&self, category: ProfileCategory) -> &[ProfileItem] {
        match category {
            ProfileCategory::Experience => &self.experience,
            ProfileCategory::Education => &self.education,
            ProfileCategory::Skill => &self.skills,
            ProfileCategory::Project => &self.projects,
        }
    }

    pub fn get_mut(&mut self, category: ProfileCategory) -> &mut Vec<ProfileItem> {
        match category {
            ProfileCategory::Experience => &mut self.experience,
            ProfileCategory::Education => &mut self.education,
            ProfileCategory::Skill => &mut self.skills,
            ProfileCategory::Project => &mut self.projects,
        }
    }

    pub fn len(&self) -> usize {
        self.experience.len() + self.education.len() + self.skills.len() + self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileItem> {
        self.experience
            .iter()
            .chain(self.education.iter())
            .chain(self.skills.iter())
            .chain(self.projects.iter())
    }
}

/// One CV variant built under a focus area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub focus_area: FocusArea,
    pub score: u8,
    pub selected_items: CategorySelection,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}
