//! Input items: requirements extracted from a posting and profile entries.

use serde::{Deserialize, Serialize};

use crate::constants::DimConfig;

/// Kind of requirement extracted from a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementCategory {
    Requirement,
    Skill,
    Responsibility,
    Qualification,
}

impl RequirementCategory {
    /// Returns `true` if a match for this requirement may count toward the
    /// given profile category when computing per-category scores.
    ///
    /// Skills bridge to skills, projects and experience. Generic requirements
    /// and responsibilities bridge to every category. Qualifications bridge to
    /// education and experience.
    pub fn bridges_to(self, category: ProfileCategory) -> bool {
        match self {
            RequirementCategory::Requirement | RequirementCategory::Responsibility => true,
            RequirementCategory::Skill => matches!(
                category,
                ProfileCategory::Skill | ProfileCategory::Project | ProfileCategory::Experience
            ),
            RequirementCategory::Qualification => matches!(
                category,
                ProfileCategory::Education | ProfileCategory::Experience
            ),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequirementCategory::Requirement => "requirement",
            RequirementCategory::Skill => "skill",
            RequirementCategory::Responsibility => "responsibility",
            RequirementCategory::Qualification => "qualification",
        }
    }
}

/// A structured unit extracted from a job posting.
///
/// Produced upstream and treated as read-only by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementItem {
    pub id: String,
    pub category: RequirementCategory,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub embedding: Vec<f32>,
}

impl RequirementItem {
    pub fn new(
        id: impl Into<String>,
        category: RequirementCategory,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            title: title.into(),
            description: String::new(),
            is_required: false,
            embedding: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Title and description joined, as used for keyword extraction and
    /// lazy embedding.
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.description)
        }
    }
}

/// CV section a profile item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileCategory {
    Experience,
    Project,
    Education,
    Skill,
}

impl ProfileCategory {
    pub const ALL: [ProfileCategory; 4] = [
        ProfileCategory::Experience,
        ProfileCategory::Education,
        ProfileCategory::Skill,
        ProfileCategory::Project,
    ];

    /// Plural section label used in reports and suggestions.
    pub fn section_name(self) -> &'static str {
        match self {
            ProfileCategory::Experience => "experience",
            ProfileCategory::Project => "projects",
            ProfileCategory::Education => "education",
            ProfileCategory::Skill => "skills",
        }
    }
}

/// A structured unit of a candidate's background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileItem {
    pub id: String,
    pub category: ProfileCategory,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl ProfileItem {
    pub fn new(id: impl Into<String>, category: ProfileCategory, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            title: title.into(),
            organization: None,
            start_date: None,
            end_date: None,
            description: None,
            highlights: Vec::new(),
            embedding: None,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: Option<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = end;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_highlights<I, S>(mut self, highlights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlights = highlights.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Searchable text: title, organization, description and highlights.
    pub fn text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        if let Some(org) = self.organization.as_deref() {
            parts.push(org);
        }
        if let Some(desc) = self.description.as_deref() {
            parts.push(desc);
        }
        parts.extend(self.highlights.iter().map(String::as_str));
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Returns the stored embedding if it has the configured dimension.
    pub fn usable_embedding(&self, dims: &DimConfig) -> Option<&[f32]> {
        self.embedding
            .as_deref()
            .filter(|embedding| dims.accepts(embedding))
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }
}
