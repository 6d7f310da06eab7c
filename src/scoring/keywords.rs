//! Data-driven keyword vocabularies.
//!
//! The technology list feeds the keyword bonus; the focus-area lists bias
//! variant selection. Both can be replaced from JSON at construction time.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::KeywordTableError;
use crate::constants::MAX_KEYWORD_BONUS;
use crate::model::FocusArea;

const DEFAULT_TECHNOLOGIES: &[&str] = &[
    "javascript", "typescript", "python", "java", "rust", "go", "golang", "c++", "c#", "ruby",
    "php", "swift", "kotlin", "scala", "react", "angular", "vue", "svelte", "next.js", "node.js",
    "express", "django", "flask", "spring", "rails", ".net", "graphql", "rest", "grpc", "sql",
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "kafka", "rabbitmq", "spark",
    "hadoop", "airflow", "docker", "kubernetes", "terraform", "ansible", "aws", "azure", "gcp",
    "linux", "git", "ci/cd", "jenkins", "html", "css", "tailwind", "tensorflow", "pytorch",
    "machine learning", "deep learning", "nlp", "llm", "pandas", "numpy", "figma",
];

const DEFAULT_TECHNICAL: &[&str] = &[
    "architecture", "api", "backend", "frontend", "database", "infrastructure", "performance",
    "scalability", "algorithm", "system", "cloud", "distributed", "engineered", "implemented",
    "developed", "optimized", "migrated", "automated", "testing", "deployment",
];

const DEFAULT_LEADERSHIP: &[&str] = &[
    "led", "lead", "managed", "manager", "mentored", "mentor", "team", "coordinated",
    "stakeholder", "hired", "directed", "supervised", "ownership", "cross-functional",
    "organized", "coached", "head of",
];

const DEFAULT_IMPACT: &[&str] = &[
    "increased", "reduced", "improved", "revenue", "saved", "growth", "delivered", "launched",
    "customers", "users", "metrics", "kpi", "percent", "cost", "efficiency", "conversion",
    "million", "achieved",
];

const DEFAULT_INNOVATION: &[&str] = &[
    "designed", "created", "prototype", "patent", "novel", "research", "pioneered",
    "introduced", "invented", "founded", "initiated", "experimental", "hackathon",
    "proof of concept", "first",
];

/// Technology vocabulary plus one keyword list per focus area.
///
/// Keywords are stored lowercased. Matching is case-insensitive and requires
/// that the characters around a hit are not alphanumeric, so `go` does not
/// match inside `google` while `c++` and `node.js` still match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordTables {
    technologies: Vec<String>,
    focus_areas: HashMap<FocusArea, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawTables {
    #[serde(default)]
    technologies: Option<Vec<String>>,
    #[serde(default)]
    focus_areas: HashMap<FocusArea, Vec<String>>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        let focus_areas = FocusArea::ALL
            .into_iter()
            .map(|area| (area, normalize(default_focus_keywords(area).iter().copied())))
            .collect();

        Self {
            technologies: normalize(DEFAULT_TECHNOLOGIES.iter().copied()),
            focus_areas,
        }
    }
}

impl KeywordTables {
    /// Builds tables from explicit lists. Areas absent from `focus_areas` match nothing.
    pub fn new<T, S>(technologies: T, focus_areas: HashMap<FocusArea, Vec<String>>) -> Self
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            technologies: normalize(technologies),
            focus_areas: focus_areas
                .into_iter()
                .map(|(area, words)| (area, normalize(words)))
                .collect(),
        }
    }

    /// Parses JSON of the form
    /// `{"technologies": [...], "focusAreas": {"technical": [...], ...}}`.
    ///
    /// Sections that are absent keep the built-in lists.
    pub fn from_json_str(json: &str) -> Result<Self, KeywordTableError> {
        let raw: RawTables = serde_json::from_str(json)?;
        let mut tables = Self::default();

        if let Some(technologies) = raw.technologies {
            tables.technologies = normalize(technologies);
        }
        for (area, words) in raw.focus_areas {
            tables.focus_areas.insert(area, normalize(words));
        }

        Ok(tables)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KeywordTableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| KeywordTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn focus_keywords(&self, area: FocusArea) -> &[String] {
        self.focus_areas.get(&area).map_or(&[], Vec::as_slice)
    }

    /// Technologies mentioned in `text`, in table order.
    pub fn technologies_in<'a>(&'a self, text: &str) -> Vec<&'a str> {
        let haystack = text.to_lowercase();
        self.technologies
            .iter()
            .filter(|tech| contains_keyword(&haystack, tech))
            .map(String::as_str)
            .collect()
    }

    /// Keyword bonus in `[0, 15]`.
    ///
    /// `round(15 × matched / found)`, where `found` counts technologies in the
    /// requirement text and `matched` those also present in the candidate text.
    pub fn keyword_bonus(&self, requirement_text: &str, candidate_text: &str) -> u32 {
        let found = self.technologies_in(requirement_text);
        if found.is_empty() {
            return 0;
        }

        let candidate = candidate_text.to_lowercase();
        let matched = found
            .iter()
            .filter(|tech| contains_keyword(&candidate, tech))
            .count();

        (f64::from(MAX_KEYWORD_BONUS) * matched as f64 / found.len() as f64).round() as u32
    }

    /// Number of distinct focus-area keywords present in `text`.
    pub fn focus_hits(&self, area: FocusArea, text: &str) -> usize {
        let haystack = text.to_lowercase();
        self.focus_keywords(area)
            .iter()
            .filter(|word| contains_keyword(&haystack, word))
            .count()
    }
}

fn default_focus_keywords(area: FocusArea) -> &'static [&'static str] {
    match area {
        FocusArea::Technical => DEFAULT_TECHNICAL,
        FocusArea::Leadership => DEFAULT_LEADERSHIP,
        FocusArea::Impact => DEFAULT_IMPACT,
        FocusArea::Innovation => DEFAULT_INNOVATION,
    }
}

fn normalize<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

/// `true` if `keyword` occurs in `haystack` with non-alphanumeric neighbours.
///
/// Both arguments must already be lowercase.
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    haystack.match_indices(keyword).any(|(start, _)| {
        let end = start + keyword.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
