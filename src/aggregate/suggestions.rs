use crate::model::{CategoryScores, ProfileCategory, RequirementItem};

/// Suggestion emitted when no requirement found a valid match.
pub const GENERIC_SUGGESTION: &str =
    "Add more detail to your profile so its items can be matched against this posting's requirements.";

/// Unmatched required requirements named in a suggestion, at most.
pub const MAX_NAMED_REQUIREMENTS: usize = 3;

fn category_suggestion(category: ProfileCategory) -> &'static str {
    match category {
        ProfileCategory::Experience => {
            "Highlight experience that relates more directly to the role's responsibilities."
        }
        ProfileCategory::Education => {
            "Emphasize degrees, coursework or certifications relevant to the posting's qualifications."
        }
        ProfileCategory::Skill => "Add or strengthen the skills the posting lists explicitly.",
        ProfileCategory::Project => {
            "Feature projects that demonstrate the technologies and responsibilities of this role."
        }
    }
}

/// Deterministic suggestion list.
///
/// Order: underperforming categories (in [`ProfileCategory::ALL`] order), the
/// unmatched count, the first unmatched required titles, then the generic
/// suggestion when nothing matched at all.
pub(super) fn build_suggestions(
    by_category: &CategoryScores,
    contributors: &[(ProfileCategory, usize)],
    unmatched: &[RequirementItem],
    valid_matches: usize,
    threshold: u8,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    for &(category, count) in contributors {
        let score = by_category.get(category);
        if count > 0 && score < threshold {
            suggestions.push(format!(
                "Your {} section scores {score}/100. {}",
                category.section_name(),
                category_suggestion(category)
            ));
        }
    }

    if !unmatched.is_empty() {
        let noun = if unmatched.len() == 1 {
            "requirement has"
        } else {
            "requirements have"
        };
        suggestions.push(format!(
            "{} {noun} no matching profile item; consider adding relevant experience, projects or skills.",
            unmatched.len()
        ));

        let required: Vec<&str> = unmatched
            .iter()
            .filter(|r| r.is_required)
            .take(MAX_NAMED_REQUIREMENTS)
            .map(|r| r.title.as_str())
            .collect();
        if !required.is_empty() {
            suggestions.push(format!(
                "Address missing required items: {}.",
                required.join(", ")
            ));
        }
    }

    if valid_matches == 0 {
        suggestions.push(GENERIC_SUGGESTION.to_string());
    }

    suggestions
}
