use serde::Serialize;

use crate::model::{FocusArea, Variant};

/// Sole con listed for a variant without weaknesses.
pub const NO_MAJOR_WEAKNESSES: &str = "No major weaknesses identified";

/// Side-by-side view of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantComparison {
    pub focus_area: FocusArea,
    pub score: u8,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Pairs each variant with pros (its strengths and score) and cons.
///
/// Preserves the order of `variants`.
pub fn compare_variants(variants: &[Variant]) -> Vec<VariantComparison> {
    variants
        .iter()
        .map(|variant| {
            let mut pros = variant.strengths.clone();
            pros.push(format!("Overall score: {}/100", variant.score));

            let cons = if variant.weaknesses.is_empty() {
                vec![NO_MAJOR_WEAKNESSES.to_string()]
            } else {
                variant.weaknesses.clone()
            };

            VariantComparison {
                focus_area: variant.focus_area,
                score: variant.score,
                pros,
                cons,
            }
        })
        .collect()
}
