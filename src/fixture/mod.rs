//! JSON input for the `cvmatch` binary.
//!
//! ```json
//! {
//!   "ownerId": "candidate-1",
//!   "requirements": [{"id": "r1", "category": "skill", "title": "Rust", "isRequired": true}],
//!   "profileItems": [{"id": "p1", "category": "experience", "title": "Backend engineer"}],
//!   "focusAreas": ["technical", "impact"]
//! }
//! ```
//!
//! `focusAreas` may be omitted to build every variant.

mod error;


use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{FocusArea, ProfileItem, RequirementItem};

pub use error::{FixtureError, FixtureResult};

/// One posting's requirements and one owner's profile items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub owner_id: String,
    pub requirements: Vec<RequirementItem>,
    #[serde(default)]
    pub profile_items: Vec<ProfileItem>,
    #[serde(default)]
    pub focus_areas: Vec<FocusArea>,
}

impl Fixture {
    pub fn from_json_str(json: &str) -> FixtureResult<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects a blank owner and repeated requirement or profile item ids.
    pub fn validate(&self) -> FixtureResult<()> {
        if self.owner_id.trim().is_empty() {
            return Err(FixtureError::MissingOwner);
        }

        check_unique("requirement", self.requirements.iter().map(|r| r.id.as_str()))?;
        check_unique("profile item", self.profile_items.iter().map(|p| p.id.as_str()))?;

        Ok(())
    }
}

fn check_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> FixtureResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(FixtureError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
