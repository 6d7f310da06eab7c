use super::*;
use crate::constants::DimConfig;

#[test]
fn test_quality_tier_thresholds() {
    assert_eq!(QualityTier::from_score(100), QualityTier::Excellent);
    assert_eq!(QualityTier::from_score(80), QualityTier::Excellent);
    assert_eq!(QualityTier::from_score(79), QualityTier::Good);
    assert_eq!(QualityTier::from_score(60), QualityTier::Good);
    assert_eq!(QualityTier::from_score(59), QualityTier::Fair);
    assert_eq!(QualityTier::from_score(40), QualityTier::Fair);
    assert_eq!(QualityTier::from_score(39), QualityTier::Weak);
    assert_eq!(QualityTier::from_score(20), QualityTier::Weak);
    assert_eq!(QualityTier::from_score(19), QualityTier::NoMatch);
    assert_eq!(QualityTier::from_score(0), QualityTier::NoMatch);
}

#[test]
fn test_quality_tier_is_monotonic() {
    let mut previous = QualityTier::from_score(0);
    for score in 1..=100u8 {
        let tier = QualityTier::from_score(score);
        assert!(tier >= previous, "tier dropped at score {score}");
        previous = tier;
    }
}

#[test]
fn test_quality_tier_serializes_as_lowercase() {
    let json = serde_json::to_string(&QualityTier::NoMatch).unwrap();
    assert_eq!(json, "\"none\"");
    let json = serde_json::to_string(&QualityTier::Excellent).unwrap();
    assert_eq!(json, "\"excellent\"");
    assert_eq!(QualityTier::NoMatch.adjective(), "no");
    assert_eq!(QualityTier::Good.adjective(), "good");
}

#[test]
fn test_no_match_sentinel() {
    let requirement = RequirementItem::new("r1", RequirementCategory::Skill, "Rust");
    let result = MatchResult::no_match(requirement.clone());

    assert!(result.is_no_match());
    assert!(!result.is_match());
    assert!(result.profile_item.is_none());
    assert_eq!(result.score, 0);
    assert_eq!(result.quality_tier, QualityTier::NoMatch);
    assert_eq!(result.requirement, requirement);
}

#[test]
fn test_requirement_bridging_rules() {
    use ProfileCategory::*;

    for category in ProfileCategory::ALL {
        assert!(RequirementCategory::Requirement.bridges_to(category));
        assert!(RequirementCategory::Responsibility.bridges_to(category));
    }

    assert!(RequirementCategory::Skill.bridges_to(Skill));
    assert!(RequirementCategory::Skill.bridges_to(Project));
    assert!(RequirementCategory::Skill.bridges_to(Experience));
    assert!(!RequirementCategory::Skill.bridges_to(Education));

    assert!(RequirementCategory::Qualification.bridges_to(Education));
    assert!(RequirementCategory::Qualification.bridges_to(Experience));
    assert!(!RequirementCategory::Qualification.bridges_to(Skill));
}

#[test]
fn test_requirement_text() {
    let bare = RequirementItem::new("r1", RequirementCategory::Skill, "Rust");
    assert_eq!(bare.text(), "Rust");

    let described = bare.with_description("async services with tokio");
    assert_eq!(described.text(), "Rust async services with tokio");
}

#[test]
fn test_profile_item_text_skips_missing_fields() {
    let item = ProfileItem::new("p1", ProfileCategory::Experience, "Backend Engineer")
        .with_organization("Acme")
        .with_highlights(["Built payment service", "Led migration"]);

    assert_eq!(
        item.text(),
        "Backend Engineer Acme Built payment service Led migration"
    );
}

#[test]
fn test_profile_item_usable_embedding() {
    let dims = DimConfig::new(3);
    let item = ProfileItem::new("p1", ProfileCategory::Skill, "Rust");
    assert!(item.usable_embedding(&dims).is_none());
    assert!(!item.has_embedding());

    let wrong = item.clone().with_embedding(vec![1.0, 0.0]);
    assert!(wrong.usable_embedding(&dims).is_none());
    assert!(wrong.has_embedding());

    let right = item.with_embedding(vec![1.0, 0.0, 0.0]);
    assert_eq!(right.usable_embedding(&dims), Some(&[1.0, 0.0, 0.0][..]));
}

#[test]
fn test_profile_item_json_uses_camel_case() {
    let json = r#"{
        "id": "p1",
        "category": "project",
        "title": "Search engine",
        "startDate": "2021-01",
        "highlights": ["Indexed 1M docs"]
    }"#;

    let item: ProfileItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.category, ProfileCategory::Project);
    assert_eq!(item.start_date.as_deref(), Some("2021-01"));
    assert!(item.embedding.is_none());

    let requirement: RequirementItem = serde_json::from_str(
        r#"{"id":"r1","category":"qualification","title":"BSc","isRequired":true}"#,
    )
    .unwrap();
    assert!(requirement.is_required);
    assert!(requirement.embedding.is_empty());
}

#[test]
fn test_focus_area_from_str() {
    assert_eq!("technical".parse::<FocusArea>(), Ok(FocusArea::Technical));
    assert_eq!(" Leadership ".parse::<FocusArea>(), Ok(FocusArea::Leadership));
    let err = "marketing".parse::<FocusArea>().unwrap_err();
    assert_eq!(err, UnknownFocusArea("marketing".to_string()));
    assert_eq!(err.to_string(), "unknown focus area 'marketing'");
}

#[test]
fn test_category_scores_get_set() {
    let mut scores = CategoryScores::default();
    scores.set(ProfileCategory::Skill, 72);
    scores.set(ProfileCategory::Project, 41);

    assert_eq!(scores.skills, 72);
    assert_eq!(scores.get(ProfileCategory::Project), 41);
    assert_eq!(scores.get(ProfileCategory::Education), 0);
}

#[test]
fn test_category_selection_len_and_iter() {
    let mut selection = CategorySelection::default();
    assert!(selection.is_empty());

    selection
        .get_mut(ProfileCategory::Skill)
        .push(ProfileItem::new("s1", ProfileCategory::Skill, "Rust"));
    selection
        .get_mut(ProfileCategory::Experience)
        .push(ProfileItem::new("e1", ProfileCategory::Experience, "Engineer"));

    assert_eq!(selection.len(), 2);
    let ids: Vec<_> = selection.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "s1"]);
}
