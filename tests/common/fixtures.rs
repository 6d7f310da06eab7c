//! Shared profiles, postings and engine wiring for integration tests.

use std::sync::Arc;

use cvmatch::{
    DimConfig, MatchingEngine, MockComponentStore, MockEmbeddingProvider, ProfileCategory,
    ProfileItem, RequirementCategory, RequirementItem, RetryPolicy,
};

pub const OWNER_ID: &str = "candidate-42";

pub const DIM: usize = 4;

pub type MockEngine = MatchingEngine<Arc<MockEmbeddingProvider>, Arc<MockComponentStore>>;

/// Axis-aligned unit vector, so cosine between two axes is 0 and with itself 1.
pub fn axis(index: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[index] = 1.0;
    v
}

pub fn profile() -> Vec<ProfileItem> {
    vec![
        ProfileItem::new("exp-platform", ProfileCategory::Experience, "Platform team lead")
            .with_organization("Acme")
            .with_dates("2019-03", None)
            .with_description("Led a team of six building Rust and Kafka services")
            .with_highlights(["Reduced cloud cost by 30 percent"])
            .with_embedding(axis(0)),
        ProfileItem::new("proj-compiler", ProfileCategory::Project, "Toy compiler")
            .with_description("Designed a novel register allocator in Rust")
            .with_embedding(axis(1)),
        ProfileItem::new("edu-msc", ProfileCategory::Education, "MSc Computer Science")
            .with_organization("University of Somewhere")
            .with_embedding(axis(2)),
        ProfileItem::new("skill-sql", ProfileCategory::Skill, "PostgreSQL")
            .with_embedding(axis(3)),
    ]
}

pub fn posting() -> Vec<RequirementItem> {
    vec![
        RequirementItem::new("req-rust", RequirementCategory::Skill, "Rust and Kafka")
            .with_description("Production services")
            .required(true),
        RequirementItem::new("req-degree", RequirementCategory::Qualification, "Degree")
            .with_description("Computer science or equivalent")
            .required(true),
        RequirementItem::new("req-sql", RequirementCategory::Skill, "PostgreSQL")
            .required(false),
    ]
}

/// Provider answering the posting's texts with vectors aligned to [`profile`].
pub fn provider() -> MockEmbeddingProvider {
    MockEmbeddingProvider::new(DIM)
        .with_vector("Rust and Kafka Production services", axis(0))
        .with_vector("Degree Computer science or equivalent", axis(2))
        .with_vector("PostgreSQL", axis(3))
}

pub fn engine(
    provider: &Arc<MockEmbeddingProvider>,
    store: &Arc<MockComponentStore>,
) -> MockEngine {
    MatchingEngine::builder(Arc::clone(provider), Arc::clone(store))
        .dims(DimConfig::new(DIM))
        .retry_policy(RetryPolicy::no_retry())
        .build()
}

pub fn setup() -> (Arc<MockEmbeddingProvider>, Arc<MockComponentStore>, MockEngine) {
    let provider = Arc::new(provider());
    let store = Arc::new(MockComponentStore::new().with_items(OWNER_ID, profile()));
    let engine = engine(&provider, &store);
    (provider, store, engine)
}
