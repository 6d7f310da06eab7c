use std::sync::Arc;

use super::*;
use crate::model::{ProfileCategory, ProfileItem};
use crate::store::{MockComponentStore, SearchBehavior, StoreError};

const OWNER: &str = "owner-1";

fn item(id: &str, embedding: Option<Vec<f32>>) -> ProfileItem {
    let item = ProfileItem::new(id, ProfileCategory::Skill, format!("Skill {id}"));
    match embedding {
        Some(e) => item.with_embedding(e),
        None => item,
    }
}

fn ids(items: &[ProfileItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

fn search_failure() -> StoreError {
    StoreError::SearchFailed {
        collection: "profile_items".to_string(),
        message: "connection refused".to_string(),
    }
}

fn owner_items() -> Vec<ProfileItem> {
    vec![
        item("orthogonal", Some(vec![0.0, 1.0, 0.0])),
        item("close", Some(vec![0.9, 0.1, 0.0])),
        item("exact", Some(vec![1.0, 0.0, 0.0])),
        item("unembedded", None),
        item("wrong-dim", Some(vec![1.0, 0.0])),
    ]
}

fn retriever(
    store: MockComponentStore,
) -> (Arc<MockComponentStore>, CandidateRetriever<Arc<MockComponentStore>>) {
    let store = Arc::new(store);
    (Arc::clone(&store), CandidateRetriever::new(store))
}

#[test]
fn test_retrieval_config_defaults() {
    let config = RetrievalConfig::default();
    assert_eq!(config.scan_threshold, 0.7);
    assert_eq!(config.limit, 5);
}

#[tokio::test]
async fn test_indexed_tier_answers_first() {
    let (store, retriever) = retriever(MockComponentStore::new().with_items(OWNER, owner_items()));

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0, 0.0], 2).await.unwrap();

    assert_eq!(retrieval.tier, RetrievalTier::Indexed);
    assert_eq!(ids(&retrieval.items), vec!["exact", "close"]);
    assert_eq!(store.search_calls(), 1);
    assert_eq!(store.list_calls(), 0);
}

#[tokio::test]
async fn test_indexed_results_truncated_to_limit() {
    let fixed = vec![item("a", None), item("b", None), item("c", None)];
    let (_, retriever) =
        retriever(MockComponentStore::new().with_search(SearchBehavior::Fixed(fixed)));

    let retrieval = retriever.retrieve(OWNER, &[1.0], 2).await.unwrap();
    assert_eq!(retrieval.tier, RetrievalTier::Indexed);
    assert_eq!(ids(&retrieval.items), vec!["a", "b"]);
}

#[tokio::test]
async fn test_unsupported_index_runs_brute_force() {
    let (store, retriever) = retriever(
        MockComponentStore::new()
            .with_items(OWNER, owner_items())
            .with_search(SearchBehavior::Unsupported),
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0, 0.0], 5).await.unwrap();

    assert_eq!(retrieval.tier, RetrievalTier::BruteForce);
    assert_eq!(ids(&retrieval.items), vec!["exact", "close"]);
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_healthy_empty_index_runs_brute_force() {
    let (_, retriever) = retriever(
        MockComponentStore::new()
            .with_items(OWNER, owner_items())
            .with_search(SearchBehavior::Fixed(Vec::new())),
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0, 0.0], 5).await.unwrap();
    assert_eq!(retrieval.tier, RetrievalTier::BruteForce);
}

#[tokio::test]
async fn test_brute_force_threshold_is_strict() {
    let store = Arc::new(
        MockComponentStore::new()
            .with_items(OWNER, vec![item("identical", Some(vec![1.0, 0.0]))])
            .with_search(SearchBehavior::Unsupported),
    );
    let retriever = CandidateRetriever::with_config(
        store,
        RetrievalConfig {
            scan_threshold: 1.0,
            limit: 5,
        },
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0], 5).await.unwrap();
    // Nothing strictly above the threshold, so the unranked tier answers.
    assert_eq!(retrieval.tier, RetrievalTier::Unranked);
}

#[tokio::test]
async fn test_brute_force_ties_keep_input_order() {
    let (_, retriever) = retriever(
        MockComponentStore::new()
            .with_items(
                OWNER,
                vec![
                    item("first", Some(vec![1.0, 0.0])),
                    item("second", Some(vec![2.0, 0.0])),
                    item("third", Some(vec![3.0, 0.0])),
                ],
            )
            .with_search(SearchBehavior::Unsupported),
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0], 5).await.unwrap();
    assert_eq!(ids(&retrieval.items), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_nothing_above_threshold_falls_back_to_unranked() {
    let items = vec![
        item("a", Some(vec![0.0, 1.0])),
        item("b", None),
        item("c", Some(vec![-1.0, 0.0])),
    ];
    let (store, retriever) = retriever(
        MockComponentStore::new()
            .with_items(OWNER, items)
            .with_search(SearchBehavior::Unsupported),
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0], 2).await.unwrap();

    assert_eq!(retrieval.tier, RetrievalTier::Unranked);
    assert_eq!(ids(&retrieval.items), vec!["a", "b"]);
    // The brute-force listing is reused.
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_index_failure_goes_straight_to_unranked() {
    let items: Vec<ProfileItem> = (0..8).map(|i| item(&format!("item-{i}"), None)).collect();
    let (store, retriever) = retriever(
        MockComponentStore::new()
            .with_items(OWNER, items)
            .with_search(SearchBehavior::Failing(search_failure())),
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0], 3).await.unwrap();

    assert_eq!(retrieval.tier, RetrievalTier::Unranked);
    assert_eq!(ids(&retrieval.items), vec!["item-0", "item-1", "item-2"]);
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_store_outage_is_an_error() {
    let store = MockComponentStore::new().with_search(SearchBehavior::Failing(search_failure()));
    store.fail_listing(StoreError::ListFailed {
        owner_id: OWNER.to_string(),
        message: "store offline".to_string(),
    });
    let (_, retriever) = retriever(store);

    let err = retriever.retrieve(OWNER, &[1.0], 3).await.unwrap_err();
    let RetrievalError::StoreUnavailable { owner_id, .. } = err;
    assert_eq!(owner_id, OWNER);
}

#[tokio::test]
async fn test_brute_force_list_failure_retries_listing_in_unranked_tier() {
    let store = MockComponentStore::new()
        .with_items(OWNER, owner_items())
        .with_search(SearchBehavior::Unsupported);
    store.fail_listing(StoreError::ListFailed {
        owner_id: OWNER.to_string(),
        message: "flaky".to_string(),
    });
    let (store, retriever) = retriever(store);

    assert!(retriever.retrieve(OWNER, &[1.0, 0.0, 0.0], 3).await.is_err());
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_brute_force_failure_still_answers_from_unranked_tier() {
    let store = MockComponentStore::new()
        .with_items(OWNER, owner_items())
        .with_search(SearchBehavior::Unsupported);
    store.fail_next_listing(StoreError::ListFailed {
        owner_id: OWNER.to_string(),
        message: "connection reset".to_string(),
    });
    let (store, retriever) = retriever(store);

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0, 0.0], 2).await.unwrap();

    assert_eq!(retrieval.tier, RetrievalTier::Unranked);
    assert_eq!(ids(&retrieval.items), vec!["orthogonal", "close"]);
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_unknown_owner_yields_empty_unranked() {
    let (_, retriever) = retriever(MockComponentStore::new());

    let retrieval = retriever.retrieve("nobody", &[1.0, 0.0], 5).await.unwrap();
    assert_eq!(retrieval.tier, RetrievalTier::Unranked);
    assert!(retrieval.items.is_empty());
}

#[tokio::test]
async fn test_empty_query_skips_ranked_tiers() {
    let (store, retriever) = retriever(MockComponentStore::new().with_items(OWNER, owner_items()));

    let retrieval = retriever.retrieve(OWNER, &[], 2).await.unwrap();
    assert_eq!(retrieval.tier, RetrievalTier::Unranked);
    assert_eq!(retrieval.items.len(), 2);
    assert_eq!(store.search_calls(), 0);
}

#[tokio::test]
async fn test_find_candidates_returns_items_only() {
    let (_, retriever) = retriever(MockComponentStore::new().with_items(OWNER, owner_items()));

    let items = retriever
        .find_candidates(OWNER, &[1.0, 0.0, 0.0], 1)
        .await
        .unwrap();
    assert_eq!(ids(&items), vec!["exact"]);
}

#[tokio::test]
async fn test_custom_scan_threshold() {
    let store = Arc::new(
        MockComponentStore::new()
            .with_items(OWNER, owner_items())
            .with_search(SearchBehavior::Unsupported),
    );
    let retriever = CandidateRetriever::with_config(
        store,
        RetrievalConfig {
            scan_threshold: 0.995,
            limit: 5,
        },
    );

    let retrieval = retriever.retrieve(OWNER, &[1.0, 0.0, 0.0], 5).await.unwrap();
    assert_eq!(ids(&retrieval.items), vec!["exact"]);
}
