use std::sync::Arc;
use std::time::Duration;

use super::client::EmbeddingClient;
use super::error::{EmbeddingError, ProviderError};
use super::mock::MockEmbeddingProvider;
use super::retry::RetryPolicy;
use crate::constants::DimConfig;

fn server_error() -> ProviderError {
    ProviderError::Http {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

fn client_with(
    provider: Arc<MockEmbeddingProvider>,
) -> EmbeddingClient<Arc<MockEmbeddingProvider>> {
    EmbeddingClient::new(provider, DimConfig::new(3))
}

#[test]
fn test_provider_error_retriable_classification() {
    assert!(server_error().is_retriable());
    assert!(
        ProviderError::Http {
            status: 500,
            message: String::new()
        }
        .is_retriable()
    );
    assert!(
        !ProviderError::Http {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retriable()
    );
    assert!(
        !ProviderError::Http {
            status: 429,
            message: "slow down".to_string()
        }
        .is_retriable()
    );

    for message in [
        "error sending request: connection reset by peer",
        "read ECONNRESET",
        "request timed out",
        "operation timeout",
        "dns error: failed to lookup address information",
        "getaddrinfo ENOTFOUND api.example.com",
    ] {
        assert!(
            ProviderError::Transport {
                message: message.to_string()
            }
            .is_retriable(),
            "{message} should be retriable"
        );
    }

    assert!(
        !ProviderError::Transport {
            message: "invalid certificate".to_string()
        }
        .is_retriable()
    );
    assert!(
        !ProviderError::InvalidResponse {
            reason: "not json".to_string()
        }
        .is_retriable()
    );
}

#[test]
fn test_retry_policy_delays_double() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(300));
    assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(600));
    assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(1200));
}

#[test]
fn test_retry_policy_never_zero_attempts() {
    assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
}

#[tokio::test]
async fn test_embed_returns_provider_vector() {
    let provider = Arc::new(MockEmbeddingProvider::new(3).with_vector("Rust", vec![1.0, 0.0, 0.0]));
    let client = client_with(Arc::clone(&provider));

    let vector = client.embed("Rust").await.unwrap();
    assert_eq!(vector, vec![1.0, 0.0, 0.0]);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_embed_twice_hits_cache() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    let client = client_with(Arc::clone(&provider));

    let first = client.embed("distributed systems").await.unwrap();
    let second = client.embed("distributed systems").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.call_count(), 1);

    let stats = client.cache().expect("cache enabled").stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_embed_without_cache_calls_provider_each_time() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    let client = client_with(Arc::clone(&provider)).without_cache();

    let first = client.embed("text").await.unwrap();
    let second = client.embed("text").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_embed_rejects_empty_text() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    let client = client_with(Arc::clone(&provider));

    assert_eq!(client.embed("   ").await, Err(EmbeddingError::EmptyInput));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_embed_retries_transient_errors_with_backoff() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    provider.fail_next("flaky", server_error(), 2);
    let client = client_with(Arc::clone(&provider));

    let start = tokio::time::Instant::now();
    let vector = client.embed("flaky").await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(vector.len(), 3);
    assert_eq!(provider.calls_for("flaky"), 3);
    assert!(elapsed >= Duration::from_millis(900), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2100), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_embed_gives_up_after_three_attempts() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    provider.fail_always("down", server_error());
    let client = client_with(Arc::clone(&provider));

    let err = client.embed("down").await.unwrap_err();

    assert_eq!(provider.calls_for("down"), 3);
    assert!(matches!(err, EmbeddingError::Provider { attempts: 3, .. }));
    assert!(err.is_transient());
    assert!(!client.cache().unwrap().contains("down"));
}

#[tokio::test(start_paused = true)]
async fn test_embed_does_not_retry_client_errors() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    provider.fail_always(
        "bad",
        ProviderError::Http {
            status: 401,
            message: "unauthorized".to_string(),
        },
    );
    let client = client_with(Arc::clone(&provider));

    let start = tokio::time::Instant::now();
    let err = client.embed("bad").await.unwrap_err();

    assert_eq!(provider.calls_for("bad"), 1);
    assert!(start.elapsed() < Duration::from_millis(300));
    assert!(matches!(err, EmbeddingError::Provider { attempts: 1, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_embed_rejects_wrong_dimension() {
    let provider = Arc::new(MockEmbeddingProvider::new(3).with_vector("short", vec![1.0, 2.0]));
    let client = client_with(Arc::clone(&provider));

    let err = client.embed("short").await.unwrap_err();
    assert_eq!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    );
    assert!(!client.cache().unwrap().contains("short"));
}

#[tokio::test]
async fn test_batch_embed_preserves_order() {
    let provider = Arc::new(
        MockEmbeddingProvider::new(3)
            .with_vector("a", vec![1.0, 0.0, 0.0])
            .with_vector("b", vec![0.0, 1.0, 0.0])
            .with_vector("c", vec![0.0, 0.0, 1.0]),
    );
    let client = client_with(provider);

    let vectors = client.batch_embed(&["c", "a", "b"], 2).await;
    assert_eq!(
        vectors,
        vec![
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0]
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_batch_embed_returns_empty_slots_for_failures() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    provider.fail_always("broken", server_error());
    let client = client_with(Arc::clone(&provider));

    let texts = vec!["ok-1".to_string(), "broken".to_string(), "ok-2".to_string()];
    let vectors = client.batch_embed(&texts, 10).await;

    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[0].len(), 3);
    assert!(vectors[1].is_empty());
    assert_eq!(vectors[2].len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_batch_embed_bounds_concurrency() {
    let provider = Arc::new(MockEmbeddingProvider::new(3).with_latency(Duration::from_millis(100)));
    let client = client_with(Arc::clone(&provider)).without_cache();

    let texts: Vec<String> = (0..25).map(|i| format!("text-{i}")).collect();

    let start = tokio::time::Instant::now();
    let vectors = client.batch_embed(&texts, 5).await;
    let elapsed = start.elapsed();

    assert_eq!(vectors.len(), 25);
    assert!(vectors.iter().all(|v| v.len() == 3));
    assert!(provider.max_in_flight() <= 5);
    assert!(provider.max_in_flight() > 1);
    // 25 calls at 5 wide is 5 rounds, far below 25 sequential calls.
    assert!(elapsed < Duration::from_millis(1000), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn test_batch_embed_default_uses_client_concurrency() {
    let provider = Arc::new(MockEmbeddingProvider::new(3));
    let client = client_with(Arc::clone(&provider)).with_max_concurrency(1);

    let vectors = client.batch_embed_default(&["x", "y"]).await;
    assert_eq!(vectors.len(), 2);
    assert_eq!(provider.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_batches_share_client_limit() {
    let provider = Arc::new(MockEmbeddingProvider::new(3).with_latency(Duration::from_millis(50)));
    let client = client_with(Arc::clone(&provider))
        .without_cache()
        .with_max_concurrency(3);

    let first: Vec<String> = (0..8).map(|i| format!("first-{i}")).collect();
    let second: Vec<String> = (0..8).map(|i| format!("second-{i}")).collect();

    let (a, b, single) = tokio::join!(
        client.batch_embed(&first, 10),
        client.batch_embed(&second, 10),
        client.embed("single"),
    );

    assert_eq!(a.len(), 8);
    assert_eq!(b.len(), 8);
    assert!(single.is_ok());
    assert_eq!(provider.call_count(), 17);
    assert_eq!(provider.max_in_flight(), 3);
}

#[tokio::test]
async fn test_cache_does_not_change_results() {
    let cached = client_with(Arc::new(MockEmbeddingProvider::new(3)));
    let uncached = client_with(Arc::new(MockEmbeddingProvider::new(3))).without_cache();

    for text in ["alpha", "beta", "alpha"] {
        assert_eq!(
            cached.embed(text).await.unwrap(),
            uncached.embed(text).await.unwrap()
        );
    }
}
