//! Scriptable in-memory provider for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::error::ProviderError;
use super::provider::EmbeddingProvider;
use crate::hashing::hash_text;

/// Provider returning fixed vectors per text, with injectable failures and latency.
///
/// Texts without a registered vector get a deterministic pseudo-random
/// vector derived from the text hash.
pub struct MockEmbeddingProvider {
    dim: usize,
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    scripted_failures: Mutex<HashMap<String, VecDeque<ProviderError>>>,
    permanent_failures: Mutex<HashMap<String, ProviderError>>,
    latency: Option<Duration>,
    calls: AtomicUsize,
    calls_by_text: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Mutex::new(HashMap::new()),
            scripted_failures: Mutex::new(HashMap::new()),
            permanent_failures: Mutex::new(HashMap::new()),
            latency: None,
            calls: AtomicUsize::new(0),
            calls_by_text: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Each call sleeps `latency` (tokio time) before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.set_vector(text, vector);
        self
    }

    pub fn set_vector(&self, text: &str, vector: Vec<f32>) {
        self.vectors.lock().insert(text.to_string(), vector);
    }

    /// The next `times` calls for `text` fail with `error`, then calls succeed.
    pub fn fail_next(&self, text: &str, error: ProviderError, times: usize) {
        let mut failures = self.scripted_failures.lock();
        let queue = failures.entry(text.to_string()).or_default();
        queue.extend(std::iter::repeat_n(error, times));
    }

    /// Every call for `text` fails with `error`.
    pub fn fail_always(&self, text: &str, error: ProviderError) {
        self.permanent_failures
            .lock()
            .insert(text.to_string(), error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls_by_text.lock().get(text).copied().unwrap_or(0)
    }

    /// Highest number of concurrent `embed` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if let Some(err) = self.permanent_failures.lock().get(text) {
            return Err(err.clone());
        }

        if let Some(err) = self
            .scripted_failures
            .lock()
            .get_mut(text)
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }

        if let Some(vector) = self.vectors.lock().get(text) {
            return Ok(vector.clone());
        }

        Ok(hashed_vector(text, self.dim))
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_text
            .lock()
            .entry(text.to_string())
            .or_insert(0) += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let result = self.respond(text);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Deterministic vector in `[-1, 1]^dim` derived from the text hash.
pub fn hashed_vector(text: &str, dim: usize) -> Vec<f32> {
    let hash = hash_text(text);
    (0..dim)
        .map(|i| {
            let byte = hash[i % hash.len()] ^ ((i / hash.len()) as u8).wrapping_mul(31);
            (f32::from(byte) / 127.5) - 1.0
        })
        .collect()
}
