use std::sync::Arc;

use super::error::ProviderError;

/// Remote (or local) model that turns text into a fixed-dimension vector.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds one text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, ProviderError>> + Send;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str {
        "unknown"
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for Arc<P> {
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, ProviderError>> + Send {
        (**self).embed(text)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
