use super::error::EmbeddingError;

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Returns [`EmbeddingError::DimensionMismatch`] when lengths differ. Identical
/// non-zero vectors give exactly `1.0`, orthogonal vectors `0.0`, and a zero
/// vector gives `NaN` (callers filter non-finite results).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    // sqrt(n * n) == n exactly, so v·v / sqrt(|v|² |v|²) is exactly 1.0.
    Ok((dot / (norm_a * norm_b).sqrt()) as f32)
}
