//! Embedding encoders
//!
//! The [`EmbeddingEncoder`] trait turns text into a fixed-length vector.
//! Production deployments plug in a model-backed encoder; [`HashingEncoder`]
//! is a deterministic, model-free stand-in built on feature hashing.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::{VectorError, VectorResult};

/// Text to fixed-length vector.
///
/// Implementations must be deterministic: the same text always encodes to
/// the same vector, and every vector has length [`dimension`](Self::dimension).
#[async_trait]
pub trait EmbeddingEncoder: Send + Sync {
    /// Length of every vector this encoder produces.
    fn dimension(&self) -> usize;

    /// Encode `text` into a vector.
    async fn encode(&self, text: &str) -> VectorResult<Vec<f32>>;
}

/// Feature-hashing encoder.
///
/// Each lowercase alphanumeric token is hashed with SHA-256; the first eight
/// bytes pick a bucket and one further bit picks the sign. The bucket counts
/// are then L2-normalized, so texts that share vocabulary tend to have a high
/// cosine similarity. Text without tokens encodes to the zero vector.
///
/// # Example
///
/// ```rust,no_run
/// use storefront_vector::{EmbeddingEncoder, HashingEncoder};
///
/// async fn example() {
///     let encoder = HashingEncoder::new(64);
///     let a = encoder.encode("gaming laptop").await.unwrap();
///     let b = encoder.encode("Gaming  LAPTOP!").await.unwrap();
///     assert_eq!(a, b);
///     assert_eq!(a.len(), 64);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    /// Create an encoder producing vectors of `dimension` values.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn encode_sync(&self, text: &str) -> VectorResult<Vec<f32>> {
        if self.dimension == 0 {
            return Err(VectorError::Encoder("dimension must be greater than zero".to_string()));
        }

        let mut values = vec![0.0f32; self.dimension];
        for token in Self::tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            values[bucket] += sign;
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }
        Ok(values)
    }
}

#[async_trait]
impl EmbeddingEncoder for HashingEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn encode(&self, text: &str) -> VectorResult<Vec<f32>> {
        self.encode_sync(text)
    }
}
