//! Embedding generation for similarity search.
//!
//! [`Embedder`] is the seam a real embedding model plugs into. The bundled
//! [`HashEmbedder`] is a deterministic bag-of-words stand-in: it captures
//! lexical overlap only, not meaning.

use async_trait::async_trait;
use postwright_common::PostwrightError;
use thiserror::Error;
use tracing::{debug, instrument};

/// Dimension of the hash embedding (matches all-MiniLM-L6-v2).
pub const DEFAULT_DIMENSION: usize = 384;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Failed to generate embedding: {0}")]
    Generation(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

impl From<EmbeddingError> for PostwrightError {
    fn from(e: EmbeddingError) -> Self {
        PostwrightError::Memory(e.to_string())
    }
}

/// Turns text into a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model or scheme name, for logs.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Hashed bag-of-words embedding.
///
/// Tokens are split on whitespace and lower-cased; each token increments one
/// bucket chosen by a 32-bit rolling hash over its UTF-16 code units. The
/// counts are then L2-normalised. Empty text yields the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Synchronous form of [`Embedder::embed`]; hashing never fails.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let bucket = token_hash(&token) as usize % self.dimension;
            vector[bucket] += 1.0;
        }
        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hashed-bag-of-words"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let vector = self.embed_text(text);
        debug!(dimension = vector.len(), "Generated hash embedding");
        Ok(vector)
    }
}

/// `h = h * 31 + unit` in wrapping 32-bit signed arithmetic, then |h|.
fn token_hash(token: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in token.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// Scale `vector` to unit length in place. The zero vector is left as is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity of two vectors.
///
/// Empty, zero-norm or mismatched-length inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)) as f32
}
