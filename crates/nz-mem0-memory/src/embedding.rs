//! Embedding generation with a deterministic hash fallback.
//!
//! The real model lives behind the [`Embedder`] trait; deployments without a
//! model degrade to [`HashEmbedder`], which carries no semantics but keeps
//! previously stored vectors searchable because it is a pure function of the
//! input text.

use crate::error::MemoryError;
use async_trait::async_trait;
use log::warn;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Interface for turning text into a fixed-dimension vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimension of vectors produced by this embedder.
    fn dimension(&self) -> usize;
    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
    /// Encode a single text into a vector of `dimension()` elements.
    async fn encode(&self, text: &str) -> Result<Vec<f32>, MemoryError>;
}

/// Deterministic fallback embedder based on SHA-256.
///
/// The digest bytes are tiled out to the configured dimension and each byte
/// is mapped into `[-1, 1]`. Identical text always yields an identical
/// vector; different texts diverge with overwhelming probability.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create a fallback embedder with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Compute the fallback vector synchronously.
    pub fn encode_text(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        (0..self.dimension)
            .map(|i| {
                let byte = digest[i % digest.len()];
                (f32::from(byte) / 255.0) * 2.0 - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hash-fallback"
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        if self.dimension == 0 {
            return Err(MemoryError::Embedding(
                "embedding dimension must be non-zero".to_string(),
            ));
        }
        Ok(self.encode_text(text))
    }
}

/// Embedding backend composing an optional model with the hash fallback.
#[derive(Clone)]
pub struct EmbeddingBackend {
    primary: Option<Arc<dyn Embedder>>,
    fallback: HashEmbedder,
}

impl EmbeddingBackend {
    /// Backend with no model: every encode uses the hash fallback.
    pub fn hash_only(dimension: usize) -> Self {
        Self {
            primary: None,
            fallback: HashEmbedder::new(dimension),
        }
    }

    /// Backend delegating to a model, with the fallback sized to match it
    /// so stored vectors keep a single dimension per deployment.
    pub fn with_model(model: Arc<dyn Embedder>) -> Self {
        let fallback = HashEmbedder::new(model.dimension());
        Self {
            primary: Some(model),
            fallback,
        }
    }

    /// Vector dimension for this deployment.
    pub fn dimension(&self) -> usize {
        self.fallback.dimension
    }

    /// Encode text, preferring the model and degrading to the fallback.
    pub async fn encode(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        if let Some(model) = &self.primary {
            match model.encode(text).await {
                Ok(vector) => return Ok(vector),
                Err(err) => {
                    warn!(
                        "embedding model failed, using hash fallback (model={}, error={})",
                        model.model_name(),
                        err
                    );
                }
            }
        }
        self.fallback.encode(text).await
    }
}
