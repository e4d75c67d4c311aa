use async_trait::async_trait;
use nz_mem0_memory::{Embedder, MemoryError};

/// Deterministic embedder for tests.
///
/// Maps a text to a small vector derived from its byte sum, so distinct
/// inputs usually get distinct directions without any model in the loop.
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let seed: u32 = text.bytes().map(u32::from).sum();
        Ok((0..self.dimension)
            .map(|i| ((seed.wrapping_add(i as u32 * 31)) % 97) as f32 / 97.0)
            .collect())
    }
}
