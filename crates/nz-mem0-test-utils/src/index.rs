use async_trait::async_trait;
use nz_mem0_memory::{MemoryError, SearchHit, VectorIndex, VectorPayload};
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory vector index with brute-force cosine search.
#[derive(Default)]
pub struct StubIndex {
    entries: Mutex<HashMap<u64, (Vec<f32>, VectorPayload)>>,
}

impl StubIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Payloads of all entries, for assertions.
    pub fn payloads(&self) -> Vec<VectorPayload> {
        self.entries
            .lock()
            .values()
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn ensure_collection(&self, _dimension: usize) {}

    async fn upsert(
        &self,
        id: u64,
        vector: &[f32],
        payload: &VectorPayload,
    ) -> Result<(), MemoryError> {
        self.entries
            .lock()
            .insert(id, (vector.to_vec(), payload.clone()));
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, MemoryError> {
        let mut hits: Vec<SearchHit> = self
            .entries
            .lock()
            .iter()
            .map(|(id, (vector, payload))| SearchHit {
                id: *id,
                score: cosine(query, vector),
                payload: payload.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn delete(&self, id: u64) {
        self.entries.lock().remove(&id);
    }
}

/// Index that fails every call, simulating a backend outage.
#[derive(Debug, Clone, Default)]
pub struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn ensure_collection(&self, _dimension: usize) {}

    async fn upsert(
        &self,
        _id: u64,
        _vector: &[f32],
        _payload: &VectorPayload,
    ) -> Result<(), MemoryError> {
        Err(MemoryError::Index("index offline".to_string()))
    }

    async fn search(&self, _query: &[f32], _limit: usize) -> Result<Vec<SearchHit>, MemoryError> {
        Err(MemoryError::Index("index offline".to_string()))
    }

    async fn delete(&self, _id: u64) {}
}
