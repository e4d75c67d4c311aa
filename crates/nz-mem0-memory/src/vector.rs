//! Vector index contract and adapters.
//!
//! The index is a derived projection of the record store: entries point back
//! at `(session_id, key)` and are never treated as authoritative content.

use crate::error::MemoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

/// Derive the numeric index id for a logical record.
///
/// First eight bytes of `sha256("session_id:key")` as a big-endian `u64`.
/// The full 64-bit space keeps accidental collisions between unrelated
/// records statistically negligible.
pub fn vector_entry_id(session_id: &str, key: &str) -> u64 {
    let digest = Sha256::digest(format!("{session_id}:{key}").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Denormalized pointer fields stored next to a vector.
///
/// Used for pre-filtering only; content is always re-fetched from the
/// record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorPayload {
    /// Owning session.
    pub session_id: String,
    /// Record key within the session.
    pub key: String,
    /// Write timestamp of the projected record.
    pub timestamp: DateTime<Utc>,
}

/// Single nearest-neighbor hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Index entry id.
    pub id: u64,
    /// Similarity score, higher is closer.
    pub score: f32,
    /// Pointer payload stored with the vector.
    pub payload: VectorPayload,
}

/// Nearest-neighbor index over `(id, vector, payload)` triples.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Make sure the backing collection exists. Failures are swallowed:
    /// the index may come up after this service, and degraded mode is
    /// "vector search unavailable", not a crash.
    async fn ensure_collection(&self, dimension: usize);

    /// Insert or replace the entry for `id`.
    async fn upsert(
        &self,
        id: u64,
        vector: &[f32],
        payload: &VectorPayload,
    ) -> Result<(), MemoryError>;

    /// Return up to `limit` hits ordered by descending similarity.
    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, MemoryError>;

    /// Best-effort removal. A missing id or an unreachable index is a no-op;
    /// the record store remains authoritative either way.
    async fn delete(&self, id: u64);
}

/// Qdrant adapter speaking the REST API.
pub struct QdrantIndex {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

impl QdrantIndex {
    /// Create an adapter for the given endpoint and collection.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        collection: impl Into<String>,
    ) -> Self {
        let base_url = url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            collection: collection.into(),
        }
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(api_key) => builder.header("api-key", api_key),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, MemoryError> {
        self.request(builder)
            .json(&body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| MemoryError::Index(err.to_string()))
    }
}

/// Raw search response shape from the Qdrant REST API.
#[derive(Debug, Deserialize)]
struct QdrantSearchResponse {
    #[serde(default)]
    result: Vec<QdrantScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct QdrantScoredPoint {
    id: u64,
    score: f32,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, dimension: usize) {
        let body = json!({
            "vectors": { "size": dimension, "distance": "Cosine" }
        });
        let result = self
            .send(self.client.put(self.collection_url("")), body)
            .await;
        match result {
            Ok(_) => debug!(
                "vector collection ready (collection={}, dimension={})",
                self.collection, dimension
            ),
            // The collection may already exist or the backend may not be
            // provisioned yet; either way the service stays up.
            Err(err) => warn!(
                "vector collection setup skipped (collection={}, error={})",
                self.collection, err
            ),
        }
    }

    async fn upsert(
        &self,
        id: u64,
        vector: &[f32],
        payload: &VectorPayload,
    ) -> Result<(), MemoryError> {
        let body = json!({
            "points": [{
                "id": id,
                "vector": vector,
                "payload": payload,
            }]
        });
        self.send(
            self.client.put(self.collection_url("/points?wait=true")),
            body,
        )
        .await?;
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>, MemoryError> {
        let body = json!({
            "vector": query,
            "limit": limit,
            "with_payload": true,
        });
        let response = self
            .send(self.client.post(self.collection_url("/points/search")), body)
            .await?;
        let response: QdrantSearchResponse = response
            .json()
            .await
            .map_err(|err| MemoryError::Index(err.to_string()))?;

        let mut hits = Vec::with_capacity(response.result.len());
        for point in response.result {
            let Some(raw_payload) = point.payload else {
                continue;
            };
            match serde_json::from_value::<VectorPayload>(raw_payload) {
                Ok(payload) => hits.push(SearchHit {
                    id: point.id,
                    score: point.score,
                    payload,
                }),
                Err(err) => {
                    warn!(
                        "skipping hit with undecodable payload (id={}, error={})",
                        point.id, err
                    );
                }
            }
        }
        Ok(hits)
    }

    async fn delete(&self, id: u64) {
        let body = json!({ "points": [id] });
        if let Err(err) = self
            .send(
                self.client.post(self.collection_url("/points/delete?wait=true")),
                body,
            )
            .await
        {
            warn!(
                "vector delete failed, leaving stale entry (id={}, error={})",
                id, err
            );
        }
    }
}

/// Adapter used when no vector backend is configured.
///
/// Writes and deletes are accepted and dropped; search always returns
/// nothing. This is the documented degraded mode.
#[derive(Debug, Clone, Default)]
pub struct DisabledIndex;

#[async_trait]
impl VectorIndex for DisabledIndex {
    async fn ensure_collection(&self, _dimension: usize) {
        debug!("vector index disabled, search will return no results");
    }

    async fn upsert(
        &self,
        _id: u64,
        _vector: &[f32],
        _payload: &VectorPayload,
    ) -> Result<(), MemoryError> {
        Ok(())
    }

    async fn search(&self, _query: &[f32], _limit: usize) -> Result<Vec<SearchHit>, MemoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: u64) {}
}
