//! Orchestration core combining the record store, vector index, and
//! embedding backend behind one consistent API.
//!
//! Write ordering is fixed: the record store is written first and its
//! failure aborts the operation; the vector index write is best-effort.
//! The two writes are never wrapped in one transaction — the index is a
//! rebuildable projection, reconciled via [`MemoryStore::rebuild_index`].

use crate::embedding::EmbeddingBackend;
use crate::error::MemoryError;
use crate::model::{RetrievedRecord, ScoredRecord, StoreReceipt};
use crate::record::RecordStore;
use crate::vector::{VectorIndex, VectorPayload, vector_entry_id};
use log::{debug, info, warn};
use std::sync::Arc;

/// Over-fetch multiplier applied before session filtering.
const DEFAULT_OVERFETCH_FACTOR: usize = 4;

/// Session-scoped memory store.
///
/// One instance is built at process start and shared by request handlers;
/// all methods take `&self` and are safe for concurrent use.
pub struct MemoryStore {
    records: Arc<RecordStore>,
    index: Arc<dyn VectorIndex>,
    embeddings: EmbeddingBackend,
    overfetch_factor: usize,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("overfetch_factor", &self.overfetch_factor)
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Compose a store from its three backing components.
    pub fn new(
        records: Arc<RecordStore>,
        index: Arc<dyn VectorIndex>,
        embeddings: EmbeddingBackend,
    ) -> Self {
        Self {
            records,
            index,
            embeddings,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
        }
    }

    /// Override the search over-fetch multiplier.
    pub fn with_overfetch_factor(mut self, factor: usize) -> Self {
        self.overfetch_factor = factor.max(1);
        self
    }

    /// Store a value under `(session_id, key)`, overwriting any prior value.
    ///
    /// The record store write is authoritative and fatal on failure. The
    /// subsequent index upsert is tolerated on failure: the record is
    /// durable, just not searchable until the index recovers.
    pub async fn store(
        &self,
        session_id: &str,
        key: &str,
        value: &serde_json::Value,
        embed: Option<Vec<f32>>,
    ) -> Result<StoreReceipt, MemoryError> {
        let value_json = serde_json::to_string(value)?;
        let vector = match embed {
            Some(vector) => vector,
            None => self.embeddings.encode(&value_json).await?,
        };
        let embedding_json = serde_json::to_string(&vector)?;

        let stamps = self
            .records
            .put(session_id, key, &value_json, Some(&embedding_json))?;

        let payload = VectorPayload {
            session_id: session_id.to_string(),
            key: key.to_string(),
            timestamp: stamps.updated_at,
        };
        let entry_id = vector_entry_id(session_id, key);
        if let Err(err) = self.index.upsert(entry_id, &vector, &payload).await {
            warn!(
                "vector upsert failed, record stored but not searchable (session_id={}, key={}, error={})",
                session_id, key, err
            );
        }

        debug!("stored memory (session_id={}, key={})", session_id, key);
        Ok(StoreReceipt {
            id: format!("{session_id}:{key}"),
            session_id: session_id.to_string(),
            key: key.to_string(),
            timestamp: stamps.updated_at,
        })
    }

    /// Fetch a record by key, or `None` if absent.
    ///
    /// A stored JSON `null` comes back as `Some` with a null value, distinct
    /// from a missing record.
    pub async fn retrieve(
        &self,
        session_id: &str,
        key: &str,
    ) -> Result<Option<RetrievedRecord>, MemoryError> {
        let Some(row) = self.records.get(session_id, key)? else {
            return Ok(None);
        };
        Ok(Some(RetrievedRecord {
            key: row.key,
            value: serde_json::from_str(&row.value)?,
            timestamp: row.updated_at,
        }))
    }

    /// Similarity search scoped to one session.
    ///
    /// The index is over-queried beyond `limit` so cross-session hits cannot
    /// starve the caller; surviving hits are rehydrated from the record
    /// store in score order, dropping entries whose record no longer exists.
    /// An index outage degrades to an empty result rather than an error.
    pub async fn search(
        &self,
        session_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, MemoryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query_vector = self.embeddings.encode(query).await?;
        let fetch = limit.saturating_mul(self.overfetch_factor);
        let hits = match self.index.search(&query_vector, fetch).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(
                    "vector search unavailable, returning no results (session_id={}, error={})",
                    session_id, err
                );
                return Ok(Vec::new());
            }
        };

        let mut results = Vec::new();
        for hit in hits {
            // Cross-session leakage through the shared index is the primary
            // correctness risk; filter before touching record content.
            if hit.payload.session_id != session_id {
                continue;
            }
            let Some(row) = self.records.get(session_id, &hit.payload.key)? else {
                // Stale index entry; tolerated, repaired only by rebuild.
                continue;
            };
            results.push(ScoredRecord {
                key: row.key,
                value: serde_json::from_str(&row.value)?,
                timestamp: row.updated_at,
                score: hit.score,
            });
            if results.len() == limit {
                break;
            }
        }
        debug!(
            "search complete (session_id={}, returned={})",
            session_id,
            results.len()
        );
        Ok(results)
    }

    /// List a session's records, newest first.
    pub async fn recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedRecord>, MemoryError> {
        let rows = self.records.list_recent(session_id, limit)?;
        rows.into_iter()
            .map(|row| {
                Ok(RetrievedRecord {
                    key: row.key,
                    value: serde_json::from_str(&row.value)?,
                    timestamp: row.updated_at,
                })
            })
            .collect()
    }

    /// Delete a record, reporting whether it existed.
    ///
    /// The relational deletion is the success criterion; the index entry is
    /// removed best-effort afterwards and never touched when the record was
    /// already absent.
    pub async fn delete(&self, session_id: &str, key: &str) -> Result<bool, MemoryError> {
        if !self.records.delete(session_id, key)? {
            return Ok(false);
        }
        self.index.delete(vector_entry_id(session_id, key)).await;
        debug!("deleted memory (session_id={}, key={})", session_id, key);
        Ok(true)
    }

    /// Rebuild the vector index from the record store.
    ///
    /// Rescans the authoritative rows, re-embeds each value, and re-upserts
    /// its entry. This is the explicit repair path for the accepted
    /// dual-write gap; index failures here do propagate, since a repair
    /// that cannot reach the index has failed.
    pub async fn rebuild_index(&self, session_id: Option<&str>) -> Result<usize, MemoryError> {
        self.index
            .ensure_collection(self.embeddings.dimension())
            .await;
        let rows = self.records.scan(session_id)?;
        let mut rebuilt = 0;
        for row in rows {
            let vector = self.embeddings.encode(&row.value).await?;
            let payload = VectorPayload {
                session_id: row.session_id.clone(),
                key: row.key.clone(),
                timestamp: row.updated_at,
            };
            self.index
                .upsert(vector_entry_id(&row.session_id, &row.key), &vector, &payload)
                .await?;
            rebuilt += 1;
        }
        info!(
            "vector index rebuilt (session_id={}, entries={})",
            session_id.unwrap_or("*"),
            rebuilt
        );
        Ok(rebuilt)
    }
}
