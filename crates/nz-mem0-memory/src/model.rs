//! Record models returned by the memory store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Receipt returned by a successful store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreReceipt {
    /// Logical composite id, `session_id:key`.
    pub id: String,
    /// Session the record belongs to.
    pub session_id: String,
    /// Record key.
    pub key: String,
    /// Write timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Record view returned by retrieve and recent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedRecord {
    /// Record key.
    pub key: String,
    /// Deserialized value.
    pub value: serde_json::Value,
    /// Last update timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Record annotated with its similarity score, returned by search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecord {
    /// Record key.
    pub key: String,
    /// Deserialized value, rehydrated from the record store.
    pub value: serde_json::Value,
    /// Last update timestamp.
    pub timestamp: DateTime<Utc>,
    /// Similarity score reported by the vector index.
    pub score: f32,
}
