//! Error types for memory operations.

/// Errors returned by the memory store and its backing components.
///
/// Record store and serialization failures are fatal to the enclosing
/// operation; index failures are isolated by the orchestration layer so a
/// vector outage never blocks writes or relational reads.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Authoritative record store failure.
    #[error("record store error: {0}")]
    Store(#[from] rusqlite::Error),
    /// Value or payload serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Derived vector index failure.
    #[error("vector index error: {0}")]
    Index(String),
    /// Embedding generation failure.
    #[error("embedding error: {0}")]
    Embedding(String),
}
