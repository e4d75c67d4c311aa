//! Session-scoped memory store combining SQL persistence and vector search.
//!
//! The relational record store is the source of truth; the vector index is a
//! derived, best-effort projection used only for similarity lookups.

pub mod embedding;
pub mod error;
pub mod model;
pub mod record;
pub mod store;
pub mod vector;

/// Memory error type.
pub use error::MemoryError;
/// Embedding backend and the model seam.
pub use embedding::{Embedder, EmbeddingBackend, HashEmbedder};
/// Record and result models.
pub use model::{RetrievedRecord, ScoredRecord, StoreReceipt};
/// SQLite-backed record store.
pub use record::RecordStore;
/// Orchestration core.
pub use store::MemoryStore;
/// Vector index contract and adapters.
pub use vector::{DisabledIndex, QdrantIndex, SearchHit, VectorIndex, VectorPayload, vector_entry_id};
