//! Public SDK surface for nz-mem0.
//!
//! This crate re-exports the building blocks and provides bootstrap helpers
//! that wire a [`MemoryStore`] and [`ToolDispatcher`] from a [`Mem0Config`],
//! keeping consumer setup consistent.

use std::sync::Arc;

use log::info;
use nz_mem0_config::{ConfigError, Mem0Config};
use nz_mem0_memory::{
    DisabledIndex, Embedder, EmbeddingBackend, MemoryError, MemoryStore, QdrantIndex, RecordStore,
    VectorIndex,
};
use nz_mem0_tools::{AuditLog, ToolDispatcher};
use thiserror::Error;

/// Re-export for convenience.
pub use nz_mem0_config as config;
/// Re-export for convenience.
pub use nz_mem0_memory as memory;
/// Re-export for convenience.
pub use nz_mem0_tools as tools;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Failure while assembling the memory service from configuration.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("memory backend setup failed: {0}")]
    Memory(#[from] MemoryError),
}

/// Assemble a [`MemoryStore`] from configuration with hash-only embeddings.
///
/// The record store is opened (and its schema applied) eagerly; a missing
/// Qdrant URL selects the disabled index, where search returns no results
/// but store/retrieve stay fully functional.
pub async fn bootstrap(config: &Mem0Config) -> Result<MemoryStore, BootstrapError> {
    bootstrap_with_model(config, None).await
}

/// Assemble a [`MemoryStore`], optionally placing a real embedding model in
/// front of the hash fallback.
pub async fn bootstrap_with_model(
    config: &Mem0Config,
    model: Option<Arc<dyn Embedder>>,
) -> Result<MemoryStore, BootstrapError> {
    config.validate()?;

    let records = Arc::new(RecordStore::open(&config.database.path)?);
    let embeddings = match model {
        Some(model) => EmbeddingBackend::with_model(model),
        None => EmbeddingBackend::hash_only(config.embedding.dimension),
    };

    let index: Arc<dyn VectorIndex> = match &config.qdrant.url {
        Some(url) => Arc::new(QdrantIndex::new(
            url.clone(),
            config.qdrant.api_key.clone(),
            config.qdrant.collection.clone(),
        )),
        None => Arc::new(DisabledIndex),
    };
    index.ensure_collection(embeddings.dimension()).await;

    info!(
        "memory service ready (database={}, vector_index={}, dimension={})",
        config.database.path,
        if config.qdrant.url.is_some() {
            "qdrant"
        } else {
            "disabled"
        },
        embeddings.dimension()
    );

    Ok(MemoryStore::new(records, index, embeddings)
        .with_overfetch_factor(config.search.overfetch_factor))
}

/// Assemble a [`ToolDispatcher`] from configuration: a bootstrapped store
/// plus the audit sink and search defaults the config names.
pub async fn bootstrap_dispatcher(config: &Mem0Config) -> Result<ToolDispatcher, BootstrapError> {
    let store = bootstrap(config).await?;
    let audit = AuditLog::new(config.audit.enabled);
    Ok(ToolDispatcher::new(Arc::new(store), audit)
        .with_default_search_limit(config.search.default_limit))
}

#[cfg(test)]
mod tests {
    use super::{BootstrapError, bootstrap};
    use nz_mem0_config::{EmbeddingConfig, Mem0Config};

    #[tokio::test]
    async fn bootstrap_rejects_invalid_config() {
        let config = Mem0Config::builder()
            .embedding(EmbeddingConfig {
                model: "test".to_string(),
                dimension: 0,
            })
            .build();
        let err = bootstrap(&config).await.expect_err("invalid dimension");
        assert!(matches!(err, BootstrapError::Config(_)));
    }
}
