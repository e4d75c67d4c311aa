//! Configuration schema for nz-mem0.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Root config for the mem0 memory service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Mem0Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Mem0Config {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> Mem0ConfigBuilder {
        Mem0ConfigBuilder::new()
    }

    /// Validate field constraints that serde defaults cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimension == 0 {
            return Err(ConfigError::invalid_field(
                "embedding.dimension",
                "must be non-zero",
            ));
        }
        if self.search.overfetch_factor == 0 {
            return Err(ConfigError::invalid_field(
                "search.overfetch_factor",
                "must be non-zero",
            ));
        }
        if self.search.default_limit == 0 {
            return Err(ConfigError::invalid_field(
                "search.default_limit",
                "must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Builder for assembling a `Mem0Config` in code.
#[derive(Debug, Default, Clone)]
pub struct Mem0ConfigBuilder {
    config: Mem0Config,
}

impl Mem0ConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: Mem0Config::default(),
        }
    }

    /// Replace the relational database configuration.
    pub fn database(mut self, database: DatabaseConfig) -> Self {
        self.config.database = database;
        self
    }

    /// Replace the Qdrant vector index configuration.
    pub fn qdrant(mut self, qdrant: QdrantConfig) -> Self {
        self.config.qdrant = qdrant;
        self
    }

    /// Replace the embedding configuration.
    pub fn embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.config.embedding = embedding;
        self
    }

    /// Replace the search tuning configuration.
    pub fn search(mut self, search: SearchConfig) -> Self {
        self.config.search = search;
        self
    }

    /// Replace the audit configuration.
    pub fn audit(mut self, audit: AuditConfig) -> Self {
        self.config.audit = audit;
        self
    }

    /// Finalize and return the built `Mem0Config`.
    pub fn build(self) -> Mem0Config {
        self.config
    }
}

/// SQLite-backed record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. `:memory:` keeps data in process.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "mem0.db".to_string()
}

/// Qdrant vector index configuration.
///
/// A missing `url` disables vector search entirely: store/retrieve stay
/// functional and search returns no results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_qdrant_collection")]
    pub collection: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            collection: default_qdrant_collection(),
        }
    }
}

fn default_qdrant_collection() -> String {
    "mem0_vectors".to_string()
}

/// Embedding backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model identifier. Informational: the model itself is provided by the
    /// caller behind the `Embedder` trait.
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Vector dimension, fixed per deployment.
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
        }
    }
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_embedding_dimension() -> usize {
    384
}

/// Search tuning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result limit used when a caller does not supply one.
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    /// Over-fetch multiplier applied before session filtering so that
    /// cross-session hits do not starve the caller's requested limit.
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            overfetch_factor: default_overfetch_factor(),
        }
    }
}

fn default_search_limit() -> usize {
    10
}

fn default_overfetch_factor() -> usize {
    4
}

/// Audit logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
        }
    }
}

fn default_audit_enabled() -> bool {
    true
}
