//! Environment variable loading for `Mem0Config`.

use crate::{ConfigError, Mem0Config};
use log::debug;

/// Environment variable naming, matching the deployed service.
const ENV_DATABASE_PATH: &str = "MEM0_DATABASE_PATH";
const ENV_QDRANT_URL: &str = "MEM0_QDRANT_URL";
const ENV_QDRANT_API_KEY: &str = "MEM0_QDRANT_API_KEY";
const ENV_QDRANT_COLLECTION: &str = "MEM0_QDRANT_COLLECTION";
const ENV_EMBEDDING_MODEL: &str = "MEM0_EMBEDDING_MODEL";
const ENV_EMBEDDING_DIMENSION: &str = "MEM0_EMBEDDING_DIMENSION";
const ENV_SEARCH_LIMIT: &str = "MEM0_SEARCH_LIMIT";
const ENV_AUDIT_ENABLED: &str = "MEM0_AUDIT_ENABLED";

impl Mem0Config {
    /// Load config from process environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load config from an arbitrary variable lookup over the defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Mem0Config::default();
        if let Some(path) = non_blank(lookup(ENV_DATABASE_PATH)) {
            config.database.path = path;
        }
        config.qdrant.url = non_blank(lookup(ENV_QDRANT_URL));
        config.qdrant.api_key = non_blank(lookup(ENV_QDRANT_API_KEY));
        if let Some(collection) = non_blank(lookup(ENV_QDRANT_COLLECTION)) {
            config.qdrant.collection = collection;
        }
        if let Some(model) = non_blank(lookup(ENV_EMBEDDING_MODEL)) {
            config.embedding.model = model;
        }
        if let Some(dimension) = non_blank(lookup(ENV_EMBEDDING_DIMENSION)) {
            config.embedding.dimension = parse_usize(ENV_EMBEDDING_DIMENSION, &dimension)?;
        }
        if let Some(limit) = non_blank(lookup(ENV_SEARCH_LIMIT)) {
            config.search.default_limit = parse_usize(ENV_SEARCH_LIMIT, &limit)?;
        }
        if let Some(enabled) = non_blank(lookup(ENV_AUDIT_ENABLED)) {
            config.audit.enabled = parse_bool(ENV_AUDIT_ENABLED, &enabled)?;
        }
        config.validate()?;
        debug!(
            "loaded mem0 config (database={}, qdrant={}, dimension={})",
            config.database.path,
            config.qdrant.url.as_deref().unwrap_or("disabled"),
            config.embedding.dimension
        );
        Ok(config)
    }
}

/// Treat empty and whitespace-only values as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_usize(name: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_field(name, format!("not a number: {value}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::invalid_field(
            name,
            format!("not a boolean: {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::Mem0Config;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn loads_overrides() {
        let config = Mem0Config::from_lookup(lookup_from(&[
            ("MEM0_DATABASE_PATH", "/data/mem0.db"),
            ("MEM0_QDRANT_URL", "http://qdrant:6333"),
            ("MEM0_QDRANT_COLLECTION", "memories"),
            ("MEM0_EMBEDDING_DIMENSION", "768"),
            ("MEM0_AUDIT_ENABLED", "false"),
        ]))
        .expect("config");

        assert_eq!(config.database.path, "/data/mem0.db");
        assert_eq!(config.qdrant.url.as_deref(), Some("http://qdrant:6333"));
        assert_eq!(config.qdrant.collection, "memories");
        assert_eq!(config.embedding.dimension, 768);
        assert!(!config.audit.enabled);
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = Mem0Config::from_lookup(|_| None).expect("config");
        assert_eq!(config.database.path, "mem0.db");
        assert_eq!(config.qdrant.url, None);
        assert_eq!(config.embedding.dimension, 384);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            Mem0Config::from_lookup(lookup_from(&[("MEM0_QDRANT_URL", "  ")])).expect("config");
        assert_eq!(config.qdrant.url, None);
    }

    #[test]
    fn invalid_dimension_is_rejected() {
        let err = Mem0Config::from_lookup(lookup_from(&[(
            "MEM0_EMBEDDING_DIMENSION",
            "not-a-number",
        )]))
        .expect_err("invalid dimension");
        assert!(err.to_string().contains("MEM0_EMBEDDING_DIMENSION"));
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let err = Mem0Config::from_lookup(lookup_from(&[("MEM0_AUDIT_ENABLED", "maybe")]))
            .expect_err("invalid bool");
        assert!(err.to_string().contains("MEM0_AUDIT_ENABLED"));
    }
}
