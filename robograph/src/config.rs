// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Bulk ingestion configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::ingest::TableKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// How the error-tolerance flag of a bulk copy is chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TolerancePolicy {
    /// Tolerant iff the table is declared by the base schema
    #[default]
    BaseSchemaShared,
    /// Every copy fails on the first bad row
    AlwaysStrict,
    /// Every copy skips bad rows
    AlwaysTolerant,
}

impl TolerancePolicy {
    pub fn tolerate_errors(&self, is_shared: bool) -> bool {
        match self {
            TolerancePolicy::BaseSchemaShared => is_shared,
            TolerancePolicy::AlwaysStrict => false,
            TolerancePolicy::AlwaysTolerant => true,
        }
    }
}

/// Settings for the bulk ingestion engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestionConfig {
    /// Query timeout restored after each bulk copy
    pub default_query_timeout_ms: u64,

    /// Query timeout in effect during a bulk copy
    pub bulk_copy_timeout_ms: u64,

    /// Node loads slower than this per row log a performance warning
    pub node_ms_per_row_threshold: f64,

    /// Relationship loads slower than this per row log a performance warning
    pub relationship_ms_per_row_threshold: f64,

    pub tolerance: TolerancePolicy,

    /// Skip DDL for tables already ensured earlier in the same run
    pub cache_ddl_per_run: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            default_query_timeout_ms: 120_000,
            bulk_copy_timeout_ms: 1_800_000,
            node_ms_per_row_threshold: 0.5,
            relationship_ms_per_row_threshold: 2.0,
            tolerance: TolerancePolicy::BaseSchemaShared,
            cache_ddl_per_run: true,
        }
    }
}

impl IngestionConfig {
    /// Every copy fails on the first bad row
    pub fn strict() -> Self {
        Self {
            tolerance: TolerancePolicy::AlwaysStrict,
            ..Self::default()
        }
    }

    /// Every copy skips bad rows
    pub fn tolerant() -> Self {
        Self {
            tolerance: TolerancePolicy::AlwaysTolerant,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: TolerancePolicy) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn ms_per_row_threshold(&self, kind: TableKind) -> f64 {
        match kind {
            TableKind::Node => self.node_ms_per_row_threshold,
            TableKind::Relationship => self.relationship_ms_per_row_threshold,
        }
    }

    /// Load from a `.json`, `.yaml` or `.yml` file; absent fields keep defaults
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(serde_json::from_str(&text)?),
            "yaml" | "yml" => Ok(serde_yaml::from_str(&text)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = IngestionConfig::default();
        assert_eq!(config.tolerance, TolerancePolicy::BaseSchemaShared);
        assert!(config.tolerance.tolerate_errors(true));
        assert!(!config.tolerance.tolerate_errors(false));
        assert_eq!(config.ms_per_row_threshold(TableKind::Node), 0.5);
        assert_eq!(config.ms_per_row_threshold(TableKind::Relationship), 2.0);
    }

    #[test]
    fn test_presets() {
        assert!(!IngestionConfig::strict().tolerance.tolerate_errors(true));
        assert!(IngestionConfig::tolerant().tolerance.tolerate_errors(false));
    }

    #[test]
    fn test_from_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingest.yaml");
        std::fs::write(&path, "bulk_copy_timeout_ms: 600000\ntolerance: always_strict\n").unwrap();

        let config = IngestionConfig::from_path(&path).unwrap();
        assert_eq!(config.bulk_copy_timeout_ms, 600_000);
        assert_eq!(config.tolerance, TolerancePolicy::AlwaysStrict);
        assert_eq!(config.default_query_timeout_ms, 120_000);
    }

    #[test]
    fn test_from_json_and_unknown_format() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("ingest.json");
        std::fs::write(&json, r#"{"cache_ddl_per_run": false}"#).unwrap();
        assert!(!IngestionConfig::from_path(&json).unwrap().cache_ddl_per_run);

        let toml = dir.path().join("ingest.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(matches!(
            IngestionConfig::from_path(&toml),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }
}
