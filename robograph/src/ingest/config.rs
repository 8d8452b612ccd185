// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Ingestion metadata derived from a compiled schema
//!
//! One [`IngestTableInfo`] per node and relationship, plus lookup indexes for
//! routing files to tables. Everything is built once in
//! [`IngestConfigGenerator::new`] and only queried afterwards.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use super::naming::{file_patterns, NODE_PREFIX, REL_PREFIX};
use super::TableKind;
use crate::schema::types::{Node, Relationship, Schema};

/// Leading columns of every relationship table
pub const RELATIONSHIP_KEY_COLUMNS: [&str; 2] = ["from", "to"];

/// Per-table ingestion metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestTableInfo {
    pub name: String,
    pub is_relationship: bool,
    pub file_patterns: BTreeSet<String>,
    pub primary_keys: Vec<String>,
    pub columns: Vec<String>,
    pub from_node: Option<String>,
    pub to_node: Option<String>,
    pub properties: Option<Vec<String>>,
}

impl IngestTableInfo {
    fn for_node(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            is_relationship: false,
            file_patterns: file_patterns(&node.name, NODE_PREFIX),
            primary_keys: node.primary_keys().into_iter().map(String::from).collect(),
            columns: node.column_names().into_iter().map(String::from).collect(),
            from_node: None,
            to_node: None,
            properties: None,
        }
    }

    fn for_relationship(relationship: &Relationship) -> Self {
        let properties: Vec<String> = relationship
            .property_names()
            .into_iter()
            .map(String::from)
            .collect();
        let columns = RELATIONSHIP_KEY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(properties.iter().cloned())
            .collect();

        Self {
            name: relationship.name.clone(),
            is_relationship: true,
            file_patterns: file_patterns(&relationship.name, REL_PREFIX),
            primary_keys: Vec::new(),
            columns,
            from_node: Some(relationship.from_node.clone()),
            to_node: Some(relationship.to_node.clone()),
            properties: Some(properties),
        }
    }

    pub fn kind(&self) -> TableKind {
        if self.is_relationship {
            TableKind::Relationship
        } else {
            TableKind::Node
        }
    }
}

/// All table metadata for one compiled schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaIngestConfig {
    pub schema_name: String,
    pub tables: Vec<IngestTableInfo>,
    /// File name pattern -> table name
    pub file_pattern_mapping: BTreeMap<String, String>,
    /// Lowercase table name -> canonical table name
    pub table_name_mapping: BTreeMap<String, String>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    relationship_index: HashMap<String, usize>,
}

impl SchemaIngestConfig {
    fn build(schema: &Schema) -> Self {
        let mut config = Self {
            schema_name: schema.name.clone(),
            tables: Vec::with_capacity(schema.nodes.len() + schema.relationships.len()),
            file_pattern_mapping: BTreeMap::new(),
            table_name_mapping: BTreeMap::new(),
            node_index: HashMap::new(),
            relationship_index: HashMap::new(),
        };

        for node in &schema.nodes {
            config.add(IngestTableInfo::for_node(node));
        }
        for relationship in &schema.relationships {
            config.add(IngestTableInfo::for_relationship(relationship));
        }

        config
    }

    fn add(&mut self, info: IngestTableInfo) {
        let position = self.tables.len();

        for pattern in &info.file_patterns {
            match self.file_pattern_mapping.get(pattern) {
                Some(owner) => log::debug!(
                    "File pattern '{}' of '{}' already maps to '{}'",
                    pattern,
                    info.name,
                    owner
                ),
                None => {
                    self.file_pattern_mapping
                        .insert(pattern.clone(), info.name.clone());
                }
            }
        }

        self.table_name_mapping
            .entry(info.name.to_lowercase())
            .or_insert_with(|| info.name.clone());

        if info.is_relationship {
            self.relationship_index.insert(info.name.clone(), position);
        } else {
            self.node_index.insert(info.name.clone(), position);
        }
        self.tables.push(info);
    }

    pub fn node_table(&self, name: &str) -> Option<&IngestTableInfo> {
        self.node_index.get(name).map(|&i| &self.tables[i])
    }

    pub fn relationship_table(&self, name: &str) -> Option<&IngestTableInfo> {
        self.relationship_index.get(name).map(|&i| &self.tables[i])
    }

    pub fn is_node_table(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn is_relationship_table(&self, name: &str) -> bool {
        self.relationship_index.contains_key(name)
    }
}

/// Builds and answers queries over a [`SchemaIngestConfig`]
#[derive(Debug)]
pub struct IngestConfigGenerator {
    schema: Arc<Schema>,
    config: SchemaIngestConfig,
}

impl IngestConfigGenerator {
    pub fn new(schema: Arc<Schema>) -> Self {
        let config = SchemaIngestConfig::build(&schema);
        log::debug!(
            "Built ingest config for '{}': {} tables, {} file patterns",
            config.schema_name,
            config.tables.len(),
            config.file_pattern_mapping.len()
        );
        Self { schema, config }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &SchemaIngestConfig {
        &self.config
    }

    /// Table named exactly like the directory holding `path`
    ///
    /// `.../nodes/Entity/batch.parquet` resolves to `Entity`. The comparison is
    /// case-sensitive; directory names are never transformed.
    pub fn resolve_table_name_from_path(&self, path: impl AsRef<Path>) -> Option<String> {
        let directory = path.as_ref().parent()?.file_name()?.to_str()?;
        if self.config.is_node_table(directory) || self.config.is_relationship_table(directory) {
            Some(directory.to_string())
        } else {
            None
        }
    }

    pub fn is_relationship_file(&self, path: impl AsRef<Path>) -> bool {
        self.resolve_table_name_from_path(path)
            .map(|name| self.config.is_relationship_table(&name))
            .unwrap_or(false)
    }

    /// Resolve a file to its table and table kind
    pub fn classify(&self, path: impl AsRef<Path>) -> Option<(String, TableKind)> {
        let name = self.resolve_table_name_from_path(path)?;
        let kind = self.table_kind(&name)?;
        Some((name, kind))
    }

    /// Node tables are checked before relationship tables
    pub fn get_table_info(&self, name: &str) -> Option<&IngestTableInfo> {
        self.config
            .node_table(name)
            .or_else(|| self.config.relationship_table(name))
    }

    pub fn table_kind(&self, name: &str) -> Option<TableKind> {
        self.get_table_info(name).map(IngestTableInfo::kind)
    }

    /// Match a file stem against the generated file patterns
    ///
    /// Trailing `_segment` parts are stripped one at a time, so
    /// `fact_dimension_000012` resolves through `fact_dimension`.
    pub fn resolve_table_name_from_pattern(&self, file_stem: &str) -> Option<String> {
        let mut candidate = file_stem.to_lowercase();
        loop {
            if let Some(table) = self.config.file_pattern_mapping.get(&candidate) {
                return Some(table.clone());
            }
            match candidate.rsplit_once('_') {
                Some((head, _)) if !head.is_empty() => candidate = head.to_string(),
                _ => return None,
            }
        }
    }

    /// Canonical spelling of a table name, matched case-insensitively
    pub fn canonical_table_name(&self, name: &str) -> Option<&str> {
        self.config
            .table_name_mapping
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    pub fn node_table_names(&self) -> Vec<&str> {
        self.config
            .tables
            .iter()
            .filter(|t| !t.is_relationship)
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn relationship_table_names(&self) -> Vec<&str> {
        self.config
            .tables
            .iter()
            .filter(|t| t.is_relationship)
            .map(|t| t.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::composer::SchemaComposer;
    use std::path::PathBuf;

    fn generator() -> IngestConfigGenerator {
        let composer = SchemaComposer::with_builtin();
        IngestConfigGenerator::new(composer.compose("base", &["roboledger"]).unwrap())
    }

    #[test]
    fn test_node_table_info() {
        let generator = generator();
        let entity = generator.get_table_info("Entity").unwrap();
        assert!(!entity.is_relationship);
        assert_eq!(entity.primary_keys, vec!["identifier"]);
        assert_eq!(entity.columns[0], "identifier");
        assert!(entity.columns.contains(&"legal_name".to_string()));
        assert!(entity.file_patterns.contains("node_entity"));
        assert!(entity.properties.is_none());
    }

    #[test]
    fn test_relationship_columns_start_with_endpoints() {
        let generator = generator();
        let info = generator.get_table_info("ENTITY_HAS_REPORT").unwrap();
        assert!(info.is_relationship);
        assert_eq!(&info.columns[..2], &["from".to_string(), "to".to_string()]);
        assert_eq!(info.columns[2..], info.properties.clone().unwrap()[..]);
        assert_eq!(info.from_node.as_deref(), Some("Entity"));
        assert_eq!(info.to_node.as_deref(), Some("Report"));
        assert!(info.file_patterns.contains("rel_entity_has_report"));
    }

    #[test]
    fn test_resolve_table_name_from_path() {
        let generator = generator();
        let node_file = PathBuf::from("/data/run-1/nodes/Entity/batch.parquet");
        let rel_file = PathBuf::from("/data/run-1/relationships/ENTITY_HAS_REPORT/batch.parquet");

        assert_eq!(
            generator.resolve_table_name_from_path(&node_file).as_deref(),
            Some("Entity")
        );
        assert_eq!(
            generator.resolve_table_name_from_path(&rel_file).as_deref(),
            Some("ENTITY_HAS_REPORT")
        );
        assert!(!generator.is_relationship_file(&node_file));
        assert!(generator.is_relationship_file(&rel_file));
    }

    #[test]
    fn test_path_resolution_is_exact() {
        let generator = generator();
        assert!(generator
            .resolve_table_name_from_path("/data/nodes/entity/batch.parquet")
            .is_none());
        assert!(generator
            .resolve_table_name_from_path("/data/nodes/Entity")
            .is_none());
        assert!(generator.resolve_table_name_from_path("batch.parquet").is_none());
    }

    #[test]
    fn test_resolve_from_pattern_strips_suffixes() {
        let generator = generator();
        assert_eq!(
            generator.resolve_table_name_from_pattern("fact_dimension_000012").as_deref(),
            Some("FactDimension")
        );
        assert_eq!(
            generator.resolve_table_name_from_pattern("rel_entity_has_report").as_deref(),
            Some("ENTITY_HAS_REPORT")
        );
        assert_eq!(
            generator.resolve_table_name_from_pattern("LineItem").as_deref(),
            Some("LineItem")
        );
        assert!(generator.resolve_table_name_from_pattern("unrelated_file").is_none());
    }

    #[test]
    fn test_canonical_names_and_listing() {
        let generator = generator();
        assert_eq!(generator.canonical_table_name("lineitem"), Some("LineItem"));
        assert_eq!(generator.canonical_table_name("ENTITY"), Some("Entity"));
        assert!(generator.node_table_names().contains(&"Account"));
        assert!(generator
            .relationship_table_names()
            .contains(&"ENTITY_HAS_ACCOUNT"));
        assert_eq!(
            generator.node_table_names().len() + generator.relationship_table_names().len(),
            generator.config().tables.len()
        );
    }
}
