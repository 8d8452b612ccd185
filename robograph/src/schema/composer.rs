// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema composition engine
//!
//! Compiles a base schema plus zero or more extensions into one validated,
//! immutable [`Schema`]. Results are cached per [`CompositionKey`], so
//! composing an equivalent combination twice returns the same `Arc`.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::cache::{CompositionCache, CompositionCacheStats, CompositionKey};
use super::registry::{ExtensionRegistry, SchemaModule};
use super::types::Schema;
use super::validator::SchemaValidator;
use super::{SchemaError, SchemaResult};
use crate::ingest::config::IngestConfigGenerator;
use crate::ingest::engine::SharedEntitySet;

/// Result of pre-flighting an extension set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityReport {
    pub compatible: bool,
    pub conflicts: Vec<String>,
}

/// Composes registered schema modules into compiled schemas
pub struct SchemaComposer {
    registry: ExtensionRegistry,
    schemas: CompositionCache<Arc<Schema>>,
    generators: CompositionCache<Arc<IngestConfigGenerator>>,
}

impl SchemaComposer {
    pub fn new(registry: ExtensionRegistry) -> Self {
        Self {
            registry,
            schemas: CompositionCache::new(),
            generators: CompositionCache::new(),
        }
    }

    /// Composer over the built-in base schema and extensions
    pub fn with_builtin() -> Self {
        Self::new(ExtensionRegistry::with_builtin())
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Compile `base` plus `extensions`, loading extensions in the order given
    ///
    /// Fails with [`SchemaError::SchemaNotFound`] for unknown modules and
    /// [`SchemaError::Consistency`] when two modules declare the same node or
    /// relationship name. Dangling relationship endpoints are logged as warnings.
    pub fn compose<S: AsRef<str>>(&self, base: &str, extensions: &[S]) -> SchemaResult<Arc<Schema>> {
        let key = CompositionKey::new(base, extensions);

        if let Some(schema) = self.schemas.get(&key) {
            log::debug!("Composition cache hit for '{}'", key);
            return Ok(schema);
        }

        let schema = Arc::new(self.compose_uncached(&key, base, extensions)?);
        Ok(self.schemas.insert(key, schema))
    }

    fn compose_uncached<S: AsRef<str>>(
        &self,
        key: &CompositionKey,
        base: &str,
        extensions: &[S],
    ) -> SchemaResult<Schema> {
        let base_module = self.registry.resolve_base(base)?;
        let mut schema = Schema::new(key.to_string(), base_module.version.clone());
        schema.description = base_module.description.clone();

        let mut modules: Vec<SchemaModule> = Vec::with_capacity(extensions.len() + 1);
        modules.push(base_module);
        for extension in extensions {
            modules.push(self.registry.resolve_extension(extension.as_ref())?);
        }

        let mut node_origin: HashMap<String, String> = HashMap::new();
        let mut rel_origin: HashMap<String, String> = HashMap::new();

        for module in &modules {
            for node in module.node_slice() {
                if let Some(previous) = node_origin.get(&node.name) {
                    return Err(SchemaError::Consistency(format!(
                        "Node '{}' is declared by both '{}' and '{}'",
                        node.name, previous, module.name
                    )));
                }
                node_origin.insert(node.name.clone(), module.name.clone());
                schema.nodes.push(node.clone());
            }

            for relationship in module.relationship_slice() {
                if let Some(previous) = rel_origin.get(&relationship.name) {
                    return Err(SchemaError::Consistency(format!(
                        "Relationship '{}' is declared by both '{}' and '{}'",
                        relationship.name, previous, module.name
                    )));
                }
                rel_origin.insert(relationship.name.clone(), module.name.clone());
                schema.relationships.push(relationship.clone());
            }
        }

        schema
            .metadata
            .insert("base".to_string(), serde_json::json!(base));
        schema.metadata.insert(
            "extensions".to_string(),
            serde_json::json!(extensions
                .iter()
                .map(|e| e.as_ref().to_string())
                .collect::<Vec<_>>()),
        );

        SchemaValidator::advisory().validate(&schema)?;

        log::info!(
            "Composed schema '{}': {} nodes, {} relationships",
            schema.name,
            schema.nodes.len(),
            schema.relationships.len()
        );

        Ok(schema)
    }

    /// Pre-flight an extension set for name collisions between extensions
    ///
    /// Only the extensions' own declarations are scanned, not the base. Never
    /// fails; unresolvable extensions are reported as conflicts.
    pub fn check_compatibility<S: AsRef<str>>(&self, extensions: &[S]) -> CompatibilityReport {
        let mut conflicts = Vec::new();
        let mut node_owner: HashMap<String, String> = HashMap::new();
        let mut rel_owner: HashMap<String, String> = HashMap::new();

        for extension in extensions {
            let extension = extension.as_ref();
            let module = match self.registry.resolve_extension(extension) {
                Ok(module) => module,
                Err(e) => {
                    conflicts.push(format!("Extension '{}' cannot be resolved: {}", extension, e));
                    continue;
                }
            };

            for node in module.node_slice() {
                match node_owner.get(&node.name) {
                    Some(owner) => conflicts.push(format!(
                        "Node '{}' is defined in both '{}' and '{}'",
                        node.name, owner, extension
                    )),
                    None => {
                        node_owner.insert(node.name.clone(), extension.to_string());
                    }
                }
            }

            for relationship in module.relationship_slice() {
                match rel_owner.get(&relationship.name) {
                    Some(owner) => conflicts.push(format!(
                        "Relationship '{}' is defined in both '{}' and '{}'",
                        relationship.name, owner, extension
                    )),
                    None => {
                        rel_owner.insert(relationship.name.clone(), extension.to_string());
                    }
                }
            }
        }

        CompatibilityReport {
            compatible: conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn discover_available_extensions(&self) -> Vec<String> {
        self.registry.discover_available_extensions()
    }

    /// Ingestion config for a composition, built once per key
    pub fn ingest_config<S: AsRef<str>>(
        &self,
        base: &str,
        extensions: &[S],
    ) -> SchemaResult<Arc<IngestConfigGenerator>> {
        let key = CompositionKey::new(base, extensions);
        if let Some(generator) = self.generators.get(&key) {
            return Ok(generator);
        }

        let schema = self.compose(base, extensions)?;
        let generator = Arc::new(IngestConfigGenerator::new(schema));
        Ok(self.generators.insert(key, generator))
    }

    /// Tables declared by the base schema alone
    pub fn shared_entities(&self, base: &str) -> SchemaResult<SharedEntitySet> {
        let schema = self.compose::<&str>(base, &[])?;
        Ok(SharedEntitySet::from_schema(&schema))
    }

    pub fn clear_cache(&self) {
        self.schemas.clear();
        self.generators.clear();
        log::debug!("Cleared composition caches");
    }

    pub fn cache_stats(&self) -> CompositionCacheStats {
        self.schemas.stats()
    }
}

impl Default for SchemaComposer {
    fn default() -> Self {
        Self::with_builtin()
    }
}
