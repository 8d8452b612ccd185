// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema module registry
//!
//! Base schemas and extensions are registered under a name together with a
//! loader that produces their node and relationship lists. Resolving an
//! unknown name is an explicit [`SchemaError::SchemaNotFound`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::modules;
use super::types::{Node, Relationship, SchemaVersion};
use super::{SchemaError, SchemaResult};

/// Schema contribution of one base or extension module
///
/// `None` for either list means the module contributes nothing of that kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaModule {
    pub name: String,
    pub version: SchemaVersion,
    pub description: Option<String>,
    pub nodes: Option<Vec<Node>>,
    pub relationships: Option<Vec<Relationship>>,
}

impl SchemaModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: SchemaVersion::default(),
            description: None,
            nodes: None,
            relationships: None,
        }
    }

    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = Some(relationships);
        self
    }

    /// Whether the module exposes both a node list and a relationship list
    pub fn is_complete(&self) -> bool {
        self.nodes.is_some() && self.relationships.is_some()
    }

    pub fn node_slice(&self) -> &[Node] {
        self.nodes.as_deref().unwrap_or(&[])
    }

    pub fn relationship_slice(&self) -> &[Relationship] {
        self.relationships.as_deref().unwrap_or(&[])
    }
}

/// Produces a module's definitions on demand
pub type ModuleLoader = Arc<dyn Fn() -> SchemaModule + Send + Sync>;

/// Central registry for base and extension schema modules
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    bases: BTreeMap<String, ModuleLoader>,
    extensions: BTreeMap<String, ModuleLoader>,
}

impl ExtensionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in base schema and extensions
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        modules::register_builtin_modules(&mut registry);
        registry
    }

    /// Register a base schema module
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_base<F>(&mut self, name: &str, loader: F)
    where
        F: Fn() -> SchemaModule + Send + Sync + 'static,
    {
        if self.bases.insert(name.to_string(), Arc::new(loader)).is_some() {
            log::warn!("Replaced base schema module '{}'", name);
        }
        log::debug!("Registered base schema module: {}", name);
    }

    /// Register an extension module
    pub fn register_extension<F>(&mut self, name: &str, loader: F)
    where
        F: Fn() -> SchemaModule + Send + Sync + 'static,
    {
        if self
            .extensions
            .insert(name.to_string(), Arc::new(loader))
            .is_some()
        {
            log::warn!("Replaced extension module '{}'", name);
        }
        log::debug!("Registered extension module: {}", name);
    }

    /// Load a base schema module by name
    pub fn resolve_base(&self, name: &str) -> SchemaResult<SchemaModule> {
        let loader = self
            .bases
            .get(name)
            .ok_or_else(|| SchemaError::SchemaNotFound(format!("base schema '{}'", name)))?;
        Ok(loader())
    }

    /// Load an extension module by name
    pub fn resolve_extension(&self, name: &str) -> SchemaResult<SchemaModule> {
        let loader = self
            .extensions
            .get(name)
            .ok_or_else(|| SchemaError::SchemaNotFound(format!("extension '{}'", name)))?;
        Ok(loader())
    }

    pub fn has_base(&self, name: &str) -> bool {
        self.bases.contains_key(name)
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    pub fn base_names(&self) -> Vec<String> {
        self.bases.keys().cloned().collect()
    }

    /// Registered extensions that expose both a node list and a relationship list
    ///
    /// Modules missing either list are skipped, not reported as malformed.
    pub fn discover_available_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .filter_map(|(name, loader)| {
                let module = loader();
                if module.is_complete() {
                    Some(name.clone())
                } else {
                    log::debug!(
                        "Extension '{}' does not expose both node and relationship lists, skipping",
                        name
                    );
                    None
                }
            })
            .collect()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("bases", &self.bases.keys().collect::<Vec<_>>())
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}
