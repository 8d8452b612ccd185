// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Structural schema validator
//
// Duplicate names and missing primary keys are always hard errors. Dangling
// relationship endpoints depend on the enforcement mode: composed schemas may
// reference extensions that are not loaded yet, custom schemas may not.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::schema::types::{Schema, WILDCARD_ENDPOINT};
use crate::schema::{SchemaError, SchemaResult};

/// How dangling relationship endpoints are treated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SchemaEnforcementMode {
    /// Undeclared endpoints are an error
    Strict,
    /// Undeclared endpoints are reported as warnings
    #[default]
    Advisory,
}

/// Non-fatal findings from a successful validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub warnings: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validates the structural invariants of a schema
pub struct SchemaValidator {
    mode: SchemaEnforcementMode,
    known_nodes: HashSet<String>,
}

impl SchemaValidator {
    pub fn new(mode: SchemaEnforcementMode) -> Self {
        Self {
            mode,
            known_nodes: HashSet::new(),
        }
    }

    pub fn strict() -> Self {
        Self::new(SchemaEnforcementMode::Strict)
    }

    pub fn advisory() -> Self {
        Self::new(SchemaEnforcementMode::Advisory)
    }

    /// Node names declared outside the schema that endpoints may reference
    pub fn with_known_nodes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_nodes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn mode(&self) -> SchemaEnforcementMode {
        self.mode
    }

    pub fn validate(&self, schema: &Schema) -> SchemaResult<ConsistencyReport> {
        let mut report = ConsistencyReport::default();

        self.check_unique_names(schema)?;
        self.check_primary_keys(schema)?;
        self.check_unique_properties(schema)?;

        for dangling in self.dangling_endpoints(schema) {
            match self.mode {
                SchemaEnforcementMode::Strict => {
                    return Err(SchemaError::Consistency(dangling));
                }
                SchemaEnforcementMode::Advisory => {
                    log::warn!("Schema '{}': {}", schema.name, dangling);
                    report.warnings.push(dangling);
                }
            }
        }

        Ok(report)
    }

    fn check_unique_names(&self, schema: &Schema) -> SchemaResult<()> {
        let mut seen = HashSet::new();
        for node in &schema.nodes {
            if !seen.insert(node.name.to_ascii_lowercase()) {
                return Err(SchemaError::Consistency(format!(
                    "Duplicate node name '{}'",
                    node.name
                )));
            }
        }

        let mut seen = HashSet::new();
        for relationship in &schema.relationships {
            if !seen.insert(relationship.name.to_ascii_lowercase()) {
                return Err(SchemaError::Consistency(format!(
                    "Duplicate relationship name '{}'",
                    relationship.name
                )));
            }
        }

        Ok(())
    }

    fn check_primary_keys(&self, schema: &Schema) -> SchemaResult<()> {
        match schema.nodes.iter().find(|n| n.primary_keys().is_empty()) {
            Some(node) => Err(SchemaError::MissingPrimaryKey(node.name.clone())),
            None => Ok(()),
        }
    }

    fn check_unique_properties(&self, schema: &Schema) -> SchemaResult<()> {
        let node_props = schema
            .nodes
            .iter()
            .map(|n| (n.name.as_str(), n.properties.as_slice()));
        let rel_props = schema
            .relationships
            .iter()
            .map(|r| (r.name.as_str(), r.properties.as_slice()));

        for (owner, properties) in node_props.chain(rel_props) {
            let mut seen = HashSet::new();
            for property in properties {
                if !seen.insert(property.name.as_str()) {
                    return Err(SchemaError::Consistency(format!(
                        "Duplicate property '{}' on '{}'",
                        property.name, owner
                    )));
                }
            }
        }

        Ok(())
    }

    fn dangling_endpoints(&self, schema: &Schema) -> Vec<String> {
        let declared: HashSet<&str> = schema.nodes.iter().map(|n| n.name.as_str()).collect();
        let mut dangling = Vec::new();

        for relationship in &schema.relationships {
            for (role, endpoint) in [
                ("from_node", &relationship.from_node),
                ("to_node", &relationship.to_node),
            ] {
                if endpoint != WILDCARD_ENDPOINT
                    && !declared.contains(endpoint.as_str())
                    && !self.known_nodes.contains(endpoint)
                {
                    dangling.push(format!(
                        "Relationship '{}' {} references undeclared node '{}'",
                        relationship.name, role, endpoint
                    ));
                }
            }
        }

        dangling
    }
}
