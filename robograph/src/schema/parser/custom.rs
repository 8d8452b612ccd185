// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parser for tenant-authored schema documents
//!
//! Documents are JSON or YAML mappings with `name`, `version`, `description`,
//! `extends`, `nodes`, `relationships` and `metadata`. Parsing runs a
//! structural pass over the raw document, then builds the typed [`Schema`]
//! and checks it strictly: unlike composed schemas, a custom schema may not
//! reference a node it does not declare (or inherit from its base).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::schema::types::{Node, Property, Relationship, Schema, SchemaVersion, TypeTag};
use crate::schema::validator::SchemaValidator;
use crate::schema::{SchemaError, SchemaResult};

/// Names set aside for platform-internal entities
pub const RESERVED_NAMES: &[&str] = &[
    "Graph",
    "GraphMetadata",
    "Tenant",
    "Platform",
    "System",
    "Migration",
    "SchemaVersion",
    "Backup",
    "Credit",
    "Subscription",
];

/// The only schema a custom document may extend
pub const EXTENDABLE_BASE: &str = "base";

/// Table and column names must be bare identifiers in the table DDL
static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(name)
}

pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn reserved_name_error(name: &str) -> SchemaError {
    SchemaError::ReservedName {
        name: name.to_string(),
        reserved: RESERVED_NAMES.iter().map(|r| r.to_string()).collect(),
    }
}

/// Text format of a schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Builds [`Schema`] values from custom schema documents
#[derive(Debug, Clone, Default)]
pub struct CustomSchemaParser {
    base: Option<Arc<Schema>>,
}

impl CustomSchemaParser {
    pub fn new() -> Self {
        Self { base: None }
    }

    /// Parser aware of the platform base schema
    ///
    /// Documents declaring `extends: base` may then reference base nodes, and
    /// [`merge_with_base`](Self::merge_with_base) becomes available.
    pub fn with_base(base: Arc<Schema>) -> Self {
        Self { base: Some(base) }
    }

    pub fn base(&self) -> Option<&Schema> {
        self.base.as_deref()
    }

    pub fn parse_json(&self, text: &str) -> SchemaResult<Schema> {
        let document: Value = serde_json::from_str(text)?;
        self.parse_value(&document)
    }

    pub fn parse_yaml(&self, text: &str) -> SchemaResult<Schema> {
        let document: Value = serde_yaml::from_str(text)?;
        self.parse_value(&document)
    }

    pub fn parse_str(&self, text: &str, format: DocumentFormat) -> SchemaResult<Schema> {
        match format {
            DocumentFormat::Json => self.parse_json(text),
            DocumentFormat::Yaml => self.parse_yaml(text),
        }
    }

    /// Parse a `.json`, `.yaml` or `.yml` file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> SchemaResult<Schema> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            SchemaError::InvalidDefinition(format!(
                "Cannot infer schema document format from '{}'",
                path.display()
            ))
        })?;
        let text = std::fs::read_to_string(path)?;
        self.parse_str(&text, format)
    }

    /// Parse an already-decoded document
    pub fn parse_value(&self, document: &Value) -> SchemaResult<Schema> {
        let root = validate_structure(document)?;
        self.build(root)
    }

    fn build(&self, root: &Map<String, Value>) -> SchemaResult<Schema> {
        let name = root
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::InvalidDefinition("Schema 'name' must be a string".into()))?;

        let version = match root.get("version") {
            None | Some(Value::Null) => SchemaVersion::default(),
            Some(Value::String(s)) => SchemaVersion::parse(s).map_err(SchemaError::InvalidDefinition)?,
            Some(Value::Number(n)) => {
                SchemaVersion::parse(&n.to_string()).map_err(SchemaError::InvalidDefinition)?
            }
            Some(other) => {
                return Err(SchemaError::InvalidDefinition(format!(
                    "Schema 'version' must be a string, got {}",
                    other
                )))
            }
        };

        let extends = match root.get("extends") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s == EXTENDABLE_BASE => Some(s.clone()),
            Some(other) => {
                return Err(SchemaError::InvalidDefinition(format!(
                    "Schema may only extend '{}', got {}",
                    EXTENDABLE_BASE, other
                )))
            }
        };

        let mut schema = Schema::new(name, version);
        schema.description = optional_str(root, "description", "schema")?;

        if let Some(entries) = root.get("nodes").and_then(Value::as_array) {
            for (index, entry) in entries.iter().enumerate() {
                schema.nodes.push(build_node(entry, index)?);
            }
        }

        if let Some(entries) = root.get("relationships").and_then(Value::as_array) {
            for (index, entry) in entries.iter().enumerate() {
                schema.relationships.push(build_relationship(entry, index)?);
            }
        }

        if let Some(metadata) = root.get("metadata") {
            let metadata = metadata.as_object().ok_or_else(|| {
                SchemaError::InvalidDefinition("Schema 'metadata' must be a mapping".into())
            })?;
            schema
                .metadata
                .extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let mut validator = SchemaValidator::strict();
        if let Some(extends) = &extends {
            schema
                .metadata
                .insert("extends".to_string(), Value::String(extends.clone()));
            if let Some(base) = &self.base {
                validator = validator.with_known_nodes(base.node_names());
            }
        }
        validator.validate(&schema)?;

        log::debug!(
            "Parsed custom schema '{}': {} nodes, {} relationships",
            schema.name,
            schema.nodes.len(),
            schema.relationships.len()
        );

        Ok(schema)
    }

    /// Base nodes and relationships followed by the user's
    ///
    /// User entities named like a base entity or a reserved name are dropped
    /// with a warning. The result is checked in advisory mode.
    pub fn merge_with_base(&self, user: &Schema) -> SchemaResult<Schema> {
        let base = self.base.as_ref().ok_or_else(|| {
            SchemaError::InvalidDefinition("No base schema configured for merge".into())
        })?;

        let mut merged = Schema::new(user.name.clone(), user.version.clone());
        merged.description = user.description.clone().or_else(|| base.description.clone());
        merged.metadata = user.metadata.clone();
        merged
            .metadata
            .insert("base".to_string(), Value::String(base.name.clone()));
        merged.nodes = base.nodes.clone();
        merged.relationships = base.relationships.clone();

        let taken: BTreeSet<String> = base
            .entity_names()
            .iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        let mut dropped = 0usize;

        for node in &user.nodes {
            if taken.contains(&node.name.to_ascii_lowercase()) || is_reserved_name(&node.name) {
                log::warn!(
                    "Dropping node '{}' from schema '{}': name is owned by the platform",
                    node.name,
                    user.name
                );
                dropped += 1;
                continue;
            }
            merged.nodes.push(node.clone());
        }

        for relationship in &user.relationships {
            if taken.contains(&relationship.name.to_ascii_lowercase()) || is_reserved_name(&relationship.name) {
                log::warn!(
                    "Dropping relationship '{}' from schema '{}': name is owned by the platform",
                    relationship.name,
                    user.name
                );
                dropped += 1;
                continue;
            }
            merged.relationships.push(relationship.clone());
        }

        SchemaValidator::advisory().validate(&merged)?;

        log::info!(
            "Merged schema '{}' with base '{}' ({} entities dropped)",
            merged.name,
            base.name,
            dropped
        );

        Ok(merged)
    }
}

/// Structural pass: a mapping with a `name` and sequence-valued lists
fn validate_structure(document: &Value) -> SchemaResult<&Map<String, Value>> {
    let root = document.as_object().ok_or_else(|| {
        SchemaError::InvalidDefinition("Schema document must be a mapping".into())
    })?;

    match root.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        Some(_) => {
            return Err(SchemaError::InvalidDefinition(
                "Schema 'name' must be a non-empty string".into(),
            ))
        }
        None => {
            return Err(SchemaError::InvalidDefinition(
                "Schema 'name' is required".into(),
            ))
        }
    }

    for field in ["nodes", "relationships"] {
        match root.get(field) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(SchemaError::InvalidDefinition(format!(
                    "Schema '{}' must be a sequence",
                    field
                )))
            }
        }
    }

    Ok(root)
}

fn build_node(entry: &Value, index: usize) -> SchemaResult<Node> {
    let entry = entry.as_object().ok_or_else(|| {
        SchemaError::InvalidDefinition(format!("nodes[{}] must be a mapping", index))
    })?;
    let name = required_identifier(entry, &format!("nodes[{}]", index))?;
    if is_reserved_name(name) {
        return Err(reserved_name_error(name));
    }

    let properties = match entry.get("properties").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        _ => {
            return Err(SchemaError::InvalidDefinition(format!(
                "Node '{}' must declare a non-empty 'properties' list",
                name
            )))
        }
    };

    let properties = properties
        .iter()
        .enumerate()
        .map(|(i, p)| build_property(name, i, p))
        .collect::<SchemaResult<Vec<_>>>()?;

    if !properties.iter().any(|p| p.is_primary_key) {
        return Err(SchemaError::MissingPrimaryKey(name.to_string()));
    }

    let mut node = Node::new(name, properties);
    node.description = optional_str(entry, "description", name)?;
    Ok(node)
}

fn build_relationship(entry: &Value, index: usize) -> SchemaResult<Relationship> {
    let entry = entry.as_object().ok_or_else(|| {
        SchemaError::InvalidDefinition(format!("relationships[{}] must be a mapping", index))
    })?;
    let name = required_identifier(entry, &format!("relationships[{}]", index))?;
    if is_reserved_name(name) {
        return Err(reserved_name_error(name));
    }

    let from_node = required_str(entry, "from_node", name)?;
    let to_node = required_str(entry, "to_node", name)?;

    let mut properties = Vec::new();
    match entry.get("properties") {
        None | Some(Value::Null) => {}
        Some(Value::Array(list)) => {
            for (i, p) in list.iter().enumerate() {
                let mut property = build_property(name, i, p)?;
                if property.is_primary_key {
                    log::warn!(
                        "Ignoring primary key flag on relationship property '{}.{}'",
                        name,
                        property.name
                    );
                    property.is_primary_key = false;
                }
                properties.push(property);
            }
        }
        Some(_) => {
            return Err(SchemaError::InvalidDefinition(format!(
                "Relationship '{}' properties must be a sequence",
                name
            )))
        }
    }

    let mut relationship = Relationship::new(name, from_node, to_node).with_properties(properties);
    relationship.description = optional_str(entry, "description", name)?;
    Ok(relationship)
}

fn build_property(owner: &str, index: usize, entry: &Value) -> SchemaResult<Property> {
    let entry = entry.as_object().ok_or_else(|| {
        SchemaError::InvalidDefinition(format!(
            "Property {} of '{}' must be a mapping",
            index, owner
        ))
    })?;
    let name = required_identifier(entry, &format!("{}.properties[{}]", owner, index))?;
    let type_name = required_str(entry, "type", &format!("{}.{}", owner, name))?;

    let type_tag = TypeTag::parse(type_name).map_err(|_| SchemaError::UnsupportedType {
        property: format!("{}.{}", owner, name),
        type_name: type_name.to_string(),
    })?;

    let is_primary_key = match entry.get("is_primary_key").or_else(|| entry.get("primary_key")) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(SchemaError::InvalidDefinition(format!(
                "Primary key flag of '{}.{}' must be a boolean, got {}",
                owner, name, other
            )))
        }
    };

    let nullable = match entry.get("nullable") {
        None | Some(Value::Null) => !is_primary_key,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(SchemaError::InvalidDefinition(format!(
                "'nullable' of '{}.{}' must be a boolean, got {}",
                owner, name, other
            )))
        }
    };

    Ok(Property {
        name: name.to_string(),
        type_tag,
        is_primary_key,
        nullable,
    })
}

fn required_str<'a>(entry: &'a Map<String, Value>, field: &str, context: &str) -> SchemaResult<&'a str> {
    match entry.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.as_str()),
        _ => Err(SchemaError::InvalidDefinition(format!(
            "{} requires a non-empty string '{}'",
            context, field
        ))),
    }
}

fn required_identifier<'a>(entry: &'a Map<String, Value>, context: &str) -> SchemaResult<&'a str> {
    let name = required_str(entry, "name", context)?;
    if !is_valid_identifier(name) {
        return Err(SchemaError::InvalidDefinition(format!(
            "{} name '{}' must start with a letter or underscore and contain only letters, digits and underscores",
            context, name
        )));
    }
    Ok(name)
}

fn optional_str(entry: &Map<String, Value>, field: &str, context: &str) -> SchemaResult<Option<String>> {
    match entry.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(SchemaError::InvalidDefinition(format!(
            "'{}' of {} must be a string",
            field, context
        ))),
    }
}
