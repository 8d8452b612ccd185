// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Core schema type definitions: properties, nodes, relationships and schemas

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::ddl;
use super::parser::type_tag::parse_type_tag;
use super::{SchemaError, SchemaResult};

/// Endpoint name that matches any node type
pub const WILDCARD_ENDPOINT: &str = "*";

/// Version information for a schema
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre_release: Option<String>,
    pub build_metadata: Option<String>,
}

impl SchemaVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build_metadata: None,
        }
    }

    /// Parse `MAJOR[.MINOR[.PATCH]][-PRE][+BUILD]`; missing components default to zero
    pub fn parse(version_str: &str) -> Result<Self, String> {
        let trimmed = version_str.trim().trim_start_matches('v');
        let (core, build_metadata) = match trimmed.split_once('+') {
            Some((core, build)) => (core, Some(build.to_string())),
            None => (trimmed, None),
        };
        let (core, pre_release) = match core.split_once('-') {
            Some((core, pre)) => (core, Some(pre.to_string())),
            None => (core, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(format!("Invalid version format: {}", version_str));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(parts.iter()) {
            *slot = part
                .parse::<u32>()
                .map_err(|_| format!("Invalid version component '{}' in {}", part, version_str))?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre_release,
            build_metadata,
        })
    }

    /// Same major version = compatible
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build_metadata {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.to_string()
    }
}

/// Storage types a property may declare
///
/// The scalar tags are the ones the platform schemas use. `List`, `Map`,
/// `Decimal` and the unsigned integers only appear in custom schemas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeTag {
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Boolean,
    Date,
    Timestamp,
    Interval,
    Blob,
    Uuid,
    List(Box<TypeTag>),
    Map(Box<TypeTag>, Box<TypeTag>),
}

impl TypeTag {
    /// Parse a type spelling such as `int64`, `STRING[]` or `MAP(STRING, DOUBLE)`
    ///
    /// Matching is case-insensitive. Unknown spellings are an error, never a
    /// fallback to `STRING`.
    pub fn parse(spelling: &str) -> SchemaResult<Self> {
        parse_type_tag(spelling)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::UInt8
                | TypeTag::UInt16
                | TypeTag::UInt32
                | TypeTag::UInt64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(
            self,
            TypeTag::Float | TypeTag::Double | TypeTag::Decimal { .. }
        )
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, TypeTag::List(_) | TypeTag::Map(_, _))
    }

    /// Value used for a column that a row does not supply
    pub fn default_value(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            TypeTag::String => Value::String(String::new()),
            t if t.is_integer() => Value::from(0),
            t if t.is_floating() => Value::from(0.0),
            TypeTag::Boolean => Value::Bool(false),
            TypeTag::List(_) => Value::Array(Vec::new()),
            TypeTag::Map(_, _) => Value::Object(serde_json::Map::new()),
            _ => Value::Null,
        }
    }

    /// Whether a JSON value can be stored in a column of this type
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self, value) {
            (_, Value::Null) => true,
            (TypeTag::String | TypeTag::Uuid | TypeTag::Blob, Value::String(_)) => true,
            (TypeTag::Date | TypeTag::Timestamp | TypeTag::Interval, Value::String(_)) => true,
            (TypeTag::UInt8 | TypeTag::UInt16 | TypeTag::UInt32 | TypeTag::UInt64, Value::Number(n)) => {
                n.is_u64()
            }
            (t, Value::Number(n)) if t.is_integer() => n.is_i64() || n.is_u64(),
            (t, Value::Number(_)) if t.is_floating() => true,
            (TypeTag::Boolean, Value::Bool(_)) => true,
            (TypeTag::List(inner), Value::Array(items)) => items.iter().all(|v| inner.accepts(v)),
            (TypeTag::Map(_, value_type), Value::Object(entries)) => {
                entries.values().all(|v| value_type.accepts(v))
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::String => write!(f, "STRING"),
            TypeTag::Int8 => write!(f, "INT8"),
            TypeTag::Int16 => write!(f, "INT16"),
            TypeTag::Int32 => write!(f, "INT32"),
            TypeTag::Int64 => write!(f, "INT64"),
            TypeTag::UInt8 => write!(f, "UINT8"),
            TypeTag::UInt16 => write!(f, "UINT16"),
            TypeTag::UInt32 => write!(f, "UINT32"),
            TypeTag::UInt64 => write!(f, "UINT64"),
            TypeTag::Float => write!(f, "FLOAT"),
            TypeTag::Double => write!(f, "DOUBLE"),
            TypeTag::Decimal { precision, scale } => write!(f, "DECIMAL({}, {})", precision, scale),
            TypeTag::Boolean => write!(f, "BOOLEAN"),
            TypeTag::Date => write!(f, "DATE"),
            TypeTag::Timestamp => write!(f, "TIMESTAMP"),
            TypeTag::Interval => write!(f, "INTERVAL"),
            TypeTag::Blob => write!(f, "BLOB"),
            TypeTag::Uuid => write!(f, "UUID"),
            TypeTag::List(inner) => write!(f, "{}[]", inner),
            TypeTag::Map(key, value) => write!(f, "MAP({}, {})", key, value),
        }
    }
}

impl TryFrom<String> for TypeTag {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeTag::parse(&value)
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.to_string()
    }
}

/// Definition of a property within a node or relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl Property {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            is_primary_key: false,
            nullable: true,
        }
    }

    /// A non-nullable primary key property
    pub fn primary_key(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            is_primary_key: true,
            nullable: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Definition of a node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            properties,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names of the primary key properties in declaration order
    pub fn primary_keys(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|p| p.is_primary_key)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Render `CREATE NODE TABLE IF NOT EXISTS` for this node
    ///
    /// Fails with [`SchemaError::MissingPrimaryKey`] when no property is flagged
    /// as primary key.
    pub fn to_ddl(&self) -> SchemaResult<String> {
        let primary_keys = self.primary_keys();
        if primary_keys.is_empty() {
            return Err(SchemaError::MissingPrimaryKey(self.name.clone()));
        }

        let columns: Vec<(&str, String)> = self
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_tag.to_string()))
            .collect();

        Ok(ddl::render_node_table(&self.name, &columns, &primary_keys))
    }
}

/// Definition of a relationship table between two node tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Relationship {
    pub fn new(
        name: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            properties: Vec::new(),
            description: None,
        }
    }

    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_wildcard_endpoint(&self) -> bool {
        self.from_node == WILDCARD_ENDPOINT || self.to_node == WILDCARD_ENDPOINT
    }

    /// Render `CREATE REL TABLE IF NOT EXISTS` for this relationship
    ///
    /// Wildcard endpoints cannot be rendered without the node list; use
    /// [`Schema::to_ddl`] for those.
    pub fn to_ddl(&self) -> SchemaResult<String> {
        if self.has_wildcard_endpoint() {
            return Err(SchemaError::InvalidDefinition(format!(
                "Relationship '{}' has a wildcard endpoint and must be rendered within its schema",
                self.name
            )));
        }
        Ok(self.render_ddl(&[(self.from_node.clone(), self.to_node.clone())]))
    }

    pub(crate) fn render_ddl(&self, endpoints: &[(String, String)]) -> String {
        let columns: Vec<(&str, String)> = self
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.type_tag.to_string()))
            .collect();
        ddl::render_rel_table(&self.name, endpoints, &columns)
    }
}

/// Summary counts for a schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemaStats {
    pub nodes: usize,
    pub relationships: usize,
    pub node_properties: usize,
    pub relationship_properties: usize,
}

/// A complete compiled or user-supplied schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub version: SchemaVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Schema {
    pub fn new(name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            name: name.into(),
            version,
            description: None,
            nodes: Vec::new(),
            relationships: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn get_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn get_relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.get_node(name).is_some()
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn relationship_names(&self) -> Vec<&str> {
        self.relationships.iter().map(|r| r.name.as_str()).collect()
    }

    /// Node and relationship names together
    pub fn entity_names(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .map(|n| n.name.clone())
            .chain(self.relationships.iter().map(|r| r.name.clone()))
            .collect()
    }

    /// Concrete `(from, to)` node pairs for a relationship
    ///
    /// A wildcard endpoint expands to every declared node. Returns `None` when
    /// a named endpoint is not declared in this schema.
    pub fn endpoint_pairs(&self, relationship: &Relationship) -> Option<Vec<(String, String)>> {
        let expand = |endpoint: &str| -> Option<Vec<String>> {
            if endpoint == WILDCARD_ENDPOINT {
                Some(self.nodes.iter().map(|n| n.name.clone()).collect())
            } else if self.has_node(endpoint) {
                Some(vec![endpoint.to_string()])
            } else {
                None
            }
        };

        let from = expand(&relationship.from_node)?;
        let to = expand(&relationship.to_node)?;
        let pairs: Vec<(String, String)> = from
            .iter()
            .flat_map(|f| to.iter().map(move |t| (f.clone(), t.clone())))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs)
        }
    }

    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            nodes: self.nodes.len(),
            relationships: self.relationships.len(),
            node_properties: self.nodes.iter().map(|n| n.properties.len()).sum(),
            relationship_properties: self
                .relationships
                .iter()
                .map(|r| r.properties.len())
                .sum(),
        }
    }

    /// All DDL statements, nodes first, then relationships
    pub fn ddl_statements(&self) -> SchemaResult<Vec<String>> {
        let mut statements = Vec::with_capacity(self.nodes.len() + self.relationships.len());

        for node in &self.nodes {
            statements.push(node.to_ddl()?);
        }

        for relationship in &self.relationships {
            let endpoints = self.endpoint_pairs(relationship).ok_or_else(|| {
                SchemaError::Consistency(format!(
                    "Relationship '{}' references undeclared node(s) '{}' -> '{}'",
                    relationship.name, relationship.from_node, relationship.to_node
                ))
            })?;
            statements.push(relationship.render_ddl(&endpoints));
        }

        Ok(statements)
    }

    /// The full DDL script, one statement per line
    pub fn to_ddl(&self) -> SchemaResult<String> {
        Ok(self
            .ddl_statements()?
            .into_iter()
            .map(|s| format!("{};", s))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Node {
        Node::new(
            "Entity",
            vec![
                Property::primary_key("identifier", TypeTag::String),
                Property::new("name", TypeTag::String),
                Property::new("fiscal_year_end", TypeTag::Int32),
            ],
        )
    }

    #[test]
    fn test_version_parsing() {
        let version = SchemaVersion::parse("1.2.3").unwrap();
        assert_eq!(version, SchemaVersion::new(1, 2, 3));
        assert_eq!(version.to_string(), "1.2.3");

        let short = SchemaVersion::parse("2.1").unwrap();
        assert_eq!(short, SchemaVersion::new(2, 1, 0));

        let with_pre = SchemaVersion::parse("2.0.0-beta+build123").unwrap();
        assert_eq!(with_pre.pre_release, Some("beta".to_string()));
        assert_eq!(with_pre.build_metadata, Some("build123".to_string()));
        assert_eq!(with_pre.to_string(), "2.0.0-beta+build123");

        assert!(SchemaVersion::parse("1..2").is_err());
        assert!(SchemaVersion::parse("one").is_err());
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 2, 3);
        assert!(v1.is_compatible_with(&SchemaVersion::new(1, 9, 0)));
        assert!(!v1.is_compatible_with(&SchemaVersion::new(2, 0, 0)));
    }

    #[test]
    fn test_node_ddl() {
        let ddl = entity().to_ddl().unwrap();
        assert_eq!(
            ddl,
            "CREATE NODE TABLE IF NOT EXISTS Entity(identifier STRING, name STRING, fiscal_year_end INT32, PRIMARY KEY(identifier))"
        );
    }

    #[test]
    fn test_node_without_primary_key_refuses_ddl() {
        let node = Node::new("Orphan", vec![Property::new("name", TypeTag::String)]);
        match node.to_ddl() {
            Err(SchemaError::MissingPrimaryKey(name)) => assert_eq!(name, "Orphan"),
            other => panic!("expected missing primary key, got {:?}", other),
        }
    }

    #[test]
    fn test_relationship_ddl_quotes_reserved_columns() {
        let rel = Relationship::new("ENTITY_HAS_REPORT", "Entity", "Report")
            .with_properties(vec![Property::new("order", TypeTag::Int32)]);
        assert_eq!(
            rel.to_ddl().unwrap(),
            "CREATE REL TABLE IF NOT EXISTS ENTITY_HAS_REPORT(FROM Entity TO Report, `order` INT32)"
        );
    }

    #[test]
    fn test_schema_ddl_orders_nodes_first_and_expands_wildcards() {
        let mut schema = Schema::new("test", SchemaVersion::default());
        schema
            .relationships
            .push(Relationship::new("TAGGED", "*", "Entity"));
        schema.nodes.push(entity());
        schema.nodes.push(Node::new(
            "Report",
            vec![Property::primary_key("identifier", TypeTag::String)],
        ));

        let statements = schema.ddl_statements().unwrap();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE NODE TABLE IF NOT EXISTS Entity"));
        assert!(statements[1].starts_with("CREATE NODE TABLE IF NOT EXISTS Report"));
        assert_eq!(
            statements[2],
            "CREATE REL TABLE IF NOT EXISTS TAGGED(FROM Entity TO Entity, FROM Report TO Entity)"
        );

        let script = schema.to_ddl().unwrap();
        assert_eq!(script.lines().count(), 3);
        assert!(script.lines().all(|l| l.ends_with(';')));
    }

    #[test]
    fn test_type_tag_defaults() {
        assert_eq!(TypeTag::String.default_value(), serde_json::json!(""));
        assert_eq!(TypeTag::Int64.default_value(), serde_json::json!(0));
        assert_eq!(TypeTag::Double.default_value(), serde_json::json!(0.0));
        assert_eq!(TypeTag::Boolean.default_value(), serde_json::json!(false));
        assert!(TypeTag::Date.default_value().is_null());
        assert!(TypeTag::Timestamp.default_value().is_null());
    }

    #[test]
    fn test_type_tag_accepts() {
        assert!(TypeTag::Int32.accepts(&serde_json::json!(4)));
        assert!(!TypeTag::Int32.accepts(&serde_json::json!("4")));
        assert!(TypeTag::Double.accepts(&serde_json::json!(4)));
        assert!(!TypeTag::UInt8.accepts(&serde_json::json!(-1)));
        assert!(TypeTag::List(Box::new(TypeTag::String)).accepts(&serde_json::json!(["a", "b"])));
        assert!(TypeTag::Date.accepts(&serde_json::Value::Null));
    }

    #[test]
    fn test_schema_serde_uses_type_spellings() {
        let mut schema = Schema::new("test", SchemaVersion::new(1, 0, 0));
        schema.nodes.push(entity());
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["nodes"][0]["properties"][2]["type"], "INT32");

        let back: Schema = serde_json::from_value(json).unwrap();
        assert_eq!(back, schema);
    }
}
