//! Tenant-authored schema documents, end to end
//!
//! Documents are written to disk, parsed, merged with the base schema and
//! then used for row completion and DDL.

use robograph::{
    CustomSchemaParser, IngestConfigGenerator, SchemaAdapter, SchemaComposer, SchemaError,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

const PORTFOLIO_YAML: &str = r#"
name: wealth
version: "2.1.0"
description: Household wealth tracking
extends: base
nodes:
  - name: Household
    properties:
      - name: identifier
        type: STRING
        is_primary_key: true
      - name: members
        type: INT32
      - name: tags
        type: STRING[]
  - name: Entity
    properties:
      - name: identifier
        type: STRING
        is_primary_key: true
relationships:
  - name: HOUSEHOLD_OWNS_ENTITY
    from_node: Household
    to_node: Entity
    properties:
      - name: share
        type: DOUBLE
"#;

fn base_parser() -> CustomSchemaParser {
    let composer = SchemaComposer::with_builtin();
    CustomSchemaParser::with_base(composer.compose::<&str>("base", &[]).unwrap())
}

fn write(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_parse_yaml_file_extending_base() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "wealth.yaml", PORTFOLIO_YAML);

    let schema = base_parser().parse_file(&path).unwrap();
    assert_eq!(schema.name, "wealth");
    assert_eq!(schema.version.to_string(), "2.1.0");
    assert_eq!(schema.metadata["extends"], json!("base"));
    assert_eq!(schema.node_names(), vec!["Household", "Entity"]);

    let household = schema.get_node("Household").unwrap();
    assert_eq!(household.primary_keys(), vec!["identifier"]);
    assert_eq!(household.get_property("tags").unwrap().type_tag.to_string(), "STRING[]");
}

#[test]
fn test_merge_drops_base_collisions() {
    let parser = base_parser();
    let user = parser.parse_yaml(PORTFOLIO_YAML).unwrap();
    let merged = parser.merge_with_base(&user).unwrap();

    let base = parser.base().unwrap();
    assert_eq!(merged.nodes.len(), base.nodes.len() + 1);
    assert_eq!(merged.relationships.len(), base.relationships.len() + 1);

    // Entity keeps the base definition
    let entity = merged.get_node("Entity").unwrap();
    assert_eq!(entity.properties.len(), base.get_node("Entity").unwrap().properties.len());
    assert!(merged.has_node("Household"));
    assert_eq!(merged.nodes.last().unwrap().name, "Household");
}

#[test]
fn test_merged_schema_renders_ddl_and_rows() {
    let parser = base_parser();
    let merged = parser
        .merge_with_base(&parser.parse_yaml(PORTFOLIO_YAML).unwrap())
        .unwrap();

    let ddl = merged.to_ddl().unwrap();
    assert!(ddl.contains(
        "CREATE REL TABLE IF NOT EXISTS HOUSEHOLD_OWNS_ENTITY(FROM Household TO Entity, share DOUBLE);"
    ));

    let generator = Arc::new(IngestConfigGenerator::new(Arc::new(merged)));
    let adapter = SchemaAdapter::new(generator);
    let mut data = HashMap::new();
    data.insert("identifier".to_string(), json!("hh-1"));
    data.insert("tags".to_string(), json!(["retired", "trust"]));

    let row = adapter.build_row("household", &data).unwrap();
    assert_eq!(row.table, "Household");
    assert_eq!(row.get("members"), Some(&json!(0)));
    assert_eq!(row.get("tags"), Some(&json!(["retired", "trust"])));
}

#[test]
fn test_json_file_and_format_detection() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "notes.JSON",
        r#"{"name": "notes", "nodes": [{"name": "Note", "properties": [
            {"name": "id", "type": "uuid", "primary_key": true},
            {"name": "body", "type": "string"}
        ]}]}"#,
    );
    let schema = CustomSchemaParser::new().parse_file(&path).unwrap();
    assert_eq!(schema.get_node("Note").unwrap().primary_keys(), vec!["id"]);

    let unknown = write(&dir, "notes.toml", "name = 'notes'");
    assert!(matches!(
        CustomSchemaParser::new().parse_file(&unknown),
        Err(SchemaError::InvalidDefinition(_))
    ));
}

#[test]
fn test_base_references_need_a_base_aware_parser() {
    let document = r#"
name: links
extends: base
nodes:
  - name: Memo
    properties:
      - name: identifier
        type: STRING
        primary_key: true
relationships:
  - name: MEMO_ABOUT_REPORT
    from_node: Memo
    to_node: Report
"#;
    assert!(base_parser().parse_yaml(document).is_ok());
    assert!(matches!(
        CustomSchemaParser::new().parse_yaml(document),
        Err(SchemaError::Consistency(_))
    ));
}

#[test]
fn test_invalid_documents() {
    let parser = CustomSchemaParser::new();
    let reserved = r#"{"name": "x", "nodes": [{"name": "Tenant", "properties": [
        {"name": "id", "type": "STRING", "is_primary_key": true}]}]}"#;
    assert!(matches!(
        parser.parse_json(reserved),
        Err(SchemaError::ReservedName { .. })
    ));

    let bad_type = r#"{"name": "x", "nodes": [{"name": "Thing", "properties": [
        {"name": "id", "type": "STRING", "is_primary_key": true},
        {"name": "size", "type": "HUGEINT"}]}]}"#;
    match parser.parse_json(bad_type) {
        Err(SchemaError::UnsupportedType { property, type_name }) => {
            assert_eq!(property, "Thing.size");
            assert_eq!(type_name, "HUGEINT");
        }
        other => panic!("expected unsupported type, got {:?}", other),
    }

    assert!(matches!(
        parser.parse_json("[1, 2, 3]"),
        Err(SchemaError::InvalidDefinition(_))
    ));
    assert!(matches!(
        parser.parse_json("{not json"),
        Err(SchemaError::JsonError(_))
    ));
}
