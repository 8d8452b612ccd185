// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Row-level access to a compiled schema
//!
//! Completes ad hoc records into schema-shaped rows and compares column sets
//! against a table's declared columns. Used for single-record writes; bulk
//! loads go through the ingestion engine instead.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::ingest::config::{IngestConfigGenerator, RELATIONSHIP_KEY_COLUMNS};
use crate::schema::types::TypeTag;
use crate::schema::{SchemaError, SchemaResult};

/// A schema-shaped row: every declared column in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub table: String,
    pub values: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.values.iter().cloned().collect())
    }
}

/// Outcome of comparing a row's columns with the declared columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub missing_columns: Vec<String>,
    pub extra_columns: Vec<String>,
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub struct SchemaAdapter {
    generator: Arc<IngestConfigGenerator>,
}

impl SchemaAdapter {
    pub fn new(generator: Arc<IngestConfigGenerator>) -> Self {
        Self { generator }
    }

    /// Canonical table name, matched case-insensitively or by file pattern
    pub fn resolve_table(&self, table_name: &str) -> SchemaResult<String> {
        self.generator
            .canonical_table_name(table_name)
            .map(String::from)
            .or_else(|| self.generator.resolve_table_name_from_pattern(table_name))
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))
    }

    /// Declared columns of a table with their types
    ///
    /// Relationship tables start with `from` and `to`, both STRING.
    pub fn expected_columns(&self, table_name: &str) -> SchemaResult<Vec<(String, TypeTag)>> {
        let table = self.resolve_table(table_name)?;
        let schema = self.generator.schema();

        if let Some(node) = schema.get_node(&table) {
            return Ok(node
                .properties
                .iter()
                .map(|p| (p.name.clone(), p.type_tag.clone()))
                .collect());
        }

        let relationship = schema
            .get_relationship(&table)
            .ok_or_else(|| SchemaError::UnknownTable(table_name.to_string()))?;

        Ok(RELATIONSHIP_KEY_COLUMNS
            .iter()
            .map(|k| (k.to_string(), TypeTag::String))
            .chain(
                relationship
                    .properties
                    .iter()
                    .map(|p| (p.name.clone(), p.type_tag.clone())),
            )
            .collect())
    }

    /// Complete `data` into a row with every declared column
    ///
    /// Absent columns get their type's default. Supplied values must fit the
    /// declared type; keys that are not declared columns are ignored.
    pub fn build_row(&self, table_name: &str, data: &HashMap<String, Value>) -> SchemaResult<Row> {
        let table = self.resolve_table(table_name)?;
        let columns = self.expected_columns(&table)?;

        let mut values = Vec::with_capacity(columns.len());
        for (column, type_tag) in columns {
            let value = match data.get(&column) {
                Some(value) if type_tag.accepts(value) => value.clone(),
                Some(value) => {
                    return Err(SchemaError::InvalidValue {
                        table,
                        column,
                        expected: type_tag.to_string(),
                        got: json_type_name(value).to_string(),
                    })
                }
                None => type_tag.default_value(),
            };
            values.push((column, value));
        }

        let undeclared = data
            .keys()
            .filter(|k| !values.iter().any(|(name, _)| name == *k))
            .count();
        if undeclared > 0 {
            log::debug!("Ignored {} undeclared column(s) for '{}'", undeclared, table);
        }

        Ok(Row { table, values })
    }

    /// Compare a row's column set with the declared columns
    pub fn validate<S: AsRef<str>>(
        &self,
        table_name: &str,
        row_columns: &[S],
    ) -> SchemaResult<ValidationResult> {
        let expected: Vec<String> = self
            .expected_columns(table_name)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let expected_set: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
        let actual_set: BTreeSet<&str> = row_columns.iter().map(|c| c.as_ref()).collect();

        let missing_columns: Vec<String> = expected
            .iter()
            .filter(|c| !actual_set.contains(c.as_str()))
            .cloned()
            .collect();
        let mut extra_columns: Vec<String> = Vec::new();
        for column in row_columns {
            let column = column.as_ref();
            if !expected_set.contains(column) && !extra_columns.iter().any(|c| c == column) {
                extra_columns.push(column.to_string());
            }
        }

        Ok(ValidationResult {
            valid: missing_columns.is_empty()
                && extra_columns.is_empty()
                && row_columns.len() == expected.len(),
            missing_columns,
            extra_columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::composer::SchemaComposer;
    use serde_json::json;

    fn adapter() -> SchemaAdapter {
        let composer = SchemaComposer::with_builtin();
        SchemaAdapter::new(composer.ingest_config("base", &["roboledger"]).unwrap())
    }

    fn data(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_build_row_fills_typed_defaults() {
        let row = adapter()
            .build_row("account", &data(&[("identifier", json!("acc-1"))]))
            .unwrap();

        assert_eq!(row.table, "Account");
        assert_eq!(row.columns()[0], "identifier");
        assert_eq!(row.get("identifier"), Some(&json!("acc-1")));
        assert_eq!(row.get("name"), Some(&json!("")));
        assert_eq!(row.get("is_active"), Some(&json!(false)));
        assert_eq!(row.get("depth"), Some(&json!(0)));
    }

    #[test]
    fn test_date_and_float_defaults() {
        let row = adapter()
            .build_row("Transaction", &data(&[("identifier", json!("t-1"))]))
            .unwrap();
        assert_eq!(row.get("date"), Some(&Value::Null));
        assert_eq!(row.get("posted_at"), Some(&Value::Null));
        assert_eq!(row.get("amount"), Some(&json!(0.0)));
    }

    #[test]
    fn test_relationship_row_starts_with_endpoints() {
        let row = adapter()
            .build_row(
                "ENTITY_HAS_REPORT",
                &data(&[("from", json!("e-1")), ("to", json!("r-1"))]),
            )
            .unwrap();
        assert_eq!(row.columns(), vec!["from", "to", "filing_context"]);
        assert_eq!(row.to_json()["from"], json!("e-1"));
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let result = adapter().build_row(
            "Account",
            &data(&[("identifier", json!("a")), ("depth", json!("deep"))]),
        );
        match result {
            Err(SchemaError::InvalidValue {
                column, expected, got, ..
            }) => {
                assert_eq!(column, "depth");
                assert_eq!(expected, "INT32");
                assert_eq!(got, "string");
            }
            other => panic!("expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_table() {
        assert!(matches!(
            adapter().build_row("Ledger", &HashMap::new()),
            Err(SchemaError::UnknownTable(name)) if name == "Ledger"
        ));
    }

    #[test]
    fn test_pattern_resolution() {
        assert_eq!(adapter().resolve_table("node_line_item").unwrap(), "LineItem");
    }

    #[test]
    fn test_validate_reports_missing_and_extra() {
        let adapter = adapter();
        let result = adapter
            .validate("Unit", &["identifier", "uri", "symbol"])
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.missing_columns, vec!["measure", "value"]);
        assert_eq!(result.extra_columns, vec!["symbol"]);

        let ok = adapter
            .validate("Unit", &["identifier", "uri", "measure", "value"])
            .unwrap();
        assert!(ok.valid);
        assert!(ok.missing_columns.is_empty() && ok.extra_columns.is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let result = adapter()
            .validate("Unit", &["identifier", "uri", "measure", "value", "value"])
            .unwrap();
        assert!(!result.valid);
        assert!(result.missing_columns.is_empty());
    }
}
