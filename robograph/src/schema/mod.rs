// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema module - tenant graph schemas assembled from a base plus extensions
//
// This module holds the in-memory schema model, the composition engine that
// merges registered modules, and the parser for tenant-authored schemas.

pub mod cache;
pub mod composer;
pub mod ddl;
pub mod modules;
pub mod parser;
pub mod registry;
pub mod types;
pub mod validator;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Schema consistency error: {0}")]
    Consistency(String),

    #[error("'{name}' is a reserved name; reserved names are: {}", .reserved.join(", "))]
    ReservedName { name: String, reserved: Vec<String> },

    #[error("Unsupported type '{type_name}' for property '{property}'")]
    UnsupportedType { property: String, type_name: String },

    #[error("Node '{0}' has no primary key property")]
    MissingPrimaryKey(String),

    #[error("Invalid schema definition: {0}")]
    InvalidDefinition(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Invalid value for '{table}.{column}': expected {expected}, got {got}")]
    InvalidValue {
        table: String,
        column: String,
        expected: String,
        got: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
