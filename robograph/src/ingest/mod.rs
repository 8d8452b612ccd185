// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Ingest module - schema-driven routing and bulk loading of columnar files
//
// The config generator derives per-table metadata from a compiled schema, the
// file schema readers inspect file footers and headers, and the bulk ingestion
// engine ensures tables and issues bulk copies one file at a time.

pub mod config;
pub mod engine;
pub mod file_schema;
pub mod naming;
pub mod outcome;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::store::StoreError;

/// Ingestion-time failures, isolated to the file they concern
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Table creation skipped: {0}")]
    TableCreationSkipped(String),

    #[error("Bulk copy into '{table}' failed: {message}")]
    BulkCopyFailure { table: String, message: String },

    #[error("Cannot read schema of '{path}': {message}")]
    FileSchema { path: String, message: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Which kind of table a file targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Node,
    Relationship,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Node => write!(f, "node"),
            TableKind::Relationship => write!(f, "relationship"),
        }
    }
}
