// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RoboGraph - schema composition and bulk ingestion for multi-tenant graph databases
//!
//! Every tenant graph is built from a shared base schema plus a chosen set of
//! extension modules. RoboGraph compiles that combination into one validated
//! [`Schema`], renders idempotent storage DDL for it, and drives bulk loads of
//! columnar files into the resulting node and relationship tables.
//!
//! # Components
//!
//! - **Schema model** ([`schema::types`]): properties, nodes, relationships and DDL rendering
//! - **Composer** ([`SchemaComposer`]): base + extensions, compatibility checks, cached results
//! - **Custom schemas** ([`CustomSchemaParser`]): tenant-authored JSON/YAML documents
//! - **Ingest config** ([`IngestConfigGenerator`]): per-table metadata and file routing
//! - **Bulk ingestion** ([`BulkIngestionEngine`]): table creation and bulk copy per file
//! - **Schema adapter** ([`SchemaAdapter`]): row-level completion and validation
//!
//! # Usage
//!
//! ```ignore
//! use robograph::{BulkIngestionEngine, SchemaComposer, ScriptStore};
//! use std::sync::Arc;
//!
//! let composer = SchemaComposer::with_builtin();
//! let generator = composer.ingest_config("base", &["roboledger"])?;
//! let shared = composer.shared_entities("base")?;
//! let store = Arc::new(ScriptStore::new());
//!
//! let engine = BulkIngestionEngine::new(generator, store.clone(), shared);
//! let summary = engine.run(&files);
//! println!("{} loaded, {} failed", summary.loaded, summary.failed);
//! ```

pub mod adapter;
pub mod config;
pub mod ingest;
pub mod schema;
pub mod store;

pub use adapter::{Row, SchemaAdapter, ValidationResult};
pub use config::{ConfigError, IngestionConfig, TolerancePolicy};
pub use ingest::engine::{BulkIngestionEngine, SharedEntitySet};
pub use ingest::file_schema::{
    AutoSchemaReader, CsvSchemaReader, FileColumn, FileColumnType, FileSchemaReader,
    ParquetSchemaReader,
};
pub use ingest::config::{IngestConfigGenerator, IngestTableInfo, SchemaIngestConfig};
pub use ingest::outcome::{BatchSummary, FileOutcome, FileStatus};
pub use ingest::{IngestError, TableKind};
pub use schema::composer::{CompatibilityReport, SchemaComposer};
pub use schema::parser::custom::CustomSchemaParser;
pub use schema::registry::{ExtensionRegistry, SchemaModule};
pub use schema::types::{Node, Property, Relationship, Schema, SchemaVersion, TypeTag};
pub use schema::{SchemaError, SchemaResult};
pub use store::script::ScriptStore;
pub use store::{GraphStore, StoreError};

/// RoboGraph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// RoboGraph crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
