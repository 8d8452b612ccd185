// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema-driven bulk ingestion
//!
//! Each file moves through classify, ensure table and load, ending as
//! loaded, skipped or failed. Classification is a pure lookup and runs in
//! parallel; table creation and copies run one file at a time, node files
//! before relationship files. A failure never leaves its file.

use chrono::Utc;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::config::{IngestConfigGenerator, RELATIONSHIP_KEY_COLUMNS};
use super::file_schema::{AutoSchemaReader, FileColumn, FileColumnType, FileSchemaReader};
use super::outcome::{BatchSummary, FileOutcome, FileStatus};
use super::{IngestError, TableKind};
use crate::config::IngestionConfig;
use crate::schema::ddl::{render_node_table, render_rel_table};
use crate::schema::types::{Property, Schema};
use crate::store::{GraphStore, QueryTimeoutGuard};

/// Tables shared across ingestion batches
///
/// Copies into these tables tolerate bad rows, since independent batches
/// routinely rewrite the same keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedEntitySet {
    names: BTreeSet<String>,
}

impl SharedEntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every node and relationship declared by `schema`
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            names: schema.entity_names(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SharedEntitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Loads columnar files into the tables of one compiled schema
pub struct BulkIngestionEngine {
    generator: Arc<IngestConfigGenerator>,
    store: Arc<dyn GraphStore>,
    reader: Arc<dyn FileSchemaReader>,
    config: IngestionConfig,
    shared: SharedEntitySet,
    /// Tables whose DDL has been issued in the current run
    ensured: Mutex<HashSet<String>>,
}

impl BulkIngestionEngine {
    pub fn new(
        generator: Arc<IngestConfigGenerator>,
        store: Arc<dyn GraphStore>,
        shared: SharedEntitySet,
    ) -> Self {
        Self {
            generator,
            store,
            reader: Arc::new(AutoSchemaReader::default()),
            config: IngestionConfig::default(),
            shared,
            ensured: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn FileSchemaReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_config(mut self, config: IngestionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub fn generator(&self) -> &Arc<IngestConfigGenerator> {
        &self.generator
    }

    pub fn shared_entities(&self) -> &SharedEntitySet {
        &self.shared
    }

    /// Error-tolerance flag used for copies into `table`
    pub fn tolerate_errors(&self, table: &str) -> bool {
        self.config
            .tolerance
            .tolerate_errors(self.shared.contains(table))
    }

    /// Ingest a batch of files
    ///
    /// Never fails as a whole: every file ends with its own [`FileOutcome`].
    /// Unresolvable files come first in the summary, then node files, then
    /// relationship files, each group in input order.
    pub fn run<P: AsRef<Path> + Sync>(&self, files: &[P]) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        self.ensured.lock().clear();

        log::info!("Ingestion run {} started: {} files", run_id, files.len());

        let classified: Vec<Option<(String, TableKind)>> = files
            .par_iter()
            .map(|path| self.generator.classify(path.as_ref()))
            .collect();

        let mut outcomes = Vec::with_capacity(files.len());
        let mut nodes = Vec::new();
        let mut relationships = Vec::new();

        for (path, classification) in files.iter().zip(classified) {
            let path = path.as_ref();
            match classification {
                Some((table, TableKind::Node)) => nodes.push((path, table)),
                Some((table, TableKind::Relationship)) => relationships.push((path, table)),
                None => outcomes.push(self.unresolved(path)),
            }
        }

        log::debug!(
            "Run {}: {} node files, {} relationship files, {} unresolved",
            run_id,
            nodes.len(),
            relationships.len(),
            outcomes.len()
        );

        for (path, table) in nodes {
            outcomes.push(self.process(path, &table, TableKind::Node));
        }
        for (path, table) in relationships {
            outcomes.push(self.process(path, &table, TableKind::Relationship));
        }

        let summary = BatchSummary::from_outcomes(run_id, started_at, outcomes);
        log::info!(
            "Ingestion run {} finished: {} loaded, {} skipped, {} failed, {} rows",
            run_id,
            summary.loaded,
            summary.skipped,
            summary.failed,
            summary.total_rows
        );
        summary
    }

    /// Run the full pipeline for a single file
    pub fn ingest_file(&self, path: &Path) -> FileOutcome {
        match self.generator.classify(path) {
            Some((table, kind)) => self.process(path, &table, kind),
            None => self.unresolved(path),
        }
    }

    fn unresolved(&self, path: &Path) -> FileOutcome {
        log::warn!("Skipping '{}': no table matches its directory", path.display());
        FileOutcome::skipped(path, "no table matches the enclosing directory")
    }

    fn process(&self, path: &Path, table: &str, kind: TableKind) -> FileOutcome {
        match self.ensure_table(path, table, kind) {
            Ok(()) => {}
            Err(IngestError::TableCreationSkipped(reason)) => {
                log::warn!("Skipping '{}': {}", path.display(), reason);
                return FileOutcome::skipped(path, reason).with_table(table, kind);
            }
            Err(e) => {
                log::error!("Cannot ensure table '{}' for '{}': {}", table, path.display(), e);
                return FileOutcome::failed(path, e.to_string()).with_table(table, kind);
            }
        }

        let tolerate_errors = self.tolerate_errors(table);
        let started = Instant::now();
        let result = self.load(path, table, tolerate_errors);
        let elapsed = started.elapsed();

        let mut outcome = FileOutcome::new(path, FileStatus::Loaded).with_table(table, kind);
        outcome.tolerate_errors = Some(tolerate_errors);
        outcome.elapsed_ms = elapsed.as_millis() as u64;

        match result {
            Ok(rows) => {
                outcome.rows = rows;
                let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
                let threshold = self.config.ms_per_row_threshold(kind);
                if rows > 0 && elapsed_ms / rows as f64 > threshold {
                    let warning = format!(
                        "{:.3}ms per row loading '{}' exceeds the {} threshold of {}ms",
                        elapsed_ms / rows as f64,
                        table,
                        kind,
                        threshold
                    );
                    log::warn!("{}", warning);
                    outcome.warnings.push(warning);
                }
                log::info!(
                    "Loaded {} rows into '{}' from '{}' in {}ms",
                    rows,
                    table,
                    path.display(),
                    outcome.elapsed_ms
                );
            }
            Err(e) => {
                log::error!("{}", e);
                outcome.status = FileStatus::Failed;
                outcome.message = Some(e.to_string());
            }
        }

        outcome
    }

    /// Create the table for `path` unless this run already did
    ///
    /// The lock is held across the read, render and execute steps so two
    /// callers never race on the same new table.
    fn ensure_table(&self, path: &Path, table: &str, kind: TableKind) -> Result<(), IngestError> {
        let mut ensured = self.ensured.lock();
        if self.config.cache_ddl_per_run && ensured.contains(table) {
            log::debug!("Table '{}' already ensured in this run", table);
            return Ok(());
        }

        let file_columns = self.reader.read_columns(path)?;
        let statement = match kind {
            TableKind::Node => self.node_table_ddl(table, &file_columns)?,
            TableKind::Relationship => self.rel_table_ddl(table, &file_columns)?,
        };

        log::debug!("Ensuring table '{}': {}", table, statement);
        self.store.execute(&statement)?;
        ensured.insert(table.to_string());
        Ok(())
    }

    /// Bulk copy with the query timeout raised for the duration of the copy
    fn load(&self, path: &Path, table: &str, tolerate_errors: bool) -> Result<u64, IngestError> {
        let _timeout = match QueryTimeoutGuard::raise(
            self.store.as_ref(),
            self.config.bulk_copy_timeout_ms,
            self.config.default_query_timeout_ms,
        ) {
            Ok(guard) => Some(guard),
            Err(e) => {
                log::warn!("Could not raise query timeout before loading '{}': {}", table, e);
                None
            }
        };

        log::debug!(
            "Copying '{}' into '{}' (ignore_errors={})",
            path.display(),
            table,
            tolerate_errors
        );

        self.store
            .bulk_copy(table, path, tolerate_errors)
            .map_err(|e| IngestError::BulkCopyFailure {
                table: table.to_string(),
                message: e.to_string(),
            })
    }

    fn node_table_ddl(&self, table: &str, file_columns: &[FileColumn]) -> Result<String, IngestError> {
        let node = self.generator.schema().get_node(table).ok_or_else(|| {
            IngestError::TableCreationSkipped(format!("node table '{}' is not declared", table))
        })?;

        let columns = intersect_columns(&node.properties, file_columns);
        if columns.is_empty() {
            return Err(IngestError::TableCreationSkipped(format!(
                "file has no columns declared by '{}'",
                table
            )));
        }

        let primary_keys: Vec<String> = node.primary_keys().into_iter().map(String::from).collect();
        if let Some(missing) = primary_keys
            .iter()
            .find(|k| !columns.iter().any(|(name, _)| name == *k))
        {
            return Err(IngestError::TableCreationSkipped(format!(
                "primary key column '{}' of '{}' is missing from the file",
                missing, table
            )));
        }

        Ok(render_node_table(table, &columns, &primary_keys))
    }

    fn rel_table_ddl(&self, table: &str, file_columns: &[FileColumn]) -> Result<String, IngestError> {
        let schema = self.generator.schema();
        let relationship = schema.get_relationship(table).ok_or_else(|| {
            IngestError::TableCreationSkipped(format!(
                "relationship table '{}' is not declared",
                table
            ))
        })?;

        let endpoints = schema.endpoint_pairs(relationship).ok_or_else(|| {
            IngestError::TableCreationSkipped(format!(
                "endpoint node table(s) '{}' -> '{}' of '{}' are not in the schema",
                relationship.from_node, relationship.to_node, table
            ))
        })?;

        let present: HashSet<&str> = file_columns.iter().map(|c| c.name.as_str()).collect();
        let columns = intersect_columns(&relationship.properties, file_columns);
        let has_keys = RELATIONSHIP_KEY_COLUMNS.iter().all(|k| present.contains(k));

        if !has_keys && columns.is_empty() {
            return Err(IngestError::TableCreationSkipped(format!(
                "file has no columns declared by '{}'",
                table
            )));
        }
        if !has_keys {
            return Err(IngestError::TableCreationSkipped(format!(
                "file for '{}' lacks the 'from'/'to' key columns",
                table
            )));
        }

        Ok(render_rel_table(table, &endpoints, &columns))
    }
}

/// Declared properties present in the file, in declaration order, typed by the file
fn intersect_columns(declared: &[Property], file_columns: &[FileColumn]) -> Vec<(String, String)> {
    let file_types: HashMap<&str, &FileColumnType> = file_columns
        .iter()
        .map(|c| (c.name.as_str(), &c.column_type))
        .collect();

    declared
        .iter()
        .filter_map(|property| {
            file_types
                .get(property.name.as_str())
                .map(|file_type| (property.name.clone(), file_type.storage_type().to_string()))
        })
        .collect()
}
