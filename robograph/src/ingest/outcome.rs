// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Per-file outcomes and batch summaries

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::TableKind;

/// Terminal state of one file in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Loaded,
    Skipped,
    Failed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Loaded => write!(f, "loaded"),
            FileStatus::Skipped => write!(f, "skipped"),
            FileStatus::Failed => write!(f, "failed"),
        }
    }
}

/// What happened to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub table: Option<String>,
    pub kind: Option<TableKind>,
    pub status: FileStatus,
    pub rows: u64,
    pub elapsed_ms: u64,
    /// Error-tolerance flag passed to the bulk copy, when one was issued
    pub tolerate_errors: Option<bool>,
    pub message: Option<String>,
    pub warnings: Vec<String>,
}

impl FileOutcome {
    pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            table: None,
            kind: None,
            status,
            rows: 0,
            elapsed_ms: 0,
            tolerate_errors: None,
            message: None,
            warnings: Vec::new(),
        }
    }

    /// A skipped file carries its reason as both message and warning
    pub fn skipped(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let mut outcome = Self::new(path, FileStatus::Skipped);
        let message = message.into();
        outcome.warnings.push(message.clone());
        outcome.message = Some(message);
        outcome
    }

    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let mut outcome = Self::new(path, FileStatus::Failed);
        outcome.message = Some(message.into());
        outcome
    }

    pub fn with_table(mut self, table: impl Into<String>, kind: TableKind) -> Self {
        self.table = Some(table.into());
        self.kind = Some(kind);
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.status == FileStatus::Loaded
    }
}

/// Aggregated result of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
    pub loaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
    pub total_rows: u64,
}

impl BatchSummary {
    pub fn from_outcomes(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        outcomes: Vec<FileOutcome>,
    ) -> Self {
        let count = |status: FileStatus| outcomes.iter().filter(|o| o.status == status).count();
        let loaded = count(FileStatus::Loaded);
        let skipped = count(FileStatus::Skipped);
        let failed = count(FileStatus::Failed);
        let warnings = outcomes.iter().map(|o| o.warnings.len()).sum();
        let total_rows = outcomes.iter().map(|o| o.rows).sum();

        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
            loaded,
            skipped,
            failed,
            warnings,
            total_rows,
        }
    }

    /// No file failed; skipped files do not count as failures
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn files(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&FileOutcome> {
        self.outcomes.iter().find(|o| o.path == path)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
