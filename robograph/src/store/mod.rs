// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Store module - the storage engine capability used by ingestion
//
// The embedded graph engine is an external collaborator. Ingestion only ever
// reaches it through `GraphStore`: execute a statement, bulk-copy a file into
// a table, and change the query timeout.

pub mod ddl;
pub mod script;
pub mod timeout;

use std::path::Path;
use thiserror::Error;

pub use timeout::QueryTimeoutGuard;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Copy into '{table}' failed: {message}")]
    CopyFailed { table: String, message: String },

    #[error("Timeout change rejected: {0}")]
    Timeout(String),

    #[error("DDL parse error: {0}")]
    Parse(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage engine capability
///
/// Implementations must be shareable across threads; all methods take
/// `&self` and synchronize internally.
pub trait GraphStore: Send + Sync {
    /// Execute one DDL statement or query
    fn execute(&self, statement: &str) -> StoreResult<()>;

    /// Load a whole file into `table`, returning the number of rows copied
    ///
    /// With `tolerate_errors` set, bad rows (including duplicate keys) are
    /// skipped instead of failing the copy.
    fn bulk_copy(&self, table: &str, file_path: &Path, tolerate_errors: bool) -> StoreResult<u64>;

    fn set_query_timeout(&self, timeout_ms: u64) -> StoreResult<()>;
}
