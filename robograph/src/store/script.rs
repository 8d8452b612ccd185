// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory [`GraphStore`] that records a script instead of touching data
//!
//! Every DDL statement, copy and timeout change is appended to the script.
//! Table declarations are parsed back into a catalog so copies into missing
//! tables fail the way they would against a real store. Used for dry runs.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::ddl::{parse_statement, TableDecl};
use super::{GraphStore, StoreError, StoreResult};

/// One bulk copy issued against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRecord {
    pub table: String,
    pub file_path: PathBuf,
    pub tolerate_errors: bool,
    /// Query timeout in effect when the copy ran
    pub timeout_ms: Option<u64>,
}

impl CopyRecord {
    pub fn to_statement(&self) -> String {
        format!(
            "COPY {} FROM '{}' (ignore_errors={})",
            self.table,
            self.file_path.display(),
            self.tolerate_errors
        )
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    statements: Vec<String>,
    tables: BTreeMap<String, TableDecl>,
    copies: Vec<CopyRecord>,
    timeout_history: Vec<u64>,
    current_timeout: Option<u64>,
}

/// Recording store for dry runs and tests
#[derive(Debug, Default)]
pub struct ScriptStore {
    state: Mutex<ScriptState>,
    row_counts: HashMap<PathBuf, u64>,
    failing_tables: HashSet<String>,
    default_rows: u64,
}

impl ScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows reported for copies of `path`
    pub fn with_row_count(mut self, path: impl Into<PathBuf>, rows: u64) -> Self {
        self.row_counts.insert(path.into(), rows);
        self
    }

    /// Rows reported for copies of files without an explicit count
    pub fn with_default_rows(mut self, rows: u64) -> Self {
        self.default_rows = rows;
        self
    }

    /// Reject every copy into `table`
    pub fn fail_copies_for(mut self, table: impl Into<String>) -> Self {
        self.failing_tables.insert(table.into());
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    /// The recorded script, one `;`-terminated statement per line
    pub fn script(&self) -> String {
        self.state
            .lock()
            .statements
            .iter()
            .map(|s| format!("{};", s))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn copies(&self) -> Vec<CopyRecord> {
        self.state.lock().copies.clone()
    }

    pub fn tables(&self) -> Vec<TableDecl> {
        self.state.lock().tables.values().cloned().collect()
    }

    pub fn table(&self, name: &str) -> Option<TableDecl> {
        self.state.lock().tables.get(name).cloned()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.state.lock().tables.contains_key(name)
    }

    pub fn current_timeout(&self) -> Option<u64> {
        self.state.lock().current_timeout
    }

    pub fn timeout_history(&self) -> Vec<u64> {
        self.state.lock().timeout_history.clone()
    }
}

impl GraphStore for ScriptStore {
    fn execute(&self, statement: &str) -> StoreResult<()> {
        let statement = statement.trim().trim_end_matches(';').trim_end();
        let mut state = self.state.lock();

        let upper = statement.to_ascii_uppercase();
        if upper.starts_with("CREATE") {
            let decl = parse_statement(statement)?;
            match state.tables.get(&decl.name) {
                Some(_) if decl.if_not_exists => {}
                Some(_) => {
                    return Err(StoreError::QueryFailed(format!(
                        "Table '{}' already exists",
                        decl.name
                    )))
                }
                None => {
                    let missing = decl.endpoints.iter().find(|(from, to)| {
                        !state.tables.contains_key(from) || !state.tables.contains_key(to)
                    });
                    if let Some((from, to)) = missing {
                        return Err(StoreError::QueryFailed(format!(
                            "Relationship '{}' references missing table(s) '{}' -> '{}'",
                            decl.name, from, to
                        )));
                    }
                    state.tables.insert(decl.name.clone(), decl);
                }
            }
        }

        state.statements.push(statement.to_string());
        Ok(())
    }

    fn bulk_copy(&self, table: &str, file_path: &Path, tolerate_errors: bool) -> StoreResult<u64> {
        let mut state = self.state.lock();

        if !state.tables.contains_key(table) {
            return Err(StoreError::CopyFailed {
                table: table.to_string(),
                message: "table does not exist".to_string(),
            });
        }

        let record = CopyRecord {
            table: table.to_string(),
            file_path: file_path.to_path_buf(),
            tolerate_errors,
            timeout_ms: state.current_timeout,
        };
        state.statements.push(record.to_statement());
        state.copies.push(record);

        if self.failing_tables.contains(table) {
            return Err(StoreError::CopyFailed {
                table: table.to_string(),
                message: "copy rejected by store".to_string(),
            });
        }

        Ok(self
            .row_counts
            .get(file_path)
            .copied()
            .unwrap_or(self.default_rows))
    }

    fn set_query_timeout(&self, timeout_ms: u64) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.statements.push(format!("CALL timeout={}", timeout_ms));
        state.timeout_history.push(timeout_ms);
        state.current_timeout = Some(timeout_ms);
        Ok(())
    }
}
