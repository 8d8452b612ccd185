// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for RoboGraph

use colored::Colorize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use robograph::{
    BulkIngestionEngine, CustomSchemaParser, IngestionConfig, SchemaAdapter, SchemaComposer,
    ScriptStore,
};

use super::commands::OutputFormat;
use super::output::ReportFormatter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn handle_extensions() -> CliResult {
    let composer = SchemaComposer::with_builtin();
    print!("{}", ReportFormatter::registry(composer.registry()));
    Ok(())
}

pub fn handle_compose(base: &str, extensions: &[String], format: OutputFormat, ddl: bool) -> CliResult {
    let composer = SchemaComposer::with_builtin();
    let schema = composer.compose(base, extensions)?;

    if ddl {
        println!("{}", schema.to_ddl()?);
    } else {
        println!("{}", ReportFormatter::schema(&schema, format));
    }
    Ok(())
}

pub fn handle_check(extensions: &[String]) -> CliResult {
    let composer = SchemaComposer::with_builtin();
    let report = composer.check_compatibility(extensions);
    print!("{}", ReportFormatter::compatibility(&report));

    if report.compatible {
        Ok(())
    } else {
        Err(format!("{} conflict(s) found", report.conflicts.len()).into())
    }
}

pub fn handle_custom(file: &Path, merge: bool, format: OutputFormat, ddl: bool) -> CliResult {
    let composer = SchemaComposer::with_builtin();
    let parser = CustomSchemaParser::with_base(composer.compose::<&str>("base", &[])?);

    let mut schema = parser.parse_file(file)?;
    if merge {
        schema = parser.merge_with_base(&schema)?;
    }

    if ddl {
        println!("{}", schema.to_ddl()?);
    } else {
        println!("{}", ReportFormatter::schema(&schema, format));
    }
    Ok(())
}

pub fn handle_row(base: &str, extensions: &[String], table: &str, data: &str) -> CliResult {
    let composer = SchemaComposer::with_builtin();
    let adapter = SchemaAdapter::new(composer.ingest_config(base, extensions)?);

    let data: HashMap<String, serde_json::Value> = serde_json::from_str(data)
        .map_err(|e| format!("--data must be a JSON object: {}", e))?;
    let row = adapter.build_row(table, &data)?;

    println!("{}", serde_json::to_string_pretty(&row.to_json())?);
    Ok(())
}

pub fn handle_ingest(
    base: &str,
    extensions: &[String],
    config: Option<&Path>,
    files: &[PathBuf],
    format: OutputFormat,
    script: bool,
) -> CliResult {
    let config = match config {
        Some(path) => IngestionConfig::from_path(path)?,
        None => IngestionConfig::default(),
    };

    let composer = SchemaComposer::with_builtin();
    let generator = composer.ingest_config(base, extensions)?;
    let shared = composer.shared_entities(base)?;
    let store = Arc::new(ScriptStore::new());

    let engine = BulkIngestionEngine::new(generator, store.clone(), shared).with_config(config);
    let summary = engine.run(files);

    println!("{}", ReportFormatter::summary(&summary, format));
    if script {
        println!("{}", "Recorded statements:".bold());
        println!("{}", store.script());
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(format!("{} file(s) failed", summary.failed).into())
    }
}
