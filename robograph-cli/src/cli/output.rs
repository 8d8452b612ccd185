// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use robograph::{BatchSummary, CompatibilityReport, ExtensionRegistry, FileStatus, Schema};

use super::commands::OutputFormat;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn registry(registry: &ExtensionRegistry) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Module").fg(Color::Green),
            Cell::new("Kind").fg(Color::Green),
        ]);

        for name in registry.base_names() {
            table.add_row(vec![name, "base".to_string()]);
        }
        for name in registry.discover_available_extensions() {
            table.add_row(vec![name, "extension".to_string()]);
        }

        format!("{}\n", table)
    }

    pub fn schema(schema: &Schema, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(schema).unwrap_or_else(|e| {
                format!("{{\"status\": \"error\", \"error\": \"{}\"}}", e)
            }),
            OutputFormat::Table => Self::schema_table(schema),
        }
    }

    fn schema_table(schema: &Schema) -> String {
        let stats = schema.stats();
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            schema.name.bold().green(),
            schema.version.to_string().dimmed()
        ));
        if let Some(description) = &schema.description {
            output.push_str(&format!("{}\n", description));
        }
        output.push_str(&format!(
            "Nodes: {}  Relationships: {}\n\n",
            stats.nodes, stats.relationships
        ));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Table").fg(Color::Green),
            Cell::new("Kind").fg(Color::Green),
            Cell::new("Key / Endpoints").fg(Color::Green),
            Cell::new("Columns").fg(Color::Green),
        ]);

        for node in &schema.nodes {
            table.add_row(vec![
                node.name.clone(),
                "node".to_string(),
                node.primary_keys().join(", "),
                node.properties.len().to_string(),
            ]);
        }
        for relationship in &schema.relationships {
            table.add_row(vec![
                relationship.name.clone(),
                "relationship".to_string(),
                format!("{} -> {}", relationship.from_node, relationship.to_node),
                relationship.properties.len().to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    pub fn compatibility(report: &CompatibilityReport) -> String {
        if report.compatible {
            return format!("{}\n", "✅ Extensions are compatible".green());
        }

        let mut output = format!("{}\n", "❌ Extensions conflict".bold().red());
        for (i, conflict) in report.conflicts.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, conflict.yellow()));
        }
        output
    }

    pub fn summary(summary: &BatchSummary, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => summary.to_json().unwrap_or_else(|e| {
                format!("{{\"status\": \"error\", \"error\": \"{}\"}}", e)
            }),
            OutputFormat::Table => Self::summary_table(summary),
        }
    }

    fn summary_table(summary: &BatchSummary) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Ingestion run".bold().green(), summary.run_id));
        output.push_str(&format!(
            "Files: {}  Loaded: {}  Skipped: {}  Failed: {}  Rows: {}  Time: {} ms\n\n",
            summary.files(),
            summary.loaded.to_string().green(),
            summary.skipped.to_string().yellow(),
            summary.failed.to_string().red(),
            summary.total_rows,
            summary.duration_ms()
        ));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("File").fg(Color::Green),
            Cell::new("Table").fg(Color::Green),
            Cell::new("Status").fg(Color::Green),
            Cell::new("Ignore errors").fg(Color::Green),
            Cell::new("Rows").fg(Color::Green),
            Cell::new("Message").fg(Color::Green),
        ]);

        for outcome in &summary.outcomes {
            let status_color = match outcome.status {
                FileStatus::Loaded => Color::Green,
                FileStatus::Skipped => Color::Yellow,
                FileStatus::Failed => Color::Red,
            };
            table.add_row(vec![
                Cell::new(outcome.path.display()),
                Cell::new(outcome.table.as_deref().unwrap_or("-")),
                Cell::new(outcome.status).fg(status_color),
                Cell::new(
                    outcome
                        .tolerate_errors
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(outcome.rows),
                Cell::new(outcome.message.as_deref().unwrap_or("")),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        let warnings: Vec<&String> = summary.outcomes.iter().flat_map(|o| &o.warnings).collect();
        if !warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".bold().yellow()));
            for (i, warning) in warnings.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, warning.yellow()));
            }
        }

        output
    }
}
