// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "robograph", version, about = "RoboGraph schema composition and bulk ingestion")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,

    /// List registered base schemas and extensions
    Extensions,

    /// Compose a base schema with extensions
    Compose {
        /// Base schema name
        #[arg(long, default_value = "base")]
        base: String,

        /// Extensions to add, comma separated or repeated
        #[arg(short = 'e', long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print the DDL script instead of a summary
        #[arg(long)]
        ddl: bool,
    },

    /// Check a set of extensions for conflicting declarations
    Check {
        #[arg(short = 'e', long = "ext", value_delimiter = ',', required = true)]
        extensions: Vec<String>,
    },

    /// Parse a custom schema document (.json, .yaml, .yml)
    Custom {
        file: PathBuf,

        /// Merge the document with the base schema
        #[arg(long)]
        merge: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print the DDL script instead of a summary
        #[arg(long)]
        ddl: bool,
    },

    /// Complete a JSON record into a schema-shaped row
    Row {
        /// Table name, matched case-insensitively
        table: String,

        /// JSON object with column values
        #[arg(short, long, default_value = "{}")]
        data: String,

        #[arg(long, default_value = "base")]
        base: String,

        #[arg(short = 'e', long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,
    },

    /// Plan a bulk load without touching a store
    ///
    /// Files are routed by their parent directory name. Table DDL and copy
    /// statements are recorded and reported instead of executed.
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, default_value = "base")]
        base: String,

        #[arg(short = 'e', long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        /// Ingestion settings (.json, .yaml, .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also print the recorded statement script
        #[arg(long)]
        script: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_accept_commas_and_repeats() {
        let cli = Cli::parse_from([
            "robograph",
            "compose",
            "--ext",
            "roboledger,roboinvestor",
            "-e",
            "audit",
        ]);
        match cli.command {
            Commands::Compose {
                base, extensions, ..
            } => {
                assert_eq!(base, "base");
                assert_eq!(extensions, vec!["roboledger", "roboinvestor", "audit"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::parse_from(["robograph", "extensions", "--log-level", "info"]);
        assert_eq!(cli.log_level, Some(LogLevel::Info));
        assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_ingest_requires_files() {
        assert!(Cli::try_parse_from(["robograph", "ingest"]).is_err());
    }
}
