// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RoboGraph CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // -v wins over --log-level; RUST_LOG still applies when neither is given
    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "RoboGraph".bold().green(), robograph::VERSION);
            println!("Schema composition and bulk ingestion for tenant graphs");
            Ok(())
        }

        Commands::Extensions => cli::handle_extensions(),

        Commands::Compose {
            base,
            extensions,
            format,
            ddl,
        } => cli::handle_compose(&base, &extensions, format, ddl),

        Commands::Check { extensions } => cli::handle_check(&extensions),

        Commands::Custom {
            file,
            merge,
            format,
            ddl,
        } => cli::handle_custom(&file, merge, format, ddl),

        Commands::Row {
            table,
            data,
            base,
            extensions,
        } => cli::handle_row(&base, &extensions, &table, &data),

        Commands::Ingest {
            files,
            base,
            extensions,
            config,
            format,
            script,
        } => cli::handle_ingest(&base, &extensions, config.as_deref(), &files, format, script),
    }
}
