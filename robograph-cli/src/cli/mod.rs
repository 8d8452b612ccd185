// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for RoboGraph
//!
//! Inspects the module registry, composes and checks schemas, parses custom
//! schema documents and plans bulk loads.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_check, handle_compose, handle_custom, handle_extensions, handle_ingest, handle_row,
};
