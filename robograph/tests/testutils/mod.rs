//! Test utilities for RoboGraph integration tests
//!
//! - IngestFixture: temp directory laid out like an export, plus a recording store
//! - files: helpers that write parquet footers and CSV headers

#![allow(dead_code)]

pub mod files;
pub mod ingest_fixture;
