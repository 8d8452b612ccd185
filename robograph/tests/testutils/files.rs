//! Writers for input files the ingestion engine reads
//!
//! Parquet files carry a schema but no row groups; only the footer is read.

use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Parquet message with one optional UTF8 column per name
pub fn utf8_message(columns: &[&str]) -> String {
    let fields: Vec<String> = columns
        .iter()
        .map(|c| format!("    optional binary {} (UTF8);", c))
        .collect();
    format!("message batch {{\n{}\n}}", fields.join("\n"))
}

/// Write an empty parquet file with the given message type
pub fn write_parquet(path: &Path, message: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    let schema = Arc::new(parse_message_type(message).expect("valid parquet message"));
    let file = File::create(path).expect("create parquet file");
    let writer =
        SerializedFileWriter::new(file, schema, Default::default()).expect("parquet writer");
    writer.close().expect("close parquet writer");
}

/// Write a CSV file holding only a header row
pub fn write_csv_header(path: &Path, columns: &[&str]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, format!("{}\n", columns.join(","))).expect("write csv file");
}
