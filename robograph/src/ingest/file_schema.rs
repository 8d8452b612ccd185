// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Column schemas of data files
//!
//! Only file metadata is read: the parquet footer or the CSV header row.
//! Native column types are parsed once into [`FileColumnType`], and every
//! variant maps to exactly one storage [`TypeTag`].

use parquet::basic::{ConvertedType, LogicalType, Type as PhysicalType};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::schema::types::Type as ParquetType;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::IngestError;
use crate::schema::types::TypeTag;

/// Native column type of a data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileColumnType {
    Utf8,
    LargeUtf8,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Decimal,
    Boolean,
    Date32,
    Date64,
    Timestamp,
    /// Any type without a storage mapping, kept with its original spelling
    Unrecognized(String),
}

impl FileColumnType {
    /// Parse an Arrow-style type spelling (`int64`, `large_string`, `timestamp[us]`)
    pub fn parse(spelling: &str) -> Self {
        let normalized = spelling.trim().to_ascii_lowercase();
        let head = normalized
            .split(|c| c == '[' || c == '(' || c == '<')
            .next()
            .unwrap_or_default()
            .trim();

        match head {
            "string" | "utf8" | "str" | "text" => FileColumnType::Utf8,
            "large_string" | "large_utf8" | "largeutf8" => FileColumnType::LargeUtf8,
            "int8" => FileColumnType::Int8,
            "int16" => FileColumnType::Int16,
            "int32" => FileColumnType::Int32,
            "int64" => FileColumnType::Int64,
            "uint8" => FileColumnType::UInt8,
            "uint16" => FileColumnType::UInt16,
            "uint32" => FileColumnType::UInt32,
            "uint64" => FileColumnType::UInt64,
            "halffloat" | "float16" => FileColumnType::Float16,
            "float" | "float32" => FileColumnType::Float32,
            "double" | "float64" => FileColumnType::Float64,
            "decimal" | "decimal128" | "decimal256" => FileColumnType::Decimal,
            "bool" | "boolean" => FileColumnType::Boolean,
            "date32" | "date" => FileColumnType::Date32,
            "date64" => FileColumnType::Date64,
            "timestamp" | "datetime" => FileColumnType::Timestamp,
            _ => FileColumnType::Unrecognized(spelling.trim().to_string()),
        }
    }

    /// Storage type used when creating a table from this column
    pub fn storage_type(&self) -> TypeTag {
        match self {
            FileColumnType::Utf8 | FileColumnType::LargeUtf8 => TypeTag::String,
            FileColumnType::Int8
            | FileColumnType::Int16
            | FileColumnType::Int32
            | FileColumnType::UInt8
            | FileColumnType::UInt16 => TypeTag::Int32,
            FileColumnType::Int64 | FileColumnType::UInt32 | FileColumnType::UInt64 => {
                TypeTag::Int64
            }
            FileColumnType::Float16 | FileColumnType::Float32 => TypeTag::Float,
            FileColumnType::Float64 | FileColumnType::Decimal => TypeTag::Double,
            FileColumnType::Boolean => TypeTag::Boolean,
            FileColumnType::Date32 | FileColumnType::Date64 => TypeTag::Date,
            FileColumnType::Timestamp => TypeTag::Timestamp,
            FileColumnType::Unrecognized(spelling) => {
                log::debug!("No storage mapping for '{}', defaulting to STRING", spelling);
                TypeTag::String
            }
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FileColumnType::Unrecognized(_))
    }
}

impl fmt::Display for FileColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileColumnType::Utf8 => "utf8",
            FileColumnType::LargeUtf8 => "large_utf8",
            FileColumnType::Int8 => "int8",
            FileColumnType::Int16 => "int16",
            FileColumnType::Int32 => "int32",
            FileColumnType::Int64 => "int64",
            FileColumnType::UInt8 => "uint8",
            FileColumnType::UInt16 => "uint16",
            FileColumnType::UInt32 => "uint32",
            FileColumnType::UInt64 => "uint64",
            FileColumnType::Float16 => "float16",
            FileColumnType::Float32 => "float32",
            FileColumnType::Float64 => "float64",
            FileColumnType::Decimal => "decimal",
            FileColumnType::Boolean => "bool",
            FileColumnType::Date32 => "date32",
            FileColumnType::Date64 => "date64",
            FileColumnType::Timestamp => "timestamp",
            FileColumnType::Unrecognized(spelling) => spelling,
        };
        write!(f, "{}", name)
    }
}

/// A column name with its native type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileColumn {
    pub name: String,
    pub column_type: FileColumnType,
}

impl FileColumn {
    pub fn new(name: impl Into<String>, column_type: FileColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Reads the column schema of a data file without reading its rows
pub trait FileSchemaReader: Send + Sync {
    fn read_columns(&self, path: &Path) -> Result<Vec<FileColumn>, IngestError>;
}

fn file_schema_error(path: &Path, message: impl fmt::Display) -> IngestError {
    IngestError::FileSchema {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Reads top-level columns from a parquet footer
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetSchemaReader;

impl ParquetSchemaReader {
    fn column_type(field: &ParquetType) -> FileColumnType {
        if !field.is_primitive() {
            return FileColumnType::Unrecognized(format!("group<{}>", field.name()));
        }

        let info = field.get_basic_info();
        if let Some(logical) = info.logical_type() {
            match logical {
                LogicalType::String | LogicalType::Enum | LogicalType::Json => {
                    return FileColumnType::Utf8
                }
                LogicalType::Integer {
                    bit_width,
                    is_signed,
                } => {
                    return match (bit_width, is_signed) {
                        (8, true) => FileColumnType::Int8,
                        (16, true) => FileColumnType::Int16,
                        (32, true) => FileColumnType::Int32,
                        (64, true) => FileColumnType::Int64,
                        (8, false) => FileColumnType::UInt8,
                        (16, false) => FileColumnType::UInt16,
                        (32, false) => FileColumnType::UInt32,
                        (64, false) => FileColumnType::UInt64,
                        _ => FileColumnType::Unrecognized(format!(
                            "INTEGER({}, {})",
                            bit_width, is_signed
                        )),
                    }
                }
                LogicalType::Decimal { .. } => return FileColumnType::Decimal,
                LogicalType::Date => return FileColumnType::Date32,
                LogicalType::Timestamp { .. } => return FileColumnType::Timestamp,
                _ => {}
            }
        }

        match info.converted_type() {
            ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON => {
                return FileColumnType::Utf8
            }
            ConvertedType::INT_8 => return FileColumnType::Int8,
            ConvertedType::INT_16 => return FileColumnType::Int16,
            ConvertedType::INT_32 => return FileColumnType::Int32,
            ConvertedType::INT_64 => return FileColumnType::Int64,
            ConvertedType::UINT_8 => return FileColumnType::UInt8,
            ConvertedType::UINT_16 => return FileColumnType::UInt16,
            ConvertedType::UINT_32 => return FileColumnType::UInt32,
            ConvertedType::UINT_64 => return FileColumnType::UInt64,
            ConvertedType::DECIMAL => return FileColumnType::Decimal,
            ConvertedType::DATE => return FileColumnType::Date32,
            ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS => {
                return FileColumnType::Timestamp
            }
            _ => {}
        }

        match field.get_physical_type() {
            PhysicalType::BOOLEAN => FileColumnType::Boolean,
            PhysicalType::INT32 => FileColumnType::Int32,
            PhysicalType::INT64 => FileColumnType::Int64,
            PhysicalType::INT96 => FileColumnType::Timestamp,
            PhysicalType::FLOAT => FileColumnType::Float32,
            PhysicalType::DOUBLE => FileColumnType::Float64,
            other @ (PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY) => {
                FileColumnType::Unrecognized(other.to_string())
            }
        }
    }
}

impl FileSchemaReader for ParquetSchemaReader {
    fn read_columns(&self, path: &Path) -> Result<Vec<FileColumn>, IngestError> {
        let file = File::open(path).map_err(|e| file_schema_error(path, e))?;
        let reader = SerializedFileReader::new(file).map_err(|e| file_schema_error(path, e))?;

        let columns = reader
            .metadata()
            .file_metadata()
            .schema_descr()
            .root_schema()
            .get_fields()
            .iter()
            .map(|field| FileColumn::new(field.name(), Self::column_type(field)))
            .collect();

        Ok(columns)
    }
}

/// Reads column names from a CSV header row; every column is text
#[derive(Debug, Clone, Copy)]
pub struct CsvSchemaReader {
    delimiter: char,
}

impl CsvSchemaReader {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvSchemaReader {
    fn default() -> Self {
        Self::new(',')
    }
}

impl FileSchemaReader for CsvSchemaReader {
    fn read_columns(&self, path: &Path) -> Result<Vec<FileColumn>, IngestError> {
        let file = File::open(path).map_err(|e| file_schema_error(path, e))?;
        let mut header = String::new();
        BufReader::new(file)
            .read_line(&mut header)
            .map_err(|e| file_schema_error(path, e))?;

        let header = header.trim_start_matches('\u{feff}').trim_end();
        if header.is_empty() {
            return Err(file_schema_error(path, "missing header row"));
        }

        Ok(header
            .split(self.delimiter)
            .map(|name| name.trim().trim_matches('"'))
            .map(|name| FileColumn::new(name, FileColumnType::Utf8))
            .collect())
    }
}

/// Picks a reader from the file extension
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSchemaReader {
    parquet: ParquetSchemaReader,
    csv: CsvSchemaReader,
}

impl FileSchemaReader for AutoSchemaReader {
    fn read_columns(&self, path: &Path) -> Result<Vec<FileColumn>, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "parquet" | "pq" => self.parquet.read_columns(path),
            "csv" => self.csv.read_columns(path),
            other => Err(file_schema_error(
                path,
                format!("unsupported file format '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquet::file::writer::SerializedFileWriter;
    use parquet::schema::parser::parse_message_type;
    use std::sync::Arc;
    use tempfile::TempDir;

    const ENTITY_MESSAGE: &str = "
        message entity {
            required binary cik (UTF8);
            optional binary ticker (STRING);
            optional int32 sic (INT_16);
            optional int64 shares;
            optional double price;
            optional float ratio;
            optional boolean active;
            optional int32 filed (DATE);
            optional int64 updated (TIMESTAMP_MILLIS);
            optional binary payload;
        }
    ";

    fn write_empty_parquet(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let schema = Arc::new(parse_message_type(ENTITY_MESSAGE).unwrap());
        let file = File::create(&path).unwrap();
        let writer = SerializedFileWriter::new(file, schema, Default::default()).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn test_parse_arrow_spellings() {
        assert_eq!(FileColumnType::parse("string"), FileColumnType::Utf8);
        assert_eq!(FileColumnType::parse("large_string"), FileColumnType::LargeUtf8);
        assert_eq!(FileColumnType::parse("timestamp[us, tz=UTC]"), FileColumnType::Timestamp);
        assert_eq!(FileColumnType::parse("decimal128(18, 2)"), FileColumnType::Decimal);
        assert_eq!(FileColumnType::parse("date32[day]"), FileColumnType::Date32);
        assert_eq!(FileColumnType::parse("Int16"), FileColumnType::Int16);
        assert_eq!(
            FileColumnType::parse("list<item: string>"),
            FileColumnType::Unrecognized("list<item: string>".to_string())
        );
    }

    #[test]
    fn test_storage_type_mapping() {
        assert_eq!(FileColumnType::Int8.storage_type(), TypeTag::Int32);
        assert_eq!(FileColumnType::Int16.storage_type(), TypeTag::Int32);
        assert_eq!(FileColumnType::Int32.storage_type(), TypeTag::Int32);
        assert_eq!(FileColumnType::Int64.storage_type(), TypeTag::Int64);
        assert_eq!(FileColumnType::UInt32.storage_type(), TypeTag::Int64);
        assert_eq!(FileColumnType::Float32.storage_type(), TypeTag::Float);
        assert_eq!(FileColumnType::Float64.storage_type(), TypeTag::Double);
        assert_eq!(FileColumnType::Decimal.storage_type(), TypeTag::Double);
        assert_eq!(FileColumnType::LargeUtf8.storage_type(), TypeTag::String);
        assert_eq!(FileColumnType::Date64.storage_type(), TypeTag::Date);
        assert_eq!(FileColumnType::Timestamp.storage_type(), TypeTag::Timestamp);
        assert_eq!(
            FileColumnType::Unrecognized("interval".into()).storage_type(),
            TypeTag::String
        );
    }

    #[test]
    fn test_parquet_footer_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_empty_parquet(&dir, "batch.parquet");

        let columns = ParquetSchemaReader.read_columns(&path).unwrap();
        let described: Vec<(&str, FileColumnType)> = columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type.clone()))
            .collect();

        assert_eq!(
            described,
            vec![
                ("cik", FileColumnType::Utf8),
                ("ticker", FileColumnType::Utf8),
                ("sic", FileColumnType::Int16),
                ("shares", FileColumnType::Int64),
                ("price", FileColumnType::Float64),
                ("ratio", FileColumnType::Float32),
                ("active", FileColumnType::Boolean),
                ("filed", FileColumnType::Date32),
                ("updated", FileColumnType::Timestamp),
                ("payload", FileColumnType::Unrecognized("BYTE_ARRAY".to_string())),
            ]
        );
    }

    #[test]
    fn test_csv_header_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entity.csv");
        std::fs::write(&path, "cik,\"ticker\", name\n0000320193,AAPL,Apple Inc.\n").unwrap();

        let columns = CsvSchemaReader::default().read_columns(&path).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cik", "ticker", "name"]);
        assert!(columns.iter().all(|c| c.column_type == FileColumnType::Utf8));
    }

    #[test]
    fn test_empty_csv_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            CsvSchemaReader::default().read_columns(&path),
            Err(IngestError::FileSchema { .. })
        ));
    }

    #[test]
    fn test_auto_reader_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let parquet = write_empty_parquet(&dir, "batch.PARQUET");
        assert_eq!(AutoSchemaReader::default().read_columns(&parquet).unwrap().len(), 10);

        let unknown = dir.path().join("batch.orc");
        std::fs::write(&unknown, "").unwrap();
        match AutoSchemaReader::default().read_columns(&unknown) {
            Err(IngestError::FileSchema { message, .. }) => assert!(message.contains("orc")),
            other => panic!("expected file schema error, got {:?}", other),
        }
    }
}
