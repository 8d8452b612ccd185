//! Ingestion fixture over the built-in schema modules
//!
//! Files are written under `nodes/<Table>/` and `relationships/<Table>/` in
//! a temp directory, matching the layout exports use.

use robograph::{
    BulkIngestionEngine, IngestConfigGenerator, IngestionConfig, SchemaComposer, ScriptStore,
    SharedEntitySet,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use super::files::{utf8_message, write_csv_header, write_parquet};

pub struct IngestFixture {
    composer: SchemaComposer,
    generator: Arc<IngestConfigGenerator>,
    shared: SharedEntitySet,
    store: Arc<ScriptStore>,
    config: IngestionConfig,
    dir: TempDir,
}

impl IngestFixture {
    /// Fixture for `base` plus `extensions`
    pub fn new(extensions: &[&str]) -> Self {
        let composer = SchemaComposer::with_builtin();
        let generator = composer
            .ingest_config("base", extensions)
            .expect("compose fixture schema");
        let shared = composer.shared_entities("base").expect("base schema");

        Self {
            composer,
            generator,
            shared,
            store: Arc::new(ScriptStore::new()),
            config: IngestionConfig::default(),
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Fixture over an arbitrary generator, e.g. one built from a custom schema
    pub fn with_generator(generator: Arc<IngestConfigGenerator>, shared: SharedEntitySet) -> Self {
        Self {
            composer: SchemaComposer::with_builtin(),
            generator,
            shared,
            store: Arc::new(ScriptStore::new()),
            config: IngestionConfig::default(),
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn with_store(mut self, store: ScriptStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_config(mut self, config: IngestionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn composer(&self) -> &SchemaComposer {
        &self.composer
    }

    pub fn store(&self) -> &ScriptStore {
        &self.store
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Path of `file` under `nodes/<table>/`, without creating it
    pub fn node_path(&self, table: &str, file: &str) -> PathBuf {
        self.dir.path().join("nodes").join(table).join(file)
    }

    /// Path of `file` under `relationships/<table>/`, without creating it
    pub fn relationship_path(&self, table: &str, file: &str) -> PathBuf {
        self.dir.path().join("relationships").join(table).join(file)
    }

    /// Node parquet file with UTF8 columns
    pub fn node_file(&self, table: &str, columns: &[&str]) -> PathBuf {
        self.node_file_named(table, "batch.parquet", columns)
    }

    pub fn node_file_named(&self, table: &str, file: &str, columns: &[&str]) -> PathBuf {
        let path = self.node_path(table, file);
        write_parquet(&path, &utf8_message(columns));
        path
    }

    /// Node parquet file with an explicit message type
    pub fn node_file_with_message(&self, table: &str, message: &str) -> PathBuf {
        let path = self.node_path(table, "batch.parquet");
        write_parquet(&path, message);
        path
    }

    /// Relationship parquet file with UTF8 columns
    pub fn relationship_file(&self, table: &str, columns: &[&str]) -> PathBuf {
        let path = self.relationship_path(table, "batch.parquet");
        write_parquet(&path, &utf8_message(columns));
        path
    }

    pub fn csv_node_file(&self, table: &str, columns: &[&str]) -> PathBuf {
        let path = self.node_path(table, "batch.csv");
        write_csv_header(&path, columns);
        path
    }

    /// File in a directory that matches no table
    pub fn stray_file(&self, columns: &[&str]) -> PathBuf {
        let path = self.dir.path().join("misc").join("batch.parquet");
        write_parquet(&path, &utf8_message(columns));
        path
    }

    /// Engine over the fixture's generator, store and config
    pub fn engine(&self) -> BulkIngestionEngine {
        BulkIngestionEngine::new(
            self.generator.clone(),
            self.store.clone(),
            self.shared.clone(),
        )
        .with_config(self.config.clone())
    }
}
