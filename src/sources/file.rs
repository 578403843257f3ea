use super::CsvSource;
use crate::core::error::DataError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads CSV files from a local directory.
pub struct FileCsvSource {
    root: PathBuf,
}

impl FileCsvSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CsvSource for FileCsvSource {
    async fn fetch_csv(&self, name: &str) -> Result<String, DataError> {
        let path = self.root.join(name);
        debug!("Reading {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DataError::fetch(name, format!("{}: {e}", path.display())))
    }
}
