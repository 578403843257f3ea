use crate::core::view::PeriodView;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the ranked selection as JSON and returns the path written.
///
/// Without `output` the file lands in the current directory under the
/// default export name for `destination`.
pub fn run(view: &PeriodView, destination: &str, output: Option<&Path>) -> Result<PathBuf> {
    let document = view.export();
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(document.file_name(destination)));

    let json = document.to_json()?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write export file to {}", path.display()))?;

    info!(rows = document.data.len(), "Exported data to {}", path.display());
    println!("Exported {} rows to {}", document.data.len(), path.display());
    Ok(path)
}
