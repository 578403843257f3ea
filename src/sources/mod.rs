//! Where the quarterly and yearly CSV tables come from.

pub mod file;
pub mod http;
pub mod util;

use crate::core::config::AppConfig;
use crate::core::dataset::{Dataset, IngestOptions, IngestReport};
use crate::core::error::DataError;
use async_trait::async_trait;
use tracing::{info, warn};

pub use file::FileCsvSource;
pub use http::HttpCsvSource;

#[async_trait]
pub trait CsvSource: Send + Sync {
    /// Returns the raw text of the named CSV file.
    async fn fetch_csv(&self, name: &str) -> Result<String, DataError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Both tables were fetched and parsed.
    Loaded,
    /// The built-in sample dataset.
    Sample,
}

#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: Dataset,
    pub origin: DataOrigin,
    pub quarterly: Option<IngestReport>,
    pub yearly: Option<IngestReport>,
    pub error: Option<DataError>,
}

impl LoadedData {
    fn sample(options: &IngestOptions, error: Option<DataError>) -> Self {
        LoadedData {
            dataset: Dataset::sample(options),
            origin: DataOrigin::Sample,
            quarterly: None,
            yearly: None,
            error,
        }
    }
}

/// Picks the configured source: a local directory wins over HTTP.
pub fn source_from_config(config: &AppConfig) -> Option<Box<dyn CsvSource>> {
    if let Some(file) = &config.data.file {
        return Some(Box::new(FileCsvSource::new(&file.root)));
    }
    config.data.http.as_ref().map(|http| {
        Box::new(
            HttpCsvSource::new(&http.base_url)
                .with_retries(config.data.retries, config.data.retry_delay_ms),
        ) as Box<dyn CsvSource>
    })
}

/// Fetches both tables concurrently and builds a dataset from them.
///
/// Unless both tables load, the result is the sample dataset; a half-loaded
/// dataset is never returned.
pub async fn load_dataset(
    source: &dyn CsvSource,
    quarterly_name: &str,
    yearly_name: &str,
    options: &IngestOptions,
) -> LoadedData {
    let (quarterly, yearly) = futures::join!(
        source.fetch_csv(quarterly_name),
        source.fetch_csv(yearly_name)
    );

    let ingested = quarterly.and_then(|quarterly| {
        let yearly = yearly?;
        let mut dataset = Dataset::new();
        let quarterly_report = dataset.ingest_quarterly(&quarterly, options)?;
        let yearly_report = dataset.ingest_yearly(&yearly, options)?;
        Ok((dataset, quarterly_report, yearly_report))
    });

    match ingested {
        Ok((dataset, quarterly_report, yearly_report)) => {
            info!("All data loaded successfully");
            LoadedData {
                dataset,
                origin: DataOrigin::Loaded,
                quarterly: Some(quarterly_report),
                yearly: Some(yearly_report),
                error: None,
            }
        }
        Err(e) => {
            warn!(error = %e, "Could not load tourism data, using sample data");
            LoadedData::sample(options, Some(e))
        }
    }
}

/// Loads the dataset described by `config`, or the sample when no source is configured.
pub async fn load_from_config(config: &AppConfig) -> LoadedData {
    let options = IngestOptions::from_config(config);
    match source_from_config(config) {
        Some(source) => {
            load_dataset(
                source.as_ref(),
                &config.data.quarterly,
                &config.data.yearly,
                &options,
            )
            .await
        }
        None => {
            warn!("No data source configured, using sample data");
            LoadedData::sample(&options, None)
        }
    }
}
