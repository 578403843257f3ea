use super::CsvSource;
use super::util::{is_transient_http, with_retry};
use crate::core::error::DataError;
use async_trait::async_trait;
use tracing::debug;

/// Fetches CSV files relative to a base URL.
pub struct HttpCsvSource {
    base_url: String,
    retries: usize,
    retry_delay_ms: u64,
}

impl HttpCsvSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            retries: 3,
            retry_delay_ms: 500,
        }
    }

    pub fn with_retries(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    async fn fetch_csv(&self, name: &str) -> Result<String, DataError> {
        let url = format!("{}/{}", self.base_url, name);
        debug!("Fetching {url}");
        let response = with_retry(
            || async { reqwest::get(&url).await?.error_for_status() },
            self.retries,
            self.retry_delay_ms,
            is_transient_http,
        )
        .await
        .map_err(|e| DataError::fetch(name, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| DataError::fetch(name, e))?;

        debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}
