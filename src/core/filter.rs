//! The user's current selection of period, metric, region and top-N.

use super::model::{Metric, PeriodKey, QuarterSelection};
use super::ranking::{RegionFilter, TopN};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub year: i32,
    pub quarter: QuarterSelection,
    pub metric: Metric,
    pub region: RegionFilter,
    pub top: TopN,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            year: 2024,
            quarter: QuarterSelection::All,
            metric: Metric::Visitors,
            region: RegionFilter::All,
            top: TopN::All,
        }
    }
}

impl FilterState {
    pub fn period(&self) -> PeriodKey {
        PeriodKey::new(self.year, self.quarter)
    }

    /// Applies `year`, `quarter`, `metric`, `region` and `top` parameters from a
    /// query string (or a full URL) on top of `self`. Values are
    /// percent-decoded and a trailing `#fragment` is dropped. Unknown keys and
    /// values that do not parse are ignored.
    pub fn with_query(&self, query: &str) -> FilterState {
        let mut state = self.clone();
        let Some(url) = query_url(query) else {
            warn!("Ignoring unparsable query: {query}");
            return state;
        };

        for (key, value) in url.query_pairs() {
            let value = value.trim();
            match key.trim() {
                "year" => match value.parse() {
                    Ok(year) => state.year = year,
                    Err(_) => warn!("Ignoring invalid year parameter: {value}"),
                },
                "quarter" => match value.parse() {
                    Ok(quarter) => state.quarter = quarter,
                    Err(_) => warn!("Ignoring invalid quarter parameter: {value}"),
                },
                "metric" => match value.parse() {
                    Ok(metric) => state.metric = metric,
                    Err(_) => warn!("Ignoring invalid metric parameter: {value}"),
                },
                "region" => state.region = RegionFilter::from(value),
                "top" => state.top = TopN::parse(value),
                _ => {}
            }
        }
        state
    }

    /// A link that reproduces the period and metric of this selection.
    pub fn share_url(&self, base_url: &str) -> Result<String> {
        let mut url = reqwest::Url::parse(base_url)
            .with_context(|| format!("Invalid share base URL: {base_url}"))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("year", &self.year.to_string())
            .append_pair("quarter", &self.quarter.to_string())
            .append_pair("metric", &self.metric.to_string());
        Ok(url.to_string())
    }
}

/// Reads `query` as an absolute URL, or as a query string (with or without a
/// leading `?`) resolved against a placeholder base.
fn query_url(query: &str) -> Option<reqwest::Url> {
    let query = query.trim();
    if let Ok(url) = reqwest::Url::parse(query) {
        return Some(url);
    }
    let base = reqwest::Url::parse("http://localhost/").ok()?;
    if query.contains('?') {
        base.join(query).ok()
    } else {
        base.join(&format!("?{query}")).ok()
    }
}
