//! Everything the dashboard shows for one filter selection.

use super::dataset::Dataset;
use super::export::ExportDocument;
use super::filter::FilterState;
use super::metrics::{self, GrowthRates, PeriodSummary};
use super::model::{Metric, PeriodKey, Snapshot};
use super::ranking::{RankedEntry, RegionTable, rank};
use super::resolver::{resolve, resolve_previous};

/// Derived, read-only results for a [`FilterState`]. Rebuilt whenever the
/// selection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodView {
    pub filter: FilterState,
    pub period: PeriodKey,
    pub snapshot: Snapshot,
    pub previous: Snapshot,
    pub ranked: Vec<RankedEntry>,
    pub summary: PeriodSummary,
}

impl PeriodView {
    pub fn compute(dataset: &Dataset, regions: &RegionTable, filter: &FilterState) -> Self {
        let period = filter.period();
        let snapshot = resolve(dataset, period);
        let previous = resolve_previous(dataset, period);
        let ranked = rank(
            &snapshot,
            regions,
            &filter.region,
            filter.metric,
            filter.top,
        );
        let summary = metrics::summarize(&snapshot, period);

        PeriodView {
            filter: filter.clone(),
            period,
            snapshot,
            previous,
            ranked,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Share of the selected metric across the whole period, not just the ranked subset.
    pub fn share(&self, country: &str) -> f64 {
        metrics::market_share(&self.snapshot, country, self.filter.metric)
    }

    pub fn growth(&self, country: &str) -> Option<GrowthRates> {
        metrics::growth_between(&self.snapshot, &self.previous, country)
    }

    pub fn total_growth(&self, metric: Metric) -> Option<f64> {
        metrics::total_growth_between(&self.snapshot, &self.previous, metric)
    }

    pub fn export(&self) -> ExportDocument {
        ExportDocument::new(&self.filter, &self.ranked)
    }
}
