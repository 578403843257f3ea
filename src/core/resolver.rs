//! Materializes the snapshot for a requested period.

use super::dataset::Dataset;
use super::model::{CountryPeriodRecord, PeriodKey, Snapshot};
use tracing::debug;

/// Returns the per-country snapshot for `period`.
///
/// A year prefers the yearly table and falls back to summing that year's
/// quarters. Missing data yields an empty snapshot.
pub fn resolve(dataset: &Dataset, period: PeriodKey) -> Snapshot {
    debug!("Resolving snapshot for {period}");
    match period {
        PeriodKey::Year(year) => {
            if let Some(snapshot) = dataset.yearly(year) {
                return snapshot.clone();
            }
            debug!("No yearly data for {year}, aggregating quarters");
            aggregate_quarters(dataset, year)
        }
        PeriodKey::Quarter { year, quarter } => match dataset.quarter(year, quarter) {
            Some(snapshot) => snapshot.clone(),
            None => {
                debug!("No quarterly data for {year} {quarter}");
                Snapshot::new()
            }
        },
    }
}

/// The snapshot that growth in `period` is measured against.
///
/// A quarter compares with the quarter before it. A whole year compares
/// yearly tables only: without a yearly entry for both the year and the one
/// before, the result is empty and no growth is defined.
pub fn resolve_previous(dataset: &Dataset, period: PeriodKey) -> Snapshot {
    match period {
        PeriodKey::Year(year) => match (dataset.yearly(year), dataset.yearly(year - 1)) {
            (Some(_), Some(previous)) => previous.clone(),
            _ => {
                debug!("No yearly tables for both {} and {year}", year - 1);
                Snapshot::new()
            }
        },
        PeriodKey::Quarter { .. } => resolve(dataset, period.previous()),
    }
}

fn aggregate_quarters(dataset: &Dataset, year: i32) -> Snapshot {
    let Some(quarters) = dataset.quarters(year) else {
        return Snapshot::new();
    };

    let mut aggregated = Snapshot::new();
    for snapshot in quarters.values() {
        for (country, record) in snapshot.iter() {
            let mut total = aggregated
                .get(country)
                .copied()
                .unwrap_or_else(|| CountryPeriodRecord::new(0, 0.0).with_location(record.location));
            total.visitors = total.visitors.saturating_add(record.visitors);
            total.amount += record.amount;
            aggregated.insert(country.to_string(), total);
        }
    }
    debug!(
        "Aggregated {} quarters of {year} into {} countries",
        quarters.len(),
        aggregated.len()
    );
    aggregated
}
