//! One-country detail and side-by-side country comparison.

use super::dataset::Dataset;
use super::metrics::{average_per_unit, market_share, record_average};
use super::model::{CountryPeriodRecord, Metric, PeriodKey, QuarterPeriod, Snapshot};
use super::trend::TrendPoint;
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

/// Standing of a country by its share of the period's visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketPosition {
    Dominant,
    Major,
    Important,
    Minor,
}

impl MarketPosition {
    /// Above 20% is dominant, above 10% major, above 5% important.
    pub fn classify(share: f64) -> Self {
        if share > 20.0 {
            MarketPosition::Dominant
        } else if share > 10.0 {
            MarketPosition::Major
        } else if share > 5.0 {
            MarketPosition::Important
        } else {
            MarketPosition::Minor
        }
    }
}

impl Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MarketPosition::Dominant => "dominant source market",
                MarketPosition::Major => "major source market",
                MarketPosition::Important => "important market",
                MarketPosition::Minor => "minor market",
            }
        )
    }
}

/// Spending per visitor against the period average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpendingProfile {
    HighValue,
    Typical,
    Budget,
}

impl SpendingProfile {
    /// More than 1.2 times the period average is high-value, less than 0.8
    /// times is budget.
    pub fn classify(average: f64, period_average: f64) -> Self {
        if average > period_average * 1.2 {
            SpendingProfile::HighValue
        } else if average < period_average * 0.8 {
            SpendingProfile::Budget
        } else {
            SpendingProfile::Typical
        }
    }
}

impl Display for SpendingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SpendingProfile::HighValue => "high-value visitors",
                SpendingProfile::Typical => "typical spending",
                SpendingProfile::Budget => "budget travelers",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryInsight {
    pub country: String,
    pub record: CountryPeriodRecord,
    /// Percentage of the period's visitors.
    pub share: f64,
    pub position: MarketPosition,
    pub average_per_unit: Option<f64>,
    pub period_average: f64,
    /// Absent when either average is undefined.
    pub profile: Option<SpendingProfile>,
}

/// Market position and spending profile of `country` within `snapshot`.
/// `None` when the country has no record there.
pub fn country_insight(snapshot: &Snapshot, country: &str) -> Option<CountryInsight> {
    let record = *snapshot.get(country)?;
    let share = market_share(snapshot, country, Metric::Visitors);
    let average = record_average(&record);
    let period_average = average_per_unit(snapshot);
    let profile = average
        .filter(|_| period_average > 0.0)
        .map(|avg| SpendingProfile::classify(avg, period_average));

    Some(CountryInsight {
        country: country.to_string(),
        record,
        share,
        position: MarketPosition::classify(share),
        average_per_unit: average,
        period_average,
        profile,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub country: String,
    pub points: Vec<TrendPoint>,
}

/// The quarters present in `dataset` between `from` and `to` inclusive.
pub fn comparison_periods(dataset: &Dataset, from: QuarterPeriod, to: QuarterPeriod) -> Vec<QuarterPeriod> {
    dataset
        .quarterly_periods()
        .map(|(year, quarter, _)| QuarterPeriod::new(year, quarter))
        .filter(|period| *period >= from && *period <= to)
        .collect()
}

/// One series per country over the quarters between `from` and `to`. All
/// series share the same labels; a quarter without the country counts as 0.
pub fn comparison(
    dataset: &Dataset,
    countries: &[String],
    metric: Metric,
    from: QuarterPeriod,
    to: QuarterPeriod,
) -> Vec<ComparisonSeries> {
    let periods = comparison_periods(dataset, from, to);
    debug!(
        "Comparing {} countries over {} quarters from {from} to {to}",
        countries.len(),
        periods.len()
    );

    countries
        .iter()
        .map(|country| ComparisonSeries {
            country: country.clone(),
            points: periods
                .iter()
                .map(|period| TrendPoint {
                    label: period.to_string(),
                    value: dataset
                        .quarter(period.year, period.quarter)
                        .and_then(|snapshot| snapshot.get(country))
                        .map_or(0.0, |record| record.value(metric)),
                })
                .collect(),
        })
        .collect()
}

/// [`country_insight`] over the resolved `period`.
pub fn insight_for_period(dataset: &Dataset, period: PeriodKey, country: &str) -> Option<CountryInsight> {
    country_insight(&super::resolver::resolve(dataset, period), country)
}
