//! Time series across periods: per-country trends and the all-data overview.

use super::dataset::Dataset;
use super::metrics::growth_rate;
use super::model::{CountryPeriodRecord, Metric, Quarter, Snapshot};
use super::ranking::RankedEntry;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Number of quarters shown by [`TrendRange::Recent`].
pub const RECENT_QUARTERS: usize = 8;

/// Number of countries listed in the overview.
pub const OVERVIEW_TOP_COUNTRIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendRange {
    #[default]
    Quarterly,
    Recent,
    Yearly,
}

impl FromStr for TrendRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quarterly" | "all" => Ok(TrendRange::Quarterly),
            "recent" => Ok(TrendRange::Recent),
            "yearly" => Ok(TrendRange::Yearly),
            _ => Err(anyhow::anyhow!("Invalid trend range: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// The values of `metric` for one country over time. Periods without the
/// country are left out.
pub fn country_series(
    dataset: &Dataset,
    country: &str,
    metric: Metric,
    range: TrendRange,
) -> Vec<TrendPoint> {
    match range {
        TrendRange::Yearly => {
            let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
            for (year, _, snapshot) in dataset.quarterly_periods() {
                if let Some(record) = snapshot.get(country) {
                    *by_year.entry(year).or_insert(0.0) += record.value(metric);
                }
            }
            by_year
                .into_iter()
                .map(|(year, value)| TrendPoint {
                    label: year.to_string(),
                    value,
                })
                .collect()
        }
        TrendRange::Quarterly | TrendRange::Recent => {
            let points: Vec<TrendPoint> = dataset
                .quarterly_periods()
                .filter_map(|(year, quarter, snapshot)| {
                    snapshot.get(country).map(|record| TrendPoint {
                        label: format!("{year}-{quarter}"),
                        value: record.value(metric),
                    })
                })
                .collect();
            if range == TrendRange::Recent {
                let skip = points.len().saturating_sub(RECENT_QUARTERS);
                points.into_iter().skip(skip).collect()
            } else {
                points
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    StrongGrowth,
    ModerateGrowth,
    Stable,
    ModerateDecline,
    SignificantDecline,
}

impl TrendDirection {
    pub fn classify(change: f64) -> Self {
        if change > 10.0 {
            TrendDirection::StrongGrowth
        } else if change > 5.0 {
            TrendDirection::ModerateGrowth
        } else if change < -10.0 {
            TrendDirection::SignificantDecline
        } else if change < -5.0 {
            TrendDirection::ModerateDecline
        } else {
            TrendDirection::Stable
        }
    }
}

impl Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TrendDirection::StrongGrowth => "strong growth",
                TrendDirection::ModerateGrowth => "moderate growth",
                TrendDirection::Stable => "stable",
                TrendDirection::ModerateDecline => "moderate decline",
                TrendDirection::SignificantDecline => "significant decline",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendInsight {
    pub first: TrendPoint,
    pub last: TrendPoint,
    pub overall_change: Option<f64>,
    pub direction: TrendDirection,
    pub peak: TrendPoint,
    /// Absent when every point has the same value.
    pub low: Option<TrendPoint>,
}

/// Summarizes a series of at least two points.
pub fn insight(series: &[TrendPoint]) -> Option<TrendInsight> {
    if series.len() < 2 {
        return None;
    }
    let first = series.first()?;
    let last = series.last()?;
    let overall_change = growth_rate(last.value, first.value);

    // First occurrence wins on ties.
    let peak = series
        .iter()
        .fold(first, |best, p| if p.value > best.value { p } else { best });
    let low = series
        .iter()
        .fold(first, |best, p| if p.value < best.value { p } else { best });

    Some(TrendInsight {
        first: first.clone(),
        last: last.clone(),
        overall_change,
        direction: overall_change.map_or(TrendDirection::Stable, TrendDirection::classify),
        peak: peak.clone(),
        low: (low.value != peak.value).then(|| low.clone()),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub year: i32,
    pub quarter: Quarter,
    pub visitors: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallGrowth {
    pub visitors: Option<f64>,
    pub amount: Option<f64>,
    /// Visitor growth of each 4-quarter window over the one before it.
    pub yearly_rates: Vec<f64>,
    pub average_yearly: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_visitors: u64,
    pub total_amount: f64,
    pub country_count: usize,
    pub quarter_count: usize,
    pub time_series: Vec<PeriodTotal>,
    pub seasonal: BTreeMap<Quarter, u64>,
    pub top_countries: Vec<RankedEntry>,
    pub average_per_unit: f64,
    pub growth: Option<OverallGrowth>,
}

/// Statistics over every quarterly record in the dataset.
pub fn overview(dataset: &Dataset) -> OverviewStats {
    let mut time_series = Vec::new();
    let mut seasonal: BTreeMap<Quarter, u64> = Quarter::ALL.iter().map(|q| (*q, 0)).collect();
    let mut country_totals = Snapshot::new();

    for (year, quarter, snapshot) in dataset.quarterly_periods() {
        for (country, record) in snapshot.iter() {
            let mut total = country_totals
                .get(country)
                .copied()
                .unwrap_or_default();
            total.visitors = total.visitors.saturating_add(record.visitors);
            total.amount += record.amount;
            country_totals.insert(country.to_string(), total);
        }
        let visitors = snapshot.total_visitors();
        let season = seasonal.entry(quarter).or_insert(0);
        *season = season.saturating_add(visitors);
        time_series.push(PeriodTotal {
            year,
            quarter,
            visitors,
            amount: snapshot.total_amount(),
        });
    }

    let mut top_countries: Vec<RankedEntry> = country_totals
        .iter()
        .map(|(country, record)| RankedEntry {
            country: country.to_string(),
            record: CountryPeriodRecord::new(record.visitors, record.amount),
        })
        .collect();
    top_countries.sort_by(|a, b| b.record.visitors.cmp(&a.record.visitors));
    top_countries.truncate(OVERVIEW_TOP_COUNTRIES);

    let total_visitors = country_totals.total_visitors();
    let total_amount = country_totals.total_amount();
    OverviewStats {
        total_visitors,
        total_amount,
        country_count: country_totals.len(),
        quarter_count: time_series.len(),
        growth: overall_growth(&time_series),
        time_series,
        seasonal,
        top_countries,
        average_per_unit: if total_visitors > 0 {
            total_amount / total_visitors as f64
        } else {
            0.0
        },
    }
}

fn overall_growth(series: &[PeriodTotal]) -> Option<OverallGrowth> {
    let (first, last) = match series {
        [first, .., last] => (first, last),
        _ => return None,
    };

    let window_sum = |range: std::ops::Range<usize>| -> f64 {
        series[range].iter().map(|p| p.visitors as f64).sum()
    };
    let yearly_rates: Vec<f64> = (4..series.len())
        .step_by(4)
        .filter_map(|i| {
            let current = window_sum(i..(i + 4).min(series.len()));
            growth_rate(current, window_sum(i - 4..i))
        })
        .collect();
    let average_yearly = (!yearly_rates.is_empty())
        .then(|| yearly_rates.iter().sum::<f64>() / yearly_rates.len() as f64);

    Some(OverallGrowth {
        visitors: growth_rate(last.visitors as f64, first.visitors as f64),
        amount: growth_rate(last.amount, first.amount),
        yearly_rates,
        average_yearly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rows: &[(&str, u64, f64)]) -> Snapshot {
        rows.iter()
            .map(|(c, v, a)| (c.to_string(), CountryPeriodRecord::new(*v, *a)))
            .collect()
    }

    fn ten_quarters() -> Dataset {
        let mut dataset = Dataset::new();
        for i in 0..10u64 {
            let year = 2019 + (i / 4) as i32;
            let quarter = Quarter::ALL[(i % 4) as usize];
            let mut rows = vec![("Russia", 100 + i * 10, 1_000.0 * (i + 1) as f64)];
            if i % 2 == 0 {
                rows.push(("Iran", 50, 10.0));
            }
            dataset = dataset.with_quarter(year, quarter, snapshot(&rows));
        }
        dataset
    }

    #[test]
    fn test_quarterly_series_is_chronological() {
        let series = country_series(&ten_quarters(), "Russia", Metric::Visitors, TrendRange::Quarterly);
        assert_eq!(series.len(), 10);
        assert_eq!(series[0].label, "2019-Q1");
        assert_eq!(series[0].value, 100.0);
        assert_eq!(series[9].label, "2021-Q2");
        assert_eq!(series[9].value, 190.0);
    }

    #[test]
    fn test_recent_series_keeps_last_eight() {
        let series = country_series(&ten_quarters(), "Russia", Metric::Amount, TrendRange::Recent);
        assert_eq!(series.len(), RECENT_QUARTERS);
        assert_eq!(series[0].label, "2019-Q3");
        assert_eq!(series.last().unwrap().value, 10_000.0);
    }

    #[test]
    fn test_yearly_series_sums_quarters_and_skips_absent() {
        let series = country_series(&ten_quarters(), "Iran", Metric::Visitors, TrendRange::Yearly);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2019", "2020", "2021"]);
        assert_eq!(series[0].value, 100.0);
        assert_eq!(series[2].value, 50.0);

        assert!(country_series(&ten_quarters(), "Atlantis", Metric::Visitors, TrendRange::Yearly).is_empty());
    }

    #[test]
    fn test_insight_direction_peak_and_low() {
        let series: Vec<TrendPoint> = [("a", 100.0), ("b", 40.0), ("c", 300.0), ("d", 40.0), ("e", 108.0)]
            .into_iter()
            .map(|(l, v)| TrendPoint {
                label: l.to_string(),
                value: v,
            })
            .collect();
        let insight = insight(&series).unwrap();

        assert_eq!(insight.overall_change, Some(8.0));
        assert_eq!(insight.direction, TrendDirection::ModerateGrowth);
        assert_eq!(insight.peak.label, "c");
        assert_eq!(insight.low.unwrap().label, "b");
    }

    #[test]
    fn test_insight_edge_cases() {
        let point = |v: f64| TrendPoint {
            label: "x".to_string(),
            value: v,
        };
        assert!(insight(&[point(1.0)]).is_none());

        let flat = insight(&[point(5.0), point(5.0)]).unwrap();
        assert_eq!(flat.direction, TrendDirection::Stable);
        assert!(flat.low.is_none());

        let from_zero = insight(&[point(0.0), point(5.0)]).unwrap();
        assert_eq!(from_zero.overall_change, None);
        assert_eq!(from_zero.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_direction_thresholds() {
        assert_eq!(TrendDirection::classify(10.5), TrendDirection::StrongGrowth);
        assert_eq!(TrendDirection::classify(10.0), TrendDirection::ModerateGrowth);
        assert_eq!(TrendDirection::classify(5.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(-6.0), TrendDirection::ModerateDecline);
        assert_eq!(TrendDirection::classify(-12.0), TrendDirection::SignificantDecline);
        assert_eq!(TrendDirection::StrongGrowth.to_string(), "strong growth");
    }

    #[test]
    fn test_overview() {
        let stats = overview(&ten_quarters());

        assert_eq!(stats.quarter_count, 10);
        assert_eq!(stats.country_count, 2);
        // Russia: 100..=190 step 10, Iran: 5 quarters of 50
        assert_eq!(stats.total_visitors, 1_450 + 250);
        assert_eq!(stats.seasonal[&Quarter::Q1], 100 + 50 + 140 + 50 + 180 + 50);
        assert_eq!(stats.seasonal[&Quarter::Q4], 130 + 170);
        assert_eq!(stats.top_countries[0].country, "Russia");
        assert_eq!(stats.top_countries[1].record.visitors, 250);
        assert_eq!(stats.time_series[0].visitors, 150);
        assert_eq!(stats.time_series[9].visitors, 190);

        let growth = stats.growth.unwrap();
        // 150 -> 190
        assert!((growth.visitors.unwrap() - 26.666_666_666_666_668).abs() < 1e-9);
        assert_eq!(growth.yearly_rates.len(), 2);
        assert!(growth.average_yearly.is_some());
    }

    #[test]
    fn test_overview_of_empty_dataset() {
        let stats = overview(&Dataset::new());
        assert_eq!(stats.total_visitors, 0);
        assert_eq!(stats.average_per_unit, 0.0);
        assert!(stats.time_series.is_empty());
        assert!(stats.growth.is_none());
        assert_eq!(stats.seasonal.len(), 4);
    }
}
