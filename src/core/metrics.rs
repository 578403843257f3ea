//! Totals, market shares, growth rates and averages over snapshots.
//!
//! Undefined results (a zero or missing denominator) are `None` so that
//! callers can show "N/A" instead of a misleading number.

use super::dataset::Dataset;
use super::model::{CountryPeriodRecord, Metric, PeriodKey, Snapshot};
use super::resolver::{resolve, resolve_previous};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GrowthRates {
    pub visitors: Option<f64>,
    pub amount: Option<f64>,
}

impl GrowthRates {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Visitors => self.visitors,
            Metric::Amount => self.amount,
        }
    }
}

/// Headline numbers for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub total_visitors: u64,
    pub total_amount: f64,
    pub average_per_unit: f64,
    pub top_country: Option<String>,
    pub top_country_share: Option<f64>,
    pub country_count: usize,
}

pub fn total(snapshot: &Snapshot, metric: Metric) -> f64 {
    snapshot.total(metric)
}

/// Percentage of the snapshot total held by `country`; 0 when absent or the total is 0.
pub fn market_share(snapshot: &Snapshot, country: &str, metric: Metric) -> f64 {
    let total = snapshot.total(metric);
    match snapshot.get(country) {
        Some(record) if total > 0.0 => record.value(metric) / total * 100.0,
        _ => 0.0,
    }
}

/// Percentage change from `previous` to `current`.
pub fn growth_rate(current: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 && previous.is_finite() && current.is_finite() {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

/// Growth of one country between two already resolved snapshots.
pub fn growth_between(
    current: &Snapshot,
    previous: &Snapshot,
    country: &str,
) -> Option<GrowthRates> {
    let now = current.get(country)?;
    let before = previous.get(country)?;
    Some(record_growth(now, before))
}

fn record_growth(now: &CountryPeriodRecord, before: &CountryPeriodRecord) -> GrowthRates {
    GrowthRates {
        visitors: growth_rate(now.value(Metric::Visitors), before.value(Metric::Visitors)),
        amount: growth_rate(now.amount, before.amount),
    }
}

/// Growth of `country` in `period` versus the preceding quarter, or the
/// preceding year's table when `period` is a whole year.
pub fn growth(dataset: &Dataset, period: PeriodKey, country: &str) -> Option<GrowthRates> {
    let current = resolve(dataset, period);
    let previous = resolve_previous(dataset, period);
    growth_between(&current, &previous, country)
}

/// Growth of the whole snapshot total versus the preceding period.
pub fn total_growth(dataset: &Dataset, period: PeriodKey, metric: Metric) -> Option<f64> {
    let current = resolve(dataset, period);
    let previous = resolve_previous(dataset, period);
    total_growth_between(&current, &previous, metric)
}

pub fn total_growth_between(current: &Snapshot, previous: &Snapshot, metric: Metric) -> Option<f64> {
    if current.is_empty() || previous.is_empty() {
        return None;
    }
    growth_rate(current.total(metric), previous.total(metric))
}

/// Total amount divided by total visitors; 0 without visitors.
pub fn average_per_unit(snapshot: &Snapshot) -> f64 {
    let visitors = snapshot.total_visitors();
    if visitors > 0 {
        snapshot.total_amount() / visitors as f64
    } else {
        0.0
    }
}

pub fn record_average(record: &CountryPeriodRecord) -> Option<f64> {
    (record.visitors > 0).then(|| record.amount / record.visitors as f64)
}

pub fn summarize(snapshot: &Snapshot, period: PeriodKey) -> PeriodSummary {
    // First maximum wins, matching the stable ranking order.
    let top = snapshot
        .iter()
        .fold(None::<(&str, u64)>, |best, (country, record)| match best {
            Some((_, v)) if v >= record.visitors => best,
            _ => Some((country, record.visitors)),
        });

    PeriodSummary {
        label: period.to_string(),
        total_visitors: snapshot.total_visitors(),
        total_amount: snapshot.total_amount(),
        average_per_unit: average_per_unit(snapshot),
        top_country: top.map(|(country, _)| country.to_string()),
        top_country_share: top
            .filter(|_| snapshot.total_visitors() > 0)
            .map(|(country, _)| market_share(snapshot, country, Metric::Visitors)),
        country_count: snapshot.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Quarter, QuarterSelection};

    fn snapshot(rows: &[(&str, u64, f64)]) -> Snapshot {
        rows.iter()
            .map(|(c, v, a)| (c.to_string(), CountryPeriodRecord::new(*v, *a)))
            .collect()
    }

    fn q(year: i32, quarter: Quarter) -> PeriodKey {
        PeriodKey::new(year, QuarterSelection::Quarter(quarter))
    }

    #[test]
    fn test_quarter_over_quarter_growth() {
        let dataset = Dataset::new()
            .with_quarter(2023, Quarter::Q1, snapshot(&[("Russia", 100_000, 100_000_000.0)]))
            .with_quarter(2023, Quarter::Q2, snapshot(&[("Russia", 150_000, 160_000_000.0)]));

        let rates = growth(&dataset, q(2023, Quarter::Q2), "Russia").unwrap();
        assert!((rates.visitors.unwrap() - 50.0).abs() < 1e-9);
        assert!((rates.amount.unwrap() - 60.0).abs() < 1e-9);
        assert_eq!(rates.get(Metric::Visitors), rates.visitors);
    }

    #[test]
    fn test_q1_compares_against_previous_q4() {
        let dataset = Dataset::new()
            .with_quarter(2022, Quarter::Q4, snapshot(&[("Iran", 200, 10.0)]))
            .with_quarter(2023, Quarter::Q1, snapshot(&[("Iran", 100, 15.0)]));

        let rates = growth(&dataset, q(2023, Quarter::Q1), "Iran").unwrap();
        assert_eq!(rates.visitors, Some(-50.0));
        assert_eq!(rates.amount, Some(50.0));
    }

    #[test]
    fn test_year_over_year_growth() {
        let dataset = Dataset::new()
            .with_yearly(2023, snapshot(&[("Georgia", 200, 100.0)]))
            .with_yearly(2024, snapshot(&[("Georgia", 250, 90.0)]));

        let rates = growth(&dataset, PeriodKey::Year(2024), "Georgia").unwrap();
        assert_eq!(rates.visitors, Some(25.0));
        assert_eq!(rates.amount, Some(-10.0));
    }

    #[test]
    fn test_year_over_year_growth_ignores_quarter_sums() {
        let dataset = Dataset::new()
            .with_quarter(2023, Quarter::Q1, snapshot(&[("Georgia", 100, 50.0)]))
            .with_quarter(2023, Quarter::Q2, snapshot(&[("Georgia", 100, 50.0)]))
            .with_yearly(2024, snapshot(&[("Georgia", 250, 90.0)]));

        assert!(growth(&dataset, PeriodKey::Year(2024), "Georgia").is_none());
        assert!(total_growth(&dataset, PeriodKey::Year(2024), Metric::Visitors).is_none());
        // The year itself still resolves from its quarters.
        assert_eq!(resolve(&dataset, PeriodKey::Year(2023)).total_visitors(), 200);
    }

    #[test]
    fn test_growth_undefined_for_zero_or_missing_previous() {
        let dataset = Dataset::new()
            .with_quarter(
                2023,
                Quarter::Q1,
                snapshot(&[("Russia", 0, 0.0), ("Iran", 10, 0.0)]),
            )
            .with_quarter(
                2023,
                Quarter::Q2,
                snapshot(&[("Russia", 5, 5.0), ("Iran", 20, 3.0), ("Georgia", 1, 1.0)]),
            );
        let period = q(2023, Quarter::Q2);

        let russia = growth(&dataset, period, "Russia").unwrap();
        assert_eq!(russia.visitors, None);
        assert_eq!(russia.amount, None);

        let iran = growth(&dataset, period, "Iran").unwrap();
        assert_eq!(iran.visitors, Some(100.0));
        assert_eq!(iran.amount, None);

        assert!(growth(&dataset, period, "Georgia").is_none());
        assert!(growth(&dataset, q(2023, Quarter::Q1), "Russia").is_none());
        assert!(growth(&dataset, period, "Atlantis").is_none());
    }

    #[test]
    fn test_market_shares_sum_to_one_hundred() {
        let snap = snapshot(&[
            ("Russia", 575_860, 596_023_216.8),
            ("Georgia", 225_828, 142_524_716.2),
            ("Iran", 158_080, 126_376_762.8),
            ("Germany", 43_112, 59_233_503.76),
        ]);
        for metric in [Metric::Visitors, Metric::Amount] {
            let sum: f64 = snap
                .countries()
                .map(|c| market_share(&snap, c, metric))
                .sum();
            assert!((sum - 100.0).abs() < 1e-9, "{metric}: {sum}");
        }
    }

    #[test]
    fn test_market_share_zero_cases() {
        let snap = snapshot(&[("Russia", 0, 0.0)]);
        assert_eq!(market_share(&snap, "Russia", Metric::Visitors), 0.0);
        assert_eq!(market_share(&snap, "Iran", Metric::Visitors), 0.0);
        assert_eq!(market_share(&Snapshot::new(), "Iran", Metric::Amount), 0.0);
    }

    #[test]
    fn test_average_per_unit() {
        let snap = snapshot(&[("Russia", 100, 1_000.0), ("Iran", 300, 1_000.0)]);
        assert_eq!(average_per_unit(&snap), 5.0);
        assert_eq!(average_per_unit(&Snapshot::new()), 0.0);
        assert_eq!(record_average(snap.get("Russia").unwrap()), Some(10.0));
        assert_eq!(record_average(&CountryPeriodRecord::new(0, 10.0)), None);
    }

    #[test]
    fn test_total_growth() {
        let dataset = Dataset::new()
            .with_yearly(2023, snapshot(&[("Russia", 100, 1.0), ("Iran", 100, 1.0)]))
            .with_yearly(2024, snapshot(&[("Russia", 250, 1.0), ("Iran", 50, 1.0)]));

        assert_eq!(
            total_growth(&dataset, PeriodKey::Year(2024), Metric::Visitors),
            Some(50.0)
        );
        assert_eq!(
            total_growth(&dataset, PeriodKey::Year(2024), Metric::Amount),
            Some(0.0)
        );
        assert_eq!(
            total_growth(&dataset, PeriodKey::Year(2023), Metric::Visitors),
            None
        );
    }

    #[test]
    fn test_summarize() {
        let snap = snapshot(&[
            ("Georgia", 300, 100.0),
            ("Russia", 600, 500.0),
            ("Iran", 600, 0.0),
        ]);
        let summary = summarize(&snap, PeriodKey::new(2024, QuarterSelection::Quarter(Quarter::Q1)));

        assert_eq!(summary.label, "2024 Q1");
        assert_eq!(summary.total_visitors, 1_500);
        assert_eq!(summary.total_amount, 600.0);
        assert_eq!(summary.average_per_unit, 0.4);
        assert_eq!(summary.top_country.as_deref(), Some("Russia"));
        assert_eq!(summary.top_country_share, Some(40.0));
        assert_eq!(summary.country_count, 3);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&Snapshot::new(), PeriodKey::Year(2030));
        assert_eq!(summary.total_visitors, 0);
        assert_eq!(summary.average_per_unit, 0.0);
        assert!(summary.top_country.is_none());
        assert!(summary.top_country_share.is_none());
    }
}
