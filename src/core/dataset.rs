//! Yearly and quarterly country tables built from CSV text.

use super::config::{AppConfig, NumericPolicy};
use super::csv::parse_line;
use super::error::DataError;
use super::model::{CountryPeriodRecord, Location, Quarter, QuarterPeriod, Snapshot};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Settings applied to every row at ingest.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub excluded_countries: BTreeSet<String>,
    pub locations: BTreeMap<String, Location>,
    pub fallback_location: Option<Location>,
    pub numeric_policy: NumericPolicy,
}

impl IngestOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        IngestOptions {
            excluded_countries: config.excluded_countries.clone(),
            locations: config.locations.clone(),
            fallback_location: Some(config.destination.location),
            numeric_policy: config.data.numeric_policy,
        }
    }

    fn location_of(&self, country: &str) -> Option<Location> {
        self.locations
            .get(country)
            .copied()
            .or(self.fallback_location)
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions::from_config(&AppConfig::default())
    }
}

/// Row counts from one ingest call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub stored: usize,
    pub excluded: usize,
    pub skipped_short: usize,
    pub skipped_period: usize,
    pub rejected_numeric: usize,
    pub coerced_numeric: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    yearly: BTreeMap<i32, Snapshot>,
    quarterly: BTreeMap<i32, BTreeMap<Quarter, Snapshot>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.yearly.is_empty() && self.quarterly.is_empty()
    }

    pub fn yearly(&self, year: i32) -> Option<&Snapshot> {
        self.yearly.get(&year)
    }

    pub fn quarters(&self, year: i32) -> Option<&BTreeMap<Quarter, Snapshot>> {
        self.quarterly.get(&year)
    }

    pub fn quarter(&self, year: i32, quarter: Quarter) -> Option<&Snapshot> {
        self.quarterly.get(&year).and_then(|q| q.get(&quarter))
    }

    /// Every year with yearly or quarterly data, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.yearly
            .keys()
            .chain(self.quarterly.keys())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All quarterly snapshots in chronological order.
    pub fn quarterly_periods(&self) -> impl Iterator<Item = (i32, Quarter, &Snapshot)> {
        self.quarterly.iter().flat_map(|(year, quarters)| {
            quarters
                .iter()
                .map(move |(quarter, snapshot)| (*year, *quarter, snapshot))
        })
    }

    pub fn with_yearly(mut self, year: i32, snapshot: Snapshot) -> Self {
        self.yearly.insert(year, snapshot);
        self
    }

    pub fn with_quarter(mut self, year: i32, quarter: Quarter, snapshot: Snapshot) -> Self {
        self.quarterly
            .entry(year)
            .or_default()
            .insert(quarter, snapshot);
        self
    }

    /// Replaces the quarterly table with rows of `YYYY-Qn,country,visitors,amount`.
    pub fn ingest_quarterly(
        &mut self,
        raw: &str,
        options: &IngestOptions,
    ) -> Result<IngestReport, DataError> {
        let mut table: BTreeMap<i32, BTreeMap<Quarter, Snapshot>> = BTreeMap::new();
        let report = ingest_rows("quarterly", raw, options, |period, country, record| {
            let (year, quarter) = parse_quarter_token(period)?;
            table
                .entry(year)
                .or_default()
                .entry(quarter)
                .or_default()
                .insert(country, record);
            Some(())
        })?;
        info!(
            "Quarterly data loaded: {} years, {} rows",
            table.len(),
            report.stored
        );
        self.quarterly = table;
        Ok(report)
    }

    /// Replaces the yearly table with rows of `YYYY,country,visitors,amount`.
    pub fn ingest_yearly(
        &mut self,
        raw: &str,
        options: &IngestOptions,
    ) -> Result<IngestReport, DataError> {
        let mut table: BTreeMap<i32, Snapshot> = BTreeMap::new();
        let report = ingest_rows("yearly", raw, options, |period, country, record| {
            let year = period.trim().parse::<i32>().ok()?;
            table.entry(year).or_default().insert(country, record);
            Some(())
        })?;
        info!(
            "Yearly data loaded: {} years, {} rows",
            table.len(),
            report.stored
        );
        self.yearly = table;
        Ok(report)
    }

    /// Builds a dataset from both tables, failing if either one fails.
    pub fn from_csv(
        quarterly: &str,
        yearly: &str,
        options: &IngestOptions,
    ) -> Result<Dataset, DataError> {
        let mut dataset = Dataset::new();
        dataset.ingest_quarterly(quarterly, options)?;
        dataset.ingest_yearly(yearly, options)?;
        Ok(dataset)
    }

    /// A small fixed dataset used when the real tables cannot be loaded.
    pub fn sample(options: &IngestOptions) -> Dataset {
        let snapshot = |rows: &[(&str, u64, f64)]| -> Snapshot {
            rows.iter()
                .map(|(country, visitors, amount)| {
                    (
                        country.to_string(),
                        CountryPeriodRecord::new(*visitors, *amount)
                            .with_location(options.location_of(country)),
                    )
                })
                .collect()
        };

        Dataset::new()
            .with_quarter(
                2024,
                Quarter::Q1,
                snapshot(&[
                    ("Russia", 143_965, 149_005_804.2),
                    ("Georgia", 56_457, 35_631_179.05),
                    ("Iran", 39_520, 31_594_190.7),
                    ("United States", 16_167, 25_344_241.71),
                    ("Germany", 10_778, 14_808_375.94),
                ]),
            )
            .with_yearly(
                2024,
                snapshot(&[
                    ("Russia", 575_860, 596_023_216.8),
                    ("Georgia", 225_828, 142_524_716.2),
                    ("Iran", 158_080, 126_376_762.8),
                    ("United States", 64_668, 101_376_966.84),
                    ("Germany", 43_112, 59_233_503.76),
                ]),
            )
    }
}

fn parse_quarter_token(token: &str) -> Option<(i32, Quarter)> {
    let period: QuarterPeriod = token.parse().ok()?;
    Some((period.year, period.quarter))
}

/// Parses `raw` after its header line and hands each usable row to `store`.
/// `store` returns `None` when the period token is not understood.
fn ingest_rows<F>(
    name: &str,
    raw: &str,
    options: &IngestOptions,
    mut store: F,
) -> Result<IngestReport, DataError>
where
    F: FnMut(&str, String, CountryPeriodRecord) -> Option<()>,
{
    let mut lines = raw.trim().lines();
    let header = lines
        .next()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| DataError::parse(name, "input is empty"))?;
    if parse_line(header).len() < 4 {
        return Err(DataError::parse(
            name,
            format!("expected at least 4 header columns, got '{header}'"),
        ));
    }

    let mut report = IngestReport::default();
    let mut data_lines = 0;
    for line in lines.filter(|l| !l.trim().is_empty()) {
        data_lines += 1;
        let fields = parse_line(line);
        if fields.len() < 4 {
            debug!("Skipping short {name} row: {line}");
            report.skipped_short += 1;
            continue;
        }

        let country = fields[1].clone();
        if options.excluded_countries.contains(&country) {
            report.excluded += 1;
            continue;
        }

        let visitors = parse_visitors(&fields[2]);
        let amount = parse_amount(&fields[3]);
        let (visitors, amount) = match (visitors, amount, options.numeric_policy) {
            (Some(v), Some(a), _) => (v, a),
            (v, a, NumericPolicy::Coerce) => {
                warn!("Coercing non-numeric value to 0 in {name} row: {line}");
                report.coerced_numeric += 1;
                (v.unwrap_or(0), a.unwrap_or(0.0))
            }
            (_, _, NumericPolicy::Reject) => {
                warn!("Rejecting {name} row with non-numeric value: {line}");
                report.rejected_numeric += 1;
                continue;
            }
        };

        let record =
            CountryPeriodRecord::new(visitors, amount).with_location(options.location_of(&country));
        match store(&fields[0], country, record) {
            Some(()) => report.stored += 1,
            None => {
                warn!("Skipping {name} row with invalid period '{}'", fields[0]);
                report.skipped_period += 1;
            }
        }
    }

    if data_lines > 0 && report.stored == 0 && report.excluded == 0 {
        return Err(DataError::parse(
            name,
            format!("none of {data_lines} rows could be used"),
        ));
    }
    debug!("Ingested {name}: {report:?}");
    Ok(report)
}

/// Largest visitor count accepted for one row; anything above is treated as non-numeric.
pub const MAX_VISITORS: u64 = 10_000_000_000;

fn parse_visitors(field: &str) -> Option<u64> {
    let field = field.trim();
    field
        .parse::<u64>()
        .ok()
        .or_else(|| {
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && *v <= MAX_VISITORS as f64)
                .map(|v| v.trunc() as u64)
        })
        .filter(|v| *v <= MAX_VISITORS)
}

fn parse_amount(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUARTERLY: &str = "\
quarter,country,tourists,spending_usd
2024-Q1,Russia,143965,149005804.2
2024-Q1,Turkey,900,1000.0
2024-Q1,Georgia,56457,35631179.05
2024-Q2,Russia,150000,160000000
2024-Q2,Azerbaijan,10,10.0
2024-Q2,Turkey,5,5.0
2023-Q4,Russia,120000,110000000
";

    #[test]
    fn test_quarterly_ingest_builds_nested_table() {
        let mut dataset = Dataset::new();
        let report = dataset
            .ingest_quarterly(QUARTERLY, &IngestOptions::default())
            .unwrap();

        assert_eq!(report.stored, 4);
        assert_eq!(report.excluded, 3);
        let q1 = dataset.quarter(2024, Quarter::Q1).unwrap();
        assert_eq!(q1.len(), 2);
        assert_eq!(q1.get("Russia").unwrap().visitors, 143_965);
        assert_eq!(q1.get("Georgia").unwrap().amount, 35_631_179.05);
        assert_eq!(
            q1.get("Russia").unwrap().location,
            Some(Location(55.7558, 37.6176))
        );
        assert!(dataset.quarter(2023, Quarter::Q4).is_some());
        assert_eq!(dataset.years(), vec![2023, 2024]);
    }

    #[test]
    fn test_excluded_countries_never_stored() {
        let mut raw = String::from("quarter,country,tourists,spending\n");
        for i in 0..5 {
            raw.push_str(&format!("2024-Q{},Turkey,{i},1.0\n", i % 4 + 1));
            raw.push_str(&format!("2024-Q{},Azerbaijan,{i},1.0\n", i % 4 + 1));
        }
        raw.push_str("2024-Q1,Iran,1,1.0\n");

        let mut dataset = Dataset::new();
        let options = IngestOptions::default();
        dataset.ingest_quarterly(&raw, &options).unwrap();
        // Ingesting twice gives the same result.
        dataset.ingest_quarterly(&raw, &options).unwrap();

        for (_, _, snapshot) in dataset.quarterly_periods() {
            assert!(!snapshot.contains("Turkey"));
            assert!(!snapshot.contains("Azerbaijan"));
        }
        assert!(dataset.quarter(2024, Quarter::Q1).unwrap().contains("Iran"));
    }

    #[test]
    fn test_second_ingest_replaces_table() {
        let mut dataset = Dataset::new();
        let options = IngestOptions::default();
        dataset.ingest_quarterly(QUARTERLY, &options).unwrap();
        dataset
            .ingest_quarterly("quarter,country,t,s\n2019-Q3,Iran,1,2\n", &options)
            .unwrap();

        assert!(dataset.quarter(2024, Quarter::Q1).is_none());
        assert_eq!(dataset.years(), vec![2019]);
    }

    #[test]
    fn test_yearly_ingest() {
        let raw = "year,country,tourists,spending\n2023,Russia,500000,5.5e8\n2024,\"Korea, South\",10,2.5\n";
        let mut dataset = Dataset::new();
        let report = dataset
            .ingest_yearly(raw, &IngestOptions::default())
            .unwrap();

        assert_eq!(report.stored, 2);
        assert_eq!(dataset.yearly(2023).unwrap().get("Russia").unwrap().amount, 5.5e8);
        let korea = dataset.yearly(2024).unwrap().get("Korea, South").unwrap();
        assert_eq!(korea.visitors, 10);
        // Unknown countries are placed at the destination.
        assert_eq!(korea.location, Some(Location(40.1792, 44.4991)));
    }

    #[test]
    fn test_short_rows_and_bad_periods_are_skipped() {
        let raw = "quarter,country,tourists,spending\n2024-Q1,Russia\n2024-Q5,Iran,1,1\nsoon,Iran,1,1\n2024-Q2,Iran,3,4\n";
        let mut dataset = Dataset::new();
        let report = dataset
            .ingest_quarterly(raw, &IngestOptions::default())
            .unwrap();

        assert_eq!(report.stored, 1);
        assert_eq!(report.skipped_short, 1);
        assert_eq!(report.skipped_period, 2);
    }

    #[test]
    fn test_non_numeric_rows_rejected_by_default() {
        let raw = "quarter,country,tourists,spending\n2024-Q1,Russia,n/a,100\n2024-Q1,Iran,5,abc\n2024-Q1,Georgia,7,8.5\n";
        let mut dataset = Dataset::new();
        let report = dataset
            .ingest_quarterly(raw, &IngestOptions::default())
            .unwrap();

        assert_eq!(report.rejected_numeric, 2);
        let q1 = dataset.quarter(2024, Quarter::Q1).unwrap();
        assert_eq!(q1.len(), 1);
        assert!(q1.contains("Georgia"));
    }

    #[test]
    fn test_non_numeric_fields_coerced_to_zero() {
        let raw = "quarter,country,tourists,spending\n2024-Q1,Russia,n/a,100\n2024-Q1,Iran,5,-3\n";
        let options = IngestOptions {
            numeric_policy: NumericPolicy::Coerce,
            ..IngestOptions::default()
        };
        let mut dataset = Dataset::new();
        let report = dataset.ingest_quarterly(raw, &options).unwrap();

        assert_eq!(report.coerced_numeric, 2);
        let q1 = dataset.quarter(2024, Quarter::Q1).unwrap();
        assert_eq!(q1.get("Russia").unwrap().visitors, 0);
        assert_eq!(q1.get("Russia").unwrap().amount, 100.0);
        assert_eq!(q1.get("Iran").unwrap().amount, 0.0);
        assert!(!q1.total(crate::core::model::Metric::Amount).is_nan());
    }

    #[test]
    fn test_decimal_visitor_count_is_truncated() {
        assert_eq!(parse_visitors("143965"), Some(143_965));
        assert_eq!(parse_visitors("12.9"), Some(12));
        assert_eq!(parse_visitors("-1"), None);
        assert_eq!(parse_visitors("NaN"), None);
    }

    #[test]
    fn test_oversized_visitor_counts_are_rejected() {
        assert_eq!(parse_visitors("1e19"), None);
        assert_eq!(parse_visitors("18446744073709551615"), None);
        assert_eq!(parse_visitors("10000000000"), Some(MAX_VISITORS));
        assert_eq!(parse_visitors("1e10"), Some(MAX_VISITORS));

        let raw = "quarter,country,tourists,spending\n\
                   2024-Q1,Russia,1e19,1\n\
                   2024-Q1,Iran,18446744073709551615,1\n\
                   2024-Q1,Georgia,5,1\n";
        let mut dataset = Dataset::new();
        let report = dataset
            .ingest_quarterly(raw, &IngestOptions::default())
            .unwrap();

        assert_eq!(report.rejected_numeric, 2);
        assert_eq!(report.stored, 1);
        let q1 = dataset.quarter(2024, Quarter::Q1).unwrap();
        assert_eq!(q1.total_visitors(), 5);
    }

    #[test]
    fn test_visitor_totals_saturate_instead_of_overflowing() {
        let half = u64::MAX / 2 + 1;
        let snapshot: Snapshot = [
            ("Russia".to_string(), CountryPeriodRecord::new(half, 1.0)),
            ("Iran".to_string(), CountryPeriodRecord::new(half, 1.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(snapshot.total_visitors(), u64::MAX);

        let dataset = Dataset::new()
            .with_quarter(2024, Quarter::Q1, snapshot.clone())
            .with_quarter(2024, Quarter::Q2, snapshot);
        let year = crate::core::resolver::resolve(&dataset, crate::core::model::PeriodKey::Year(2024));
        assert_eq!(year.get("Russia").unwrap().visitors, u64::MAX);
    }

    #[test]
    fn test_malformed_input_is_a_parse_failure() {
        let options = IngestOptions::default();
        let mut dataset = Dataset::new();

        assert!(matches!(
            dataset.ingest_quarterly("", &options),
            Err(DataError::Parse { .. })
        ));
        assert!(matches!(
            dataset.ingest_quarterly("<html><body>Not Found</body></html>", &options),
            Err(DataError::Parse { .. })
        ));
        assert!(matches!(
            dataset.ingest_yearly("year,country,t,s\nnope\nstill nope\n", &options),
            Err(DataError::Parse { .. })
        ));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_header_only_is_empty_but_valid() {
        let mut dataset = Dataset::new();
        let report = dataset
            .ingest_yearly("year,country,tourists,spending\n", &IngestOptions::default())
            .unwrap();
        assert_eq!(report, IngestReport::default());
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_sample_dataset() {
        let dataset = Dataset::sample(&IngestOptions::default());
        assert_eq!(dataset.yearly(2024).unwrap().len(), 5);
        assert_eq!(dataset.quarter(2024, Quarter::Q1).unwrap().len(), 5);
        assert_eq!(
            dataset.yearly(2024).unwrap().get("Russia").unwrap().visitors,
            575_860
        );
    }
}
