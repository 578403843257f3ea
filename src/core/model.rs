//! Period keys, metrics and per-country records

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// The quarter before this one, and whether that crosses into the previous year.
    pub fn previous(&self) -> (Quarter, bool) {
        match self {
            Quarter::Q1 => (Quarter::Q4, true),
            Quarter::Q2 => (Quarter::Q1, false),
            Quarter::Q3 => (Quarter::Q2, false),
            Quarter::Q4 => (Quarter::Q3, false),
        }
    }
}

impl Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Quarter::Q1 => "Q1",
                Quarter::Q2 => "Q2",
                Quarter::Q3 => "Q3",
                Quarter::Q4 => "Q4",
            }
        )
    }
}

impl FromStr for Quarter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "Q1" => Ok(Quarter::Q1),
            "Q2" => Ok(Quarter::Q2),
            "Q3" => Ok(Quarter::Q3),
            "Q4" => Ok(Quarter::Q4),
            _ => Err(anyhow::anyhow!("Invalid quarter: {}", s)),
        }
    }
}

/// Either a whole year or one quarter of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuarterSelection {
    #[default]
    All,
    Quarter(Quarter),
}

impl Display for QuarterSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuarterSelection::All => write!(f, "ALL"),
            QuarterSelection::Quarter(q) => write!(f, "{q}"),
        }
    }
}

impl FromStr for QuarterSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(QuarterSelection::All);
        }
        s.parse().map(QuarterSelection::Quarter)
    }
}

impl TryFrom<String> for QuarterSelection {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuarterSelection> for String {
    fn from(value: QuarterSelection) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKey {
    Year(i32),
    Quarter { year: i32, quarter: Quarter },
}

impl PeriodKey {
    pub fn new(year: i32, selection: QuarterSelection) -> Self {
        match selection {
            QuarterSelection::All => PeriodKey::Year(year),
            QuarterSelection::Quarter(quarter) => PeriodKey::Quarter { year, quarter },
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            PeriodKey::Year(year) | PeriodKey::Quarter { year, .. } => *year,
        }
    }

    pub fn selection(&self) -> QuarterSelection {
        match self {
            PeriodKey::Year(_) => QuarterSelection::All,
            PeriodKey::Quarter { quarter, .. } => QuarterSelection::Quarter(*quarter),
        }
    }

    /// The immediately preceding period of the same granularity.
    pub fn previous(&self) -> PeriodKey {
        match self {
            PeriodKey::Year(year) => PeriodKey::Year(year - 1),
            PeriodKey::Quarter { year, quarter } => {
                let (quarter, wraps) = quarter.previous();
                let year = if wraps { year - 1 } else { *year };
                PeriodKey::Quarter { year, quarter }
            }
        }
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodKey::Year(year) => write!(f, "{year}"),
            PeriodKey::Quarter { year, quarter } => write!(f, "{year} {quarter}"),
        }
    }
}

/// One quarter of one year, written `2024-Q1`. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuarterPeriod {
    pub year: i32,
    pub quarter: Quarter,
}

impl QuarterPeriod {
    pub fn new(year: i32, quarter: Quarter) -> Self {
        Self { year, quarter }
    }
}

impl Display for QuarterPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.quarter)
    }
}

impl FromStr for QuarterPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, quarter) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid period, expected YYYY-Qn: {}", s))?;
        let year = year
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid year in period: {}", s))?;
        Ok(QuarterPeriod::new(year, quarter.parse()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    #[serde(alias = "tourists")]
    Visitors,
    #[serde(alias = "spending")]
    Amount,
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Metric::Visitors => "visitors",
                Metric::Amount => "amount",
            }
        )
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visitors" | "tourists" => Ok(Metric::Visitors),
            "amount" | "spending" => Ok(Metric::Amount),
            _ => Err(anyhow::anyhow!("Invalid metric: {}", s)),
        }
    }
}

/// Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location(pub f64, pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryPeriodRecord {
    pub visitors: u64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<Location>,
}

impl CountryPeriodRecord {
    pub fn new(visitors: u64, amount: f64) -> Self {
        Self {
            visitors,
            amount,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Visitors => self.visitors as f64,
            Metric::Amount => self.amount,
        }
    }
}

/// Per-country records for one period, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, CountryPeriodRecord)>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, country: &str) -> Option<&CountryPeriodRecord> {
        self.index.get(country).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.index.contains_key(country)
    }

    /// Inserts or replaces a record. A replaced country keeps its original position.
    pub fn insert(&mut self, country: String, record: CountryPeriodRecord) {
        match self.index.get(&country) {
            Some(&i) => self.entries[i].1 = record,
            None => {
                self.index.insert(country.clone(), self.entries.len());
                self.entries.push((country, record));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountryPeriodRecord)> {
        self.entries.iter().map(|(c, r)| (c.as_str(), r))
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn total(&self, metric: Metric) -> f64 {
        self.entries.iter().map(|(_, r)| r.value(metric)).sum()
    }

    pub fn total_visitors(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, (_, r)| sum.saturating_add(r.visitors))
    }

    pub fn total_amount(&self) -> f64 {
        self.total(Metric::Amount)
    }
}

impl FromIterator<(String, CountryPeriodRecord)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, CountryPeriodRecord)>>(iter: T) -> Self {
        let mut snapshot = Snapshot::new();
        for (country, record) in iter {
            snapshot.insert(country, record);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_ordering() {
        assert!(Quarter::Q1 < Quarter::Q2);
        assert!(Quarter::Q3 < Quarter::Q4);
    }

    #[test]
    fn test_previous_period_wraps_year() {
        let q1 = PeriodKey::Quarter {
            year: 2024,
            quarter: Quarter::Q1,
        };
        assert_eq!(
            q1.previous(),
            PeriodKey::Quarter {
                year: 2023,
                quarter: Quarter::Q4
            }
        );

        let q3 = PeriodKey::Quarter {
            year: 2024,
            quarter: Quarter::Q3,
        };
        assert_eq!(
            q3.previous(),
            PeriodKey::Quarter {
                year: 2024,
                quarter: Quarter::Q2
            }
        );

        assert_eq!(PeriodKey::Year(2024).previous(), PeriodKey::Year(2023));
    }

    #[test]
    fn test_quarter_period_parsing_and_order() {
        let period: QuarterPeriod = "2023-q4".parse().unwrap();
        assert_eq!(period, QuarterPeriod::new(2023, Quarter::Q4));
        assert_eq!(period.to_string(), "2023-Q4");
        assert!(period < QuarterPeriod::new(2024, Quarter::Q1));
        assert!("2023".parse::<QuarterPeriod>().is_err());
        assert!("20x3-Q1".parse::<QuarterPeriod>().is_err());
        assert!("2023-Q5".parse::<QuarterPeriod>().is_err());
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(
            "ALL".parse::<QuarterSelection>().unwrap(),
            QuarterSelection::All
        );
        assert_eq!(
            "q2".parse::<QuarterSelection>().unwrap(),
            QuarterSelection::Quarter(Quarter::Q2)
        );
        assert!("Q5".parse::<QuarterSelection>().is_err());
    }

    #[test]
    fn test_metric_accepts_legacy_names() {
        assert_eq!("tourists".parse::<Metric>().unwrap(), Metric::Visitors);
        assert_eq!("spending".parse::<Metric>().unwrap(), Metric::Amount);
        assert_eq!("Amount".parse::<Metric>().unwrap(), Metric::Amount);
        assert!("revenue".parse::<Metric>().is_err());

        let metric: Metric = serde_yaml::from_str("tourists").unwrap();
        assert_eq!(metric, Metric::Visitors);
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(PeriodKey::Year(2024).to_string(), "2024");
        assert_eq!(
            PeriodKey::new(2024, QuarterSelection::Quarter(Quarter::Q3)).to_string(),
            "2024 Q3"
        );
    }

    #[test]
    fn test_snapshot_keeps_insertion_order_on_replace() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("Russia".to_string(), CountryPeriodRecord::new(10, 1.0));
        snapshot.insert("Georgia".to_string(), CountryPeriodRecord::new(5, 2.0));
        snapshot.insert("Russia".to_string(), CountryPeriodRecord::new(20, 3.0));

        let countries: Vec<&str> = snapshot.countries().collect();
        assert_eq!(countries, vec!["Russia", "Georgia"]);
        assert_eq!(snapshot.get("Russia").unwrap().visitors, 20);
        assert_eq!(snapshot.total_visitors(), 25);
        assert_eq!(snapshot.total(Metric::Amount), 5.0);
    }
}
