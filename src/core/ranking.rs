//! Region filtering and top-N ranking of a snapshot.

use super::model::{CountryPeriodRecord, Metric, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// Region id to member countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionTable(BTreeMap<String, Vec<String>>);

impl RegionTable {
    pub fn new(regions: BTreeMap<String, Vec<String>>) -> Self {
        Self(regions)
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn members(&self, region: &str) -> Option<&[String]> {
        self.0.get(region).map(Vec::as_slice)
    }

    /// Whether `country` belongs to `region`. Unknown regions contain nothing.
    pub fn contains(&self, region: &str, country: &str) -> bool {
        self.members(region)
            .is_some_and(|members| members.iter().any(|m| m == country))
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        let regions: [(&str, &[&str]); 5] = [
            (
                "europe",
                &[
                    "Germany",
                    "France",
                    "United Kingdom",
                    "Italy",
                    "Spain",
                    "Netherlands",
                    "Poland",
                    "Czechia",
                    "Greece",
                    "Switzerland",
                    "Austria",
                    "Belgium",
                    "Norway",
                    "Sweden",
                    "Denmark",
                    "Finland",
                ],
            ),
            ("asia", &["China", "India", "Japan", "South Korea"]),
            ("americas", &["United States", "Canada"]),
            (
                "middle-east",
                &[
                    "Iran",
                    "Israel",
                    "Lebanon",
                    "UAE",
                    "Qatar",
                    "Kuwait",
                    "Saudi Arabia",
                    "Iraq",
                ],
            ),
            (
                "post-soviet",
                &[
                    "Russia",
                    "Georgia",
                    "Kazakhstan",
                    "Belarus",
                    "Ukraine",
                    "Uzbekistan",
                    "Kyrgyzstan",
                    "Tajikistan",
                    "Armenian Diaspora (non-resident)",
                ],
            ),
        ];
        Self(
            regions
                .iter()
                .map(|(id, members)| {
                    (
                        id.to_string(),
                        members.iter().map(|m| m.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionFilter {
    #[default]
    All,
    Region(String),
}

impl Display for RegionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionFilter::All => write!(f, "all"),
            RegionFilter::Region(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for RegionFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            RegionFilter::All
        } else {
            RegionFilter::Region(value.to_string())
        }
    }
}

impl From<String> for RegionFilter {
    fn from(value: String) -> Self {
        RegionFilter::from(value.as_str())
    }
}

impl From<RegionFilter> for String {
    fn from(value: RegionFilter) -> Self {
        value.to_string()
    }
}

/// How many ranked entries to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TopNRepr", into = "String")]
pub enum TopN {
    #[default]
    All,
    Count(usize),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TopNRepr {
    Count(i64),
    Text(String),
}

impl From<TopNRepr> for TopN {
    fn from(value: TopNRepr) -> Self {
        match value {
            TopNRepr::Count(n) => TopN::from_count(n),
            TopNRepr::Text(s) => TopN::parse(&s),
        }
    }
}

impl TopN {
    /// Anything other than a positive integer means "all".
    pub fn parse(value: &str) -> Self {
        value
            .trim()
            .parse::<i64>()
            .map_or(TopN::All, TopN::from_count)
    }

    fn from_count(n: i64) -> Self {
        if n > 0 {
            TopN::Count(n as usize)
        } else {
            TopN::All
        }
    }
}

impl FromStr for TopN {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TopN::parse(s))
    }
}

impl Display for TopN {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopN::All => write!(f, "all"),
            TopN::Count(n) => write!(f, "{n}"),
        }
    }
}

impl From<TopN> for String {
    fn from(value: TopN) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub country: String,
    pub record: CountryPeriodRecord,
}

/// Orders a snapshot by `metric`, descending, after applying the region filter.
///
/// The sort is stable: equal values keep the snapshot's iteration order.
pub fn rank(
    snapshot: &Snapshot,
    regions: &RegionTable,
    region: &RegionFilter,
    metric: Metric,
    top: TopN,
) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = snapshot
        .iter()
        .filter(|(country, _)| match region {
            RegionFilter::All => true,
            RegionFilter::Region(id) => regions.contains(id, country),
        })
        .map(|(country, record)| RankedEntry {
            country: country.to_string(),
            record: *record,
        })
        .collect();

    entries.sort_by(|a, b| b.record.value(metric).total_cmp(&a.record.value(metric)));

    if let TopN::Count(n) = top {
        entries.truncate(n);
    }
    debug!(
        "Ranked {} of {} countries by {metric} (region: {region}, top: {top})",
        entries.len(),
        snapshot.len()
    );
    entries
}
