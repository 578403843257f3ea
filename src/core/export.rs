use super::filter::FilterState;
use super::model::{Metric, QuarterSelection};
use super::ranking::RankedEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub country: String,
    pub visitors: u64,
    pub amount: f64,
}

/// A ranked period ready to hand to an external consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub year: i32,
    pub quarter: QuarterSelection,
    pub metric: Metric,
    pub data: Vec<ExportRow>,
}

impl ExportDocument {
    pub fn new(filter: &FilterState, ranked: &[RankedEntry]) -> Self {
        ExportDocument {
            year: filter.year,
            quarter: filter.quarter,
            metric: filter.metric,
            data: ranked
                .iter()
                .map(|entry| ExportRow {
                    country: entry.country.clone(),
                    visitors: entry.record.visitors,
                    amount: entry.record.amount,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize export document")
    }

    /// Default download name, e.g. `armenia-tourism-2024-Q1.json`.
    pub fn file_name(&self, destination: &str) -> String {
        let slug = destination.trim().to_lowercase().replace(' ', "-");
        format!("{slug}-tourism-{}-{}.json", self.year, self.quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CountryPeriodRecord, Quarter};

    #[test]
    fn test_export_keeps_ranking_order() {
        let filter = FilterState {
            year: 2024,
            quarter: QuarterSelection::Quarter(Quarter::Q1),
            metric: Metric::Amount,
            ..FilterState::default()
        };
        let ranked = vec![
            RankedEntry {
                country: "Russia".to_string(),
                record: CountryPeriodRecord::new(143_965, 149_005_804.2),
            },
            RankedEntry {
                country: "Georgia".to_string(),
                record: CountryPeriodRecord::new(56_457, 35_631_179.05),
            },
        ];

        let doc = ExportDocument::new(&filter, &ranked);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(json["year"], 2024);
        assert_eq!(json["quarter"], "Q1");
        assert_eq!(json["metric"], "amount");
        assert_eq!(json["data"][0]["country"], "Russia");
        assert_eq!(json["data"][0]["visitors"], 143_965);
        assert_eq!(json["data"][1]["country"], "Georgia");
        assert_eq!(json["data"][1]["amount"], 35_631_179.05);
        assert_eq!(doc.file_name("Armenia"), "armenia-tourism-2024-Q1.json");
    }

    #[test]
    fn test_empty_export() {
        let filter = FilterState {
            year: 2030,
            ..FilterState::default()
        };
        let doc = ExportDocument::new(&filter, &[]);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(json["year"], 2030);
        assert_eq!(json["quarter"], "ALL");
        assert_eq!(json["metric"], "visitors");
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
