pub mod cli;
pub mod core;
pub mod sources;

use crate::cli::ui::{self, StyleType};
use crate::core::config::AppConfig;
use crate::core::filter::FilterState;
use crate::core::model::{Metric, Quarter, QuarterPeriod, QuarterSelection};
use crate::core::ranking::{RegionFilter, RegionTable, TopN};
use crate::core::trend::TrendRange;
use crate::core::view::PeriodView;
use crate::sources::DataOrigin;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Stats,
    Top,
    Trend { country: String, range: TrendRange },
    Country { name: String },
    Compare {
        countries: Vec<String>,
        from: Option<QuarterPeriod>,
        to: Option<QuarterPeriod>,
    },
    Overview,
    Export { output: Option<PathBuf> },
    Share,
}

/// Selection flags given on the command line. A `query` string is applied
/// first, explicit flags override it.
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    pub year: Option<i32>,
    pub quarter: Option<QuarterSelection>,
    pub metric: Option<Metric>,
    pub region: Option<RegionFilter>,
    pub top: Option<TopN>,
    pub query: Option<String>,
}

impl FilterOverrides {
    pub fn apply(&self, base: &FilterState) -> FilterState {
        let mut filter = match &self.query {
            Some(query) => base.with_query(query),
            None => base.clone(),
        };
        if let Some(year) = self.year {
            filter.year = year;
        }
        if let Some(quarter) = self.quarter {
            filter.quarter = quarter;
        }
        if let Some(metric) = self.metric {
            filter.metric = metric;
        }
        if let Some(region) = &self.region {
            filter.region = region.clone();
        }
        if let Some(top) = self.top {
            filter.top = top;
        }
        filter
    }
}

/// Names the known region ids when `region` selects one that is not configured.
fn unknown_region_notice(regions: &RegionTable, region: &RegionFilter) -> Option<String> {
    let RegionFilter::Region(id) = region else {
        return None;
    };
    if regions.members(id).is_some() {
        return None;
    }
    let known: Vec<&str> = regions.region_ids().collect();
    Some(format!(
        "Unknown region '{id}'; known regions: {}",
        known.join(", ")
    ))
}

pub async fn run_command(
    command: AppCommand,
    overrides: &FilterOverrides,
    config_path: Option<&str>,
) -> Result<()> {
    info!("Tourism dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let filter = overrides.apply(&config.defaults);
    debug!(?filter, "Resolved selection");
    if let Some(notice) = unknown_region_notice(&config.regions, &filter.region) {
        warn!("{notice}");
    }

    if command == AppCommand::Share {
        return cli::share::run(&filter, config.share_base_url.as_deref());
    }

    let pb = ui::new_spinner("Loading tourism data...");
    let loaded = sources::load_from_config(&config).await;
    pb.finish_and_clear();

    if loaded.origin == DataOrigin::Sample {
        let reason = loaded
            .error
            .as_ref()
            .map_or_else(|| "no data source configured".to_string(), |e| e.to_string());
        eprintln!(
            "{}",
            ui::style_text(
                &format!("Using sample data ({reason})"),
                StyleType::Error
            )
        );
    }
    for report in [&loaded.quarterly, &loaded.yearly].into_iter().flatten() {
        debug!(?report, "Ingest report");
    }

    let dataset = &loaded.dataset;
    match command {
        AppCommand::Stats => {
            let view = PeriodView::compute(dataset, &config.regions, &filter);
            cli::stats::run(&view, &dataset.years());
        }
        AppCommand::Top => {
            cli::top::run(&PeriodView::compute(dataset, &config.regions, &filter));
        }
        AppCommand::Trend { country, range } => {
            cli::trend::run(dataset, &country, filter.metric, range);
        }
        AppCommand::Country { name } => {
            cli::country::run(dataset, filter.period(), &name);
        }
        AppCommand::Compare {
            countries,
            from,
            to,
        } => {
            let from = from.unwrap_or(QuarterPeriod::new(i32::MIN, Quarter::Q1));
            let to = to.unwrap_or(QuarterPeriod::new(i32::MAX, Quarter::Q4));
            let countries: Vec<String> = countries
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            cli::compare::run(dataset, &countries, filter.metric, from, to);
        }
        AppCommand::Overview => {
            cli::overview::run(&crate::core::trend::overview(dataset));
        }
        AppCommand::Export { output } => {
            let view = PeriodView::compute(dataset, &config.regions, &filter);
            cli::export::run(&view, &config.destination.name, output.as_deref())?;
        }
        AppCommand::Share => unreachable!("Share is handled before loading data"),
    }
    Ok(())
}
