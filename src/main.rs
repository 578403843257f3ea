use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tourdash::core::log::init_logging;
use tourdash::core::model::{Metric, QuarterPeriod, QuarterSelection};
use tourdash::core::ranking::{RegionFilter, TopN};
use tourdash::core::trend::TrendRange;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Year to show
    #[arg(short, long, global = true)]
    year: Option<i32>,

    /// Quarter to show (Q1-Q4, or ALL for the whole year)
    #[arg(short, long, global = true)]
    quarter: Option<QuarterSelection>,

    /// Metric to rank by (visitors or amount)
    #[arg(short, long, global = true)]
    metric: Option<Metric>,

    /// Region to restrict the ranking to, or "all"
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Number of countries to show, or "all"
    #[arg(short, long, global = true)]
    top: Option<TopN>,

    /// Query string with year, quarter and metric, e.g. "year=2023&quarter=Q2&metric=amount"
    #[arg(long, global = true)]
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> tourdash::FilterOverrides {
        tourdash::FilterOverrides {
            year: self.year,
            quarter: self.quarter,
            metric: self.metric,
            region: self.region.as_deref().map(RegionFilter::from),
            top: self.top,
            query: self.query.clone(),
        }
    }
}

impl From<Commands> for tourdash::AppCommand {
    fn from(cmd: Commands) -> tourdash::AppCommand {
        match cmd {
            Commands::Stats => tourdash::AppCommand::Stats,
            Commands::Top => tourdash::AppCommand::Top,
            Commands::Trend { country, range } => tourdash::AppCommand::Trend { country, range },
            Commands::Country { name } => tourdash::AppCommand::Country { name },
            Commands::Compare {
                countries,
                from,
                to,
            } => tourdash::AppCommand::Compare {
                countries,
                from,
                to,
            },
            Commands::Overview => tourdash::AppCommand::Overview,
            Commands::Export { output } => tourdash::AppCommand::Export { output },
            Commands::Share => tourdash::AppCommand::Share,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display statistics for the selected period
    Stats,
    /// Display countries ranked by the selected metric
    Top,
    /// Display the history of one country
    Trend {
        /// Country name as it appears in the data
        #[arg(long)]
        country: String,
        /// quarterly, recent (last 8 quarters) or yearly
        #[arg(long, default_value = "quarterly")]
        range: TrendRange,
    },
    /// Display market position and spending profile of one country
    Country {
        /// Country name as it appears in the data
        #[arg(long)]
        name: String,
    },
    /// Compare countries quarter by quarter
    Compare {
        /// Comma-separated country names
        #[arg(long, value_delimiter = ',', required = true)]
        countries: Vec<String>,
        /// First quarter, e.g. 2023-Q1; defaults to the earliest
        #[arg(long)]
        from: Option<QuarterPeriod>,
        /// Last quarter, e.g. 2024-Q4; defaults to the latest
        #[arg(long)]
        to: Option<QuarterPeriod>,
    },
    /// Display statistics over all quarterly data
    Overview,
    /// Write the ranked selection to a JSON file
    Export {
        /// Output file, defaults to <destination>-tourism-<year>-<quarter>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a link that reproduces the selection
    Share,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let overrides = cli.overrides();
    let result = match cli.command {
        Some(Commands::Setup) => tourdash::cli::setup::setup(),
        Some(cmd) => {
            tourdash::run_command(cmd.into(), &overrides, cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
