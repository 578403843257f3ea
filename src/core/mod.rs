//! Tourism statistics engine: ingest, period resolution, metrics and ranking

pub mod config;
pub mod country;
pub mod csv;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod log;
pub mod metrics;
pub mod model;
pub mod ranking;
pub mod resolver;
pub mod trend;
pub mod view;

// Re-export main types for cleaner imports
pub use dataset::{Dataset, IngestOptions, IngestReport};
pub use error::DataError;
pub use filter::FilterState;
pub use model::{CountryPeriodRecord, Metric, PeriodKey, Quarter, QuarterSelection, Snapshot};
pub use ranking::{RankedEntry, RegionFilter, RegionTable, TopN};
pub use view::PeriodView;
