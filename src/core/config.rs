use super::filter::FilterState;
use super::model::Location;
use super::ranking::RegionTable;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileSourceConfig {
    pub root: String,
}

/// What to do with a visitor or amount field that is not a number.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Skip the row.
    #[default]
    Reject,
    /// Store the field as zero.
    Coerce,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DataConfig {
    #[serde(default)]
    pub http: Option<HttpSourceConfig>,
    #[serde(default)]
    pub file: Option<FileSourceConfig>,
    #[serde(default = "default_quarterly_name")]
    pub quarterly: String,
    #[serde(default = "default_yearly_name")]
    pub yearly: String,
    #[serde(default)]
    pub numeric_policy: NumericPolicy,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_quarterly_name() -> String {
    "armenia_inbound_tourism_by_country_quarter_2019q1_2025q3.csv".to_string()
}

fn default_yearly_name() -> String {
    "armenia_inbound_tourism_yearly_2019_2025.csv".to_string()
}

fn default_retries() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            http: None,
            file: Some(FileSourceConfig {
                root: "data".to_string(),
            }),
            quarterly: default_quarterly_name(),
            yearly: default_yearly_name(),
            numeric_policy: NumericPolicy::default(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// The host country receiving the visitors.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DestinationConfig {
    pub name: String,
    pub location: Location,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        DestinationConfig {
            name: "Armenia".to_string(),
            location: Location(40.1792, 44.4991),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub destination: DestinationConfig,
    #[serde(default = "default_excluded_countries")]
    pub excluded_countries: BTreeSet<String>,
    #[serde(default)]
    pub regions: RegionTable,
    #[serde(default = "default_locations")]
    pub locations: BTreeMap<String, Location>,
    #[serde(default)]
    pub defaults: FilterState,
    #[serde(default)]
    pub share_base_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data: DataConfig::default(),
            destination: DestinationConfig::default(),
            excluded_countries: default_excluded_countries(),
            regions: RegionTable::default(),
            locations: default_locations(),
            defaults: FilterState::default(),
            share_base_url: None,
        }
    }
}

fn default_excluded_countries() -> BTreeSet<String> {
    ["Azerbaijan", "Turkey"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_locations() -> BTreeMap<String, Location> {
    [
        ("Russia", 55.7558, 37.6176),
        ("Georgia", 41.7151, 44.8271),
        ("Iran", 35.6892, 51.3890),
        ("United States", 38.9072, -77.0369),
        ("Germany", 52.5200, 13.4050),
        ("France", 48.8566, 2.3522),
        ("United Kingdom", 51.5074, -0.1278),
        ("Italy", 41.9028, 12.4964),
        ("Spain", 40.4168, -3.7038),
        ("Netherlands", 52.3676, 4.9041),
        ("Poland", 52.2297, 21.0122),
        ("Czechia", 50.0755, 14.4378),
        ("Greece", 37.9838, 23.7275),
        ("Switzerland", 46.9481, 7.4474),
        ("Austria", 48.2082, 16.3738),
        ("Belgium", 50.8503, 4.3517),
        ("Norway", 59.9139, 10.7522),
        ("Sweden", 59.3293, 18.0686),
        ("Denmark", 55.6761, 12.5683),
        ("Finland", 60.1699, 24.9384),
        ("Canada", 45.4215, -75.6972),
        ("China", 39.9042, 116.4074),
        ("India", 28.6139, 77.2090),
        ("Japan", 35.6762, 139.6503),
        ("South Korea", 37.5665, 126.9780),
        ("Israel", 31.7683, 35.2137),
        ("Lebanon", 33.8938, 35.5018),
        ("UAE", 24.4539, 54.3773),
        ("Qatar", 25.2764, 51.5205),
        ("Kuwait", 29.3117, 47.4818),
        ("Saudi Arabia", 24.7136, 46.6753),
        ("Iraq", 33.3152, 44.3661),
        ("Kazakhstan", 51.1694, 71.4491),
        ("Belarus", 53.9045, 27.5615),
        ("Ukraine", 50.4501, 30.5234),
        ("Uzbekistan", 41.3775, 64.5853),
        ("Kyrgyzstan", 42.8746, 74.5698),
        ("Tajikistan", 38.5598, 68.7870),
    ]
    .into_iter()
    .map(|(country, lat, lon)| (country.to_string(), Location(lat, lon)))
    .collect()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "tourdash", "tourdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
