//! Command line and source configuration.
//!
//! Every option can also be set through the environment (a `.env` file is
//! honoured). Where the data server lives and how far back to search for a
//! model run can additionally be overridden from a YAML file:
//!
//! ```yaml
//! base_url: https://nomads.ncep.noaa.gov/dods
//! lookback_hours: 180
//! templates:
//!   0p25: "{base}/gfs_0p25_1hr/gfs{date}/gfs_0p25_1hr_{cycle}z"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Deserialize;
use tracing::{debug, warn};

use wind_common::{posix_to_datetime, Resolution, Window, WindResult};

/// Default root of the NOMADS GrADS data server.
pub const DEFAULT_BASE_URL: &str = "https://nomads.ncep.noaa.gov/dods";

/// Longest accepted search window for a covering model run, 31 days.
pub const MAX_LOOKBACK_HOURS: f64 = 744.0;

/// Default output path template.
pub const DEFAULT_OUTPUT: &str = "gfs/gfs_%(time)_%(lat)_%(lon)_%(latdelta)_%(londelta).dat";

#[derive(Parser, Debug, Clone)]
#[command(name = "get-wind-data")]
#[command(about = "Download GFS wind data tiles for the landing predictor")]
#[command(version)]
pub struct Args {
    /// Search for a dataset covering the POSIX timestamp TIME [default: now]
    #[arg(short, long, value_name = "TIME", env = "GFS_TIMESTAMP", allow_hyphen_values = true)]
    pub timestamp: Option<i64>,

    /// Output file template; %(time), %(lat), %(lon), %(latdelta) and
    /// %(londelta) are replaced with the tile's values
    #[arg(short, long, value_name = "FILE", env = "GFS_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Be verbose. The more times this is specified the more verbose
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Save data at most HOURS hours in the past
    #[arg(short, long, value_name = "HOURS", env = "GFS_PAST", default_value_t = 3)]
    pub past: i64,

    /// Save data at most HOURS hours in the future
    #[arg(short, long, value_name = "HOURS", env = "GFS_FUTURE", default_value_t = 9)]
    pub future: i64,

    /// GFS dataset resolution: 1p00, 0p50 or 0p25
    #[arg(short, long, env = "GFS_RESOLUTION", default_value = "0p50")]
    pub resolution: String,

    /// Tile centre latitude in range (-90,90) degrees north
    #[arg(long, value_name = "DEGREES", env = "GFS_LAT", default_value_t = 52.0, allow_hyphen_values = true)]
    pub lat: f64,

    /// Tile centre longitude in degrees east
    #[arg(long, value_name = "DEGREES", env = "GFS_LON", default_value_t = 0.0, allow_hyphen_values = true)]
    pub lon: f64,

    /// Tile radius in latitude in degrees
    #[arg(long, value_name = "DEGREES", env = "GFS_LATDELTA", default_value_t = 5.0, allow_hyphen_values = true)]
    pub latdelta: f64,

    /// Tile radius in longitude in degrees
    #[arg(long, value_name = "DEGREES", env = "GFS_LONDELTA", default_value_t = 5.0, allow_hyphen_values = true)]
    pub londelta: f64,

    /// Number of tiles along latitude to download
    #[arg(long, value_name = "TILES", env = "GFS_LATTILES", default_value_t = 1)]
    pub lattiles: u32,

    /// Number of tiles along longitude to download
    #[arg(long, value_name = "TILES", env = "GFS_LONTILES", default_value_t = 1)]
    pub lontiles: u32,

    /// Data server root URL [default: NOMADS]
    #[arg(long, value_name = "URL", env = "GFS_SERVER")]
    pub server: Option<String>,

    /// File the accepted dataset URL is recorded in
    #[arg(long, value_name = "FILE", env = "GFS_DATASET_RECORD", default_value = "gfs/dataset.txt")]
    pub dataset_record: PathBuf,

    /// Directory for the transfer cache, emptied when the run ends
    #[arg(long, value_name = "DIR", env = "GFS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// YAML file overriding the data server settings
    #[arg(long, value_name = "FILE", env = "GFS_SOURCE_CONFIG")]
    pub source_config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, env = "GFS_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    /// Validated area of interest with its centre longitude canonicalized.
    pub fn area_of_interest(&self) -> WindResult<Window> {
        Window::area_of_interest(self.lat, self.latdelta, self.lon, self.londelta)
    }

    /// Requested target time.
    pub fn target_time(&self) -> WindResult<DateTime<Utc>> {
        match self.timestamp {
            Some(seconds) => posix_to_datetime(seconds),
            None => Ok(Utc::now()),
        }
    }

    /// Requested resolution tier. Unknown names select the 0.5 degree tier.
    pub fn resolution(&self) -> Resolution {
        match Resolution::parse(&self.resolution) {
            Some(resolution) => resolution,
            None => {
                let fallback = Resolution::default();
                warn!(
                    requested = %self.resolution,
                    using = %fallback,
                    "Unknown resolution, falling back"
                );
                fallback
            }
        }
    }

    /// Source settings from `--source-config`, with `--server` taking
    /// precedence over the file's base URL.
    pub fn source(&self) -> Result<SourceConfig> {
        let mut source = match &self.source_config {
            Some(path) => SourceConfig::load(path)?,
            None => SourceConfig::default(),
        };
        if let Some(server) = &self.server {
            source.base_url = server.clone();
        }
        Ok(source)
    }
}

/// Where datasets are published and how far back to search for them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How far before the target time a model run may start
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: f64,

    /// Per-tier dataset URL templates
    #[serde(default)]
    pub templates: TemplateOverrides,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_lookback_hours() -> f64 {
    180.0 // 7.5 days
}

/// Optional replacements for the built-in dataset URL templates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TemplateOverrides {
    #[serde(rename = "1p00")]
    pub one_degree: Option<String>,
    #[serde(rename = "0p50")]
    pub half_degree: Option<String>,
    #[serde(rename = "0p25")]
    pub quarter_degree: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lookback_hours: default_lookback_hours(),
            templates: TemplateOverrides::default(),
        }
    }
}

impl SourceConfig {
    /// Load source settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source config: {}", path.display()))?;

        let config: SourceConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse source config: {}", path.display()))?;

        if !(0.0..=MAX_LOOKBACK_HOURS).contains(&config.lookback_hours) {
            anyhow::bail!(
                "lookback_hours must be between 0 and {} (got {})",
                MAX_LOOKBACK_HOURS,
                config.lookback_hours
            );
        }

        debug!(path = %path.display(), base_url = %config.base_url, "Loaded source config");
        Ok(config)
    }

    /// Whole days reaching back from the target date, `ceil(lookback / 1 day)`.
    ///
    /// Values outside `[0, MAX_LOOKBACK_HOURS]` are clamped; NaN counts as zero.
    pub fn lookback_days(&self) -> u32 {
        let hours = self.lookback_hours.max(0.0).min(MAX_LOOKBACK_HOURS);
        (hours / 24.0).ceil() as u32
    }

    /// Dataset URL template for a tier.
    pub fn template(&self, resolution: Resolution) -> &str {
        let custom = match resolution {
            Resolution::OneDegree => &self.templates.one_degree,
            Resolution::HalfDegree => &self.templates.half_degree,
            Resolution::QuarterDegree => &self.templates.quarter_degree,
        };
        custom
            .as_deref()
            .unwrap_or_else(|| resolution.default_template())
    }
}
