//! Per-run context: log setup, output locations and the transfer cache lifetime.

use std::path::{Path, PathBuf};

use opendap::{DapClientConfig, ResponseCache};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wind_common::WindResult;

use crate::config::DEFAULT_OUTPUT;

/// Crates whose logs `-v` and `-vv` enable.
const WORKSPACE_TARGETS: [&str; 4] = ["get_wind_data", "wind_downloader", "opendap", "wind_common"];

/// Log filter directives for a `-v` count.
///
/// One or two `-v` raise this workspace's crates to info and debug; three
/// and four do the same for every crate, HTTP stack included.
pub fn filter_directives(verbosity: u8) -> String {
    let workspace = |level: &str| {
        let mut directives = vec!["warn".to_string()];
        directives.extend(WORKSPACE_TARGETS.iter().map(|t| format!("{}={}", t, level)));
        directives.join(",")
    };
    match verbosity {
        0 => "warn".to_string(),
        1 => workspace("info"),
        2 => workspace("debug"),
        3 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init_tracing(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 3)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Empties the transfer cache when dropped, whichever way the run ends.
#[derive(Debug)]
pub struct CacheGuard {
    cache: ResponseCache,
}

impl CacheGuard {
    pub fn new(cache: ResponseCache) -> Self {
        Self { cache }
    }

    pub fn dir(&self) -> &Path {
        self.cache.dir()
    }
}

impl Drop for CacheGuard {
    fn drop(&mut self) {
        info!(path = %self.cache.dir().display(), "Purging transfer cache");
        let removed = self.cache.purge();
        debug!(removed, "Transfer cache purged");
    }
}

/// State shared by every stage of one run.
#[derive(Debug)]
pub struct RunContext {
    dataset_record: PathBuf,
    output_template: String,
    cache: Option<CacheGuard>,
}

impl RunContext {
    /// Create the context, preparing the cache directory if one is given.
    pub fn new(dataset_record: impl Into<PathBuf>, cache_dir: Option<PathBuf>) -> WindResult<Self> {
        let cache = match cache_dir {
            Some(dir) => {
                let cache = ResponseCache::new(dir)?;
                debug!(path = %cache.dir().display(), "Using cache directory");
                Some(CacheGuard::new(cache))
            }
            None => None,
        };
        Ok(Self {
            dataset_record: dataset_record.into(),
            output_template: DEFAULT_OUTPUT.to_string(),
            cache,
        })
    }

    /// Set the output path template.
    pub fn with_output_template(mut self, template: impl Into<String>) -> Self {
        self.output_template = template.into();
        self
    }

    /// Where the accepted dataset identifier is recorded.
    pub fn dataset_record(&self) -> &Path {
        &self.dataset_record
    }

    pub fn output_template(&self) -> &str {
        &self.output_template
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache.as_ref().map(CacheGuard::dir)
    }

    /// DAP client settings sharing this run's cache directory.
    pub fn client_config(&self) -> DapClientConfig {
        DapClientConfig {
            cache_dir: self.cache_dir().map(Path::to_path_buf),
            ..DapClientConfig::default()
        }
    }
}
