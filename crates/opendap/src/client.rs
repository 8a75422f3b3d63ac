//! DAP2 client and remote GFS dataset handle.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use ndarray::{ArrayD, IxDyn};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};

use wind_common::grid::{DatasetOpener, GridAxes, GridBlock, GridDataset, Hyperslab, Variable};
use wind_common::{WindError, WindResult};

use crate::ascii::{parse_ascii, parse_error_body, AsciiArray};
use crate::cache::ResponseCache;
use crate::dds::{parse_dds, Dds};
use crate::error::{DapError, DapResult};

/// Coordinate variables every GFS pressure-level dataset declares.
const AXIS_NAMES: [&str; 4] = ["time", "lev", "lat", "lon"];

/// Configuration for the DAP client.
#[derive(Debug, Clone)]
pub struct DapClientConfig {
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Directory for the transfer cache; `None` disables caching
    pub cache_dir: Option<PathBuf>,
}

impl Default for DapClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(600), // NOMADS is slow
            connect_timeout: Duration::from_secs(30),
            cache_dir: None,
        }
    }
}

/// Client for the GrADS data server.
#[derive(Debug, Clone)]
pub struct DapClient {
    http: Client,
    cache: Option<ResponseCache>,
}

impl DapClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DapClientConfig) -> DapResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .build()?;

        let cache = config.cache_dir.map(ResponseCache::new).transpose()?;
        if let Some(cache) = &cache {
            debug!(path = %cache.dir().display(), "Using transfer cache directory");
        }

        Ok(Self { http, cache })
    }

    /// GET a text body, consulting the transfer cache first.
    async fn get_text(&self, url: &str) -> DapResult<String> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url).await {
                return Ok(body);
            }
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(DapError::NotPublished(url.to_string()));
        }
        if let Some(message) = parse_error_body(&body) {
            return Err(classify_server_message(status, message, url));
        }
        if !status.is_success() {
            return Err(DapError::Server {
                status: status.as_u16(),
                message: body.lines().next().unwrap_or_default().to_string(),
            });
        }

        if let Some(cache) = &self.cache {
            cache.put(url, &body).await;
        }
        Ok(body)
    }

    /// Fetch and parse the DDS of a dataset.
    #[instrument(skip(self))]
    pub async fn fetch_dds(&self, dataset_url: &str) -> DapResult<Dds> {
        let body = self.get_text(&format!("{}.dds", dataset_url)).await?;
        parse_dds(&body)
    }

    /// Fetch arrays through the ASCII service.
    #[instrument(skip(self))]
    pub async fn fetch_ascii(
        &self,
        dataset_url: &str,
        constraint: &str,
    ) -> DapResult<Vec<AsciiArray>> {
        let body = self
            .get_text(&format!("{}.ascii?{}", dataset_url, constraint))
            .await?;
        parse_ascii(&body)
    }

    /// Open a dataset: read its structure and coordinate axes.
    pub async fn open_dataset(&self, url: &str) -> DapResult<DapDataset> {
        let dds = self.fetch_dds(url).await?;
        dds.require(&AXIS_NAMES)?;

        let arrays = self.fetch_ascii(url, &AXIS_NAMES.join(",")).await?;
        let axis = |name: &str| -> DapResult<Vec<f64>> {
            arrays
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.values.clone())
                .ok_or_else(|| DapError::MissingVariable(format!("axis '{}' not returned", name)))
        };
        let axes = GridAxes {
            time: axis("time")?,
            levels: axis("lev")?,
            latitudes: axis("lat")?,
            longitudes: axis("lon")?,
        };
        axes.validate()
            .map_err(|e| DapError::InvalidFormat(e.to_string()))?;

        let dimensions = dds
            .variables
            .iter()
            .map(|v| (v.name.clone(), v.dimension_names()))
            .collect();

        info!(
            url = %url,
            times = axes.time.len(),
            levels = axes.levels.len(),
            lats = axes.latitudes.len(),
            lons = axes.longitudes.len(),
            "Opened dataset"
        );

        Ok(DapDataset {
            url: url.to_string(),
            axes,
            dimensions,
            client: self.clone(),
        })
    }
}

fn classify_server_message(status: StatusCode, message: String, url: &str) -> DapError {
    // GDS reports unknown dataset paths through an Error body
    if message.contains("not an available dataset") || message.contains("No such file") {
        DapError::NotPublished(format!("{}: {}", url, message))
    } else {
        DapError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

/// DAP constraint expression selecting `slab` of `variable`.
///
/// DAP hyperslabs are inclusive, `[start:stop]`.
pub fn hyperslab_constraint(variable: &str, slab: &Hyperslab) -> DapResult<String> {
    let ranges = [
        slab.time..slab.time + 1,
        slab.levels.clone(),
        slab.lat.clone(),
        slab.lon.clone(),
    ];
    let mut constraint = variable.to_string();
    for range in ranges {
        if range.is_empty() {
            return Err(DapError::InvalidFormat(format!(
                "empty hyperslab range {:?} for '{}'",
                range, variable
            )));
        }
        constraint.push_str(&format!("[{}:{}]", range.start, range.end - 1));
    }
    Ok(constraint)
}

/// An opened remote GFS dataset.
#[derive(Debug, Clone)]
pub struct DapDataset {
    url: String,
    axes: GridAxes,
    dimensions: HashMap<String, Vec<String>>,
    client: DapClient,
}

impl DapDataset {
    async fn read_block(&self, variable: Variable, slab: &Hyperslab) -> DapResult<GridBlock> {
        let constraint = hyperslab_constraint(variable.name(), slab)?;
        let mut arrays = self.client.fetch_ascii(&self.url, &constraint).await?;

        let position = arrays
            .iter()
            .position(|a| a.name == variable.name())
            .ok_or_else(|| {
                DapError::MissingVariable(format!("'{}' not in response", variable))
            })?;
        let array = arrays.remove(position);

        let map = |name: &str, fallback: &[f64]| -> Vec<f64> {
            arrays
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.values.clone())
                .unwrap_or_else(|| fallback.to_vec())
        };
        let levels = map("lev", &self.axes.levels[slab.levels.clone()]);
        let latitudes = map("lat", &self.axes.latitudes[slab.lat.clone()]);
        let longitudes = map("lon", &self.axes.longitudes[slab.lon.clone()]);

        let values: Vec<f32> = array.values.iter().map(|&v| v as f32).collect();
        let data = ArrayD::from_shape_vec(IxDyn(&array.shape), values)
            .map_err(|e| DapError::InvalidFormat(e.to_string()))?;

        Ok(GridBlock {
            data,
            levels,
            latitudes,
            longitudes,
        })
    }
}

#[async_trait]
impl GridDataset for DapDataset {
    fn identifier(&self) -> &str {
        &self.url
    }

    fn axes(&self) -> &GridAxes {
        &self.axes
    }

    fn dimensions(&self, variable: Variable) -> Option<&[String]> {
        self.dimensions.get(variable.name()).map(Vec::as_slice)
    }

    async fn read(&self, variable: Variable, slab: &Hyperslab) -> WindResult<GridBlock> {
        let out_of_bounds = slab.time >= self.axes.time.len()
            || slab.levels.end > self.axes.levels.len()
            || slab.lat.end > self.axes.latitudes.len()
            || slab.lon.end > self.axes.longitudes.len();
        if out_of_bounds {
            return Err(WindError::Protocol(format!(
                "hyperslab {:?} outside dataset axes",
                slab
            )));
        }

        Ok(self.read_block(variable, slab).await?)
    }
}

#[async_trait]
impl DatasetOpener for DapClient {
    type Dataset = DapDataset;

    async fn open(&self, identifier: &str) -> WindResult<DapDataset> {
        Ok(self.open_dataset(identifier).await?)
    }
}
