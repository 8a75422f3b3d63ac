//! Pressure-level grid access.
//!
//! A GFS pressure-level dataset is a 4-D grid over `(time, lev, lat, lon)`
//! carrying geopotential height and both horizontal wind components. The
//! [`GridDataset`] trait abstracts over where that grid lives so the
//! extraction pipeline can run against a remote server or an in-memory
//! fixture alike.

use std::ops::Range;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ndarray::ArrayD;

use crate::error::{WindError, WindResult};
use crate::time::timestamp_to_datetime;

/// Dimension names every extracted variable must be declared with.
pub const EXPECTED_DIMENSIONS: [&str; 4] = ["time", "lev", "lat", "lon"];

/// The three physical variables written to every output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Geopotential height [gpm]
    Height,
    /// U-component of wind [m/s]
    UWind,
    /// V-component of wind [m/s]
    VWind,
}

impl Variable {
    /// All variables in output column order.
    pub const ALL: [Variable; 3] = [Variable::Height, Variable::UWind, Variable::VWind];

    /// Variable name on the GFS data server.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Height => "hgtprs",
            Variable::UWind => "ugrdprs",
            Variable::VWind => "vgrdprs",
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A rectangular index subset of a `(time, lev, lat, lon)` grid.
///
/// Ranges are half-open, as in Rust slicing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperslab {
    pub time: usize,
    pub levels: Range<usize>,
    pub lat: Range<usize>,
    pub lon: Range<usize>,
}

impl Hyperslab {
    /// Expected shape of the block this slab selects.
    pub fn shape(&self) -> [usize; 4] {
        [1, self.levels.len(), self.lat.len(), self.lon.len()]
    }
}

/// Coordinate axes of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridAxes {
    /// Model fractional-day timestamps
    pub time: Vec<f64>,
    /// Pressure levels [hPa]
    pub levels: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl GridAxes {
    /// Check every axis has at least one value.
    pub fn validate(&self) -> WindResult<()> {
        let axes = [
            ("time", &self.time),
            ("lev", &self.levels),
            ("lat", &self.latitudes),
            ("lon", &self.longitudes),
        ];
        for (name, values) in axes {
            if values.is_empty() {
                return Err(WindError::Protocol(format!("Axis '{}' is empty", name)));
            }
        }
        Ok(())
    }

    /// First and last time of the dataset as calendar times.
    pub fn time_bounds(&self) -> WindResult<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.time.first(), self.time.last()) {
            (Some(&first), Some(&last)) => {
                Ok((timestamp_to_datetime(first)?, timestamp_to_datetime(last)?))
            }
            _ => Err(WindError::Protocol("Time axis is empty".to_string())),
        }
    }

    /// Full-depth slab at one time index.
    pub fn slab(&self, time: usize, lat: Range<usize>, lon: Range<usize>) -> Hyperslab {
        Hyperslab {
            time,
            levels: 0..self.levels.len(),
            lat,
            lon,
        }
    }
}

/// A block of values read from one variable, with the coordinate maps of
/// the block.
#[derive(Debug, Clone)]
pub struct GridBlock {
    pub data: ArrayD<f32>,
    pub levels: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

/// Read access to a pressure-level grid.
#[async_trait]
pub trait GridDataset: Send + Sync {
    /// Identifier the dataset was opened with.
    fn identifier(&self) -> &str;

    /// Coordinate axes of the dataset.
    fn axes(&self) -> &GridAxes;

    /// Declared dimension names of a variable, if the dataset carries it.
    fn dimensions(&self, variable: Variable) -> Option<&[String]>;

    /// Read a block of one variable.
    async fn read(&self, variable: Variable, slab: &Hyperslab) -> WindResult<GridBlock>;
}

/// Opens datasets by identifier.
#[async_trait]
pub trait DatasetOpener: Send + Sync {
    type Dataset: GridDataset;

    /// Open a dataset. Unreachable or unpublished datasets fail with
    /// [`WindError::RemoteUnavailable`].
    async fn open(&self, identifier: &str) -> WindResult<Self::Dataset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_names() {
        let names: Vec<&str> = Variable::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["hgtprs", "ugrdprs", "vgrdprs"]);
    }

    #[test]
    fn test_slab_shape() {
        let axes = GridAxes {
            time: vec![736645.0],
            levels: vec![1000.0, 975.0, 950.0],
            latitudes: vec![0.0; 10],
            longitudes: vec![0.0; 20],
        };
        let slab = axes.slab(0, 2..5, 0..20);
        assert_eq!(slab.shape(), [1, 3, 3, 20]);
    }

    #[test]
    fn test_validate_empty_axis() {
        let axes = GridAxes {
            time: vec![736645.0],
            ..Default::default()
        };
        assert!(matches!(axes.validate(), Err(WindError::Protocol(_))));
    }

    #[test]
    fn test_time_bounds() {
        let axes = GridAxes {
            time: vec![736645.0, 736645.125, 736645.25],
            ..Default::default()
        };
        let (start, end) = axes.time_bounds().unwrap();
        assert_eq!((end - start).num_hours(), 6);
    }
}
