//! In-memory GFS datasets for exercising the extraction pipeline without a
//! data server.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::{ArrayD, IxDyn};
use wind_common::{
    DatasetOpener, GridAxes, GridBlock, GridDataset, Hyperslab, Variable, WindError, WindResult,
    EXPECTED_DIMENSIONS,
};

use crate::generators::synthetic_value;

/// Corruption injected into the block returned for one variable at one time
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFault {
    /// Drop the last longitude column
    ShortLongitude,
    /// Return the block without its leading time dimension
    MissingTimeDimension,
}

/// A synthetic dataset whose values come from [`synthetic_value`].
#[derive(Debug, Clone)]
pub struct MockDataset {
    identifier: String,
    axes: GridAxes,
    dimensions: HashMap<Variable, Vec<String>>,
    faults: HashMap<(Variable, usize), BlockFault>,
}

impl MockDataset {
    pub fn new(identifier: impl Into<String>, axes: GridAxes) -> Self {
        let dimensions = Variable::ALL
            .into_iter()
            .map(|v| (v, EXPECTED_DIMENSIONS.iter().map(|d| d.to_string()).collect()))
            .collect();
        Self {
            identifier: identifier.into(),
            axes,
            dimensions,
            faults: HashMap::new(),
        }
    }

    /// Corrupt reads of `variable` at `time`.
    pub fn with_fault(mut self, variable: Variable, time: usize, fault: BlockFault) -> Self {
        self.faults.insert((variable, time), fault);
        self
    }

    /// Declare `variable` with different dimension names.
    pub fn with_dimensions(mut self, variable: Variable, names: &[&str]) -> Self {
        self.dimensions
            .insert(variable, names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Remove `variable` from the dataset.
    pub fn without_variable(mut self, variable: Variable) -> Self {
        self.dimensions.remove(&variable);
        self
    }
}

#[async_trait]
impl GridDataset for MockDataset {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn axes(&self) -> &GridAxes {
        &self.axes
    }

    fn dimensions(&self, variable: Variable) -> Option<&[String]> {
        self.dimensions.get(&variable).map(Vec::as_slice)
    }

    async fn read(&self, variable: Variable, slab: &Hyperslab) -> WindResult<GridBlock> {
        if !self.dimensions.contains_key(&variable) {
            return Err(WindError::Protocol(format!(
                "'{}' not in {}",
                variable, self.identifier
            )));
        }
        let in_bounds = slab.time < self.axes.time.len()
            && slab.levels.end <= self.axes.levels.len()
            && slab.lat.end <= self.axes.latitudes.len()
            && slab.lon.end <= self.axes.longitudes.len();
        if !in_bounds {
            return Err(WindError::Protocol(format!(
                "hyperslab {:?} outside dataset axes",
                slab
            )));
        }

        let fault = self.faults.get(&(variable, slab.time)).copied();
        let lon_end = match fault {
            Some(BlockFault::ShortLongitude) => slab.lon.end.saturating_sub(1).max(slab.lon.start),
            _ => slab.lon.end,
        };
        let lon = slab.lon.start..lon_end;

        let mut values = Vec::with_capacity(slab.levels.len() * slab.lat.len() * lon.len());
        for lev in slab.levels.clone() {
            for lat in slab.lat.clone() {
                for x in lon.clone() {
                    values.push(synthetic_value(variable, slab.time, lev, lat, x));
                }
            }
        }

        let shape: Vec<usize> = match fault {
            Some(BlockFault::MissingTimeDimension) => {
                vec![slab.levels.len(), slab.lat.len(), lon.len()]
            }
            _ => vec![1, slab.levels.len(), slab.lat.len(), lon.len()],
        };
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|e| WindError::ShapeMismatch(e.to_string()))?;

        Ok(GridBlock {
            data,
            levels: self.axes.levels[slab.levels.clone()].to_vec(),
            latitudes: self.axes.latitudes[slab.lat.clone()].to_vec(),
            longitudes: self.axes.longitudes[lon].to_vec(),
        })
    }
}

/// Opener serving a fixed set of [`MockDataset`]s.
///
/// Identifiers that were not registered fail like an unpublished run. Every
/// open attempt is recorded so tests can check probe order.
#[derive(Debug, Default)]
pub struct MockOpener {
    datasets: HashMap<String, MockDataset>,
    malformed: HashSet<String>,
    attempts: Mutex<Vec<String>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: MockDataset) -> Self {
        self.datasets.insert(dataset.identifier.clone(), dataset);
        self
    }

    /// Make `identifier` answer with an unparseable response.
    pub fn with_malformed(mut self, identifier: impl Into<String>) -> Self {
        self.malformed.insert(identifier.into());
        self
    }

    /// Identifiers passed to [`DatasetOpener::open`], in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatasetOpener for MockOpener {
    type Dataset = MockDataset;

    async fn open(&self, identifier: &str) -> WindResult<MockDataset> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(identifier.to_string());
        }
        if self.malformed.contains(identifier) {
            return Err(WindError::Protocol(format!(
                "unrecognised response from {}",
                identifier
            )));
        }
        self.datasets.get(identifier).cloned().ok_or_else(|| {
            WindError::RemoteUnavailable(format!("{} is not an available dataset", identifier))
        })
    }
}
