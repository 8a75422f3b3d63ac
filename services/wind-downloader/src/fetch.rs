//! Retrieval of the three wind variables for one tile and time step.

use ndarray::{Array4, Ix4};
use tracing::{debug, info};

use wind_common::{GridDataset, Variable, WindError, WindResult, EXPECTED_DIMENSIONS};

use crate::extract::Selection;

/// One variable at one time step: a `(1, lev, lat, lon)` block with its
/// coordinate maps.
#[derive(Debug, Clone)]
pub struct VariableSlice {
    pub variable: Variable,
    pub data: Array4<f32>,
    pub levels: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl VariableSlice {
    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }
}

/// Height and wind components for one time step, all of the same shape.
#[derive(Debug, Clone)]
pub struct WindSlices {
    pub height: VariableSlice,
    pub u_wind: VariableSlice,
    pub v_wind: VariableSlice,
}

impl WindSlices {
    /// Bundle the three slices, failing unless their shapes agree.
    pub fn new(height: VariableSlice, u_wind: VariableSlice, v_wind: VariableSlice) -> WindResult<Self> {
        let expected = height.shape();
        for other in [&u_wind, &v_wind] {
            if other.shape() != expected {
                return Err(WindError::ShapeMismatch(format!(
                    "'{}' has shape {:?} but '{}' has shape {:?}",
                    other.variable,
                    other.shape(),
                    height.variable,
                    expected
                )));
            }
        }
        Ok(Self {
            height,
            u_wind,
            v_wind,
        })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.height.shape()
    }
}

/// Check `variable` is declared over `(time, lev, lat, lon)`.
pub fn check_dimensions<D: GridDataset>(dataset: &D, variable: Variable) -> WindResult<()> {
    let dimensions = dataset.dimensions(variable).ok_or_else(|| {
        WindError::Protocol(format!(
            "'{}' is not declared by {}",
            variable,
            dataset.identifier()
        ))
    })?;
    if dimensions != EXPECTED_DIMENSIONS {
        return Err(WindError::Protocol(format!(
            "'{}' has dimensions {:?}, expected {:?}",
            variable, dimensions, EXPECTED_DIMENSIONS
        )));
    }
    Ok(())
}

/// Fetch one variable at `time_index` over the selection's fetch ranges.
pub async fn fetch_slice<D: GridDataset>(
    dataset: &D,
    variable: Variable,
    time_index: usize,
    selection: &Selection,
) -> WindResult<VariableSlice> {
    check_dimensions(dataset, variable)?;

    let slab = dataset.axes().slab(
        time_index,
        selection.lat_fetch_range(),
        selection.lon_fetch_range(),
    );
    info!(variable = %variable, shape = ?slab.shape(), "Processing variable");

    let block = dataset.read(variable, &slab).await?;
    debug!(variable = %variable, shape = ?block.data.shape(), "Downloaded data");

    let ndim = block.data.ndim();
    let data = block.data.into_dimensionality::<Ix4>().map_err(|_| {
        WindError::ShapeMismatch(format!(
            "'{}' returned {}-d data, expected 4-d",
            variable, ndim
        ))
    })?;

    let maps = [1, block.levels.len(), block.latitudes.len(), block.longitudes.len()];
    if data.shape() != maps {
        return Err(WindError::ShapeMismatch(format!(
            "'{}' data shape {:?} disagrees with its coordinates {:?}",
            variable,
            data.shape(),
            maps
        )));
    }

    Ok(VariableSlice {
        variable,
        data,
        levels: block.levels,
        latitudes: block.latitudes,
        longitudes: block.longitudes,
    })
}

/// Fetch height and both wind components at `time_index`.
pub async fn fetch_time_slice<D: GridDataset>(
    dataset: &D,
    time_index: usize,
    selection: &Selection,
) -> WindResult<WindSlices> {
    let height = fetch_slice(dataset, Variable::Height, time_index, selection).await?;
    let u_wind = fetch_slice(dataset, Variable::UWind, time_index, selection).await?;
    let v_wind = fetch_slice(dataset, Variable::VWind, time_index, selection).await?;
    WindSlices::new(height, u_wind, v_wind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::select_indices;
    use test_utils::{fixtures, gfs_axes, synthetic_value, BlockFault, MockDataset};
    use wind_common::{TimeRange, Window};

    fn dataset() -> MockDataset {
        MockDataset::new("mock", gfs_axes(0.5, fixtures::time::reference(), 3, 4))
    }

    fn selection(ds: &MockDataset) -> Selection {
        let (lat, latdelta, lon, londelta) = fixtures::areas::TWO_BY_TWO;
        let window = Window::area_of_interest(lat, latdelta, lon, londelta).unwrap();
        select_indices(
            ds.axes(),
            &window,
            &TimeRange::around(fixtures::time::reference(), 3, 9),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_time_slice() {
        let ds = dataset();
        let sel = selection(&ds);
        let slices = fetch_time_slice(&ds, 1, &sel).await.unwrap();

        assert_eq!(slices.shape(), [1, 8, 2, 2]);
        assert_eq!(slices.height.latitudes, vec![10.0, 10.5]);
        assert_eq!(slices.v_wind.longitudes, vec![20.0, 20.5]);
        // lat 10.0 is index 200, lon 20.5 is index 41
        assert_eq!(
            slices.u_wind.data[[0, 3, 0, 1]],
            synthetic_value(Variable::UWind, 1, 3, 200, 41)
        );
    }

    #[tokio::test]
    async fn test_mismatched_shapes() {
        let ds = dataset().with_fault(Variable::VWind, 2, BlockFault::ShortLongitude);
        let sel = selection(&ds);

        let err = fetch_time_slice(&ds, 2, &sel).await.unwrap_err();
        assert!(matches!(err, WindError::ShapeMismatch(_)));
        assert!(fetch_time_slice(&ds, 1, &sel).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_4d_block() {
        let ds = dataset().with_fault(Variable::Height, 0, BlockFault::MissingTimeDimension);
        let sel = selection(&ds);

        let err = fetch_slice(&ds, Variable::Height, 0, &sel).await.unwrap_err();
        assert!(matches!(err, WindError::ShapeMismatch(msg) if msg.contains("3-d")));
    }

    #[tokio::test]
    async fn test_unexpected_dimension_names() {
        let ds = dataset().with_dimensions(Variable::UWind, &["time", "lat", "lon", "lev"]);
        let sel = selection(&ds);
        let err = fetch_time_slice(&ds, 0, &sel).await.unwrap_err();
        assert!(matches!(err, WindError::Protocol(_)));
    }

    #[test]
    fn test_missing_variable() {
        let ds = dataset().without_variable(Variable::VWind);
        assert!(check_dimensions(&ds, Variable::Height).is_ok());
        assert!(check_dimensions(&ds, Variable::VWind).is_err());
    }
}
