//! Generators for synthetic GFS-like axes and field values.
//!
//! Values are deterministic functions of their grid position so tests can
//! recompute what any cell should contain.

use chrono::{DateTime, Duration, Utc};
use wind_common::{datetime_to_timestamp, GridAxes, Variable};

/// Standard GFS isobaric levels in hPa, surface first.
pub const GFS_LEVELS: [f64; 8] = [1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 250.0, 200.0];

/// A global regular lat/lon axis pair at `spacing` degrees.
///
/// Latitudes run `-90 ..= 90`, longitudes `0 .. 360`, as on the GFS server.
pub fn global_axes(spacing: f64) -> (Vec<f64>, Vec<f64>) {
    let nlat = (180.0 / spacing).round() as usize + 1;
    let nlon = (360.0 / spacing).round() as usize;
    let latitudes = (0..nlat).map(|i| -90.0 + i as f64 * spacing).collect();
    let longitudes = (0..nlon).map(|i| i as f64 * spacing).collect();
    (latitudes, longitudes)
}

/// A model time axis of `count` steps `step_hours` apart, starting at `start`.
pub fn time_axis(start: DateTime<Utc>, step_hours: i64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| datetime_to_timestamp(&(start + Duration::hours(step_hours * i as i64))))
        .collect()
}

/// Axes of a global forecast run.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use test_utils::gfs_axes;
///
/// let run = Utc.with_ymd_and_hms(2017, 11, 11, 0, 0, 0).unwrap();
/// let axes = gfs_axes(1.0, run, 6, 5);
/// assert_eq!(axes.latitudes.len(), 181);
/// assert_eq!(axes.longitudes.len(), 360);
/// assert_eq!(axes.time.len(), 5);
/// ```
pub fn gfs_axes(spacing: f64, run: DateTime<Utc>, step_hours: i64, steps: usize) -> GridAxes {
    let (latitudes, longitudes) = global_axes(spacing);
    GridAxes {
        time: time_axis(run, step_hours, steps),
        levels: GFS_LEVELS.to_vec(),
        latitudes,
        longitudes,
    }
}

/// Deterministic field value of `variable` at an absolute grid position.
///
/// Each variable occupies its own decade so columns cannot be confused:
/// height is `10000 + ...`, u-wind `20000 + ...`, v-wind `30000 + ...`.
/// The remainder is `time * 1000 + lev * 100 + lat / 2 + lon / 16`, exact in
/// `f32` for any grid up to 0.25 degree global.
pub fn synthetic_value(
    variable: Variable,
    time: usize,
    lev: usize,
    lat: usize,
    lon: usize,
) -> f32 {
    let base = match variable {
        Variable::Height => 10_000.0,
        Variable::UWind => 20_000.0,
        Variable::VWind => 30_000.0,
    };
    base + (time * 1000 + lev * 100) as f32 + lat as f32 * 0.5 + lon as f32 * 0.0625
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_global_axes_half_degree() {
        let (lats, lons) = global_axes(0.5);
        assert_eq!(lats.len(), 361);
        assert_eq!(lons.len(), 720);
        assert_eq!(lats[0], -90.0);
        assert_eq!(lats[360], 90.0);
        assert_eq!(lons[719], 359.5);
    }

    #[test]
    fn test_time_axis_steps() {
        let start = Utc.with_ymd_and_hms(2017, 11, 11, 0, 0, 0).unwrap();
        let axis = time_axis(start, 3, 3);
        assert_eq!(axis[0], 736645.0);
        assert_eq!(axis[2], 736645.25);
    }

    #[test]
    fn test_synthetic_values_distinct_per_variable() {
        let h = synthetic_value(Variable::Height, 1, 2, 3, 4);
        let u = synthetic_value(Variable::UWind, 1, 2, 3, 4);
        assert_eq!(u - h, 10_000.0);
        assert_ne!(
            synthetic_value(Variable::Height, 0, 0, 0, 1),
            synthetic_value(Variable::Height, 0, 0, 1, 0)
        );
    }
}
