//! Selection of the time, latitude and longitude indices a tile needs.

use std::ops::Range;

use chrono::{DateTime, Utc};
use tracing::debug;

use wind_common::{timestamp_to_datetime, GridAxes, TimeRange, WindError, WindResult, Window};

/// Indices picked from one axis, in axis order, with their coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRange {
    entries: Vec<(usize, f64)>,
}

impl IndexRange {
    /// Keep the entries of `axis` matching `keep`. `None` if nothing matches.
    fn filter(axis: &[f64], keep: impl Fn(f64) -> bool) -> Option<Self> {
        let entries: Vec<(usize, f64)> = axis
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, v)| keep(v))
            .collect();
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn first_index(&self) -> usize {
        self.entries[0].0
    }

    pub fn last_index(&self) -> usize {
        self.entries[self.entries.len() - 1].0
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, v)| v).collect()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        self.entries.iter().any(|&(i, _)| i == index)
    }

    /// Smallest contiguous index range covering the selection.
    pub fn span(&self) -> Range<usize> {
        self.first_index()..self.last_index() + 1
    }
}

/// A time step of the dataset that falls inside the requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    pub index: usize,
    pub time: DateTime<Utc>,
}

/// Everything a tile extracts.
#[derive(Debug, Clone)]
pub struct Selection {
    pub times: Vec<TimeStep>,
    pub latitudes: IndexRange,
    pub longitudes: IndexRange,
    /// The longitude selection straddles the 0/360 seam
    pub wraps: bool,
    lon_axis_len: usize,
}

impl Selection {
    /// Latitude indices to request.
    pub fn lat_fetch_range(&self) -> Range<usize> {
        self.latitudes.span()
    }

    /// Longitude indices to request.
    ///
    /// A seam-straddling selection is not contiguous on the 0..360 axis, so
    /// the whole axis is fetched and narrowed down after transfer.
    pub fn lon_fetch_range(&self) -> Range<usize> {
        if self.wraps {
            0..self.lon_axis_len
        } else {
            self.longitudes.span()
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.times[0].time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.times[self.times.len() - 1].time
    }
}

/// Work out which parts of the dataset `window` and `range` select.
///
/// Latitudes are matched by plain distance, longitudes by circular distance
/// so windows crossing the prime meridian keep both ends of the axis.
pub fn select_indices(axes: &GridAxes, window: &Window, range: &TimeRange) -> WindResult<Selection> {
    let mut times = Vec::new();
    for (index, &timestamp) in axes.time.iter().enumerate() {
        let time = timestamp_to_datetime(timestamp)?;
        if range.contains(&time) {
            times.push(TimeStep { index, time });
        }
    }
    if times.is_empty() {
        return Err(WindError::empty_selection(
            "time",
            format!(
                "no data found between {} and {}",
                range.start, range.end
            ),
        ));
    }

    let longitudes = IndexRange::filter(&axes.longitudes, |lon| window.contains_longitude(lon))
        .ok_or_else(|| {
            WindError::empty_selection("longitude", format!("no grid points within {}", window))
        })?;
    let latitudes = IndexRange::filter(&axes.latitudes, |lat| window.contains_latitude(lat))
        .ok_or_else(|| {
            WindError::empty_selection("latitude", format!("no grid points within {}", window))
        })?;

    let lon_axis_len = axes.longitudes.len();
    let wraps = longitudes.contains_index(0) && longitudes.contains_index(lon_axis_len - 1);

    debug!(longitudes = ?longitudes.values(), wraps, "Using longitudes");

    Ok(Selection {
        times,
        latitudes,
        longitudes,
        wraps,
        lon_axis_len,
    })
}
