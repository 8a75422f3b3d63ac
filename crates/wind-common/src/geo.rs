//! Longitude arithmetic and extraction windows.
//!
//! GFS grids store longitude on a linear `0.0 ..= 359.x` axis. Everything
//! here treats longitude as circular so windows that straddle the 0°/360°
//! seam still select the right points.

use crate::error::{WindError, WindResult};

/// Smallest accepted window half-width in degrees.
pub const MIN_WINDOW_RADIUS: f64 = 0.5;

/// Largest meaningful longitude half-width in degrees.
pub const MAX_LON_RADIUS: f64 = 180.0;

/// Wrap a longitude into `[0, 360)`.
pub fn canonicalize_longitude(lon: f64) -> f64 {
    let mut lon = lon % 360.0;
    if lon < 0.0 {
        lon += 360.0;
    }
    // -1e-17 % 360 + 360 rounds to exactly 360.0
    if lon >= 360.0 {
        lon -= 360.0;
    }
    lon
}

/// Shortest angular distance in degrees between two longitudes.
///
/// Symmetric and always within `[0, 180]`, for any finite inputs.
pub fn longitude_distance(a: f64, b: f64) -> f64 {
    let diff = canonicalize_longitude(a - b);
    diff.min(360.0 - diff)
}

/// A rectangular lat/lon extraction window, described by its centre and
/// half-widths in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub center_lat: f64,
    pub lat_radius: f64,
    pub center_lon: f64,
    pub lon_radius: f64,
}

impl Window {
    /// Create a window without validation.
    ///
    /// Tile windows derived from a validated area of interest are built this
    /// way; their centres may lie outside the canonical ranges.
    pub fn new(center_lat: f64, lat_radius: f64, center_lon: f64, lon_radius: f64) -> Self {
        Self {
            center_lat,
            lat_radius,
            center_lon,
            lon_radius,
        }
    }

    /// Validate an area of interest and canonicalize its centre longitude.
    pub fn area_of_interest(
        center_lat: f64,
        lat_radius: f64,
        center_lon: f64,
        lon_radius: f64,
    ) -> WindResult<Self> {
        let all_finite = [center_lat, lat_radius, center_lon, lon_radius]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(WindError::Configuration(
                "Area of interest must be given as finite numbers".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&center_lat) {
            return Err(WindError::Configuration(format!(
                "Latitude {} is outside of the range (-90,90)",
                center_lat
            )));
        }

        if lat_radius < MIN_WINDOW_RADIUS || lon_radius < MIN_WINDOW_RADIUS {
            return Err(WindError::Configuration(format!(
                "Latitude and longitude deltas must be at least {} degrees (got {}, {})",
                MIN_WINDOW_RADIUS, lat_radius, lon_radius
            )));
        }

        if lon_radius > MAX_LON_RADIUS {
            return Err(WindError::Configuration(format!(
                "Longitude window sizes greater than {} degrees are meaningless (got {})",
                MAX_LON_RADIUS, lon_radius
            )));
        }

        Ok(Self::new(
            center_lat,
            lat_radius,
            canonicalize_longitude(center_lon),
            lon_radius,
        ))
    }

    /// Check whether a latitude lies within the window.
    pub fn contains_latitude(&self, lat: f64) -> bool {
        (lat - self.center_lat).abs() <= self.lat_radius
    }

    /// Check whether a longitude lies within the window, measured circularly.
    pub fn contains_longitude(&self, lon: f64) -> bool {
        longitude_distance(lon, self.center_lon) <= self.lon_radius
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(lat, lon) = ({} +/- {}, {} +/- {})",
            self.center_lat, self.lat_radius, self.center_lon, self.lon_radius
        )
    }
}
