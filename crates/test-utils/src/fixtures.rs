//! Common test fixtures: reference times, areas of interest and dataset
//! identifiers used across the workspace tests.

/// Reference target times.
pub mod time {
    use chrono::{DateTime, TimeZone, Utc};

    /// 2017-11-11T00:00:00Z, model day 736645.0
    pub fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 11, 11, 0, 0, 0).unwrap()
    }

    /// POSIX seconds of [`reference`].
    pub const REFERENCE_POSIX: i64 = 1_510_358_400;

    /// Model timestamp of [`reference`].
    pub const REFERENCE_MODEL: f64 = 736_645.0;
}

/// Areas of interest as `(lat, latdelta, lon, londelta)`.
pub mod areas {
    /// Off the coast of New South Wales
    pub const SYDNEY: (f64, f64, f64, f64) = (-33.0, 10.0, 139.0, 10.0);

    /// Straddles the 0/360 longitude seam
    pub const GREENWICH_SEAM: (f64, f64, f64, f64) = (52.0, 5.0, 2.0, 5.0);

    /// Latitude delta below the accepted floor
    pub const TOO_NARROW: (f64, f64, f64, f64) = (-33.0, 0.3, 139.0, 10.0);

    /// A window small enough to pick a 2x2 block from a 0.5 degree grid
    pub const TWO_BY_TWO: (f64, f64, f64, f64) = (10.25, 0.5, 20.25, 0.5);
}

/// Dataset identifiers in the NOMADS layout.
pub mod datasets {
    /// The 18Z half-degree run of 2017-11-10
    pub const GFS_0P50_20171110_18Z: &str =
        "https://nomads.ncep.noaa.gov/dods/gfs_0p50/gfs20171110/gfs_0p50_18z";

    /// The 00Z half-degree run of 2017-11-11
    pub const GFS_0P50_20171111_00Z: &str =
        "https://nomads.ncep.noaa.gov/dods/gfs_0p50/gfs20171111/gfs_0p50_00z";
}
