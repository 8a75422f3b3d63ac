//! Common types and utilities shared across the GFS wind extraction workspace.

pub mod error;
pub mod geo;
pub mod grid;
pub mod resolution;
pub mod time;

pub use error::{WindError, WindResult};
pub use geo::{canonicalize_longitude, longitude_distance, Window};
pub use grid::{
    DatasetOpener, GridAxes, GridBlock, GridDataset, Hyperslab, Variable, EXPECTED_DIMENSIONS,
};
pub use resolution::Resolution;
pub use time::{
    datetime_to_posix, datetime_to_timestamp, posix_to_datetime, timestamp_to_datetime, SynopticCycle,
    TimeRange,
};
