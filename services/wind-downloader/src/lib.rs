//! GFS wind data extraction.
//!
//! Finds the newest GFS run covering a target time on the NOMADS data server,
//! cuts the requested area into tiles and writes geopotential height and
//! wind for every tile and time step into the predictor's text format.
//!
//! The stages, in run order:
//! - [`locator`] picks the dataset
//! - [`tiles`] lays out the windows
//! - [`extract`] selects axis indices per window
//! - [`fetch`] pulls the three variables per time step
//! - [`writer`] serializes each tile file
//!
//! [`pipeline`] drives the last four for every tile.

pub mod config;
pub mod context;
pub mod extract;
pub mod fetch;
pub mod locator;
pub mod pipeline;
pub mod tiles;
pub mod writer;

pub use config::{Args, SourceConfig};
pub use context::RunContext;
pub use pipeline::RunSummary;
