//! Shared test utilities for the GFS wind extraction workspace.
//!
//! - [`MockDataset`] / [`MockOpener`]: in-memory stand-ins for remote GFS
//!   datasets, with injectable faults
//! - generators for GFS-like axes and deterministic field values
//! - common fixtures (reference times, areas of interest)
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```

pub mod dataset;
pub mod fixtures;
pub mod generators;

pub use dataset::{BlockFault, MockDataset, MockOpener};
pub use fixtures::*;
pub use generators::*;
