//! Minimal DAP2 client for the NOMADS GrADS data server.
//!
//! Only what subsetting a GFS pressure-level dataset needs is implemented:
//! - `<dataset>.dds` for the dataset structure ([`dds`])
//! - `<dataset>.ascii?<constraint>` for coordinate axes and hyperslabs ([`ascii`])
//! - an optional on-disk transfer cache ([`cache`])
//!
//! [`DapClient`] implements [`wind_common::DatasetOpener`] and hands out
//! [`DapDataset`]s, which implement [`wind_common::GridDataset`].

pub mod ascii;
pub mod cache;
pub mod client;
pub mod dds;
pub mod error;

pub use ascii::{parse_ascii, parse_error_body, AsciiArray};
pub use cache::ResponseCache;
pub use client::{hyperslab_constraint, DapClient, DapClientConfig, DapDataset};
pub use dds::{parse_dds, ArrayDecl, Dds, Dimension};
pub use error::{DapError, DapResult};
