//! Bulk export tooling for intervals.icu built on `intervals_client`.
//!
//! The binary drives a fixed sequence of dependent fetches (athlete,
//! activities, details, streams, calendar, wellness, power curve), isolates
//! failure per fetch, persists the aggregate to a run directory, and prints
//! a console summary.

pub mod cli;
pub mod download;
pub mod error;
pub mod store;
pub mod summary;

pub use download::DownloadResult;
pub use error::{ExportError, ExportResult};
