//! Rule-based analysis of host and process telemetry.
//!
//! Each tick scores process snapshots, derives operator recommendations and
//! alerts, and keeps a bounded history for reporting.

pub mod analysis;
pub mod config;
pub mod export;
pub mod history;
pub mod jobs;
pub mod telemetry;
