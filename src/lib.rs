//! Academic analytics library
//!
//! Turns an unordered list of transcript course records into GPA, grade and
//! department distributions, per-term series, insights, and degree progress.
//! The `acadanalytics` CLI is a thin adapter over this crate.

pub mod core;
pub mod logger;

pub use crate::core::{aggregate, config, get_version, AggregationBundle, AnalyticsConfig};
