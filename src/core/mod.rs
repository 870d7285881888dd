//! Core module: models, the aggregation engine, and everything around it

pub mod aggregate;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod grouping;
pub mod insights;
pub mod models;
pub mod primitives;
pub mod projection;
pub mod report;
pub mod store;
pub mod trend;

pub use aggregate::{aggregate, AnalyticsConfig, InvalidGradePolicy};
pub use bundle::AggregationBundle;
pub use error::{AnalyticsError, AnalyticsResult};

/// Returns the current version of the `acadanalytics` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
