//! CLI command handlers for `acadanalytics`.
//!
//! Each subcommand lives in its own submodule.

pub mod analyze;
pub mod config;
pub mod trend;
