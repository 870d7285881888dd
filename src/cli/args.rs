//! CLI argument definitions for `acadanalytics`

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use academic_analytics::config::{validate_requirement, ConfigOverrides};
use academic_analytics::core::primitives::GradeGranularity;
use academic_analytics::core::projection::ProjectionMethod;
use academic_analytics::core::report::ReportFormat;
use academic_analytics::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// Grade distribution bucketing
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum GranularityArg {
    /// One bucket per letter grade with modifiers (A-, B+)
    Exact,
    /// Modifiers folded into the plain letter
    Collapsed,
}

impl From<GranularityArg> for GradeGranularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Exact => Self::Exact,
            GranularityArg::Collapsed => Self::Collapsed,
        }
    }
}

/// Report output format
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// JSON document
    Json,
    /// Markdown summary
    Markdown,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Markdown => Self::Markdown,
        }
    }
}

/// Projection method
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum MethodArg {
    /// Least-squares trend line
    Linear,
    /// Mean of recent terms
    MovingAverage,
    /// Exponential smoothing
    Exponential,
}

impl From<MethodArg> for ProjectionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Linear => Self::Linear,
            MethodArg::MovingAverage => Self::MovingAverage,
            MethodArg::Exponential => Self::Exponential,
        }
    }
}

/// Parse `--requirement`, rejecting zero, negative and non-finite values
fn parse_requirement(raw: &str) -> Result<f64, String> {
    let credits = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    validate_requirement(credits)
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `requirement`, `data_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute transcript analytics.
    ///
    /// Reads course exports (CSV or JSON) given as FILES, or fetches a user's
    /// records from the configured source with --user.
    Analyze {
        /// Course export files (supports multiple)
        #[arg(value_name = "FILES", required_unless_present = "user")]
        input_files: Vec<PathBuf>,

        /// Fetch records for this user from the configured source
        #[arg(long, value_name = "ID", conflicts_with = "input_files")]
        user: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write the report into the configured reports directory
        #[arg(long)]
        save: bool,

        /// Append this many projected terms of GPA to the report
        #[arg(long, value_name = "TERMS")]
        project: Option<usize>,
    },
    /// Combine term GPA and credits with a points series.
    Trend {
        /// Course export file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Points series (CSV or JSON)
        #[arg(long, value_name = "FILE")]
        points: PathBuf,

        /// Project this many future terms of GPA and credits
        #[arg(long, value_name = "TERMS")]
        project: Option<usize>,

        /// Projection method
        #[arg(long, value_enum, default_value = "linear")]
        method: MethodArg,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "acadanalytics",
    about = "Academic analytics from transcript exports",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override the degree credit requirement
    #[arg(long, value_name = "CREDITS", value_parser = parse_requirement)]
    pub requirement: Option<f64>,

    /// Override grade distribution bucketing
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Use the built-in demo transcript instead of exports
    #[arg(long)]
    pub demo: bool,

    /// Override the directory holding user exports
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the reports output directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override; `--demo` only ever switches demo data on.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: None,
            verbose: None,
            requirement: self.requirement,
            granularity: self.granularity.map(Into::into),
            demo: self.demo.then_some(true),
            data_dir: self
                .data_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
