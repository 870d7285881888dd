//! Configuration module for `acadanalytics`

use crate::core::aggregate::{
    AnalyticsConfig, InvalidGradePolicy, DEFAULT_DEGREE_CREDITS, DEFAULT_MIN_EARNING_POINTS,
};
use crate::core::primitives::GradeGranularity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the application directory in path values
const DIR_VARIABLE: &str = "$ACAD_ANALYTICS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Aggregation engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSection {
    /// Credits required for the degree
    pub degree_credit_requirement: f64,
    /// Grade distribution bucketing ("exact" or "collapsed")
    pub grade_granularity: GradeGranularity,
    /// Lowest quality points that earn credit
    pub min_earning_points: f64,
    /// What to do with unrecognized grades ("skip" or "abort")
    pub invalid_grade_policy: InvalidGradePolicy,
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self {
            degree_credit_requirement: DEFAULT_DEGREE_CREDITS,
            grade_granularity: GradeGranularity::Collapsed,
            min_earning_points: DEFAULT_MIN_EARNING_POINTS,
            invalid_grade_policy: InvalidGradePolicy::Skip,
        }
    }
}

/// Where course records come from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Serve the built-in demo transcript instead of reading exports
    #[serde(default)]
    pub demo: bool,
    /// Directory holding `<user>.csv` / `<user>.json` exports
    #[serde(default)]
    pub data_dir: String,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Engine settings
    #[serde(default)]
    pub analytics: AnalyticsSection,
    /// Record source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override degree credit requirement
    pub requirement: Option<f64>,
    /// Override grade distribution granularity
    pub granularity: Option<GradeGranularity>,
    /// Override the demo-data switch
    pub demo: Option<bool>,
    /// Override the export directory
    pub data_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$ACAD_ANALYTICS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/acadanalytics`
    /// - macOS: `~/Library/Application Support/acadanalytics`
    /// - Windows: `%APPDATA%\acadanalytics`
    #[must_use]
    pub fn get_acadanalytics_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("acadanalytics")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading so that fields added in newer versions get their
    /// default values. Only string fields that are empty here and non-empty in
    /// `defaults` are updated; typed engine settings already fall back to
    /// their defaults while deserializing.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.source.data_dir.is_empty() && !defaults.source.data_dir.is_empty() {
            self.source.data_dir.clone_from(&defaults.source.data_dir);
            changed = true;
        }

        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Command-line arguments override file values for this run only; the
    /// configuration file is not modified. Only `Some` values are applied.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     requirement: Some(128.0),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(requirement) = overrides.requirement {
            match validate_requirement(requirement) {
                Ok(credits) => self.analytics.degree_credit_requirement = credits,
                Err(err) => crate::warn!("Ignoring requirement override: {err}"),
            }
        }
        if let Some(granularity) = overrides.granularity {
            self.analytics.grade_granularity = granularity;
        }

        if let Some(demo) = overrides.demo {
            self.source.demo = demo;
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.source.data_dir.clone_from(data_dir);
        }

        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Engine options built from the `[analytics]` section
    #[must_use]
    pub const fn analytics_config(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            degree_credit_requirement: self.analytics.degree_credit_requirement,
            grade_bucket_granularity: self.analytics.grade_granularity,
            min_earning_points: self.analytics.min_earning_points,
            invalid_grade_policy: self.analytics.invalid_grade_policy,
        }
    }

    /// Directory the file store reads exports from
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.source.data_dir)
    }

    /// Directory reports are written to
    #[must_use]
    pub fn reports_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.reports_dir)
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in
    /// the directory returned by [`get_acadanalytics_dir`].
    ///
    /// [`get_acadanalytics_dir`]: Self::get_acadanalytics_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_acadanalytics_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$ACAD_ANALYTICS` in a string to the application directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let app_dir = Self::get_acadanalytics_dir();
            value.replace(DIR_VARIABLE, app_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses the TOML and expands `$ACAD_ANALYTICS` in path values. Missing
    /// fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.source.data_dir = Self::expand_variables(&config.source.data_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// The defaults differ between debug and release builds:
    /// - Debug: Uses `DefaultCLIConfigDebug.toml`
    /// - Release: Uses `DefaultCLIConfigRelease.toml`
    ///
    /// Should the embedded file ever fail to parse, built-in engine defaults
    /// with empty paths are returned instead.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|err| {
            crate::error!("Compiled-in default configuration is invalid: {err}");
            Self::default()
        })
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults, and save it back when anything was added
    /// - On first run: create the config directory and save the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// Serializes the configuration to TOML and writes it to the
    /// platform-specific config file, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`: logging
    /// - `requirement`, `granularity`, `min_earning_points`, `invalid_grade_policy`: engine
    /// - `demo`, `data_dir`: record source
    /// - `reports_dir`: report output
    ///
    /// Returns `None` if the key is not recognized.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "requirement" | "degree_credit_requirement" => {
                Some(self.analytics.degree_credit_requirement.to_string())
            }
            "granularity" | "grade_granularity" => {
                Some(self.analytics.grade_granularity.to_string())
            }
            "min_earning_points" | "min-earning-points" => {
                Some(self.analytics.min_earning_points.to_string())
            }
            "invalid_grade_policy" | "policy" => {
                Some(self.analytics.invalid_grade_policy.to_string())
            }
            "demo" => Some(self.source.demo.to_string()),
            "data_dir" | "data-dir" => Some(self.source.data_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated and converted to the field's type. Only the
    /// in-memory config changes; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value is invalid
    /// (e.g., a negative requirement or "maybe" for a boolean)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                value.parse::<crate::logger::Level>()?;
                self.logging.level = value.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "requirement" | "degree_credit_requirement" => {
                self.analytics.degree_credit_requirement =
                    validate_requirement(parse_number(key, value)?)?;
            }
            "granularity" | "grade_granularity" => {
                self.analytics.grade_granularity = value.parse()?;
            }
            "min_earning_points" | "min-earning-points" => {
                let points = parse_number(key, value)?;
                if !(0.0..=4.0).contains(&points) {
                    return Err(format!("'{key}' must be between 0.0 and 4.0, got {points}"));
                }
                self.analytics.min_earning_points = points;
            }
            "invalid_grade_policy" | "policy" => {
                self.analytics.invalid_grade_policy = value.parse()?;
            }
            "demo" => self.source.demo = parse_bool(key, value)?,
            "data_dir" | "data-dir" => self.source.data_dir = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// The value is taken from `defaults` (typically
    /// [`from_defaults()`](Config::from_defaults)). Call
    /// [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "requirement" | "degree_credit_requirement" => {
                self.analytics.degree_credit_requirement =
                    defaults.analytics.degree_credit_requirement;
            }
            "granularity" | "grade_granularity" => {
                self.analytics.grade_granularity = defaults.analytics.grade_granularity;
            }
            "min_earning_points" | "min-earning-points" => {
                self.analytics.min_earning_points = defaults.analytics.min_earning_points;
            }
            "invalid_grade_policy" | "policy" => {
                self.analytics.invalid_grade_policy = defaults.analytics.invalid_grade_policy;
            }
            "demo" => self.source.demo = defaults.source.demo,
            "data_dir" | "data-dir" => self.source.data_dir.clone_from(&defaults.source.data_dir),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if there is no file. The CLI asks for
    /// confirmation before calling this.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

/// Check a degree credit requirement: finite and strictly positive
///
/// # Errors
/// Returns a message naming the rejected value
pub fn validate_requirement(credits: f64) -> Result<f64, String> {
    if credits.is_finite() && credits > 0.0 {
        Ok(credits)
    } else {
        Err(format!(
            "Degree credit requirement must be a positive number, got {credits}"
        ))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

fn parse_number(key: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("Invalid number for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[analytics]")?;
        writeln!(
            f,
            "  degree_credit_requirement = {}",
            self.analytics.degree_credit_requirement
        )?;
        writeln!(
            f,
            "  grade_granularity = \"{}\"",
            self.analytics.grade_granularity
        )?;
        writeln!(
            f,
            "  min_earning_points = {}",
            self.analytics.min_earning_points
        )?;
        writeln!(
            f,
            "  invalid_grade_policy = \"{}\"",
            self.analytics.invalid_grade_policy
        )?;

        writeln!(f, "\n[source]")?;
        writeln!(f, "  demo = {}", self.source.demo)?;
        writeln!(f, "  data_dir = \"{}\"", self.source.data_dir)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
