//! Integration tests for configuration management

use academic_analytics::config::{Config, ConfigOverrides};
use academic_analytics::core::primitives::GradeGranularity;
use academic_analytics::core::InvalidGradePolicy;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.source.data_dir.is_empty(),
        "Default data_dir should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert!((config.analytics.degree_credit_requirement - 120.0).abs() < 1e-9);
    assert!((config.analytics.min_earning_points - 1.7).abs() < 1e-9);
    assert_eq!(config.analytics.grade_granularity, GradeGranularity::Collapsed);
    assert_eq!(config.analytics.invalid_grade_policy, InvalidGradePolicy::Skip);
    assert!(!config.source.demo);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[analytics]
degree_credit_requirement = 128.0
grade_granularity = "exact"
min_earning_points = 1.0
invalid_grade_policy = "abort"

[source]
demo = true
data_dir = "./exports"

[paths]
reports_dir = "./reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert!((config.analytics.degree_credit_requirement - 128.0).abs() < 1e-9);
    assert_eq!(config.analytics.grade_granularity, GradeGranularity::Exact);
    assert!((config.analytics.min_earning_points - 1.0).abs() < 1e-9);
    assert_eq!(config.analytics.invalid_grade_policy, InvalidGradePolicy::Abort);
    assert!(config.source.demo);
    assert_eq!(config.source.data_dir, "./exports");
    assert_eq!(config.paths.reports_dir, "./reports");
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields fall back to their defaults
    let toml_str = r#"
[logging]
level = "error"

[analytics]
degree_credit_requirement = 90.0
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert!((config.analytics.degree_credit_requirement - 90.0).abs() < 1e-9);
    assert!((config.analytics.min_earning_points - 1.7).abs() < 1e-9);
    assert_eq!(config.analytics.invalid_grade_policy, InvalidGradePolicy::Skip);
    assert_eq!(config.source.data_dir, "");
}

#[test]
fn test_config_rejects_unknown_policy() {
    let toml_str = r#"
[logging]

[analytics]
invalid_grade_policy = "ignore"
"#;
    assert!(Config::from_toml(toml_str).is_err());
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$ACAD_ANALYTICS/test.log"

[source]
data_dir = "$ACAD_ANALYTICS/transcripts"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("acadanalytics"));
    assert!(!config.logging.file.contains("$ACAD_ANALYTICS"));
    assert!(config.source.data_dir.ends_with("transcripts"));
    assert!(!config.source.data_dir.contains("$ACAD_ANALYTICS"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("requirement", "128")
        .expect("Failed to set requirement");
    assert_eq!(config.get("requirement").unwrap(), "128");
    assert!((config.analytics_config().degree_credit_requirement - 128.0).abs() < 1e-9);

    config
        .set("granularity", "exact")
        .expect("Failed to set granularity");
    assert_eq!(
        config.analytics_config().grade_bucket_granularity,
        GradeGranularity::Exact
    );

    config.set("demo", "true").expect("Failed to set demo");
    assert!(config.source.demo);

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_set_validates_values() {
    let mut config = Config::from_defaults();

    assert!(config.set("level", "loud").is_err());
    assert!(config.set("requirement", "-4").is_err());
    assert!(config.set("requirement", "lots").is_err());
    assert!(config.set("min_earning_points", "5.0").is_err());
    assert!(config.set("granularity", "fine").is_err());
    assert!(config.set("policy", "maybe").is_err());
    assert!(config.set("demo", "sometimes").is_err());

    // Failed sets leave the previous value alone
    assert!((config.analytics.degree_credit_requirement - 120.0).abs() < 1e-9);
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("policy", "abort").expect("Failed to set policy");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("policy", &defaults)
        .expect("Failed to unset policy");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.analytics.invalid_grade_policy, InvalidGradePolicy::Skip);

    assert!(config.unset("unknown_key", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config
        .set("min_earning_points", "2.0")
        .expect("Failed to set min points");

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded.logging.level, "info");
    assert!((loaded.analytics.min_earning_points - 2.0).abs() < 1e-9);
    assert_eq!(
        loaded.analytics.grade_granularity,
        config.analytics.grade_granularity
    );
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        requirement: Some(64.0),
        granularity: Some(GradeGranularity::Exact),
        demo: Some(true),
        data_dir: Some("./custom_data".to_string()),
        reports_dir: Some("./custom_reports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert!((config.analytics.degree_credit_requirement - 64.0).abs() < 1e-9);
    assert_eq!(config.analytics.grade_granularity, GradeGranularity::Exact);
    assert!(config.source.demo);
    assert_eq!(config.data_dir(), PathBuf::from("./custom_data"));
    assert_eq!(config.reports_dir(), PathBuf::from("./custom_reports"));
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..Default::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.source.data_dir, before.source.data_dir);
    assert!(
        (config.analytics.degree_credit_requirement
            - before.analytics.degree_credit_requirement)
            .abs()
            < 1e-9
    );
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[analytics]"));
    assert!(display_str.contains("[source]"));
    assert!(display_str.contains("[paths]"));

    assert!(display_str.contains("degree_credit_requirement"));
    assert!(display_str.contains("invalid_grade_policy = \"skip\""));
    assert!(display_str.contains("verbose"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[source]
data_dir = ""

[paths]
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    assert!(
        config.merge_defaults(&defaults),
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.source.data_dir, defaults.source.data_dir);
    assert_eq!(config.paths.reports_dir, defaults.paths.reports_dir);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[source]
data_dir = "/srv/exports"

[paths]
reports_dir = "/srv/reports"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    assert!(!config.merge_defaults(&defaults));
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.source.data_dir, "/srv/exports");
}

#[test]
fn test_get_acadanalytics_dir() {
    let dir = Config::get_acadanalytics_dir();

    assert!(dir.to_string_lossy().contains("acadanalytics"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}

#[test]
fn test_config_overrides_reject_bad_requirement() {
    let mut config = Config::from_defaults();

    for bad in [0.0, -30.0, f64::NAN, f64::INFINITY] {
        config.apply_overrides(&ConfigOverrides {
            requirement: Some(bad),
            ..Default::default()
        });
        assert!((config.analytics.degree_credit_requirement - 120.0).abs() < 1e-9);
    }

    assert!(config.set("requirement", "0").is_err());
    assert!(config.set("requirement", "NaN").is_err());
}
