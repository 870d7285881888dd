//! Analyze command handler
//!
//! Loads course records, runs the aggregation engine, and writes the result
//! as JSON or Markdown.

use academic_analytics::config::Config;
use academic_analytics::core::{
    aggregate,
    grouping::current_courses,
    insights::derive_findings,
    models::CourseRecord,
    projection::{gpa_series, project, ProjectionConfig},
    report::{reporter_for, ReportContext, ReportFormat},
    store::{load_course_file, open_store, DemoStore},
};
use academic_analytics::{error, info, verbose};
use std::path::{Path, PathBuf};

/// Options collected from the `analyze` subcommand
pub struct AnalyzeOptions {
    /// Export files to read
    pub input_files: Vec<PathBuf>,
    /// User to fetch from the configured source
    pub user: Option<String>,
    /// Output format
    pub format: ReportFormat,
    /// Explicit output file
    pub output: Option<PathBuf>,
    /// Also save under the reports directory
    pub save: bool,
    /// Projected GPA terms to include
    pub project: Option<usize>,
}

/// Run the analyze command
pub fn run(options: &AnalyzeOptions, config: &Config) {
    if let Err(err) = analyze(options, config) {
        error!("Analyze failed: {err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Records plus a label naming where they came from
fn load_records(options: &AnalyzeOptions, config: &Config) -> Result<(String, Vec<CourseRecord>), String> {
    if let Some(user) = &options.user {
        let store = open_store(config.source.demo, &config.data_dir());
        info!("Fetching courses for '{user}' from {}", store.describe());
        let records = store
            .fetch_courses(user)
            .map_err(|e| format!("✗ Failed to fetch courses for '{user}': {e}"))?;
        return Ok((user.clone(), records));
    }

    if options.input_files.is_empty() {
        if config.source.demo {
            return Ok(("demo".to_string(), DemoStore::records()));
        }
        return Err("✗ No input files provided.".to_string());
    }

    let mut records = Vec::new();
    for path in &options.input_files {
        let loaded = load_course_file(path)
            .map_err(|e| format!("✗ Failed to load {}: {e}", path.display()))?;
        verbose!("{} records from {}", loaded.len(), path.display());
        records.extend(loaded);
    }
    let subject = options
        .input_files
        .iter()
        .map(|p| stem_of(p))
        .collect::<Vec<_>>()
        .join("+");
    Ok((subject, records))
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript")
        .to_string()
}

fn analyze(options: &AnalyzeOptions, config: &Config) -> Result<(), String> {
    let (subject, records) = load_records(options, config)?;
    info!("Loaded {} course records for {subject}", records.len());

    let bundle = aggregate(&records, &config.analytics_config())
        .map_err(|e| format!("✗ Aggregation failed: {e}"))?;
    if !bundle.skipped_records.is_empty() {
        eprintln!(
            "⚠️  Skipped {} record(s) with unrecognized grades",
            bundle.skipped_records.len()
        );
    }

    let findings = derive_findings(&bundle, &records);
    let projection = options.project.map_or_else(Vec::new, |terms| {
        project(&gpa_series(&bundle), &ProjectionConfig::gpa().with_periods(terms))
    });
    let ctx = ReportContext::new(&subject, &bundle, &findings, current_courses(&records))
        .with_projection(&projection);
    let reporter = reporter_for(options.format);

    if let Some(output) = &options.output {
        reporter
            .generate(&ctx, output)
            .map_err(|e| format!("✗ Failed to write {}: {e}", output.display()))?;
        println!("✓ Report generated: {}", output.display());
        info!("Report exported to: {}", output.display());
    } else if !options.save {
        let rendered = reporter
            .render(&ctx)
            .map_err(|e| format!("✗ Failed to render {} report: {e}", options.format))?;
        println!("{rendered}");
    }

    if options.save {
        let reports_dir = config.reports_dir();
        std::fs::create_dir_all(&reports_dir).map_err(|e| {
            format!(
                "✗ Failed to create reports directory {}: {e}",
                reports_dir.display()
            )
        })?;
        let path = reports_dir.join(format!(
            "{}_report.{}",
            sanitize(&subject),
            options.format.extension()
        ));
        reporter
            .generate(&ctx, &path)
            .map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))?;
        println!("✓ Report generated: {}", path.display());
    }

    Ok(())
}

/// File-name-safe version of a subject label
fn sanitize(subject: &str) -> String {
    subject
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
