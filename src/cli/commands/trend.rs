//! Trend command handler
//!
//! Prints the engine's term GPA and credits side by side with an external
//! points series, optionally followed by projected terms.

use academic_analytics::config::Config;
use academic_analytics::core::{
    aggregate,
    models::Period,
    projection::{project, ProjectedPoint, ProjectionConfig, ProjectionMethod},
    store::{load_course_file, load_points_file},
    trend::{align_points_trend, CombinedTrendPoint},
};
use academic_analytics::{error, info};
use std::fmt::Write;
use std::path::Path;

/// Run the trend command
pub fn run(
    input_file: &Path,
    points_file: &Path,
    projected_terms: Option<usize>,
    method: ProjectionMethod,
    config: &Config,
) {
    match build_trend(input_file, points_file, projected_terms, method, config) {
        Ok(table) => print!("{table}"),
        Err(err) => {
            error!("Trend failed for {}: {err}", input_file.display());
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn build_trend(
    input_file: &Path,
    points_file: &Path,
    projected_terms: Option<usize>,
    method: ProjectionMethod,
    config: &Config,
) -> Result<String, String> {
    let records = load_course_file(input_file)
        .map_err(|e| format!("✗ Failed to load {}: {e}", input_file.display()))?;
    let points = load_points_file(points_file)
        .map_err(|e| format!("✗ Failed to load {}: {e}", points_file.display()))?;

    let bundle = aggregate(&records, &config.analytics_config())
        .map_err(|e| format!("✗ Aggregation failed: {e}"))?;
    let combined = align_points_trend(&bundle, &points);
    info!(
        "Aligned {} terms from {} and {}",
        combined.len(),
        input_file.display(),
        points_file.display()
    );

    let mut table = render_table(&combined);
    if let Some(terms) = projected_terms.filter(|&n| n > 0) {
        table.push_str(&render_projection(&combined, terms, method));
    }
    Ok(table)
}

fn cell(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

fn render_table(combined: &[CombinedTrendPoint]) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<14} {:>6} {:>8} {:>8} {:>10} {:>8}",
        "Term", "GPA", "Credits", "Points", "Attempted", "Earned"
    );
    for point in combined {
        let _ = writeln!(
            table,
            "{:<14} {:>6} {:>8} {:>8} {:>10} {:>8}",
            point.period.label(),
            cell(point.gpa, 2),
            cell(point.credits, 1),
            cell(point.total_points, 0),
            cell(point.attempted_credits, 1),
            cell(point.earned_credits, 1),
        );
    }
    table
}

fn series<F>(combined: &[CombinedTrendPoint], value: F) -> Vec<(Period, f64)>
where
    F: Fn(&CombinedTrendPoint) -> Option<f64>,
{
    combined
        .iter()
        .filter_map(|point| value(point).map(|v| (point.period, v)))
        .collect()
}

fn render_projection(
    combined: &[CombinedTrendPoint],
    terms: usize,
    method: ProjectionMethod,
) -> String {
    let gpa = project(
        &series(combined, |p| p.gpa),
        &ProjectionConfig::gpa().with_method(method).with_periods(terms),
    );
    let credits = project(
        &series(combined, |p| p.credits),
        &ProjectionConfig::credits().with_method(method).with_periods(terms),
    );
    let points = project(
        &series(combined, |p| p.total_points),
        &ProjectionConfig::points().with_method(method).with_periods(terms),
    );

    let mut out = String::new();
    let _ = writeln!(out, "\nProjected ({method}):");
    let rows = [("GPA", &gpa, 2), ("Credits", &credits, 1), ("Points", &points, 0)];
    for (label, projected, precision) in rows {
        let values: Vec<String> = projected
            .iter()
            .filter(|p| p.is_projected)
            .map(|p: &ProjectedPoint| format!("{} {:.precision$}", p.period, p.value))
            .collect();
        if values.is_empty() {
            let _ = writeln!(out, "  {label:<8} not enough data");
        } else {
            let _ = writeln!(out, "  {label:<8} {}", values.join(", "));
        }
    }
    out
}
