//! Markdown report generator
//!
//! Renders the `templates/report.md` askama template. Table rows are
//! formatted here so the template only lays them out.

use crate::core::get_version;
use crate::core::report::{ReportContext, ReportGenerator};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Placeholder for values that do not exist (e.g., a term without GPA data)
const NONE: &str = "-";

struct ShareRow {
    label: String,
    count: usize,
    percentage: String,
}

struct PeriodRow {
    period: String,
    gpa: String,
    attempted: String,
    earned: String,
    courses: usize,
}

struct CourseRow {
    code: String,
    name: String,
    grade: String,
    period: String,
}

struct ProjectionRow {
    period: String,
    gpa: String,
}

#[derive(Template)]
#[template(path = "report.md", escape = "none")]
struct MarkdownTemplate {
    subject: String,
    version: &'static str,
    has_no_data: bool,
    overall_gpa: String,
    total_credits: String,
    total_courses: usize,
    department_count: usize,
    standing: String,
    progress: String,
    remaining: String,
    estimate: String,
    avg_credits: String,
    best_semester: String,
    worst_semester: String,
    improving: &'static str,
    in_progress_courses: usize,
    in_progress_credits: String,
    skipped: String,
    grades: Vec<ShareRow>,
    departments: Vec<ShareRow>,
    periods: Vec<PeriodRow>,
    notes: Vec<String>,
    struggling: Vec<CourseRow>,
    strengths: Vec<CourseRow>,
    current: Vec<CourseRow>,
    projection: Vec<ProjectionRow>,
}

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn build(ctx: &ReportContext) -> MarkdownTemplate {
        let bundle = ctx.bundle;
        let insights = &bundle.insights;
        let progress = &bundle.degree_progress;
        let highlight = |h: Option<crate::core::bundle::SemesterHighlight>| {
            h.map_or_else(|| NONE.to_string(), |h| format!("{} ({:.2})", h.period, h.gpa))
        };

        MarkdownTemplate {
            subject: ctx.subject.to_string(),
            version: get_version(),
            has_no_data: bundle.has_no_data,
            overall_gpa: format!("{:.2}", bundle.overall_gpa),
            total_credits: format!("{:.1}", bundle.total_credits),
            total_courses: bundle.total_courses,
            department_count: bundle.department_count,
            standing: progress.standing.to_string(),
            progress: format!("{:.1}%", progress.percentage),
            remaining: format!("{:.1}", progress.remaining_credits),
            estimate: progress
                .estimated_semesters_remaining
                .map_or_else(|| NONE.to_string(), |n| n.to_string()),
            avg_credits: format!("{:.1}", insights.avg_credits_per_semester),
            best_semester: highlight(insights.best_semester),
            worst_semester: highlight(insights.worst_semester),
            improving: if insights.is_improving { "yes" } else { "no" },
            in_progress_courses: bundle.in_progress.courses,
            in_progress_credits: format!("{:.1}", bundle.in_progress.credits),
            skipped: bundle.skipped_records.join(", "),
            grades: bundle
                .grade_distribution
                .iter()
                .map(|share| ShareRow {
                    label: share.grade.clone(),
                    count: share.count,
                    percentage: format!("{:.1}%", share.percentage),
                })
                .collect(),
            departments: bundle
                .department_distribution
                .iter()
                .map(|share| ShareRow {
                    label: share.category.clone(),
                    count: share.count,
                    percentage: format!("{:.1}%", share.percentage),
                })
                .collect(),
            periods: bundle
                .gpa_by_period
                .iter()
                .map(|point| PeriodRow {
                    period: point.period.label(),
                    gpa: point
                        .gpa
                        .map_or_else(|| NONE.to_string(), |gpa| format!("{gpa:.2}")),
                    attempted: format!("{:.1}", point.attempted_credits),
                    earned: format!("{:.1}", point.earned_credits),
                    courses: point.course_count,
                })
                .collect(),
            notes: ctx
                .findings
                .trend_notes
                .iter()
                .map(ToString::to_string)
                .collect(),
            struggling: ctx
                .findings
                .struggling_courses
                .iter()
                .map(|c| CourseRow {
                    code: c.course_code.clone(),
                    name: c.course_name.clone(),
                    grade: c.grade.to_string(),
                    period: c.period.label(),
                })
                .collect(),
            strengths: ctx
                .findings
                .top_department_best_courses
                .iter()
                .map(|c| CourseRow {
                    code: c.course_code.clone(),
                    name: c.course_name.clone(),
                    grade: c.grade.to_string(),
                    period: c.period.label(),
                })
                .collect(),
            current: ctx
                .current_courses
                .iter()
                .map(|c| CourseRow {
                    code: c.course_code.clone(),
                    name: c.course_name.clone(),
                    grade: format!("{:.1} cr", c.credit_hours),
                    period: c.period().label(),
                })
                .collect(),
            projection: ctx
                .projected_points()
                .map(|p| ProjectionRow {
                    period: p.period.label(),
                    gpa: format!("{:.2}", p.value),
                })
                .collect(),
        }
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(Self::build(ctx).render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{aggregate, AnalyticsConfig};
    use crate::core::insights::derive_findings;
    use crate::core::models::{CourseRecord, Semester};

    #[test]
    fn test_render_contains_summary_and_tables() {
        let records = vec![
            CourseRecord::new("1", "CS 1800", 4.0, Semester::Fall, 2023)
                .with_name("Discrete Structures")
                .with_grade("A"),
            CourseRecord::new("2", "MATH 1341", 4.0, Semester::Spring, 2024).with_grade("C"),
            CourseRecord::new("3", "CS 2500", 4.0, Semester::Fall, 2024).in_progress(),
        ];
        let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();
        let findings = derive_findings(&bundle, &records);
        let current = crate::core::grouping::current_courses(&records);
        let ctx = ReportContext::new("tester", &bundle, &findings, current);

        let out = MarkdownReporter::new().render(&ctx).unwrap();
        assert!(out.contains("# Academic Report: tester"));
        assert!(out.contains("| Overall GPA | 3.00 |"));
        assert!(out.contains("| Fall 2023 | 4.00 |"));
        assert!(out.contains("| MATH | 1 | 50.0% |"));
        assert!(out.contains("CS 2500"));
        assert!(out.contains("Declining trend"));
    }

    #[test]
    fn test_render_no_data() {
        let bundle = crate::core::bundle::AggregationBundle::empty();
        let findings = crate::core::insights::Findings::default();
        let ctx = ReportContext::new("nobody", &bundle, &findings, Vec::new());
        let out = MarkdownReporter::new().render(&ctx).unwrap();
        assert!(out.contains("No completed courses yet."));
    }
}
