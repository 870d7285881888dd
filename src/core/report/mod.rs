//! Report generation for aggregation results
//!
//! This module renders a computed bundle, its findings, and an optional GPA
//! projection as either a JSON document (for other tools) or a Markdown
//! summary (for people).

pub mod formats;

use crate::core::bundle::AggregationBundle;
use crate::core::insights::Findings;
use crate::core::models::CourseRecord;
use crate::core::projection::ProjectedPoint;
use std::error::Error;
use std::path::Path;

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
///
/// Collects everything a report shows so each format renders from one
/// source.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Whose transcript this is (user id, file name, or "demo")
    pub subject: &'a str,
    /// Computed metrics
    pub bundle: &'a AggregationBundle,
    /// Qualitative findings
    pub findings: &'a Findings,
    /// Courses currently being taken
    pub current_courses: Vec<&'a CourseRecord>,
    /// Observed and projected term GPAs, empty when not requested
    pub projection: &'a [ProjectedPoint],
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub fn new(
        subject: &'a str,
        bundle: &'a AggregationBundle,
        findings: &'a Findings,
        current_courses: Vec<&'a CourseRecord>,
    ) -> Self {
        Self {
            subject,
            bundle,
            findings,
            current_courses,
            projection: &[],
        }
    }

    /// Attach a projected GPA series
    #[must_use]
    pub fn with_projection(mut self, projection: &'a [ProjectedPoint]) -> Self {
        self.projection = projection;
        self
    }

    /// Projected points only
    pub fn projected_points(&self) -> impl Iterator<Item = &ProjectedPoint> {
        self.projection.iter().filter(|point| point.is_projected)
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

/// Reporter for a format
#[must_use]
pub fn reporter_for(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
    }
}
