//! JSON report generator

use crate::core::bundle::AggregationBundle;
use crate::core::get_version;
use crate::core::insights::Findings;
use crate::core::models::CourseRecord;
use crate::core::projection::ProjectedPoint;
use crate::core::report::{ReportContext, ReportGenerator};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Serialized shape of a JSON report
#[derive(Serialize)]
struct JsonReport<'a> {
    subject: &'a str,
    generator: String,
    bundle: &'a AggregationBundle,
    findings: &'a Findings,
    current_courses: &'a [&'a CourseRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<&'a [ProjectedPoint]>,
}

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let report = JsonReport {
            subject: ctx.subject,
            generator: format!("acadanalytics {}", get_version()),
            bundle: ctx.bundle,
            findings: ctx.findings,
            current_courses: &ctx.current_courses,
            projection: (!ctx.projection.is_empty()).then_some(ctx.projection),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}
