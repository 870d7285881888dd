//! Aggregation engine: course records in, `AggregationBundle` out
//!
//! The engine is a pure function of its inputs. Records are resolved
//! (grades parsed, quality points looked up), partitioned into completed and
//! in-progress, sorted into a canonical order, and then folded into the
//! summary figures, distributions, and per-period series. Sorting first means
//! every floating-point sum runs in the same order for any permutation of the
//! input, so the output is identical regardless of input order.

use crate::core::bundle::{
    AggregationBundle, ClassStanding, DegreeProgress, DepartmentShare, GradeShare,
    InProgressSummary, PeriodCredits, PeriodGpa,
};
use crate::core::error::{AnalyticsError, AnalyticsResult};
use crate::core::grouping::{group_by_department, group_by_period};
use crate::core::insights::derive_insights;
use crate::core::models::{CourseRecord, CourseStatus, CourseView, Grade, Period};
use crate::core::primitives::{bucket_grade, percentage, round_to, weighted_gpa, GradeGranularity};
use crate::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Credit hours required for the degree unless configured otherwise
pub const DEFAULT_DEGREE_CREDITS: f64 = 120.0;

/// Lowest quality points that still earn credit (C-)
pub const DEFAULT_MIN_EARNING_POINTS: f64 = 1.7;

/// What to do with a record whose grade is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidGradePolicy {
    /// Leave the record out and keep going
    #[default]
    Skip,
    /// Fail the whole aggregation
    Abort,
}

impl FromStr for InvalidGradePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("Unknown invalid-grade policy: '{other}'")),
        }
    }
}

impl fmt::Display for InvalidGradePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Options recognized by [`aggregate`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Credits needed to graduate
    pub degree_credit_requirement: f64,
    /// Bucketing used by the grade distribution
    pub grade_bucket_granularity: GradeGranularity,
    /// Lowest quality points that earn credit
    pub min_earning_points: f64,
    /// Handling of unrecognized grades
    pub invalid_grade_policy: InvalidGradePolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            degree_credit_requirement: DEFAULT_DEGREE_CREDITS,
            grade_bucket_granularity: GradeGranularity::Collapsed,
            min_earning_points: DEFAULT_MIN_EARNING_POINTS,
            invalid_grade_policy: InvalidGradePolicy::Skip,
        }
    }
}

/// A record with its grade parsed and quality points resolved
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCourse<'a> {
    /// The source record
    pub record: &'a CourseRecord,
    /// Parsed grade (`None` when ungraded)
    pub grade: Option<Grade>,
    /// Quality points (`None` for non-GPA grades)
    pub points: Option<f64>,
    /// Whether the course is still being taken
    pub in_progress: bool,
}

impl<'a> ResolvedCourse<'a> {
    /// Resolve a record's grade.
    ///
    /// In-progress records are never parsed; their grade is ignored.
    ///
    /// # Errors
    /// Returns `InvalidGradeError` (wrapped) when a completed record's grade
    /// is not recognized
    pub fn resolve(record: &'a CourseRecord) -> AnalyticsResult<Self> {
        if record.status == CourseStatus::InProgress {
            return Ok(Self {
                record,
                grade: None,
                points: None,
                in_progress: true,
            });
        }

        let grade = record
            .parsed_grade()
            .map_err(|source| AnalyticsError::InvalidGrade {
                record_id: record.id.clone(),
                source,
            })?;
        let points = grade
            .and_then(Grade::points)
            .map(|table| record.grade_points.unwrap_or(table));

        Ok(Self {
            record,
            grade,
            points,
            in_progress: grade == Some(Grade::InProgress),
        })
    }

    /// Whether the course earns its credit hours
    #[must_use]
    pub fn earns_credit(&self, min_points: f64) -> bool {
        match self.grade {
            Some(Grade::Pass) => true,
            Some(_) => self.points.is_some_and(|points| points >= min_points),
            None => false,
        }
    }

    /// Whether the course counts toward attempted credits
    #[must_use]
    pub fn is_attempted(&self) -> bool {
        !self.in_progress && self.grade != Some(Grade::Withdrawn)
    }

    /// Credits this course contributes to the earned total
    #[must_use]
    pub fn earned_credits(&self, min_points: f64) -> f64 {
        if self.earns_credit(min_points) {
            self.record.credit_hours
        } else {
            0.0
        }
    }

    fn has_gpa_weight(&self) -> bool {
        self.points.is_some() && self.record.credit_hours > 0.0
    }
}

impl CourseView for ResolvedCourse<'_> {
    fn period(&self) -> Period {
        self.record.period()
    }

    fn department_key(&self) -> String {
        self.record.department_key()
    }

    fn credit_hours(&self) -> f64 {
        self.record.credit_hours
    }

    fn quality_points(&self) -> Option<f64> {
        self.points
    }
}

/// Compute the full metrics bundle for a set of course records.
///
/// Input order does not matter. An empty input yields
/// [`AggregationBundle::empty`].
///
/// # Errors
/// Returns [`AnalyticsError::InvalidGrade`] for an unrecognized grade when
/// the policy is [`InvalidGradePolicy::Abort`]. Under
/// [`InvalidGradePolicy::Skip`] such records are left out and listed in
/// `skipped_records`.
pub fn aggregate(
    records: &[CourseRecord],
    config: &AnalyticsConfig,
) -> AnalyticsResult<AggregationBundle> {
    if records.is_empty() {
        debug!("aggregate: no records, returning empty bundle");
        return Ok(AggregationBundle::empty());
    }

    let (resolved, skipped_records) = resolve_all(records, config.invalid_grade_policy)?;
    let (mut completed, mut in_progress): (Vec<_>, Vec<_>) =
        resolved.into_iter().partition(|course| !course.in_progress);
    completed.sort_by(canonical_order);
    in_progress.sort_by(canonical_order);

    let min_points = config.min_earning_points;
    let total_courses = completed.len();
    let total_credits = round_to(
        completed.iter().map(|c| c.earned_credits(min_points)).sum(),
        2,
    );
    let departments = group_by_department(&completed);

    let mut bundle = AggregationBundle {
        overall_gpa: weighted_gpa(&completed),
        total_credits,
        total_courses,
        department_count: departments.len(),
        has_no_data: total_courses == 0,
        grade_distribution: grade_distribution(&completed, config.grade_bucket_granularity),
        department_distribution: departments
            .iter()
            .map(|(category, courses)| DepartmentShare {
                category: category.clone(),
                count: courses.len(),
                percentage: percentage(courses.len(), total_courses),
            })
            .collect(),
        credits_by_period: Vec::new(),
        gpa_by_period: Vec::new(),
        insights: crate::core::bundle::Insights::default(),
        degree_progress: DegreeProgress::default(),
        in_progress: InProgressSummary {
            courses: in_progress.len(),
            credits: round_to(in_progress.iter().map(|c| c.record.credit_hours).sum(), 2),
        },
        skipped_records,
    };

    for (period, courses) in group_by_period(&completed) {
        let earned = round_to(courses.iter().map(|c| c.earned_credits(min_points)).sum(), 2);
        let attempted = round_to(
            courses
                .iter()
                .filter(|c| c.is_attempted())
                .map(|c| c.record.credit_hours)
                .sum(),
            2,
        );
        let gpa = courses
            .iter()
            .any(|c| c.has_gpa_weight())
            .then(|| weighted_gpa(courses.iter().copied()));

        bundle.credits_by_period.push(PeriodCredits {
            period,
            credits: earned,
        });
        bundle.gpa_by_period.push(PeriodGpa {
            period,
            gpa,
            attempted_credits: attempted,
            earned_credits: earned,
            course_count: courses.len(),
        });
    }

    bundle.insights = derive_insights(&bundle);
    bundle.degree_progress = degree_progress(
        bundle.total_credits,
        bundle.insights.avg_credits_per_semester,
        config.degree_credit_requirement,
    );

    debug!(
        "aggregate: {} completed, {} in progress, {} skipped, gpa {:.2}, {} periods",
        bundle.total_courses,
        bundle.in_progress.courses,
        bundle.skipped_records.len(),
        bundle.overall_gpa,
        bundle.gpa_by_period.len()
    );

    Ok(bundle)
}

/// Resolve every record, applying the invalid-grade policy
fn resolve_all(
    records: &[CourseRecord],
    policy: InvalidGradePolicy,
) -> AnalyticsResult<(Vec<ResolvedCourse<'_>>, Vec<String>)> {
    let mut resolved = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        match ResolvedCourse::resolve(record) {
            Ok(course) => resolved.push(course),
            Err(err) if policy == InvalidGradePolicy::Skip => {
                warn!("Skipping course {}: {err}", record.course_code);
                skipped.push(record.id.clone());
            }
            Err(err) => return Err(err),
        }
    }

    skipped.sort();
    Ok((resolved, skipped))
}

/// Total order over resolved courses used before any summation
fn canonical_order(a: &ResolvedCourse, b: &ResolvedCourse) -> std::cmp::Ordering {
    a.record
        .period()
        .cmp(&b.record.period())
        .then_with(|| a.record.course_code.cmp(&b.record.course_code))
        .then_with(|| a.record.id.cmp(&b.record.id))
        .then_with(|| a.record.credit_hours.total_cmp(&b.record.credit_hours))
        .then_with(|| a.grade.cmp(&b.grade))
}

/// Histogram of GPA-affecting grades, best bucket first
fn grade_distribution(
    completed: &[ResolvedCourse],
    granularity: GradeGranularity,
) -> Vec<GradeShare> {
    let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
    for grade in completed
        .iter()
        .filter_map(|c| c.grade)
        .filter(|g| g.is_gpa_affecting())
    {
        *counts.entry(bucket_grade(grade, granularity)).or_default() += 1;
    }

    let graded: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(bucket, count)| GradeShare {
            grade: bucket.symbol().to_string(),
            count,
            percentage: percentage(count, graded),
        })
        .collect()
}

/// Progress toward the credit requirement at the current pace
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn degree_progress(total_credits: f64, avg_per_semester: f64, requirement: f64) -> DegreeProgress {
    let percentage = if requirement > 0.0 {
        round_to((total_credits / requirement * 100.0).clamp(0.0, 100.0), 1)
    } else {
        100.0
    };
    let remaining_credits = round_to((requirement - total_credits).max(0.0), 2);
    let estimated_semesters_remaining =
        (avg_per_semester > 0.0).then(|| (remaining_credits / avg_per_semester).ceil() as u32);

    DegreeProgress {
        percentage,
        remaining_credits,
        estimated_semesters_remaining,
        standing: ClassStanding::from_credits(total_credits),
    }
}
