//! Metric primitives: grade lookup, credit-weighted GPA, grade bucketing

use crate::core::models::{CourseView, Grade, InvalidGradeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Map a grade symbol to its quality points.
///
/// # Errors
/// Returns `InvalidGradeError` when the symbol is not a recognized grade.
/// Recognized grades without GPA impact (P, W, IP) map to `Ok(None)`.
pub fn grade_to_points(grade: &str) -> Result<Option<f64>, InvalidGradeError> {
    Ok(grade.parse::<Grade>()?.points())
}

/// Credit-weighted GPA over courses that carry quality points.
///
/// `Σ(points × credits) / Σ credits`, rounded to two decimals. Returns `0.0`
/// when the credit sum is zero, so an empty input never yields `NaN`.
pub fn weighted_gpa<I>(courses: I) -> f64
where
    I: IntoIterator,
    I::Item: CourseView,
{
    let (quality, credits) = courses
        .into_iter()
        .filter_map(|course| {
            course
                .quality_points()
                .map(|points| (points * course.credit_hours(), course.credit_hours()))
        })
        .fold((0.0, 0.0), |(q, c), (dq, dc)| (q + dq, c + dc));

    if credits > 0.0 {
        round_to(quality / credits, 2)
    } else {
        0.0
    }
}

/// How finely grades are bucketed in distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeGranularity {
    /// Each letter grade is its own bucket (A-, B+ stay distinct)
    Exact,
    /// Modifiers fold into the plain letter (A+, A, A- become A)
    #[default]
    Collapsed,
}

impl FromStr for GradeGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "collapsed" | "letter" => Ok(Self::Collapsed),
            other => Err(format!("Unknown grade granularity: '{other}'")),
        }
    }
}

impl fmt::Display for GradeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Collapsed => write!(f, "collapsed"),
        }
    }
}

/// The distribution bucket a grade falls into under the given policy
#[must_use]
pub const fn bucket_grade(grade: Grade, granularity: GradeGranularity) -> Grade {
    match granularity {
        GradeGranularity::Exact => grade,
        GradeGranularity::Collapsed => grade.letter(),
    }
}

/// `count / total` as a percentage rounded to one decimal; `0.0` when `total` is zero
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(count as f64 / total as f64 * 100.0, 1)
    }
}

/// Round to a fixed number of decimal places
///
/// Negative zero (e.g., from summing an empty iterator) comes back as `0.0`.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor + 0.0
}
