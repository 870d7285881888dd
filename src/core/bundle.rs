//! Output types of the aggregation engine

use crate::core::models::Period;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One bar of the grade histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeShare {
    /// Bucket label (e.g., "A" or "B+")
    pub grade: String,
    /// Courses in the bucket
    pub count: usize,
    /// Share of GPA-affecting courses, one decimal
    pub percentage: f64,
}

/// One slice of the department breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentShare {
    /// Department key (e.g., "MATH")
    pub category: String,
    /// Completed courses in the department
    pub count: usize,
    /// Share of completed courses, one decimal
    pub percentage: f64,
}

/// Earned credits in one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCredits {
    /// The period
    pub period: Period,
    /// Credits earned in the period
    pub credits: f64,
}

/// GPA and credit totals for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodGpa {
    /// The period
    pub period: Period,
    /// Term GPA, `None` when no course in the period carried quality points
    pub gpa: Option<f64>,
    /// Credits attempted (everything completed except withdrawals)
    pub attempted_credits: f64,
    /// Credits earned
    pub earned_credits: f64,
    /// Completed courses in the period
    pub course_count: usize,
}

/// A period singled out by the insight generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemesterHighlight {
    /// The period
    pub period: Period,
    /// Its GPA
    pub gpa: f64,
}

/// Summary findings derived from the period series and distributions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Insights {
    /// Department with the largest share of completed courses
    pub top_department: Option<DepartmentShare>,
    /// Mean earned credits per period
    pub avg_credits_per_semester: f64,
    /// Last GPA period strictly above the first (endpoint comparison only)
    pub is_improving: bool,
    /// Last GPA minus first GPA; zero with fewer than two GPA periods
    pub gpa_change: f64,
    /// Highest-GPA period (earliest on ties)
    pub best_semester: Option<SemesterHighlight>,
    /// Lowest-GPA period (earliest on ties)
    pub worst_semester: Option<SemesterHighlight>,
}

/// Class standing by earned credits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStanding {
    /// 0 to 30 credits
    #[default]
    Freshman,
    /// 31 to 60 credits
    Sophomore,
    /// 61 to 90 credits
    Junior,
    /// More than 90 credits
    Senior,
}

impl ClassStanding {
    /// Standing for a number of earned credits
    #[must_use]
    pub fn from_credits(credits: f64) -> Self {
        if credits > 90.0 {
            Self::Senior
        } else if credits > 60.0 {
            Self::Junior
        } else if credits > 30.0 {
            Self::Sophomore
        } else {
            Self::Freshman
        }
    }
}

impl fmt::Display for ClassStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Freshman => "Freshman",
            Self::Sophomore => "Sophomore",
            Self::Junior => "Junior",
            Self::Senior => "Senior",
        };
        f.write_str(name)
    }
}

/// Progress toward the degree credit requirement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DegreeProgress {
    /// Percent of the requirement earned, clamped to `[0, 100]`
    pub percentage: f64,
    /// Credits still needed, never negative
    pub remaining_credits: f64,
    /// Semesters left at the current pace; `None` when the pace is zero
    pub estimated_semesters_remaining: Option<u32>,
    /// Class standing by earned credits
    pub standing: ClassStanding,
}

/// Courses currently being taken
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InProgressSummary {
    /// Number of in-progress courses
    pub courses: usize,
    /// Their credit hours
    pub credits: f64,
}

/// Every metric derived from one snapshot of course records.
///
/// Produced fresh by each call to `aggregate`; never updated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregationBundle {
    /// Credit-weighted GPA over completed GPA-affecting courses
    pub overall_gpa: f64,
    /// Earned credits over completed courses
    pub total_credits: f64,
    /// Completed courses
    pub total_courses: usize,
    /// Distinct departments among completed courses
    pub department_count: usize,
    /// `true` when there are no completed courses at all
    pub has_no_data: bool,
    /// Grade histogram, best grade first, empty buckets omitted
    pub grade_distribution: Vec<GradeShare>,
    /// Department breakdown, alphabetical
    pub department_distribution: Vec<DepartmentShare>,
    /// Earned credits per period, chronological
    pub credits_by_period: Vec<PeriodCredits>,
    /// GPA per period, chronological
    pub gpa_by_period: Vec<PeriodGpa>,
    /// Summary insights
    pub insights: Insights,
    /// Degree progress
    pub degree_progress: DegreeProgress,
    /// In-progress courses
    pub in_progress: InProgressSummary,
    /// Ids of records skipped because of unrecognized grades
    pub skipped_records: Vec<String>,
}

impl AggregationBundle {
    /// The "no data yet" bundle returned for an empty record set
    #[must_use]
    pub fn empty() -> Self {
        Self {
            has_no_data: true,
            ..Self::default()
        }
    }

    /// Periods that have GPA data, chronological
    pub fn graded_periods(&self) -> impl Iterator<Item = SemesterHighlight> + '_ {
        self.gpa_by_period.iter().filter_map(|point| {
            point.gpa.map(|gpa| SemesterHighlight {
                period: point.period,
                gpa,
            })
        })
    }
}
