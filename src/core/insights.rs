//! Insight generation over a computed bundle
//!
//! [`derive_insights`] fills the bundle's summary `Insights`. [`derive_findings`]
//! goes one step further and produces the qualitative notes and course lists
//! shown on the analytics page. Both are pure functions of their inputs.

use crate::core::bundle::{AggregationBundle, DepartmentShare, Insights, SemesterHighlight};
use crate::core::models::{CourseRecord, CourseView, Grade, Period};
use crate::core::primitives::round_to;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const STRONG_CHANGE: f64 = 0.3;
const STEADY_CHANGE: f64 = 0.1;
const RECENT_CHANGE: f64 = 0.2;
const RECENT_WINDOW: usize = 3;
const CONSISTENT_SPREAD: f64 = 0.2;
const VARIABLE_SPREAD: f64 = 0.5;
const NOTABLE_GAP: f64 = 0.5;
const STRUGGLING_POINTS: f64 = 2.0;
const MAX_STRUGGLING: usize = 5;
const MAX_BEST_SEMESTER_COURSES: usize = 5;
const MAX_DEPARTMENT_COURSES: usize = 3;

/// Summary insights for a bundle.
///
/// `is_improving` compares the first and last periods that have GPA data. It
/// is an endpoint check, not a regression: a dip followed by a partial
/// recovery reads as "not improving" if the last term is still below the
/// first.
#[must_use]
pub fn derive_insights(bundle: &AggregationBundle) -> Insights {
    let graded: Vec<SemesterHighlight> = bundle.graded_periods().collect();

    let (is_improving, gpa_change) = match (graded.first(), graded.last()) {
        (Some(first), Some(last)) if graded.len() >= 2 => {
            (last.gpa > first.gpa, round_to(last.gpa - first.gpa, 2))
        }
        _ => (false, 0.0),
    };

    Insights {
        top_department: top_department(&bundle.department_distribution),
        avg_credits_per_semester: mean(bundle.credits_by_period.iter().map(|p| p.credits)),
        is_improving,
        gpa_change,
        best_semester: extreme(&graded, Ordering::Greater),
        worst_semester: extreme(&graded, Ordering::Less),
    }
}

/// Largest department share; the first (alphabetical) one wins ties
fn top_department(distribution: &[DepartmentShare]) -> Option<DepartmentShare> {
    distribution
        .iter()
        .fold(None, |best: Option<&DepartmentShare>, share| match best {
            Some(current) if current.percentage >= share.percentage => Some(current),
            _ => Some(share),
        })
        .cloned()
}

/// Period whose GPA compares as `wanted` against every other; earliest wins ties
fn extreme(graded: &[SemesterHighlight], wanted: Ordering) -> Option<SemesterHighlight> {
    graded.iter().copied().reduce(|best, candidate| {
        if candidate.gpa.total_cmp(&best.gpa) == wanted {
            candidate
        } else {
            best
        }
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    round_to(values.sum::<f64>() / count as f64, 2)
}

/// A qualitative observation about the GPA series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendNote {
    /// Overall change above +0.3
    StrongUpward {
        /// Last minus first GPA
        change: f64,
    },
    /// Overall change above +0.1
    SteadyImprovement {
        /// Last minus first GPA
        change: f64,
    },
    /// Overall change below -0.3
    Declining {
        /// Last minus first GPA
        change: f64,
    },
    /// Overall change below -0.1
    SlightDecline {
        /// Last minus first GPA
        change: f64,
    },
    /// Overall change within ±0.1
    Stable {
        /// Last minus first GPA
        change: f64,
    },
    /// The last three GPA periods rose by more than 0.2
    RecentImprovement {
        /// Change across the window
        change: f64,
    },
    /// The last three GPA periods fell by more than 0.2
    RecentDecline {
        /// Change across the window
        change: f64,
    },
    /// Max minus min GPA under 0.2
    HighlyConsistent {
        /// Max minus min GPA
        spread: f64,
    },
    /// Max minus min GPA over 0.5
    Variable {
        /// Max minus min GPA
        spread: f64,
    },
    /// Best and worst terms differ by more than 0.5
    SignificantGap {
        /// Best term
        best: SemesterHighlight,
        /// Worst term
        worst: SemesterHighlight,
    },
}

impl fmt::Display for TrendNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrongUpward { change } => {
                write!(f, "Strong upward trend: GPA improved by {change:.2} points")
            }
            Self::SteadyImprovement { change } => {
                write!(f, "Steady improvement: GPA increased by {change:.2} points")
            }
            Self::Declining { change } => {
                write!(f, "Declining trend: GPA decreased by {:.2} points", change.abs())
            }
            Self::SlightDecline { change } => {
                write!(f, "Slight decline: GPA decreased by {:.2} points", change.abs())
            }
            Self::Stable { change } => {
                write!(f, "Stable performance: GPA remained consistent ({change:.2} change)")
            }
            Self::RecentImprovement { change } => write!(
                f,
                "Recent improvement: last {RECENT_WINDOW} semesters show a {change:.2} point increase"
            ),
            Self::RecentDecline { change } => write!(
                f,
                "Recent decline: last {RECENT_WINDOW} semesters show a {:.2} point decrease",
                change.abs()
            ),
            Self::HighlyConsistent { spread } => {
                write!(f, "Highly consistent: GPA varies by only {spread:.2} points")
            }
            Self::Variable { spread } => {
                write!(f, "Variable performance: GPA fluctuates by {spread:.2} points")
            }
            Self::SignificantGap { best, worst } => write!(
                f,
                "Significant variation: {:.2} point gap between best ({}) and worst ({}) semesters",
                best.gpa - worst.gpa,
                best.period,
                worst.period
            ),
        }
    }
}

/// A single course called out by the findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseHighlight {
    /// Course code
    pub course_code: String,
    /// Course title
    pub course_name: String,
    /// Grade received
    pub grade: Grade,
    /// Quality points used for the GPA
    pub points: f64,
    /// When it was taken
    pub period: Period,
}

/// Qualitative findings for the analytics page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Findings {
    /// Notes about the GPA series, in a fixed order
    pub trend_notes: Vec<TrendNote>,
    /// Completed courses graded C+ or below, lowest first
    pub struggling_courses: Vec<CourseHighlight>,
    /// Course codes taken in the best semester
    pub best_semester_courses: Vec<String>,
    /// Highest-graded courses in the top department
    pub top_department_best_courses: Vec<CourseHighlight>,
}

/// Derive findings from a bundle and the records it was computed from.
///
/// Records with unrecognized grades or without quality points are ignored
/// here, whatever policy the aggregation used.
#[must_use]
pub fn derive_findings(bundle: &AggregationBundle, records: &[CourseRecord]) -> Findings {
    let graded: Vec<CourseHighlight> = records
        .iter()
        .filter(|record| !record.is_in_progress())
        .filter_map(highlight)
        .collect();

    let mut struggling: Vec<CourseHighlight> = graded
        .iter()
        .filter(|course| course.is_struggling())
        .cloned()
        .collect();
    struggling.sort_by(|a, b| a.points.total_cmp(&b.points).then_with(|| by_when(a, b)));
    struggling.truncate(MAX_STRUGGLING);

    let best_semester_courses = bundle
        .insights
        .best_semester
        .map(|best| {
            let mut codes: Vec<String> = records
                .iter()
                .filter(|record| !record.is_in_progress() && record.period() == best.period)
                .filter(|record| record.parsed_grade().is_ok())
                .map(|record| record.course_code.clone())
                .filter(|code| !code.is_empty())
                .collect();
            codes.sort();
            codes.dedup();
            codes.truncate(MAX_BEST_SEMESTER_COURSES);
            codes
        })
        .unwrap_or_default();

    let top_department_best_courses = bundle
        .insights
        .top_department
        .as_ref()
        .map(|top| {
            let mut courses: Vec<CourseHighlight> = records
                .iter()
                .filter(|record| {
                    !record.is_in_progress() && record.department_key() == top.category
                })
                .filter_map(highlight)
                .collect();
            courses.sort_by(|a, b| b.points.total_cmp(&a.points).then_with(|| by_when(a, b)));
            courses.truncate(MAX_DEPARTMENT_COURSES);
            courses
        })
        .unwrap_or_default();

    Findings {
        trend_notes: trend_notes(bundle),
        struggling_courses: struggling,
        best_semester_courses,
        top_department_best_courses,
    }
}

impl CourseHighlight {
    /// Graded C+ or below (any C, D or F), or at most 2.0 quality points
    fn is_struggling(&self) -> bool {
        matches!(self.grade.letter(), Grade::C | Grade::D | Grade::F)
            || self.points <= STRUGGLING_POINTS
    }
}

fn highlight(record: &CourseRecord) -> Option<CourseHighlight> {
    let grade = record.parsed_grade().ok().flatten()?;
    let points = CourseView::quality_points(record)?;
    Some(CourseHighlight {
        course_code: record.course_code.clone(),
        course_name: record.course_name.clone(),
        grade,
        points,
        period: record.period(),
    })
}

fn by_when(a: &CourseHighlight, b: &CourseHighlight) -> Ordering {
    a.period
        .cmp(&b.period)
        .then_with(|| a.course_code.cmp(&b.course_code))
}

fn trend_notes(bundle: &AggregationBundle) -> Vec<TrendNote> {
    let graded: Vec<SemesterHighlight> = bundle.graded_periods().collect();
    let mut notes = Vec::new();

    if graded.len() >= 2 {
        let change = bundle.insights.gpa_change;
        notes.push(if change > STRONG_CHANGE {
            TrendNote::StrongUpward { change }
        } else if change > STEADY_CHANGE {
            TrendNote::SteadyImprovement { change }
        } else if change < -STRONG_CHANGE {
            TrendNote::Declining { change }
        } else if change < -STEADY_CHANGE {
            TrendNote::SlightDecline { change }
        } else {
            TrendNote::Stable { change }
        });
    }

    if graded.len() >= RECENT_WINDOW {
        let window = &graded[graded.len() - RECENT_WINDOW..];
        let change = round_to(window[RECENT_WINDOW - 1].gpa - window[0].gpa, 2);
        if change > RECENT_CHANGE {
            notes.push(TrendNote::RecentImprovement { change });
        } else if change < -RECENT_CHANGE {
            notes.push(TrendNote::RecentDecline { change });
        }

        let max = graded.iter().map(|p| p.gpa).fold(f64::MIN, f64::max);
        let min = graded.iter().map(|p| p.gpa).fold(f64::MAX, f64::min);
        let spread = round_to(max - min, 2);
        if spread < CONSISTENT_SPREAD {
            notes.push(TrendNote::HighlyConsistent { spread });
        } else if spread > VARIABLE_SPREAD {
            notes.push(TrendNote::Variable { spread });
        }
    }

    if let (Some(best), Some(worst)) = (bundle.insights.best_semester, bundle.insights.worst_semester) {
        if best.gpa > 0.0
            && worst.gpa > 0.0
            && best.period != worst.period
            && best.gpa - worst.gpa > NOTABLE_GAP
        {
            notes.push(TrendNote::SignificantGap { best, worst });
        }
    }

    notes
}
