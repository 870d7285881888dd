//! Course record model

use super::{Grade, InvalidGradeError, Period, Semester};
use serde::{Deserialize, Serialize};

/// Whether a course has a final grade yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CourseStatus {
    /// Finished with a final grade (including P and W)
    Completed,
    /// Currently being taken
    #[serde(alias = "in_progress")]
    InProgress,
}

/// One course instance from a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Unique identifier
    pub id: String,

    /// Course code (e.g., "MATH 2210")
    #[serde(alias = "courseCode")]
    pub course_code: String,

    /// Course title (e.g., "Linear Algebra")
    #[serde(default, alias = "courseName")]
    pub course_name: String,

    /// Department key used for grouping (e.g., "MATH")
    #[serde(default)]
    pub department: String,

    /// Credit hours (can be fractional; zero for audits)
    #[serde(alias = "creditHours")]
    pub credit_hours: f64,

    /// Raw grade symbol, absent while in progress
    #[serde(default)]
    pub grade: Option<String>,

    /// Quality points supplied by the transcript, if any
    #[serde(default, alias = "gradePoints")]
    pub grade_points: Option<f64>,

    /// Term the course was taken
    pub semester: Semester,

    /// Calendar year the course was taken
    pub year: i32,

    /// Completion status
    pub status: CourseStatus,
}

impl CourseRecord {
    /// Create a completed course without a grade
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `course_code` - Course code; its first token doubles as the department
    /// * `credit_hours` - Credit hours
    /// * `semester` - Term taken
    /// * `year` - Year taken
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        course_code: impl Into<String>,
        credit_hours: f64,
        semester: Semester,
        year: i32,
    ) -> Self {
        Self {
            id: id.into(),
            course_code: course_code.into(),
            course_name: String::new(),
            department: String::new(),
            credit_hours,
            grade: None,
            grade_points: None,
            semester,
            year,
            status: CourseStatus::Completed,
        }
    }

    /// Set the grade symbol
    #[must_use]
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Set the course title
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.course_name = name.into();
        self
    }

    /// Set an explicit department
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Override the quality points for this course
    #[must_use]
    pub const fn with_grade_points(mut self, points: f64) -> Self {
        self.grade_points = Some(points);
        self
    }

    /// Mark the course as in progress (clears any grade)
    #[must_use]
    pub fn in_progress(mut self) -> Self {
        self.status = CourseStatus::InProgress;
        self.grade = None;
        self.grade_points = None;
        self
    }

    /// The (semester, year) period of this course
    #[must_use]
    pub const fn period(&self) -> Period {
        Period::new(self.semester, self.year)
    }

    /// Department used for grouping.
    ///
    /// Falls back to the first token of the course code when no department
    /// was recorded (e.g., "cs 2510" becomes "CS").
    #[must_use]
    pub fn department_key(&self) -> String {
        let explicit = self.department.trim();
        if explicit.is_empty() {
            self.course_code
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_ascii_uppercase()
        } else {
            explicit.to_ascii_uppercase()
        }
    }

    /// Parse the grade symbol, treating blank grades as absent
    ///
    /// # Errors
    /// Returns `InvalidGradeError` when the symbol is not a recognized grade
    pub fn parsed_grade(&self) -> Result<Option<Grade>, InvalidGradeError> {
        match self.grade.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(symbol) => symbol.parse().map(Some),
        }
    }

    /// Whether the course is in progress (by status or by an `IP` grade)
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == CourseStatus::InProgress
            || matches!(self.parsed_grade(), Ok(Some(Grade::InProgress)))
    }
}

/// Read access to the fields the grouping and GPA primitives need.
///
/// Implemented by raw records and by records whose grade has already been
/// resolved, so the same primitives serve both.
pub trait CourseView {
    /// Period the course belongs to
    fn period(&self) -> Period;

    /// Department grouping key
    fn department_key(&self) -> String;

    /// Credit hours
    fn credit_hours(&self) -> f64;

    /// Quality points, or `None` when the course has no GPA impact
    fn quality_points(&self) -> Option<f64>;
}

impl CourseView for CourseRecord {
    fn period(&self) -> Period {
        Self::period(self)
    }

    fn department_key(&self) -> String {
        Self::department_key(self)
    }

    fn credit_hours(&self) -> f64 {
        self.credit_hours
    }

    /// Unparseable grades count as having no GPA impact here; the
    /// aggregation engine applies the configured policy to them instead.
    fn quality_points(&self) -> Option<f64> {
        let grade = self.parsed_grade().ok().flatten()?;
        grade.points().map(|table| self.grade_points.unwrap_or(table))
    }
}

impl<T: CourseView + ?Sized> CourseView for &T {
    fn period(&self) -> Period {
        (**self).period()
    }

    fn department_key(&self) -> String {
        (**self).department_key()
    }

    fn credit_hours(&self) -> f64 {
        (**self).credit_hours()
    }

    fn quality_points(&self) -> Option<f64> {
        (**self).quality_points()
    }
}
