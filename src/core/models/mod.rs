//! Data models for `academic_analytics`

pub mod course;
pub mod grade;
pub mod period;

pub use course::{CourseRecord, CourseStatus, CourseView};
pub use grade::{Grade, InvalidGradeError};
pub use period::{ParsePeriodError, Period, Semester};
