//! Grouping of course records by period and by department

use crate::core::models::{CourseRecord, CourseView, Period};
use std::collections::BTreeMap;

/// Courses grouped by period, iterated chronologically.
pub type ByPeriod<'a, T> = BTreeMap<Period, Vec<&'a T>>;

/// Courses grouped by department key, iterated alphabetically.
pub type ByDepartment<'a, T> = BTreeMap<String, Vec<&'a T>>;

/// Group courses by (semester, year).
///
/// Keys iterate in chronological order regardless of input order; within a
/// period, courses keep their input order. Nothing is filtered.
pub fn group_by_period<T: CourseView>(courses: &[T]) -> ByPeriod<'_, T> {
    let mut groups: ByPeriod<'_, T> = BTreeMap::new();
    for course in courses {
        groups.entry(course.period()).or_default().push(course);
    }
    groups
}

/// Group courses by department key. Nothing is filtered.
pub fn group_by_department<T: CourseView>(courses: &[T]) -> ByDepartment<'_, T> {
    let mut groups: ByDepartment<'_, T> = BTreeMap::new();
    for course in courses {
        groups.entry(course.department_key()).or_default().push(course);
    }
    groups
}

/// Split records into (completed, in progress)
#[must_use]
pub fn partition_by_status(records: &[CourseRecord]) -> (Vec<&CourseRecord>, Vec<&CourseRecord>) {
    records.iter().partition(|record| !record.is_in_progress())
}

/// Courses currently being taken, ordered by period then course code
#[must_use]
pub fn current_courses(records: &[CourseRecord]) -> Vec<&CourseRecord> {
    let (_, mut in_progress) = partition_by_status(records);
    in_progress.sort_by(|a, b| {
        a.period()
            .cmp(&b.period())
            .then_with(|| a.course_code.cmp(&b.course_code))
            .then_with(|| a.id.cmp(&b.id))
    });
    in_progress
}
