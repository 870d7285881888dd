//! Built-in sample transcript

use super::{CourseStore, StoreError};
use crate::core::models::{CourseRecord, Semester};

/// Serves the same sample transcript for every user
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoStore;

const SAMPLE: &[(&str, &str, &str, f64, &str, Semester, i32)] = &[
    ("CS 1800", "Discrete Structures", "CS", 4.0, "B+", Semester::Fall, 2022),
    ("CS 2500", "Fundamentals of Computer Science 1", "CS", 4.0, "A-", Semester::Fall, 2022),
    ("MATH 1341", "Calculus 1", "MATH", 4.0, "B", Semester::Fall, 2022),
    ("ENGW 1111", "First-Year Writing", "ENGW", 4.0, "A", Semester::Fall, 2022),
    ("CS 2510", "Fundamentals of Computer Science 2", "CS", 4.0, "B", Semester::Spring, 2023),
    ("MATH 1342", "Calculus 2", "MATH", 4.0, "C+", Semester::Spring, 2023),
    ("PHYS 1151", "Physics for Engineering 1", "PHYS", 4.0, "B-", Semester::Spring, 2023),
    ("PE 1000", "Wellness", "PE", 1.0, "P", Semester::Spring, 2023),
    ("CS 3500", "Object-Oriented Design", "CS", 4.0, "A-", Semester::Fall, 2023),
    ("CS 3000", "Algorithms and Data", "CS", 4.0, "B+", Semester::Fall, 2023),
    ("MATH 2331", "Linear Algebra", "MATH", 4.0, "A", Semester::Fall, 2023),
    ("ECON 1115", "Principles of Macroeconomics", "ECON", 4.0, "W", Semester::Fall, 2023),
    ("CS 3650", "Computer Systems", "CS", 4.0, "A", Semester::Spring, 2024),
    ("CS 4500", "Software Development", "CS", 4.0, "A-", Semester::Spring, 2024),
    ("MATH 3081", "Probability and Statistics", "MATH", 4.0, "B+", Semester::Spring, 2024),
    ("PHIL 1145", "Technology and Human Values", "PHIL", 4.0, "A", Semester::Spring, 2024),
];

const CURRENT: &[(&str, &str, &str, f64, Semester, i32)] = &[
    ("CS 4400", "Programming Languages", "CS", 4.0, Semester::Fall, 2024),
    ("CS 3700", "Networks and Distributed Systems", "CS", 4.0, Semester::Fall, 2024),
];

impl DemoStore {
    /// The sample records
    #[must_use]
    pub fn records() -> Vec<CourseRecord> {
        let completed = SAMPLE.iter().enumerate().map(
            |(i, &(code, name, dept, credits, grade, semester, year))| {
                CourseRecord::new(format!("demo-{}", i + 1), code, credits, semester, year)
                    .with_name(name)
                    .with_department(dept)
                    .with_grade(grade)
            },
        );
        let current = CURRENT.iter().enumerate().map(
            |(i, &(code, name, dept, credits, semester, year))| {
                CourseRecord::new(
                    format!("demo-{}", SAMPLE.len() + i + 1),
                    code,
                    credits,
                    semester,
                    year,
                )
                .with_name(name)
                .with_department(dept)
                .in_progress()
            },
        );
        completed.chain(current).collect()
    }
}

impl CourseStore for DemoStore {
    fn fetch_courses(&self, _user_id: &str) -> Result<Vec<CourseRecord>, StoreError> {
        Ok(Self::records())
    }

    fn describe(&self) -> String {
        "demo transcript".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_records_are_well_formed() {
        let records = DemoStore::records();
        assert_eq!(records.len(), SAMPLE.len() + CURRENT.len());
        assert!(records.iter().all(|r| r.parsed_grade().is_ok()));
        assert_eq!(records.iter().filter(|r| r.is_in_progress()).count(), CURRENT.len());

        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn test_same_records_for_any_user() {
        let store = DemoStore;
        assert_eq!(
            store.fetch_courses("alice").unwrap(),
            store.fetch_courses("bob").unwrap()
        );
    }
}
