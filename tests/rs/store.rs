//! Integration tests for loading course records from disk and the demo source.

use academic_analytics::core::models::{CourseStatus, Semester};
use academic_analytics::core::store::{
    load_course_file, load_points_file, open_store, CourseStore, DemoStore, FileStore, StoreError,
};
use std::fs;
use tempfile::TempDir;

const CSV_EXPORT: &str = "\
id,course_code,course_name,department,credit_hours,grade,semester,year,status
c1,CS 2500,Fundamentals of CS 1,,4,A,Fall,2023,
c2,MATH 1341,Calculus 1,Math,4,B+,Fall,2023,completed
,CS 3500,Object-Oriented Design,,4,,Spring,2024,
";

const JSON_EXPORT: &str = r#"{
  "courses": [
    { "courseCode": "CS 2510", "creditHours": 4, "grade": "A-", "semester": "Spring", "year": 2024 },
    { "course_code": "ENGW 1111", "credits": 4, "grade": "IP", "semester": "Fall", "year": 2024 }
  ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

#[test]
fn csv_export_loads_records() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "alice.csv", CSV_EXPORT);

    let records = load_course_file(&path).unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].id, "c1");
    assert_eq!(records[0].department_key(), "CS");
    assert_eq!(records[0].grade.as_deref(), Some("A"));
    assert_eq!(records[0].period().semester, Semester::Fall);

    assert_eq!(records[1].department_key(), "MATH");
    assert_eq!(records[1].status, CourseStatus::Completed);

    // Blank id falls back to the file stem and row number
    assert_eq!(records[2].id, "alice-3");
    assert_eq!(records[2].status, CourseStatus::InProgress);
}

#[test]
fn json_export_accepts_camel_case_and_aliases() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "bob.json", JSON_EXPORT);

    let records = load_course_file(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].course_code, "CS 2510");
    assert!((records[0].credit_hours - 4.0).abs() < f64::EPSILON);
    assert_eq!(records[0].id, "bob-1");
    assert!(records[1].is_in_progress());
}

#[test]
fn malformed_rows_report_position() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(
        &dir,
        "bad.csv",
        "course_code,credit_hours,grade,semester,year\nCS 1800,4,A,Fall,2023\nCS 1802,1,A,Midterm,2023\n",
    );

    match load_course_file(&path) {
        Err(StoreError::InvalidRow { row, .. }) => assert_eq!(row, 2),
        other => panic!("expected an invalid row error, got {other:?}"),
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write(&dir, "notes.txt", "hello");
    assert!(matches!(
        load_course_file(&path),
        Err(StoreError::UnsupportedFormat { .. })
    ));
}

#[test]
fn file_store_finds_user_exports() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(&dir, "alice.csv", CSV_EXPORT);
    write(&dir, "bob.json", JSON_EXPORT);
    let store = FileStore::new(dir.path());

    assert_eq!(store.fetch_courses("alice").unwrap().len(), 3);
    assert_eq!(store.fetch_courses("bob").unwrap().len(), 2);
    assert!(matches!(
        store.fetch_courses("carol"),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn file_store_rejects_path_like_ids() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());

    for id in ["", "  ", "../alice", "a/b", ".hidden"] {
        assert!(
            matches!(
                store.fetch_courses(id),
                Err(StoreError::InvalidUserId { .. })
            ),
            "id {id:?} should be rejected"
        );
    }
}

#[test]
fn points_series_loads_from_csv_and_json() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv = write(
        &dir,
        "points.csv",
        "period,total_points,attempted_credits,earned_credits\nFall 2023,52.0,16,16\nSpring 2024,60.5,16,12\n",
    );
    let json = write(
        &dir,
        "points.json",
        r#"{ "points": [ { "period": "Fall 2023", "totalPoints": 52.0, "attemptedCredits": 16, "earnedCredits": 16 } ] }"#,
    );

    let from_csv = load_points_file(&csv).unwrap();
    assert_eq!(from_csv.len(), 2);
    assert_eq!(from_csv[1].period, "Spring 2024");
    assert!((from_csv[1].total_points - 60.5).abs() < f64::EPSILON);

    let from_json = load_points_file(&json).unwrap();
    assert_eq!(from_json.len(), 1);
    assert!((from_json[0].earned_credits - 16.0).abs() < f64::EPSILON);
}

#[test]
fn open_store_selects_demo_source() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let demo = open_store(true, dir.path());
    assert_eq!(
        demo.fetch_courses("anyone").unwrap(),
        DemoStore::records()
    );

    let files = open_store(false, dir.path());
    assert!(files.describe().contains(&dir.path().display().to_string()));
    assert!(files.fetch_courses("anyone").is_err());
}
