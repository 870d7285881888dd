//! End-to-end aggregation scenarios over the public API.

use academic_analytics::core::models::{CourseRecord, Semester};
use academic_analytics::core::primitives::GradeGranularity;
use academic_analytics::core::store::DemoStore;
use academic_analytics::core::{AnalyticsError, InvalidGradePolicy};
use academic_analytics::{aggregate, AnalyticsConfig};

fn course(id: &str, code: &str, grade: &str, credits: f64, sem: Semester, year: i32) -> CourseRecord {
    CourseRecord::new(id, code, credits, sem, year).with_grade(grade)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn empty_transcript_has_no_data() {
    let bundle = aggregate(&[], &AnalyticsConfig::default()).unwrap();
    assert_eq!(bundle.total_courses, 0);
    assert!(close(bundle.overall_gpa, 0.0));
    assert!(bundle.grade_distribution.is_empty());
    assert!(bundle.has_no_data);
}

#[test]
fn two_courses_one_term() {
    let records = vec![
        course("1", "CS 2500", "A", 3.0, Semester::Fall, 2023),
        course("2", "CS 2510", "B", 3.0, Semester::Fall, 2023),
    ];
    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();

    assert!(close(bundle.overall_gpa, 3.5));
    let shares: Vec<(&str, usize, f64)> = bundle
        .grade_distribution
        .iter()
        .map(|s| (s.grade.as_str(), s.count, s.percentage))
        .collect();
    assert_eq!(shares, vec![("A", 1, 50.0), ("B", 1, 50.0)]);
    assert!(!bundle.has_no_data);
}

#[test]
fn best_term_and_improvement() {
    let records = vec![
        course("1", "CS 2500", "B", 4.0, Semester::Fall, 2023),
        course("2", "CS 3500", "A", 4.0, Semester::Spring, 2024),
        course("3", "CS 3650", "A-", 4.0, Semester::Spring, 2024),
    ];
    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();

    assert_eq!(bundle.gpa_by_period[0].gpa, Some(3.0));
    assert_eq!(bundle.gpa_by_period[1].gpa, Some(3.85));
    let best = bundle.insights.best_semester.as_ref().unwrap();
    assert_eq!(best.period.label(), "Spring 2024");
    assert!(bundle.insights.is_improving);
    let worst = bundle.insights.worst_semester.as_ref().unwrap();
    assert_eq!(worst.period.label(), "Fall 2023");
}

#[test]
fn progress_is_clamped_past_requirement() {
    let records: Vec<CourseRecord> = (0..5)
        .map(|i| {
            course(
                &format!("r{i}"),
                &format!("GEN {i}"),
                "A",
                25.0,
                Semester::Fall,
                2019 + i,
            )
        })
        .collect();
    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();

    assert!(close(bundle.total_credits, 125.0));
    assert!(close(bundle.degree_progress.percentage, 100.0));
    assert!(close(bundle.degree_progress.remaining_credits, 0.0));
    assert!(matches!(
        bundle.degree_progress.estimated_semesters_remaining,
        None | Some(0)
    ));
}

#[test]
fn progress_below_requirement() {
    let records = vec![
        course("1", "CS 2500", "A", 15.0, Semester::Fall, 2023),
        course("2", "CS 2510", "B", 15.0, Semester::Spring, 2024),
    ];
    let config = AnalyticsConfig::default();
    let bundle = aggregate(&records, &config).unwrap();

    assert!(close(bundle.degree_progress.percentage, 25.0));
    assert!(close(bundle.degree_progress.remaining_credits, 90.0));
    assert_eq!(bundle.degree_progress.estimated_semesters_remaining, Some(6));
}

#[test]
fn distribution_counts_match_graded_courses() {
    let records = DemoStore::records();
    for granularity in [GradeGranularity::Exact, GradeGranularity::Collapsed] {
        let config = AnalyticsConfig {
            grade_bucket_granularity: granularity,
            ..AnalyticsConfig::default()
        };
        let bundle = aggregate(&records, &config).unwrap();

        let graded = records
            .iter()
            .filter(|r| !r.is_in_progress())
            .filter_map(|r| r.parsed_grade().ok().flatten())
            .filter(|g| g.is_gpa_affecting())
            .count();
        let counted: usize = bundle.grade_distribution.iter().map(|s| s.count).sum();
        assert_eq!(counted, graded);
    }
}

#[test]
fn department_shares_sum_to_hundred() {
    let bundle = aggregate(&DemoStore::records(), &AnalyticsConfig::default()).unwrap();
    let total: f64 = bundle
        .department_distribution
        .iter()
        .map(|d| d.percentage)
        .sum();
    assert!((total - 100.0).abs() < 0.5, "got {total}");
    assert_eq!(bundle.department_count, bundle.department_distribution.len());
}

#[test]
fn input_order_does_not_matter() {
    let records = DemoStore::records();
    let config = AnalyticsConfig::default();
    let expected = aggregate(&records, &config).unwrap();

    let mut reversed = records.clone();
    reversed.reverse();
    assert_eq!(aggregate(&reversed, &config).unwrap(), expected);

    let mut rotated = records;
    rotated.rotate_left(5);
    assert_eq!(aggregate(&rotated, &config).unwrap(), expected);
}

#[test]
fn single_term_is_not_improving() {
    let records = vec![course("1", "CS 2500", "A", 4.0, Semester::Fall, 2023)];
    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();
    assert!(!bundle.insights.is_improving);
    assert!(close(bundle.insights.gpa_change, 0.0));
}

#[test]
fn invalid_grades_follow_policy() {
    let records = vec![
        course("ok", "CS 2500", "A", 4.0, Semester::Fall, 2023),
        course("bad", "CS 2510", "Z+", 4.0, Semester::Fall, 2023),
    ];

    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();
    assert_eq!(bundle.skipped_records, vec!["bad".to_string()]);
    assert_eq!(bundle.total_courses, 1);

    let strict = AnalyticsConfig {
        invalid_grade_policy: InvalidGradePolicy::Abort,
        ..AnalyticsConfig::default()
    };
    match aggregate(&records, &strict) {
        Err(AnalyticsError::InvalidGrade { record_id, .. }) => assert_eq!(record_id, "bad"),
        other => panic!("expected an invalid grade error, got {other:?}"),
    }
}

#[test]
fn in_progress_courses_stay_out_of_gpa() {
    let records = vec![
        course("1", "CS 2500", "B", 4.0, Semester::Fall, 2023),
        CourseRecord::new("2", "CS 3500", 4.0, Semester::Spring, 2024).in_progress(),
    ];
    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();

    assert!(close(bundle.overall_gpa, 3.0));
    assert_eq!(bundle.total_courses, 1);
    assert_eq!(bundle.in_progress.courses, 1);
    assert!(close(bundle.in_progress.credits, 4.0));
    assert_eq!(bundle.gpa_by_period.len(), 1);
}

#[test]
fn fractional_in_progress_credits_are_order_independent() {
    let records = vec![
        course("done", "CS 2500", "A", 4.0, Semester::Fall, 2023),
        CourseRecord::new("ip1", "CS 3500", 2.017, Semester::Spring, 2024).in_progress(),
        CourseRecord::new("ip2", "CS 3650", 0.127, Semester::Spring, 2024).in_progress(),
        CourseRecord::new("ip3", "MATH 2331", 1.121, Semester::Spring, 2024).in_progress(),
    ];
    let config = AnalyticsConfig::default();
    let forward = aggregate(&records, &config).unwrap();

    let mut reversed = records;
    reversed.reverse();
    let backward = aggregate(&reversed, &config).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(
        forward.in_progress.credits.to_bits(),
        backward.in_progress.credits.to_bits()
    );
}

#[test]
fn empty_sums_are_positive_zero() {
    let in_progress_only = vec![
        CourseRecord::new("1", "CS 3500", 4.0, Semester::Spring, 2024).in_progress(),
    ];
    let bundle = aggregate(&in_progress_only, &AnalyticsConfig::default()).unwrap();
    assert!(bundle.has_no_data);
    assert!(bundle.total_credits.is_sign_positive());
    assert!(bundle.overall_gpa.is_sign_positive());
    assert!(bundle.degree_progress.percentage.is_sign_positive());
    assert!(bundle.insights.avg_credits_per_semester.is_sign_positive());
    let json = serde_json::to_string(&bundle).unwrap();
    assert!(!json.contains("-0.0"), "{json}");

    let withdrawn_only = vec![
        course("1", "CS 2500", "W", 4.0, Semester::Fall, 2023),
        course("2", "CS 2510", "W", 4.0, Semester::Fall, 2023),
    ];
    let bundle = aggregate(&withdrawn_only, &AnalyticsConfig::default()).unwrap();
    let fall = &bundle.gpa_by_period[0];
    assert!(fall.attempted_credits.is_sign_positive());
    assert!(fall.earned_credits.is_sign_positive());
    assert!(bundle.credits_by_period[0].credits.is_sign_positive());
    assert!(bundle.total_credits.is_sign_positive());
}
