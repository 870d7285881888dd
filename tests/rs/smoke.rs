//! Integration smoke tests for `academic_analytics`

use academic_analytics::core::store::DemoStore;
use academic_analytics::{aggregate, get_version, AnalyticsConfig};

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn demo_transcript_aggregates() {
    let records = DemoStore::records();
    let bundle = aggregate(&records, &AnalyticsConfig::default()).unwrap();
    assert!(bundle.total_courses > 0);
    assert!(bundle.overall_gpa > 0.0 && bundle.overall_gpa <= 4.0);
    assert!(bundle.in_progress.courses > 0);
    assert!(bundle.skipped_records.is_empty());
}
