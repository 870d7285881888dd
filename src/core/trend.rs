//! Alignment of the engine's period series with an external points series

use crate::core::bundle::AggregationBundle;
use crate::core::models::Period;
use crate::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One period of the points series supplied by the gamification engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsTrendPoint {
    /// Period label (e.g., "Fall 2023")
    pub period: String,
    /// Points awarded in the period
    #[serde(alias = "totalPoints")]
    pub total_points: f64,
    /// Credits attempted, as the points engine counts them
    #[serde(default, alias = "attemptedCredits")]
    pub attempted_credits: f64,
    /// Credits earned, as the points engine counts them
    #[serde(default, alias = "earnedCredits")]
    pub earned_credits: f64,
}

/// One period of the combined points and academics view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTrendPoint {
    /// The period
    pub period: Period,
    /// Term GPA from the bundle
    pub gpa: Option<f64>,
    /// Earned credits from the bundle
    pub credits: Option<f64>,
    /// Points from the external series
    pub total_points: Option<f64>,
    /// Attempted credits from the external series
    pub attempted_credits: Option<f64>,
    /// Earned credits from the external series
    pub earned_credits: Option<f64>,
}

impl CombinedTrendPoint {
    const fn empty(period: Period) -> Self {
        Self {
            period,
            gpa: None,
            credits: None,
            total_points: None,
            attempted_credits: None,
            earned_credits: None,
        }
    }
}

/// Join the bundle's periods with the points series on the period key.
///
/// The result covers the union of both sides, chronologically. A side that
/// lacks a period leaves its fields `None`. Points rows whose label does not
/// parse are dropped with a warning; repeated labels are summed.
#[must_use]
pub fn align_points_trend(
    bundle: &AggregationBundle,
    points: &[PointsTrendPoint],
) -> Vec<CombinedTrendPoint> {
    let mut combined: BTreeMap<Period, CombinedTrendPoint> = BTreeMap::new();

    for entry in &bundle.gpa_by_period {
        let point = combined
            .entry(entry.period)
            .or_insert_with(|| CombinedTrendPoint::empty(entry.period));
        point.gpa = entry.gpa;
    }
    for entry in &bundle.credits_by_period {
        let point = combined
            .entry(entry.period)
            .or_insert_with(|| CombinedTrendPoint::empty(entry.period));
        point.credits = Some(entry.credits);
    }

    for row in points {
        let Ok(period) = row.period.parse::<Period>() else {
            warn!("Dropping points row with unrecognized period '{}'", row.period);
            continue;
        };
        let point = combined
            .entry(period)
            .or_insert_with(|| CombinedTrendPoint::empty(period));
        point.total_points = Some(point.total_points.unwrap_or(0.0) + row.total_points);
        point.attempted_credits =
            Some(point.attempted_credits.unwrap_or(0.0) + row.attempted_credits);
        point.earned_credits = Some(point.earned_credits.unwrap_or(0.0) + row.earned_credits);
    }

    combined.into_values().collect()
}
