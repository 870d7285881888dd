//! Projection of per-period series into future terms

use crate::core::bundle::AggregationBundle;
use crate::core::models::Period;
use crate::core::primitives::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How future values are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionMethod {
    /// Least-squares line through the lookback window
    #[default]
    Linear,
    /// Mean of the lookback window
    MovingAverage,
    /// Exponentially smoothed level of the lookback window
    Exponential,
}

impl FromStr for ProjectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "moving-average" | "moving_average" | "average" => Ok(Self::MovingAverage),
            "exponential" => Ok(Self::Exponential),
            other => Err(format!("Unknown projection method: '{other}'")),
        }
    }
}

impl fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::MovingAverage => write!(f, "moving-average"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

/// Projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Future periods to add
    pub periods: usize,
    /// Trailing points the estimate is based on
    pub lookback: usize,
    /// Below this many points nothing is projected
    pub min_data_points: usize,
    /// Estimation method
    pub method: ProjectionMethod,
    /// Smoothing factor for [`ProjectionMethod::Exponential`]
    pub alpha: f64,
    /// Lower clamp
    pub min: Option<f64>,
    /// Upper clamp
    pub max: Option<f64>,
    /// Step through Spring and Fall only
    pub regular_terms_only: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            periods: 4,
            lookback: 6,
            min_data_points: 2,
            method: ProjectionMethod::Linear,
            alpha: 0.3,
            min: None,
            max: None,
            regular_terms_only: false,
        }
    }
}

impl ProjectionConfig {
    /// GPA preset: linear, clamped to the 4.0 scale
    #[must_use]
    pub fn gpa() -> Self {
        Self {
            min: Some(0.0),
            max: Some(4.0),
            ..Self::default()
        }
    }

    /// Credits preset: moving average, never negative
    #[must_use]
    pub fn credits() -> Self {
        Self {
            method: ProjectionMethod::MovingAverage,
            min: Some(0.0),
            ..Self::default()
        }
    }

    /// Points preset: linear, never negative
    #[must_use]
    pub fn points() -> Self {
        Self {
            min: Some(0.0),
            ..Self::default()
        }
    }

    /// Replace the method
    #[must_use]
    pub const fn with_method(mut self, method: ProjectionMethod) -> Self {
        self.method = method;
        self
    }

    /// Replace the number of future periods
    #[must_use]
    pub const fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    fn clamp(&self, value: f64) -> f64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }

    fn step(&self, period: Period) -> Period {
        if self.regular_terms_only {
            period.next_regular()
        } else {
            period.next()
        }
    }
}

/// One point of a projected series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    /// The period
    pub period: Period,
    /// Observed or projected value
    pub value: f64,
    /// `true` for points added by the projection
    pub is_projected: bool,
}

/// Extend a series with projected future periods.
///
/// The input is sorted chronologically first. Observed points are returned
/// unchanged, followed by `config.periods` projected ones. With fewer than
/// `config.min_data_points` observations only the observed points come back.
#[must_use]
pub fn project(series: &[(Period, f64)], config: &ProjectionConfig) -> Vec<ProjectedPoint> {
    let mut observed = series.to_vec();
    observed.sort_by_key(|(period, _)| *period);

    let mut out: Vec<ProjectedPoint> = observed
        .iter()
        .map(|&(period, value)| ProjectedPoint {
            period,
            value,
            is_projected: false,
        })
        .collect();

    let Some(&(last_period, _)) = observed.last() else {
        return out;
    };
    if observed.len() < config.min_data_points.max(1) {
        return out;
    }

    let start = observed.len().saturating_sub(config.lookback.max(1));
    let window: Vec<f64> = observed[start..].iter().map(|&(_, value)| value).collect();
    let estimate = Estimator::fit(&window, config);

    let mut period = last_period;
    for step in 0..config.periods {
        period = config.step(period);
        out.push(ProjectedPoint {
            period,
            value: round_to(config.clamp(estimate.at(step)), 2),
            is_projected: true,
        });
    }
    out
}

/// Fitted model over the lookback window
enum Estimator {
    Line { slope: f64, intercept: f64, origin: f64 },
    Level(f64),
}

impl Estimator {
    #[allow(clippy::cast_precision_loss)]
    fn fit(window: &[f64], config: &ProjectionConfig) -> Self {
        let n = window.len() as f64;
        match config.method {
            ProjectionMethod::Linear => {
                let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
                for (i, &y) in window.iter().enumerate() {
                    let x = i as f64;
                    sx += x;
                    sy += y;
                    sxy += x * y;
                    sxx += x * x;
                }
                let denominator = n * sxx - sx * sx;
                let slope = if denominator.abs() > f64::EPSILON {
                    (n * sxy - sx * sy) / denominator
                } else {
                    0.0
                };
                Self::Line {
                    slope,
                    intercept: (sy - slope * sx) / n,
                    origin: n,
                }
            }
            ProjectionMethod::MovingAverage => Self::Level(window.iter().sum::<f64>() / n),
            ProjectionMethod::Exponential => {
                let alpha = config.alpha.clamp(0.0, 1.0);
                let level = window
                    .iter()
                    .skip(1)
                    .fold(window[0], |level, &y| alpha * y + (1.0 - alpha) * level);
                Self::Level(level)
            }
        }
    }

    /// Value `step` periods past the end of the window
    #[allow(clippy::cast_precision_loss)]
    fn at(&self, step: usize) -> f64 {
        match *self {
            Self::Line {
                slope,
                intercept,
                origin,
            } => slope * (origin + step as f64) + intercept,
            Self::Level(level) => level,
        }
    }
}

/// Term GPAs of a bundle as a projection input
#[must_use]
pub fn gpa_series(bundle: &AggregationBundle) -> Vec<(Period, f64)> {
    bundle
        .graded_periods()
        .map(|point| (point.period, point.gpa))
        .collect()
}

/// Earned credits per period of a bundle as a projection input
#[must_use]
pub fn credit_series(bundle: &AggregationBundle) -> Vec<(Period, f64)> {
    bundle
        .credits_by_period
        .iter()
        .map(|point| (point.period, point.credits))
        .collect()
}
