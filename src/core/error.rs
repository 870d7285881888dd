//! Errors raised by the aggregation engine

use crate::core::models::InvalidGradeError;
use std::error::Error;
use std::fmt;

/// Result alias for engine operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Failures that stop an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// A record carried an unrecognized grade and the policy is to abort
    InvalidGrade {
        /// Id of the offending record
        record_id: String,
        /// The underlying parse failure
        source: InvalidGradeError,
    },
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrade { record_id, source } => {
                write!(f, "record '{record_id}': {source}")
            }
        }
    }
}

impl Error for AnalyticsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidGrade { source, .. } => Some(source),
        }
    }
}
