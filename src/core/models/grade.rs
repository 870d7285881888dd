//! Letter grades and their quality-point values

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// A recognized transcript grade.
///
/// Variants are declared best-first, so the derived ordering sorts
/// distributions from `A+` down to `F`, followed by the non-GPA grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// A+
    #[serde(rename = "A+")]
    APlus,
    /// A
    A,
    /// A-
    #[serde(rename = "A-")]
    AMinus,
    /// B+
    #[serde(rename = "B+")]
    BPlus,
    /// B
    B,
    /// B-
    #[serde(rename = "B-")]
    BMinus,
    /// C+
    #[serde(rename = "C+")]
    CPlus,
    /// C
    C,
    /// C-
    #[serde(rename = "C-")]
    CMinus,
    /// D+
    #[serde(rename = "D+")]
    DPlus,
    /// D
    D,
    /// D-
    #[serde(rename = "D-")]
    DMinus,
    /// F
    F,
    /// Pass (credit without GPA impact)
    #[serde(rename = "P")]
    Pass,
    /// Withdrawn
    #[serde(rename = "W")]
    Withdrawn,
    /// In progress
    #[serde(rename = "IP")]
    InProgress,
}

impl Grade {
    /// Every recognized grade, best first.
    pub const ALL: [Self; 16] = [
        Self::APlus,
        Self::A,
        Self::AMinus,
        Self::BPlus,
        Self::B,
        Self::BMinus,
        Self::CPlus,
        Self::C,
        Self::CMinus,
        Self::DPlus,
        Self::D,
        Self::DMinus,
        Self::F,
        Self::Pass,
        Self::Withdrawn,
        Self::InProgress,
    ];

    /// Quality points on the 4.0 scale, or `None` for grades with no GPA impact.
    #[must_use]
    pub const fn points(self) -> Option<f64> {
        match self {
            Self::APlus | Self::A => Some(4.0),
            Self::AMinus => Some(3.7),
            Self::BPlus => Some(3.3),
            Self::B => Some(3.0),
            Self::BMinus => Some(2.7),
            Self::CPlus => Some(2.3),
            Self::C => Some(2.0),
            Self::CMinus => Some(1.7),
            Self::DPlus => Some(1.3),
            Self::D => Some(1.0),
            Self::DMinus => Some(0.7),
            Self::F => Some(0.0),
            Self::Pass | Self::Withdrawn | Self::InProgress => None,
        }
    }

    /// Whether the grade carries quality points.
    #[must_use]
    pub const fn is_gpa_affecting(self) -> bool {
        self.points().is_some()
    }

    /// Transcript symbol (e.g., "B+").
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::F => "F",
            Self::Pass => "P",
            Self::Withdrawn => "W",
            Self::InProgress => "IP",
        }
    }

    /// The plain letter this grade collapses to (`A-` becomes `A`).
    /// Non-GPA grades collapse to themselves.
    #[must_use]
    pub const fn letter(self) -> Self {
        match self {
            Self::APlus | Self::A | Self::AMinus => Self::A,
            Self::BPlus | Self::B | Self::BMinus => Self::B,
            Self::CPlus | Self::C | Self::CMinus => Self::C,
            Self::DPlus | Self::D | Self::DMinus => Self::D,
            other => other,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Grade {
    type Err = InvalidGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|grade| grade.symbol() == normalized)
            .ok_or_else(|| InvalidGradeError {
                grade: s.to_string(),
            })
    }
}

/// An unrecognized grade symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGradeError {
    /// The symbol as it appeared in the input
    pub grade: String,
}

impl fmt::Display for InvalidGradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized grade '{}'", self.grade)
    }
}

impl Error for InvalidGradeError {}
