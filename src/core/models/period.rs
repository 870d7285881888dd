//! Academic periods (semester + year)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Academic term within a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Semester {
    /// Spring term
    Spring,
    /// Summer term
    Summer,
    /// Fall term
    Fall,
    /// Winter term
    Winter,
}

impl Semester {
    /// Position of the term within a calendar year.
    ///
    /// Spring < Summer < Fall < Winter.
    #[must_use]
    pub const fn rank(self) -> i64 {
        match self {
            Self::Spring => 0,
            Self::Summer => 1,
            Self::Fall => 2,
            Self::Winter => 3,
        }
    }

    /// Display name (e.g., "Fall")
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
        }
    }

    /// Whether this is one of the two regular terms (Spring or Fall).
    #[must_use]
    pub const fn is_regular(self) -> bool {
        matches!(self, Self::Spring | Self::Fall)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Semester {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" | "sp" | "spr" => Ok(Self::Spring),
            "summer" | "su" | "sum" => Ok(Self::Summer),
            "fall" | "fa" | "autumn" => Ok(Self::Fall),
            "winter" | "wi" | "win" => Ok(Self::Winter),
            _ => Err(ParsePeriodError {
                input: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Semester {
    type Error = ParsePeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Semester> for String {
    fn from(semester: Semester) -> Self {
        semester.name().to_string()
    }
}

/// A (semester, year) grouping key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PeriodRepr", into = "PeriodRepr")]
pub struct Period {
    /// Calendar year
    pub year: i32,
    /// Term within the year
    pub semester: Semester,
}

impl Period {
    /// Create a period
    #[must_use]
    pub const fn new(semester: Semester, year: i32) -> Self {
        Self { year, semester }
    }

    /// Chronological ordering key: `year * 10 + semester rank`.
    #[must_use]
    pub const fn sort_key(&self) -> i64 {
        self.year as i64 * 10 + self.semester.rank()
    }

    /// Label in the form "Fall 2023"
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// The period that immediately follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        match self.semester {
            Semester::Spring => Self::new(Semester::Summer, self.year),
            Semester::Summer => Self::new(Semester::Fall, self.year),
            Semester::Fall => Self::new(Semester::Winter, self.year),
            Semester::Winter => Self::new(Semester::Spring, self.year + 1),
        }
    }

    /// The next Spring or Fall period after this one.
    #[must_use]
    pub const fn next_regular(&self) -> Self {
        let mut next = self.next();
        while !next.semester.is_regular() {
            next = next.next();
        }
        next
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.semester, self.year)
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePeriodError {
            input: s.to_string(),
        };
        let mut parts = s.split_whitespace();
        let semester = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        let year = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::new(semester, year))
    }
}

/// Serialized shape of a period: `{ year, semester, label }`.
#[derive(Serialize, Deserialize)]
struct PeriodRepr {
    year: i32,
    semester: Semester,
    #[serde(default)]
    label: String,
}

impl From<Period> for PeriodRepr {
    fn from(period: Period) -> Self {
        Self {
            year: period.year,
            semester: period.semester,
            label: period.label(),
        }
    }
}

impl From<PeriodRepr> for Period {
    fn from(repr: PeriodRepr) -> Self {
        Self::new(repr.semester, repr.year)
    }
}

/// A semester name or period label that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError {
    /// The rejected input
    pub input: String,
}

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized period '{}'", self.input)
    }
}

impl Error for ParsePeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_format() {
        assert_eq!(Period::new(Semester::Fall, 2023).label(), "Fall 2023");
    }

    #[test]
    fn test_chronological_order_within_year() {
        let spring = Period::new(Semester::Spring, 2024);
        let summer = Period::new(Semester::Summer, 2024);
        let fall = Period::new(Semester::Fall, 2024);
        let winter = Period::new(Semester::Winter, 2024);
        assert!(spring < summer && summer < fall && fall < winter);
        assert!(Period::new(Semester::Winter, 2023) < spring);
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(Period::new(Semester::Fall, 2023).sort_key(), 20232);
        assert_eq!(Period::new(Semester::Spring, 2024).sort_key(), 20240);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            "Spring 2024".parse::<Period>(),
            Ok(Period::new(Semester::Spring, 2024))
        );
        assert_eq!(
            "fa 2021".parse::<Period>(),
            Ok(Period::new(Semester::Fall, 2021))
        );
        assert!("Fall".parse::<Period>().is_err());
        assert!("Fall 20x3".parse::<Period>().is_err());
        assert!("Fall 2023 extra".parse::<Period>().is_err());
    }

    #[test]
    fn test_next_wraps_year_after_winter() {
        let fall = Period::new(Semester::Fall, 2023);
        assert_eq!(fall.next(), Period::new(Semester::Winter, 2023));
        assert_eq!(fall.next().next(), Period::new(Semester::Spring, 2024));
    }

    #[test]
    fn test_next_regular_skips_summer_and_winter() {
        let spring = Period::new(Semester::Spring, 2024);
        assert_eq!(spring.next_regular(), Period::new(Semester::Fall, 2024));
        let fall = Period::new(Semester::Fall, 2024);
        assert_eq!(fall.next_regular(), Period::new(Semester::Spring, 2025));
    }

    #[test]
    fn test_serializes_with_label() {
        let json = serde_json::to_value(Period::new(Semester::Fall, 2023)).unwrap();
        assert_eq!(json["label"], "Fall 2023");
        assert_eq!(json["semester"], "Fall");
        assert_eq!(json["year"], 2023);
    }
}
