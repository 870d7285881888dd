//! Course exports on disk (CSV or JSON)

use super::{CourseStore, StoreError};
use crate::core::models::{CourseRecord, CourseStatus, Grade, Semester};
use crate::core::trend::PointsTrendPoint;
use crate::{debug, verbose};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `<data_dir>/<user_id>.csv` or `<data_dir>/<user_id>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `data_dir`
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory the store reads from
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl CourseStore for FileStore {
    fn fetch_courses(&self, user_id: &str) -> Result<Vec<CourseRecord>, StoreError> {
        let id = user_id.trim();
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(StoreError::InvalidUserId {
                user_id: user_id.to_string(),
            });
        }

        for ext in ["csv", "json"] {
            let path = self.data_dir.join(format!("{id}.{ext}"));
            if path.is_file() {
                return load_course_file(&path);
            }
        }

        Err(StoreError::NotFound {
            user_id: id.to_string(),
            data_dir: self.data_dir.clone(),
        })
    }

    fn describe(&self) -> String {
        format!("course exports in {}", self.data_dir.display())
    }
}

/// One course row as it appears in an export, before validation
#[derive(Debug, Deserialize)]
struct RawCourseRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "courseCode")]
    course_code: String,
    #[serde(default, alias = "courseName")]
    course_name: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(alias = "creditHours", alias = "credits")]
    credit_hours: f64,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default, alias = "gradePoints")]
    grade_points: Option<f64>,
    semester: String,
    year: i32,
    #[serde(default)]
    status: Option<String>,
}

/// JSON exports are either a bare array or `{ "courses": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCourses {
    List(Vec<RawCourseRow>),
    Wrapped { courses: Vec<RawCourseRow> },
}

/// JSON points series: a bare array or `{ "points": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPoints {
    List(Vec<PointsTrendPoint>),
    Wrapped { points: Vec<PointsTrendPoint> },
}

impl RawCourseRow {
    fn into_record(self, fallback_id: String) -> Result<CourseRecord, String> {
        if !self.credit_hours.is_finite() || self.credit_hours < 0.0 {
            return Err(format!("invalid credit hours {}", self.credit_hours));
        }
        let semester: Semester = self.semester.parse().map_err(|e| format!("{e}"))?;

        let grade = self
            .grade
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        let status = match self.status.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => parse_status(s)?,
            _ => infer_status(grade.as_deref()),
        };

        let mut record = CourseRecord::new(
            self.id.filter(|id| !id.trim().is_empty()).unwrap_or(fallback_id),
            self.course_code.trim(),
            self.credit_hours,
            semester,
            self.year,
        )
        .with_name(self.course_name.unwrap_or_default().trim())
        .with_department(self.department.unwrap_or_default().trim());

        if status == CourseStatus::InProgress {
            return Ok(record.in_progress());
        }
        record.grade = grade;
        record.grade_points = self.grade_points;
        Ok(record)
    }
}

fn parse_status(raw: &str) -> Result<CourseStatus, String> {
    match raw.to_ascii_lowercase().replace([' ', '-', '_'], "").as_str() {
        "completed" | "complete" | "done" => Ok(CourseStatus::Completed),
        "inprogress" | "current" | "enrolled" => Ok(CourseStatus::InProgress),
        _ => Err(format!("unknown status '{raw}'")),
    }
}

/// No grade, or an `IP` grade, means the course is still running
fn infer_status(grade: Option<&str>) -> CourseStatus {
    match grade.map(str::parse::<Grade>) {
        None | Some(Ok(Grade::InProgress)) => CourseStatus::InProgress,
        Some(_) => CourseStatus::Completed,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "row".to_string(), |s| s.to_string_lossy().into_owned())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    reader
        .deserialize::<T>()
        .map(|row| {
            row.map_err(|source| StoreError::Csv {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load course records from a `.csv` or `.json` export.
///
/// Records without an id get `<file stem>-<row>`. When the status column is
/// absent or blank, a missing grade or an `IP` grade marks the course as in
/// progress.
///
/// # Errors
/// Returns `StoreError` for unreadable files, malformed rows, unknown
/// semesters or statuses, negative credits, and unsupported extensions
pub fn load_course_file(path: &Path) -> Result<Vec<CourseRecord>, StoreError> {
    let rows = match extension(path).as_deref() {
        Some("csv") => read_csv::<RawCourseRow>(path)?,
        Some("json") => match read_json::<JsonCourses>(path)? {
            JsonCourses::List(rows) | JsonCourses::Wrapped { courses: rows } => rows,
        },
        _ => {
            return Err(StoreError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let stem = file_stem(path);
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let number = index + 1;
            verbose!("{}: row {number}: {}", path.display(), row.course_code);
            row.into_record(format!("{stem}-{number}"))
                .map_err(|message| StoreError::InvalidRow {
                    path: path.to_path_buf(),
                    row: number,
                    message,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Loaded {} course records from {}", records.len(), path.display());
    Ok(records)
}

/// Load a points series from a `.csv` or `.json` file.
///
/// CSV columns: `period,total_points,attempted_credits,earned_credits`.
///
/// # Errors
/// Returns `StoreError` for unreadable or malformed files and unsupported
/// extensions
pub fn load_points_file(path: &Path) -> Result<Vec<PointsTrendPoint>, StoreError> {
    let points = match extension(path).as_deref() {
        Some("csv") => read_csv::<PointsTrendPoint>(path)?,
        Some("json") => match read_json::<JsonPoints>(path)? {
            JsonPoints::List(points) | JsonPoints::Wrapped { points } => points,
        },
        _ => {
            return Err(StoreError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    debug!("Loaded {} points rows from {}", points.len(), path.display());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(grade: Option<&str>, status: Option<&str>) -> RawCourseRow {
        RawCourseRow {
            id: None,
            course_code: "CS 1800".into(),
            course_name: Some("Discrete Structures".into()),
            department: None,
            credit_hours: 4.0,
            grade: grade.map(Into::into),
            grade_points: None,
            semester: "Fall".into(),
            year: 2023,
            status: status.map(Into::into),
        }
    }

    #[test]
    fn test_status_inferred_from_grade() {
        let graded = row(Some("B+"), None).into_record("x-1".into()).unwrap();
        assert_eq!(graded.status, CourseStatus::Completed);
        assert_eq!(graded.id, "x-1");

        let ip = row(Some("ip"), None).into_record("x-2".into()).unwrap();
        assert_eq!(ip.status, CourseStatus::InProgress);
        assert_eq!(ip.grade, None);

        let blank = row(Some("  "), None).into_record("x-3".into()).unwrap();
        assert_eq!(blank.status, CourseStatus::InProgress);
    }

    #[test]
    fn test_explicit_status_wins() {
        let done = row(None, Some("completed")).into_record("x".into()).unwrap();
        assert_eq!(done.status, CourseStatus::Completed);

        let running = row(Some("A"), Some("In Progress")).into_record("x".into()).unwrap();
        assert_eq!(running.status, CourseStatus::InProgress);
        assert_eq!(running.grade, None);

        assert!(row(None, Some("paused")).into_record("x".into()).is_err());
    }

    #[test]
    fn test_rejects_bad_semester_and_credits() {
        let mut bad_sem = row(Some("A"), None);
        bad_sem.semester = "Autumnal".into();
        assert!(bad_sem.into_record("x".into()).is_err());

        let mut negative = row(Some("A"), None);
        negative.credit_hours = -1.0;
        assert!(negative.into_record("x".into()).is_err());
    }
}
