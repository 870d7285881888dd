//! Course record sources
//!
//! The engine only ever sees a `Vec<CourseRecord>`. Where those records come
//! from (exported transcript files or the built-in demo transcript) is decided
//! here, by explicit configuration, before aggregation starts.

pub mod demo;
pub mod file;

pub use demo::DemoStore;
pub use file::{load_course_file, load_points_file, FileStore};

use crate::core::models::CourseRecord;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Failures while loading course records or points series
#[derive(Debug)]
pub enum StoreError {
    /// The file could not be read
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// The file is not valid CSV for the expected columns
    Csv {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: csv::Error,
    },
    /// The file is not valid JSON for the expected shape
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// A row parsed but carries an unusable value
    InvalidRow {
        /// File involved
        path: PathBuf,
        /// 1-based data row
        row: usize,
        /// What was wrong
        message: String,
    },
    /// The extension is neither `.csv` nor `.json`
    UnsupportedFormat {
        /// File involved
        path: PathBuf,
    },
    /// No export exists for the user
    NotFound {
        /// Requested user
        user_id: String,
        /// Directory searched
        data_dir: PathBuf,
    },
    /// The user id cannot name a file in the data directory
    InvalidUserId {
        /// Rejected id
        user_id: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Csv { path, source } => write!(f, "{}: invalid CSV: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "{}: invalid JSON: {source}", path.display())
            }
            Self::InvalidRow { path, row, message } => {
                write!(f, "{}: row {row}: {message}", path.display())
            }
            Self::UnsupportedFormat { path } => write!(
                f,
                "{}: unsupported file type (expected .csv or .json)",
                path.display()
            ),
            Self::NotFound { user_id, data_dir } => write!(
                f,
                "no course export for user '{user_id}' in {}",
                data_dir.display()
            ),
            Self::InvalidUserId { user_id } => write!(f, "invalid user id '{user_id}'"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A source of course records for a user
pub trait CourseStore {
    /// Fetch every course record for `user_id`
    ///
    /// # Errors
    /// Returns `StoreError` when the records cannot be located or parsed
    fn fetch_courses(&self, user_id: &str) -> Result<Vec<CourseRecord>, StoreError>;

    /// Short description for logs (e.g., "demo transcript")
    fn describe(&self) -> String;
}

/// Pick the record source from configuration
#[must_use]
pub fn open_store(demo: bool, data_dir: &Path) -> Box<dyn CourseStore> {
    if demo {
        Box::new(DemoStore)
    } else {
        Box::new(FileStore::new(data_dir))
    }
}
