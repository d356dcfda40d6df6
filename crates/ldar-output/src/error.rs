//! Error types for ldar-output.

use thiserror::Error;

/// A failed report write.  `ReportObserver` keeps the first one.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write report files: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("cannot write SQLite report: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;
