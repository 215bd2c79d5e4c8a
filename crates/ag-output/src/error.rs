//! Error types for ag-output.
//!
//! Every failure names the stage it happened in (opening the store, writing
//! one day's rows, flushing at the end of the run).  The backend's own error
//! is kept as the `source`.

use std::path::PathBuf;

use thiserror::Error;

use crate::OutputRow;

/// Low-level failure of one storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot open output store `{}`: {source}", path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("writing {rows} row(s) for day {day} failed: {source}")]
    Write {
        day:    u64,
        rows:   usize,
        #[source]
        source: StoreError,
    },

    #[error("flushing output failed: {source}")]
    Finish {
        #[source]
        source: StoreError,
    },

    /// Rows arrived after `finish`; they were not stored.
    #[error("output already finished; {rows} row(s) for day {day} dropped")]
    AfterFinish { day: u64, rows: usize },
}

impl OutputError {
    pub fn open(path: impl Into<PathBuf>, source: impl Into<StoreError>) -> Self {
        OutputError::Open { path: path.into(), source: source.into() }
    }

    /// A failed write of `rows`, tagged with the day of the first row.
    pub fn write(rows: &[OutputRow], source: impl Into<StoreError>) -> Self {
        OutputError::Write { day: first_day(rows), rows: rows.len(), source: source.into() }
    }

    pub fn finish(source: impl Into<StoreError>) -> Self {
        OutputError::Finish { source: source.into() }
    }

    pub fn after_finish(rows: &[OutputRow]) -> Self {
        OutputError::AfterFinish { day: first_day(rows), rows: rows.len() }
    }
}

fn first_day(rows: &[OutputRow]) -> u64 {
    rows.first().map_or(0, |r| r.day)
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
