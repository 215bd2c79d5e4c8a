//! Framework error type.
//!
//! Sub-crates define their own error enums for their own failure modes and
//! wrap `AgError` where a core failure (configuration, I/O) bubbles up.

use thiserror::Error;

/// The top-level error type for `ag-core`.
#[derive(Debug, Error)]
pub enum AgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ag-core`.
pub type AgResult<T> = Result<T, AgError>;
