use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Everything that can abort a report run.
///
/// Source failures (`Read`, `Csv`, `Json`, `Parquet`, `Arrow`,
/// `UnsupportedFormat`, `MalformedRecord`) happen before any rendering.
/// Lookup failures (`MissingColumn`, `NotNumeric`) happen while the figure is
/// built. Output failures (`Render`, `Encode`, `Write`) happen last; none of
/// them leave a file behind.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse JSON {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read parquet {}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("invalid arrow data")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("failed to draw figure: {0}")]
    Render(String),

    #[error("failed to encode PNG")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Wrap any drawing backend error.
    pub(crate) fn render(err: impl std::fmt::Display) -> Self {
        ReportError::Render(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Simulation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SimError {
    #[error("workload has no processes")]
    EmptyWorkload,

    #[error("process {id} has a zero burst time")]
    ZeroBurst { id: u32 },

    #[error("process id {id} appears more than once")]
    DuplicateId { id: u32 },

    #[error("workload does not finish within u32 time units")]
    TimeOverflow,

    #[error("round robin quantum must be positive")]
    ZeroQuantum,

    #[error("failed to read workload {}", .path.display())]
    Workload {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write results to {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
