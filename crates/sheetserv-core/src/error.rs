//! Error taxonomy for sheetserv

use std::path::PathBuf;

use thiserror::Error;

use crate::range::CellRange;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the service boundary.
///
/// Every failure mode from the read and write engines is mapped into one of
/// these kinds at the adapter boundary; transport bindings decide how each
/// kind is represented on the wire (status code, tool-error payload).
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed range notation (charset, missing row/column, row 0)
    #[error("invalid range '{notation}': {reason}")]
    InvalidRangeFormat { notation: String, reason: String },

    /// End corner precedes start corner on an axis; ranges are never
    /// auto-normalized
    #[error("invalid range '{notation}': end corner precedes start corner")]
    InvalidRangeOrder { notation: String },

    /// Resolved range exceeds the actual sheet dimensions
    #[error("range {range} exceeds sheet dimensions ({rows} rows x {cols} columns)")]
    RangeOutOfBounds {
        range: CellRange,
        rows: u32,
        cols: u32,
    },

    /// Requested sheet name or index absent from the workbook
    #[error("sheet not found: '{name}' (available: {available:?})")]
    SheetNotFound {
        name: String,
        available: Vec<String>,
    },

    /// Read target does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File extension/content is not one of the supported formats
    #[error("unsupported format for {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// The engine cannot parse the file structure
    #[error("cannot parse {}: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    /// Write target's directory or permissions reject creation
    #[error("path not writable: {}: {reason}", path.display())]
    PathNotWritable { path: PathBuf, reason: String },

    /// Append or finalize failure mid-write; carries the number of data rows
    /// committed before the failure
    #[error("write to {} failed after {rows_written} rows: {reason}", path.display())]
    WriteFailed {
        path: PathBuf,
        rows_written: usize,
        reason: String,
    },
}

impl Error {
    /// Machine-readable code for transport bindings
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidRangeFormat { .. } => "INVALID_RANGE_FORMAT",
            Error::InvalidRangeOrder { .. } => "INVALID_RANGE_ORDER",
            Error::RangeOutOfBounds { .. } => "RANGE_OUT_OF_BOUNDS",
            Error::SheetNotFound { .. } => "SHEET_NOT_FOUND",
            Error::FileNotFound(_) => "FILE_NOT_FOUND",
            Error::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Error::CorruptFile { .. } => "CORRUPT_FILE",
            Error::PathNotWritable { .. } => "PATH_NOT_WRITABLE",
            Error::WriteFailed { .. } => "WRITE_FAILED",
        }
    }
}
