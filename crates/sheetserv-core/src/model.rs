//! Request and response models
//!
//! These are the objects transport bindings construct and consume. All of
//! them are per-request transients; nothing here outlives a single service
//! call and nothing is cached across calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::range::CellRange;
use crate::value::CellValue;

/// Default sheet name for writes
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Supported workbook container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Excel 2007+ (XML in ZIP)
    Xlsx,
    /// Excel macro-enabled (XML in ZIP)
    Xlsm,
    /// Excel binary
    Xlsb,
    /// Excel 97-2003 (BIFF in CFB)
    Xls,
    /// OpenDocument spreadsheet
    Ods,
}

impl FileFormat {
    /// Look up a format from a file extension (case-insensitive, no dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(FileFormat::Xlsx),
            "xlsm" => Some(FileFormat::Xlsm),
            "xlsb" => Some(FileFormat::Xlsb),
            "xls" => Some(FileFormat::Xls),
            "ods" => Some(FileFormat::Ods),
            _ => None,
        }
    }

    /// Canonical extension (no dot)
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xlsm => "xlsm",
            FileFormat::Xlsb => "xlsb",
            FileFormat::Xls => "xls",
            FileFormat::Ods => "ods",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A read operation against one sheet of one workbook.
///
/// Constructed by a transport binding, consumed once by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Path to the workbook file
    pub file_path: String,

    /// Sheet to read by name; takes precedence over `sheet_index`
    #[serde(default)]
    pub sheet_name: Option<String>,

    /// Sheet to read by 0-based index; used when `sheet_name` is absent
    #[serde(default)]
    pub sheet_index: Option<usize>,

    /// Raw A1-notation range ("A1:C10"); whole sheet when absent
    #[serde(default)]
    pub cell_range: Option<String>,

    /// Split the first row (of the sheet, or of the range when one is given)
    /// off as headers
    #[serde(default)]
    pub include_headers: bool,

    /// Drop rows whose cells are all empty
    #[serde(default)]
    pub skip_empty_rows: bool,

    /// Hard cap on the number of data rows returned
    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl ReadRequest {
    /// Read the first sheet of `file_path` with default options
    pub fn new<S: Into<String>>(file_path: S) -> Self {
        Self {
            file_path: file_path.into(),
            sheet_name: None,
            sheet_index: None,
            cell_range: None,
            include_headers: false,
            skip_empty_rows: false,
            max_rows: None,
        }
    }

    /// Target a sheet by name
    pub fn sheet<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Target a sheet by 0-based index
    pub fn sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = Some(index);
        self
    }

    /// Restrict the read to an A1-notation range
    pub fn range<S: Into<String>>(mut self, notation: S) -> Self {
        self.cell_range = Some(notation.into());
        self
    }

    /// Treat the first row as headers
    pub fn with_headers(mut self) -> Self {
        self.include_headers = true;
        self
    }

    /// Drop all-empty rows from the output
    pub fn skip_empty_rows(mut self) -> Self {
        self.skip_empty_rows = true;
        self
    }

    /// Cap the number of data rows returned
    pub fn max_rows(mut self, cap: usize) -> Self {
        self.max_rows = Some(cap);
        self
    }
}

/// Data read from a single sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    /// Name of the sheet the data came from
    pub sheet_name: String,

    /// Data rows in sheet order; headers are never duplicated here
    pub rows: Vec<Vec<CellValue>>,

    /// Number of data rows (headers excluded)
    pub row_count: usize,

    /// Width of the widest row (or of the requested range)
    pub column_count: usize,

    /// Header row, when `include_headers` was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,

    /// The resolved range, when one was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_range: Option<CellRange>,
}

/// A write operation producing one workbook with one sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    /// Path where the workbook will be created
    pub file_path: String,

    /// Data rows in output order. Row widths may differ from the header
    /// length; the response reports the widest column count so callers can
    /// detect misalignment.
    pub rows: Vec<Vec<CellValue>>,

    /// Optional header row, written first when present (even with zero data
    /// rows)
    #[serde(default)]
    pub headers: Option<Vec<String>>,

    /// Name of the sheet to create
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

impl WriteRequest {
    /// Write `rows` to a new workbook at `file_path`
    pub fn new<S: Into<String>>(file_path: S, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            file_path: file_path.into(),
            rows,
            headers: None,
            sheet_name: default_sheet_name(),
        }
    }

    /// Prepend a header row
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Name the output sheet
    pub fn sheet<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = name.into();
        self
    }
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Path of the file actually written (the adapter may normalize the
    /// extension)
    pub file_path: String,

    /// Number of data rows written (headers excluded, mirroring the read
    /// path's counting)
    pub rows_written: usize,

    /// Widest row written, headers included
    pub column_count: usize,

    /// Size of the finished file in bytes
    pub file_size_bytes: u64,
}

/// Metadata for a single sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetInfo {
    /// Sheet name
    pub name: String,
    /// 0-based position in the workbook
    pub index: usize,
    /// Number of rows with data
    pub row_count: usize,
    /// Number of columns with data
    pub column_count: usize,
}

/// Workbook metadata snapshot.
///
/// Recomputed on every request; the backing file may change between calls, so
/// nothing here is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookInfo {
    /// Path the snapshot was taken from
    pub file_path: String,

    /// Sheet names in stored order
    pub sheet_names: Vec<String>,

    /// Per-sheet metadata, same order as `sheet_names`
    pub sheets: Vec<SheetInfo>,

    /// File size in bytes
    pub file_size_bytes: u64,

    /// Detected container format
    pub file_format: FileFormat,

    /// Last modification time, when the filesystem reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}
