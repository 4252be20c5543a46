//! Adapter contracts for the read and write engines
//!
//! The service depends only on these traits. Concrete engines live in their
//! own crates and are swappable without touching range or validation logic;
//! tests drive the service with in-memory fakes.

use std::path::Path;

use crate::error::Result;
use crate::model::FileFormat;
use crate::range::CellRange;
use crate::value::CellValue;

/// A lazy, finite, non-restartable sequence of rows.
///
/// Each call to [`WorkbookHandle::stream_rows`] yields a fresh stream. The
/// stream is the one place where memory use stays bounded independent of file
/// size; consumers must not force full materialization before applying row
/// caps.
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<Vec<CellValue>>> + 'a>;

/// Contract for any cell-reading engine.
///
/// `open` fails with `FileNotFound`, `UnsupportedFormat`, or `CorruptFile`;
/// the engine performs real format sniffing, never extension guessing alone.
pub trait ReadAdapter {
    /// An open workbook
    type Workbook: WorkbookHandle;

    /// Open a workbook for reading
    fn open(&self, path: &Path) -> Result<Self::Workbook>;
}

/// An open workbook produced by a [`ReadAdapter`]
pub trait WorkbookHandle {
    /// Sheet names in stored order
    fn sheet_names(&self) -> &[String];

    /// Detected container format
    fn file_format(&self) -> FileFormat;

    /// Extent of the sheet's data as `(row_count, column_count)`, anchored at
    /// A1
    fn dimensions(&mut self, sheet: &str) -> Result<(u32, u32)>;

    /// Stream rows from a sheet, restricted to `range` when given.
    ///
    /// Rows inside a range window are exactly `range.col_count()` wide, with
    /// missing cells as [`CellValue::Empty`]. Callers validate the range
    /// against [`WorkbookHandle::dimensions`] first.
    fn stream_rows(&mut self, sheet: &str, range: Option<CellRange>) -> Result<RowStream<'_>>;
}

/// Contract for any cell-writing engine.
///
/// `create` fails with `PathNotWritable`. The returned writer owns file
/// creation/truncation semantics; the service never reads back a pre-existing
/// file at the target path.
pub trait WriteAdapter {
    /// An open output stream
    type Writer: SheetWriter;

    /// Open an output stream for a new workbook with one named sheet
    fn create(&self, path: &Path, sheet_name: &str) -> Result<Self::Writer>;
}

/// An in-progress workbook write.
///
/// Scoped acquisition: [`SheetWriter::finalize`] must run on every exit path,
/// success or failure, so the output file is a valid container up to the last
/// committed row.
pub trait SheetWriter {
    /// The path the finished file will be written to
    fn path(&self) -> &Path;

    /// Append the header row
    fn append_header_row(&mut self, headers: &[String]) -> Result<()>;

    /// Append one data row; each cell is written in its native representation
    fn append_row(&mut self, row: &[CellValue]) -> Result<()>;

    /// Flush and close the output, returning the finished file size in bytes
    fn finalize(self) -> Result<u64>;
}
