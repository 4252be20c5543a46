//! The Excel service
//!
//! Orchestrates the read and write adapters: resolves sheets, parses and
//! validates ranges, streams rows under the `max_rows` cap, splits headers,
//! and guarantees finalize-on-every-exit-path for writes. Stateless across
//! calls; every operation re-opens the target file.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::adapter::{ReadAdapter, SheetWriter, WorkbookHandle, WriteAdapter};
use crate::error::{Error, Result};
use crate::model::{ReadRequest, SheetData, SheetInfo, WorkbookInfo, WriteRequest, WriteResponse};
use crate::range::CellRange;
use crate::value::CellValue;

/// Transport-agnostic spreadsheet service over a pair of adapters.
///
/// Holds no per-request state; concurrent calls do not interact. Concurrent
/// writers to the same path are not coordinated here.
pub struct ExcelService<R, W> {
    read_adapter: R,
    write_adapter: W,
}

impl<R: ReadAdapter + Default, W: WriteAdapter + Default> Default for ExcelService<R, W> {
    fn default() -> Self {
        Self::new(R::default(), W::default())
    }
}

impl<R: ReadAdapter, W: WriteAdapter> ExcelService<R, W> {
    /// Create a service over the given adapters
    pub fn new(read_adapter: R, write_adapter: W) -> Self {
        Self {
            read_adapter,
            write_adapter,
        }
    }

    /// Read rows from one sheet of a workbook.
    ///
    /// Sheet resolution: an explicit `sheet_name` must exist, else
    /// `SheetNotFound`; otherwise `sheet_index`, otherwise the first sheet.
    /// An explicit range is validated against the sheet dimensions and
    /// rejected with `RangeOutOfBounds` when either corner exceeds them;
    /// out-of-range requests are never silently clamped, which would hide
    /// caller mistakes on large files.
    pub fn read(&self, request: &ReadRequest) -> Result<SheetData> {
        log::debug!(
            "read {} sheet={:?} range={:?} max_rows={:?}",
            request.file_path,
            request.sheet_name,
            request.cell_range,
            request.max_rows
        );

        let path = Path::new(&request.file_path);
        let mut workbook = self.read_adapter.open(path)?;
        let sheet_name = resolve_sheet(
            workbook.sheet_names(),
            request.sheet_name.as_deref(),
            request.sheet_index,
        )?;

        let range = request
            .cell_range
            .as_deref()
            .map(CellRange::parse)
            .transpose()?;
        if let Some(range) = range {
            let (rows, cols) = workbook.dimensions(&sheet_name)?;
            if range.end_row >= rows || range.end_col >= cols {
                return Err(Error::RangeOutOfBounds { range, rows, cols });
            }
        }

        // The cap counts data rows; when a header row will be split off, one
        // extra row is streamed to carry it.
        let cap = request
            .max_rows
            .map(|n| n.saturating_add(usize::from(request.include_headers)));

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        {
            let mut stream = workbook.stream_rows(&sheet_name, range)?;
            while cap.map_or(true, |c| rows.len() < c) {
                let Some(item) = stream.next() else { break };
                let row = item?;
                if request.skip_empty_rows && row.iter().all(CellValue::is_empty) {
                    continue;
                }
                rows.push(row);
            }
        }

        // With an explicit range the first row *of the range* becomes the
        // header row; without one it is the sheet's first row. Either way it
        // is the first streamed row.
        let mut headers = None;
        if request.include_headers && !rows.is_empty() {
            let first = rows.remove(0);
            headers = Some(first.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
        }

        let column_count = match range {
            Some(r) => r.col_count() as usize,
            None => rows
                .iter()
                .map(Vec::len)
                .max()
                .unwrap_or(0)
                .max(headers.as_ref().map_or(0, Vec::len)),
        };

        Ok(SheetData {
            sheet_name,
            row_count: rows.len(),
            column_count,
            rows,
            headers,
            cell_range: range,
        })
    }

    /// Write rows (and an optional header row) to a new workbook.
    ///
    /// The header row, when present, is written first regardless of the data
    /// row count. Finalize runs on every exit path: an append failure still
    /// closes the output so the file is a valid container up to the last
    /// committed row, and the resulting `WriteFailed` carries that count.
    pub fn write(&self, request: &WriteRequest) -> Result<WriteResponse> {
        log::debug!(
            "write {} sheet={} rows={} headers={}",
            request.file_path,
            request.sheet_name,
            request.rows.len(),
            request.headers.is_some()
        );

        let path = Path::new(&request.file_path);
        let mut writer = self.write_adapter.create(path, &request.sheet_name)?;
        let file_path = writer.path().display().to_string();

        if let Some(headers) = &request.headers {
            if let Err(err) = writer.append_header_row(headers) {
                let reason = failure_reason(err);
                let _ = writer.finalize();
                return Err(Error::WriteFailed {
                    path: path.to_path_buf(),
                    rows_written: 0,
                    reason,
                });
            }
        }

        let mut rows_written = 0usize;
        for row in &request.rows {
            if let Err(err) = writer.append_row(row) {
                log::warn!(
                    "append to {file_path} failed after {rows_written} rows, finalizing partial file"
                );
                let reason = failure_reason(err);
                let _ = writer.finalize();
                return Err(Error::WriteFailed {
                    path: path.to_path_buf(),
                    rows_written,
                    reason,
                });
            }
            rows_written += 1;
        }

        let file_size_bytes = match writer.finalize() {
            Ok(size) => size,
            Err(err) => {
                let reason = failure_reason(err);
                return Err(Error::WriteFailed {
                    path: path.to_path_buf(),
                    rows_written,
                    reason,
                });
            }
        };

        let column_count = request
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(request.headers.as_ref().map_or(0, Vec::len));

        Ok(WriteResponse {
            file_path,
            rows_written,
            column_count,
            file_size_bytes,
        })
    }

    /// Snapshot workbook metadata. Recomputed on every call; the backing file
    /// may change between requests.
    pub fn info(&self, file_path: &str) -> Result<WorkbookInfo> {
        let path = Path::new(file_path);
        let mut workbook = self.read_adapter.open(path)?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for (index, name) in sheet_names.iter().enumerate() {
            let (rows, cols) = workbook.dimensions(name)?;
            sheets.push(SheetInfo {
                name: name.clone(),
                index,
                row_count: rows as usize,
                column_count: cols as usize,
            });
        }

        let metadata =
            std::fs::metadata(path).map_err(|_| Error::FileNotFound(path.to_path_buf()))?;

        Ok(WorkbookInfo {
            file_path: file_path.to_string(),
            sheet_names,
            sheets,
            file_size_bytes: metadata.len(),
            file_format: workbook.file_format(),
            modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    /// Sheet names in stored order
    pub fn list_sheets(&self, file_path: &str) -> Result<Vec<String>> {
        let workbook = self.read_adapter.open(Path::new(file_path))?;
        Ok(workbook.sheet_names().to_vec())
    }

    /// Read a single cell by A1 reference
    pub fn cell_value(
        &self,
        file_path: &str,
        cell: &str,
        sheet_name: Option<&str>,
    ) -> Result<CellValue> {
        let mut request = ReadRequest::new(file_path).range(cell);
        if let Some(name) = sheet_name {
            request = request.sheet(name);
        }
        let data = self.read(&request)?;
        Ok(data
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default())
    }
}

/// Pick the target sheet: explicit name, then explicit index, then first.
fn resolve_sheet(
    names: &[String],
    sheet_name: Option<&str>,
    sheet_index: Option<usize>,
) -> Result<String> {
    if let Some(name) = sheet_name {
        if names.iter().any(|n| n == name) {
            return Ok(name.to_string());
        }
        return Err(Error::SheetNotFound {
            name: name.to_string(),
            available: names.to_vec(),
        });
    }

    if let Some(index) = sheet_index {
        return names.get(index).cloned().ok_or_else(|| Error::SheetNotFound {
            name: format!("index {index}"),
            available: names.to_vec(),
        });
    }

    names.first().cloned().ok_or_else(|| Error::SheetNotFound {
        name: "(first sheet)".to_string(),
        available: Vec::new(),
    })
}

/// Unwrap an adapter error's message for re-wrapping with the service-side
/// committed-row count.
fn failure_reason(err: Error) -> String {
    match err {
        Error::WriteFailed { reason, .. } => reason,
        other => other.to_string(),
    }
}
