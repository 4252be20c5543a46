//! Read adapter backed by the [calamine] engine.
//!
//! Supports xlsx, xlsm, xlsb, xls, and ods containers through
//! [`calamine::open_workbook_auto`]. One [`CalamineWorkbook`] caches each
//! sheet's cell range after the first access so that a dimension probe
//! followed by a row stream parses the sheet once.
//!
//! [calamine]: https://docs.rs/calamine

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use sheetserv_core::adapter::{ReadAdapter, RowStream, WorkbookHandle};
use sheetserv_core::{CellRange, CellValue, Error, FileFormat, Result};

/// Stateless factory for [`CalamineWorkbook`] handles
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineAdapter;

impl CalamineAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReadAdapter for CalamineAdapter {
    type Workbook = CalamineWorkbook;

    fn open(&self, path: &Path) -> Result<CalamineWorkbook> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let format = path
            .extension()
            .and_then(OsStr::to_str)
            .and_then(FileFormat::from_extension)
            .ok_or_else(|| Error::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "extension is not one of xlsx, xlsm, xlsb, xls, ods".into(),
            })?;
        let sheets = open_workbook_auto(path).map_err(|err| classify_open_error(path, err))?;
        let names = sheets.sheet_names();
        log::debug!(
            "opened {} ({format}, {} sheets)",
            path.display(),
            names.len()
        );
        Ok(CalamineWorkbook {
            path: path.to_path_buf(),
            sheets,
            names,
            format,
            cached: HashMap::new(),
        })
    }
}

/// An open workbook with lazily-parsed, per-sheet cell ranges
pub struct CalamineWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
    names: Vec<String>,
    format: FileFormat,
    cached: HashMap<String, Range<Data>>,
}

impl std::fmt::Debug for CalamineWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalamineWorkbook")
            .field("path", &self.path)
            .field("names", &self.names)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl CalamineWorkbook {
    /// Parse the sheet into the cache if it is not there yet.
    ///
    /// The caller resolves the sheet name against [`Self::sheet_names`]
    /// before calling, so a lookup failure here means the engine could not
    /// parse the sheet, not that it is missing.
    fn ensure_cached(&mut self, sheet: &str) -> Result<()> {
        if !self.cached.contains_key(sheet) {
            let range = self
                .sheets
                .worksheet_range(sheet)
                .map_err(|err| Error::CorruptFile {
                    path: self.path.clone(),
                    reason: err.to_string(),
                })?;
            self.cached.insert(sheet.to_string(), range);
        }
        Ok(())
    }
}

impl WorkbookHandle for CalamineWorkbook {
    fn sheet_names(&self) -> &[String] {
        &self.names
    }

    fn file_format(&self) -> FileFormat {
        self.format
    }

    fn dimensions(&mut self, sheet: &str) -> Result<(u32, u32)> {
        self.ensure_cached(sheet)?;
        let range = &self.cached[sheet];
        // `end` is the absolute coordinate of the last used cell, so the
        // A1-anchored extent is one past it on each axis.
        Ok(range
            .end()
            .map_or((0, 0), |(row, col)| (row + 1, col + 1)))
    }

    fn stream_rows(&mut self, sheet: &str, window: Option<CellRange>) -> Result<RowStream<'_>> {
        self.ensure_cached(sheet)?;
        let range = &self.cached[sheet];
        let (rows, cols) = range
            .end()
            .map_or((0, 0), |(row, col)| (row + 1, col + 1));
        let (row_start, row_end, col_start, col_end) = match window {
            Some(w) => (w.start_row, w.end_row, w.start_col, w.end_col),
            None => {
                if rows == 0 || cols == 0 {
                    return Ok(Box::new(std::iter::empty()));
                }
                (0, rows - 1, 0, cols - 1)
            }
        };
        Ok(Box::new((row_start..=row_end).map(move |row| {
            Ok((col_start..=col_end)
                .map(|col| {
                    // Absolute addressing; cells outside the used area come
                    // back as None and pad with Empty.
                    range
                        .get_value((row, col))
                        .map_or(CellValue::Empty, normalize)
                })
                .collect())
        })))
    }
}

/// Map an engine value to the service's value model.
///
/// Floats with no fractional part collapse to `Int` so that a column of
/// counts reads back as integers even though the container stores every
/// number as a double.
fn normalize(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => normalize_float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            None => normalize_float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

fn normalize_float(f: f64) -> CellValue {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}

/// ODS stores dates as ISO-8601 text rather than serial numbers.
fn parse_iso_datetime(s: &str) -> CellValue {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return CellValue::DateTime(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return CellValue::DateTime(date.and_time(NaiveTime::MIN));
    }
    CellValue::String(s.to_string())
}

fn classify_open_error(path: &Path, err: calamine::Error) -> Error {
    match err {
        calamine::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            Error::FileNotFound(path.to_path_buf())
        }
        // `open_workbook_auto` reports sniffing failures as plain messages.
        calamine::Error::Msg(msg) => Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: msg.to_string(),
        },
        other => Error::CorruptFile {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;

    fn fixture(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("people.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("People").unwrap();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "age").unwrap();
        sheet.write_string(1, 0, "Alice").unwrap();
        sheet.write_number(1, 1, 30.0).unwrap();
        sheet.write_string(2, 0, "Bob").unwrap();
        sheet.write_number(2, 1, 25.5).unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_missing_file() {
        let err = CalamineAdapter::new()
            .open(Path::new("/nonexistent/missing.xlsx"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_open_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();
        let err = CalamineAdapter::new().open(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_open_garbage_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();
        let err = CalamineAdapter::new().open(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptFile { .. }));
    }

    #[test]
    fn test_dimensions_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        let mut wb = CalamineAdapter::new().open(&path).unwrap();
        assert_eq!(wb.sheet_names(), ["People"]);
        assert_eq!(wb.file_format(), FileFormat::Xlsx);
        assert_eq!(wb.dimensions("People").unwrap(), (3, 2));
    }

    #[test]
    fn test_stream_whole_sheet_normalizes_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        let mut wb = CalamineAdapter::new().open(&path).unwrap();
        let rows: Vec<Vec<CellValue>> = wb
            .stream_rows("People", None)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 3);
        // Integral floats read back as Int, true fractions stay Float.
        assert_eq!(rows[1], vec!["Alice".into(), CellValue::Int(30)]);
        assert_eq!(rows[2], vec!["Bob".into(), CellValue::Float(25.5)]);
    }

    #[test]
    fn test_stream_window_pads_outside_used_area() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        let mut wb = CalamineAdapter::new().open(&path).unwrap();
        // B2:C3 reaches one column past the used area.
        let window = CellRange::parse("B2:C3").unwrap();
        let rows: Vec<Vec<CellValue>> = wb
            .stream_rows("People", Some(window))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::Int(30), CellValue::Empty],
                vec![CellValue::Float(25.5), CellValue::Empty],
            ]
        );
    }

    #[test]
    fn test_stream_is_lazy() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir);
        let mut wb = CalamineAdapter::new().open(&path).unwrap();
        let mut stream = wb.stream_rows("People", None).unwrap();
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first[0], CellValue::String("name".into()));
        drop(stream);
    }

    #[test]
    fn test_normalize_float_edge_cases() {
        assert_eq!(normalize_float(0.0), CellValue::Int(0));
        assert_eq!(normalize_float(-3.0), CellValue::Int(-3));
        assert_eq!(normalize_float(2.5), CellValue::Float(2.5));
        assert_eq!(normalize_float(f64::NAN).type_name(), "float");
        assert_eq!(
            normalize_float(f64::INFINITY),
            CellValue::Float(f64::INFINITY)
        );
    }

    #[test]
    fn test_parse_iso_datetime_forms() {
        assert_eq!(
            parse_iso_datetime("2024-03-15T10:30:00"),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap()
            )
        );
        assert_eq!(
            parse_iso_datetime("2024-03-15"),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_time(NaiveTime::MIN)
            )
        );
        assert_eq!(
            parse_iso_datetime("not a date"),
            CellValue::String("not a date".into())
        );
    }
}
