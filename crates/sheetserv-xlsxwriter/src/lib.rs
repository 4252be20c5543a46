//! Write adapter backed by [rust_xlsxwriter].
//!
//! Produces xlsx output only. Rows accumulate in a detached
//! [`rust_xlsxwriter::Worksheet`]; the workbook container is assembled and
//! saved at [`finalize`]. Creating a writer truncates the target, so even a
//! failed write ends with either a valid container or an empty file, never a
//! torn one.
//!
//! [`finalize`]: sheetserv_core::adapter::SheetWriter::finalize
//! [rust_xlsxwriter]: https://docs.rs/rust_xlsxwriter

use std::fs::File;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

use sheetserv_core::adapter::{SheetWriter, WriteAdapter};
use sheetserv_core::{CellValue, Error, Result};

/// Header fill matching the service's standard report styling
const HEADER_FILL: Color = Color::RGB(0x4F81BD);

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Stateless factory for [`XlsxSheetWriter`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriterAdapter;

impl XlsxWriterAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl WriteAdapter for XlsxWriterAdapter {
    type Writer = XlsxSheetWriter;

    fn create(&self, path: &Path, sheet_name: &str) -> Result<XlsxSheetWriter> {
        let path = with_xlsx_extension(path);
        probe_writable(&path)?;

        let mut worksheet = Worksheet::new();
        worksheet
            .set_name(sheet_name)
            .map_err(|err| Error::WriteFailed {
                path: path.clone(),
                rows_written: 0,
                reason: format!("invalid sheet name '{sheet_name}': {err}"),
            })?;

        Ok(XlsxSheetWriter {
            path,
            worksheet,
            next_row: 0,
            data_rows: 0,
            header_format: Format::new()
                .set_bold()
                .set_background_color(HEADER_FILL)
                .set_font_color(Color::White)
                .set_border(FormatBorder::Thin),
            datetime_format: Format::new().set_num_format(DATETIME_FORMAT),
        })
    }
}

/// An in-progress xlsx write
pub struct XlsxSheetWriter {
    path: PathBuf,
    worksheet: Worksheet,
    next_row: u32,
    data_rows: usize,
    header_format: Format,
    datetime_format: Format,
}

impl std::fmt::Debug for XlsxSheetWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxSheetWriter")
            .field("path", &self.path)
            .field("next_row", &self.next_row)
            .field("data_rows", &self.data_rows)
            .finish_non_exhaustive()
    }
}

impl XlsxSheetWriter {
    fn write_error(&self, err: XlsxError) -> Error {
        Error::WriteFailed {
            path: self.path.clone(),
            rows_written: self.data_rows,
            reason: err.to_string(),
        }
    }

    fn write_cell(&mut self, col: u16, value: &CellValue) -> std::result::Result<(), XlsxError> {
        let row = self.next_row;
        match value {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => self.worksheet.write_boolean(row, col, *b).map(|_| ()),
            CellValue::Int(i) => self.worksheet.write_number(row, col, *i as f64).map(|_| ()),
            CellValue::Float(f) => self.worksheet.write_number(row, col, *f).map(|_| ()),
            CellValue::DateTime(dt) => self
                .worksheet
                .write_datetime_with_format(row, col, dt, &self.datetime_format)
                .map(|_| ()),
            CellValue::String(s) => self.worksheet.write_string(row, col, s).map(|_| ()),
        }
    }
}

impl SheetWriter for XlsxSheetWriter {
    fn path(&self) -> &Path {
        &self.path
    }

    fn append_header_row(&mut self, headers: &[String]) -> Result<()> {
        let format = self.header_format.clone();
        for (col, header) in headers.iter().enumerate() {
            let col = column_index(col).map_err(|err| self.write_error(err))?;
            if let Err(err) =
                self.worksheet
                    .write_string_with_format(self.next_row, col, header, &format)
            {
                return Err(self.write_error(err));
            }
        }
        self.next_row += 1;
        Ok(())
    }

    fn append_row(&mut self, row: &[CellValue]) -> Result<()> {
        for (col, value) in row.iter().enumerate() {
            let col = column_index(col).map_err(|err| self.write_error(err))?;
            self.write_cell(col, value)
                .map_err(|err| self.write_error(err))?;
        }
        self.next_row += 1;
        self.data_rows += 1;
        Ok(())
    }

    fn finalize(self) -> Result<u64> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        workbook.save(&self.path).map_err(|err| Error::WriteFailed {
            path: self.path.clone(),
            rows_written: self.data_rows,
            reason: err.to_string(),
        })?;
        let size = std::fs::metadata(&self.path)
            .map_err(|err| Error::WriteFailed {
                path: self.path.clone(),
                rows_written: self.data_rows,
                reason: err.to_string(),
            })?
            .len();
        log::debug!(
            "saved {} ({} data rows, {size} bytes)",
            self.path.display(),
            self.data_rows
        );
        Ok(size)
    }
}

fn column_index(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Append `.xlsx` unless the path already carries it (any case)
fn with_xlsx_extension(path: &Path) -> PathBuf {
    let has_xlsx = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xlsx"));
    if has_xlsx {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".xlsx");
        PathBuf::from(name)
    }
}

/// Confirm the target can be created before any rows are accepted.
///
/// The save happens only at finalize, so without this probe a bad directory
/// would surface as `WriteFailed` after the caller streamed every row.
fn probe_writable(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(Error::PathNotWritable {
            path: path.to_path_buf(),
            reason: "target is a directory".into(),
        });
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(Error::PathNotWritable {
                path: path.to_path_buf(),
                reason: format!("directory {} does not exist", parent.display()),
            });
        }
    }
    File::create(path)
        .map(drop)
        .map_err(|err| Error::PathNotWritable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}
