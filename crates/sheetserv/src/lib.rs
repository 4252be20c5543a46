//! # sheetserv
//!
//! A spreadsheet read/write service: open xlsx/xlsm/xlsb/xls/ods workbooks,
//! read rows with A1-notation range selection, and write new xlsx files.
//!
//! This crate wires the default engines (calamine for reads, rust_xlsxwriter
//! for writes) into the core service. Transport bindings and tools depend on
//! this crate and call [`Service`]; applications that need a different engine
//! implement the adapter traits in `sheetserv_core` instead.
//!
//! ## Example
//!
//! ```no_run
//! use sheetserv::prelude::*;
//!
//! # fn main() -> sheetserv::Result<()> {
//! let service = Service::default();
//!
//! let data = service.read(
//!     &ReadRequest::new("report.xlsx")
//!         .sheet("Q3")
//!         .range("A1:D100")
//!         .with_headers(),
//! )?;
//! println!("{} rows, {} columns", data.row_count, data.column_count);
//! # Ok(())
//! # }
//! ```

pub mod prelude;

// Re-export the core model
pub use sheetserv_core::{
    CellRange,
    // Cell types
    CellValue,
    // Error types
    Error,
    ExcelService,
    FileFormat,
    // Request/response types
    ReadRequest,
    Result,
    SheetData,
    SheetInfo,
    WorkbookInfo,
    WriteRequest,
    WriteResponse,
    DEFAULT_SHEET_NAME,
};

// Re-export the default engines
pub use sheetserv_calamine::{CalamineAdapter, CalamineWorkbook};
pub use sheetserv_xlsxwriter::{XlsxSheetWriter, XlsxWriterAdapter};

/// The service over the default engine pair
pub type Service = ExcelService<CalamineAdapter, XlsxWriterAdapter>;
