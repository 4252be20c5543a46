//! # sheetserv-core
//!
//! Core of the sheetserv spreadsheet service: the data model, the A1-notation
//! range parser, the transport-agnostic error taxonomy, the adapter contracts
//! for read/write engines, and the [`ExcelService`] that orchestrates them.
//!
//! Transport bindings (HTTP, agent-tool) construct [`ReadRequest`] /
//! [`WriteRequest`] values, call the service, and map the responses and
//! errors into their own wire formats. Concrete engines implement
//! [`adapter::ReadAdapter`] and [`adapter::WriteAdapter`] in their own crates.
//!
//! ## Example
//!
//! ```no_run
//! use sheetserv_core::{ExcelService, ReadRequest};
//! # use sheetserv_core::adapter::{ReadAdapter, WriteAdapter};
//! # fn demo<R: ReadAdapter, W: WriteAdapter>(service: ExcelService<R, W>) -> sheetserv_core::Result<()> {
//! let data = service.read(&ReadRequest::new("report.xlsx").range("A1:C10").with_headers())?;
//! println!("{} rows from {}", data.row_count, data.sheet_name);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod error;
pub mod model;
pub mod range;
pub mod service;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use model::{
    FileFormat, ReadRequest, SheetData, SheetInfo, WorkbookInfo, WriteRequest, WriteResponse,
    DEFAULT_SHEET_NAME,
};
pub use range::CellRange;
pub use service::ExcelService;
pub use value::CellValue;
