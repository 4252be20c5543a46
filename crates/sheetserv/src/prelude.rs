//! Prelude module - common imports for sheetserv users
//!
//! ```rust
//! use sheetserv::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellRange,
    CellValue,
    // Error types
    Error,
    FileFormat,
    // Request/response types
    ReadRequest,
    Result,
    // Main types
    Service,
    SheetData,
    SheetInfo,
    WorkbookInfo,
    WriteRequest,
    WriteResponse,
};
