//! Spreadsheet snapshots of the product catalog.

pub mod workbook;

pub use workbook::{write_catalog, ExportError, HEADERS, SHEET_TITLE};
