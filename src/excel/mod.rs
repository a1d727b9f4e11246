//! Excel export/import
//!
//! - Export: in-memory workbook → .xlsx with cell formatting (rust_xlsxwriter)
//! - Import: .xlsx → sheet values, for inspecting generated files (calamine)

mod exporter;
mod importer;

pub use exporter::{build_format, parse_color, ExcelExporter};
pub use importer::ExcelImporter;
