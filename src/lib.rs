//! Salesheet - styled template rows for sales reports
//!
//! This library fills a spreadsheet template with product-sales records. The
//! template's data row is fully formatted; every record after the first gets
//! a new row carrying a copy of that formatting (style bundle, font, border,
//! protection, row height), then its values and derived percentages.
//!
//! # Features
//!
//! - Row style cloning with owned, detached copies of every style attribute
//! - Percent-of-previous-year columns rounded to one decimal percent
//! - Fiscal-year and month header labels
//! - YAML templates and records, Excel (.xlsx) export and read-back
//!
//! # Example
//!
//! ```no_run
//! use salesheet::core::RowPopulator;
//! use salesheet::excel::ExcelExporter;
//! use salesheet::parser::parse_template;
//! use salesheet::types::RecordSet;
//! use std::path::Path;
//!
//! let mut template = parse_template(Path::new("template.yaml"))?;
//! let records = RecordSet::sample().records;
//!
//! let layout = template.layout.clone();
//! let sheet = template.workbook.worksheet_mut(0)?;
//! let summary = RowPopulator::new(&layout).populate(sheet, &records, layout.data_start_row)?;
//! println!("Rows: {:?}", summary.rows);
//!
//! ExcelExporter::new(&template.workbook).export(Path::new("report.xlsx"))?;
//! # Ok::<(), salesheet::error::SheetError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{SheetError, SheetResult};
pub use types::{Cell, CellRef, CellValue, Record, Row, Sheet, Workbook};
