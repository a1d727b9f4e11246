//! Excel importer implementation - .xlsx → Sheet (values only)

use crate::error::{SheetError, SheetResult};
use crate::types::{CellRef, CellValue, Sheet};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};

/// Reads cell values back from an .xlsx file.
///
/// calamine exposes values, not formatting, so the returned sheets carry no
/// style information. Used to inspect generated reports.
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Names of all worksheets, in workbook order
    pub fn sheet_names(&self) -> SheetResult<Vec<String>> {
        let workbook = self.open()?;
        Ok(workbook.sheet_names().to_vec())
    }

    /// Import a worksheet by name, or the first worksheet when `name` is `None`
    pub fn import_sheet(&self, name: Option<&str>) -> SheetResult<Sheet> {
        let mut workbook = self.open()?;

        let sheet_name = match name {
            Some(name) => name.to_string(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| SheetError::MissingWorksheet("#1".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| match e {
            calamine::XlsxError::WorksheetNotFound(_) => {
                SheetError::MissingWorksheet(sheet_name.clone())
            }
            other => SheetError::Import(format!("Failed to read '{}': {}", sheet_name, other)),
        })?;

        Self::range_to_sheet(&sheet_name, &range)
    }

    fn open(&self) -> SheetResult<Xlsx<std::io::BufReader<std::fs::File>>> {
        open_workbook(&self.path)
            .map_err(|e| SheetError::Import(format!("Failed to open Excel file: {}", e)))
    }

    fn range_to_sheet(name: &str, range: &Range<Data>) -> SheetResult<Sheet> {
        let mut sheet = Sheet::new(name);
        let Some((start_row, start_col)) = range.start() else {
            return Ok(sheet);
        };

        for (row_offset, col_offset, data) in range.used_cells() {
            let value = match data {
                Data::Int(i) => CellValue::Number(*i as f64),
                Data::Float(f) => CellValue::Number(*f),
                Data::String(s) => CellValue::Text(s.clone()),
                Data::Bool(b) => CellValue::Bool(*b),
                Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
                Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
                Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
                Data::Empty => continue,
            };

            // calamine positions are 0-indexed and relative to the range start
            let row = start_row + row_offset as u32 + 1;
            let col = u16::try_from(start_col as usize + col_offset)
                .map_err(|_| SheetError::Import(format!("column {} out of range", col_offset)))?;
            sheet.set_value(CellRef::new(row, col), value)?;
        }

        Ok(sheet)
    }
}
