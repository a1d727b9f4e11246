//! Writes sales records into the template, one styled row per record

use super::layout::SheetLayout;
use super::style_cloner::clone_row_style;
use crate::error::{SheetError, SheetResult};
use crate::types::{CellRef, Record, Sheet, MAX_ROW};
use std::ops::Range;
use tracing::{debug, info};

/// Outcome of a populate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateSummary {
    /// Row numbers that received a record, in order
    pub rows: Range<u32>,
}

impl PopulateSummary {
    pub fn rows_written(&self) -> usize {
        self.rows.len()
    }
}

/// Round a ratio to one decimal place in percent space, returned as a fraction.
///
/// `sale / prev_year_sales * 100` is rounded to one decimal first, then
/// divided by 100: 100 / 95 gives 105.263..% → 105.3 → 1.053.
///
/// Returns `None` when the result would not be a finite number
/// (zero or non-finite divisor).
pub fn derived_percent(sale: f64, prev_year_sales: f64) -> Option<f64> {
    if prev_year_sales == 0.0 || !prev_year_sales.is_finite() || !sale.is_finite() {
        return None;
    }
    let percent = (sale / prev_year_sales * 100.0 * 10.0).round() / 10.0;
    let fraction = percent / 100.0;
    fraction.is_finite().then_some(fraction)
}

/// Reset every value in a row to empty, keeping its formatting
pub fn clear_row_values(sheet: &mut Sheet, row: u32) -> SheetResult<()> {
    sheet.existing_row_mut(row)?.clear_values();
    Ok(())
}

/// A record checked against the layout, with its percentages computed
struct PreparedRecord<'r> {
    record: &'r Record,
    /// `(sale, percent)` per sales column
    sales: Vec<(f64, f64)>,
}

/// Fills the template row and the rows below it from a record sequence
pub struct RowPopulator<'a> {
    layout: &'a SheetLayout,
}

impl<'a> RowPopulator<'a> {
    pub fn new(layout: &'a SheetLayout) -> Self {
        Self { layout }
    }

    /// Check one record without touching any sheet
    pub fn validate_record(&self, record: &Record) -> SheetResult<()> {
        self.prepare(record).map(|_| ())
    }

    fn prepare<'r>(&self, record: &'r Record) -> SheetResult<PreparedRecord<'r>> {
        let invalid = |reason: String| SheetError::InvalidRecord {
            id: record.id,
            reason,
        };

        let expected = self.layout.sales_columns.len();
        if record.sales.len() != expected {
            return Err(invalid(format!(
                "expected {} sales figures, got {}",
                expected,
                record.sales.len()
            )));
        }

        let figures = [
            ("price", record.price),
            ("three_years_ago_sales", record.three_years_ago_sales),
            ("prev_prev_year_sales", record.prev_prev_year_sales),
            ("prev_year_sales", record.prev_year_sales),
        ];
        for (field, value) in figures {
            if !value.is_finite() {
                return Err(invalid(format!("{} is not a finite number", field)));
            }
        }

        if record.prev_year_sales == 0.0 {
            return Err(invalid(
                "prev_year_sales is zero, percentages are undefined".to_string(),
            ));
        }

        let sales = record
            .sales
            .iter()
            .enumerate()
            .map(|(idx, &sale)| {
                derived_percent(sale, record.prev_year_sales)
                    .map(|percent| (sale, percent))
                    .ok_or_else(|| {
                        invalid(format!("sales[{}] does not give a finite percentage", idx))
                    })
            })
            .collect::<SheetResult<Vec<_>>>()?;

        Ok(PreparedRecord { record, sales })
    }

    /// Write `records` into `sheet` starting at the template row `start_row`.
    ///
    /// Record `i` lands on row `start_row + i`. The template row's values are
    /// cleared first and it receives the first record; each later row gets a
    /// copy of the template row's formatting before its values are written.
    ///
    /// Every record is validated before the sheet is modified, so a failed run
    /// leaves the sheet exactly as it was.
    ///
    /// # Errors
    /// * `Layout` - the layout's columns collide or run off the sheet
    /// * `MissingRow` - `start_row` has no template row
    /// * `InvalidRecord` - a record has the wrong number of sales figures,
    ///   a non-finite figure, or zero previous-year sales
    /// * `InvalidRow` - the records would run past the last sheet row
    pub fn populate(
        &self,
        sheet: &mut Sheet,
        records: &[Record],
        start_row: u32,
    ) -> SheetResult<PopulateSummary> {
        self.layout.validate()?;
        sheet.existing_row(start_row)?;

        let count = u32::try_from(records.len()).map_err(|_| SheetError::InvalidRow(MAX_ROW))?;
        let end_row = start_row
            .checked_add(count)
            .filter(|end| *end - 1 <= MAX_ROW)
            .ok_or(SheetError::InvalidRow(start_row.saturating_add(count)))?;

        let prepared = records
            .iter()
            .map(|record| self.prepare(record))
            .collect::<SheetResult<Vec<_>>>()?;

        clear_row_values(sheet, start_row)?;

        for (row, item) in (start_row..end_row).zip(&prepared) {
            if row != start_row {
                clone_row_style(sheet, start_row, row)?;
            }
            self.write_record(sheet, row, item)?;
            debug!(row, id = item.record.id, "wrote record");
        }

        info!(
            sheet = sheet.name(),
            start_row,
            records = records.len(),
            "populated data rows"
        );

        Ok(PopulateSummary {
            rows: start_row..end_row,
        })
    }

    fn write_record(&self, sheet: &mut Sheet, row: u32, item: &PreparedRecord) -> SheetResult<()> {
        let layout = self.layout;
        let record = item.record;
        let at = |col: u16| CellRef::new(row, col);

        sheet.set_value(at(layout.id_column), record.id)?;
        sheet.set_value(at(layout.name_column), record.name.as_str())?;
        sheet.set_value(at(layout.price_column), record.price)?;
        sheet.set_value(at(layout.three_years_ago_column), record.three_years_ago_sales)?;
        sheet.set_value(at(layout.prev_prev_year_column), record.prev_prev_year_sales)?;
        sheet.set_value(at(layout.prev_year_column), record.prev_year_sales)?;

        for ((sales_col, percent_col), &(sale, percent)) in
            layout.sales_and_percent_columns().zip(&item.sales)
        {
            sheet.set_value(at(sales_col), sale)?;
            sheet.set_value(at(percent_col), percent)?;
        }

        Ok(())
    }
}
