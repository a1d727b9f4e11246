//! Fixed column layout of the sales template

use crate::error::{SheetError, SheetResult};
use crate::types::{column_index_to_letter, CellRef, MAX_COLUMN};
use std::collections::HashMap;

/// Where each record field lands, and where the header labels go.
///
/// The defaults reproduce the stock template: data from row 6, record fields
/// in `A`–`F`, sales in `G I K M` with percentages in `H J L N`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Row number of the styled template row; record `i` lands on `data_start_row + i`
    pub data_start_row: u32,
    pub id_column: u16,
    pub name_column: u16,
    pub price_column: u16,
    pub three_years_ago_column: u16,
    pub prev_prev_year_column: u16,
    pub prev_year_column: u16,
    /// Current-period sales columns, in record order
    pub sales_columns: Vec<u16>,
    /// Header cells for the three prior fiscal years, oldest first
    pub fiscal_year_cells: Vec<CellRef>,
    /// Header cells for the current-period month labels
    pub month_cells: Vec<CellRef>,
    /// First month (1-12) of the fiscal year
    pub fiscal_year_start_month: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            data_start_row: 6,
            id_column: 0,
            name_column: 1,
            price_column: 2,
            three_years_ago_column: 3,
            prev_prev_year_column: 4,
            prev_year_column: 5,
            sales_columns: vec![6, 8, 10, 12],
            fiscal_year_cells: vec![CellRef::new(4, 3), CellRef::new(4, 4), CellRef::new(4, 5)],
            month_cells: vec![
                CellRef::new(4, 6),
                CellRef::new(4, 8),
                CellRef::new(4, 10),
                CellRef::new(4, 12),
            ],
            fiscal_year_start_month: 4,
        }
    }
}

impl SheetLayout {
    /// The percent column paired with a sales column
    pub fn percent_column(sales_column: u16) -> u16 {
        sales_column.saturating_add(1)
    }

    /// Every `(sales, percent)` column pair, in record order
    pub fn sales_and_percent_columns(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.sales_columns
            .iter()
            .map(|&col| (col, Self::percent_column(col)))
    }

    /// Check that no two fields share a column and every column is addressable
    pub fn validate(&self) -> SheetResult<()> {
        if self.data_start_row == 0 || self.data_start_row > crate::types::MAX_ROW {
            return Err(SheetError::Layout(format!(
                "data_start_row {} is outside the worksheet",
                self.data_start_row
            )));
        }

        if self.sales_columns.is_empty() {
            return Err(SheetError::Layout(
                "at least one sales column is required".to_string(),
            ));
        }

        if !(1..=12).contains(&self.fiscal_year_start_month) {
            return Err(SheetError::Layout(format!(
                "fiscal_year_start_month must be 1-12, got {}",
                self.fiscal_year_start_month
            )));
        }

        let mut owners: HashMap<u16, String> = HashMap::new();
        let mut claim = |col: u16, field: String| -> SheetResult<()> {
            if col > MAX_COLUMN {
                return Err(SheetError::Layout(format!(
                    "{} column index {} is beyond XFD",
                    field, col
                )));
            }
            if let Some(other) = owners.insert(col, field.clone()) {
                return Err(SheetError::Layout(format!(
                    "column {} is used by both {} and {}",
                    column_index_to_letter(col),
                    other,
                    field
                )));
            }
            Ok(())
        };

        claim(self.id_column, "id".to_string())?;
        claim(self.name_column, "name".to_string())?;
        claim(self.price_column, "price".to_string())?;
        claim(self.three_years_ago_column, "three_years_ago_sales".to_string())?;
        claim(self.prev_prev_year_column, "prev_prev_year_sales".to_string())?;
        claim(self.prev_year_column, "prev_year_sales".to_string())?;
        for (idx, (sales, percent)) in self.sales_and_percent_columns().enumerate() {
            claim(sales, format!("sales[{}]", idx))?;
            claim(percent, format!("percent[{}]", idx))?;
        }

        Ok(())
    }
}
