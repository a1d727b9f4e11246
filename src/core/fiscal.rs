//! Fiscal-year header labels above the data rows

use super::layout::SheetLayout;
use crate::error::SheetResult;
use crate::types::Sheet;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

/// Fiscal year containing `date`, for a fiscal year starting in `start_month`
///
/// With an April start, 2025-03-31 belongs to fiscal 2024 and 2025-04-01 to
/// fiscal 2025.
pub fn fiscal_year(date: NaiveDate, start_month: u32) -> i32 {
    if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Labels for the prior-year header cells, oldest first.
///
/// `count` cells hold `fy - count ..= fy - 1`; the oldest carries a `～`
/// prefix since it stands for "that year and earlier".
pub fn prior_year_labels(fiscal_year: i32, count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| {
            let year = fiscal_year - (count - idx) as i32;
            if idx == 0 {
                format!("～{}", year)
            } else {
                year.to_string()
            }
        })
        .collect()
}

/// Labels for the current-period month header cells.
///
/// Months run consecutively from the fiscal start month, formatted
/// `2025/04 (M0)`; the last label reads `2025/07～ (M3)` because it covers the
/// rest of the period.
pub fn month_labels(fiscal_year: i32, start_month: u32, count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| {
            let month = (start_month - 1 + idx as u32) % 12 + 1;
            let open_ended = if idx + 1 == count { "～" } else { "" };
            format!("{}/{:02}{} (M{})", fiscal_year, month, open_ended, idx)
        })
        .collect()
}

/// Write the fiscal-year and month labels for `today` into the header cells
pub fn write_header_labels(
    sheet: &mut Sheet,
    layout: &SheetLayout,
    today: NaiveDate,
) -> SheetResult<()> {
    let fy = fiscal_year(today, layout.fiscal_year_start_month);

    if layout.month_cells.len() != layout.sales_columns.len() {
        warn!(
            month_cells = layout.month_cells.len(),
            sales_columns = layout.sales_columns.len(),
            "month header cells do not line up with sales columns"
        );
    }

    let years = prior_year_labels(fy, layout.fiscal_year_cells.len());
    for (at, label) in layout.fiscal_year_cells.iter().zip(years) {
        sheet.set_value(*at, label)?;
    }

    let months = month_labels(fy, layout.fiscal_year_start_month, layout.month_cells.len());
    for (at, label) in layout.month_cells.iter().zip(months) {
        sheet.set_value(*at, label)?;
    }

    debug!(fiscal_year = fy, "wrote header labels");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellRef, CellValue};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fiscal_year_boundary() {
        assert_eq!(fiscal_year(date(2025, 3, 31), 4), 2024);
        assert_eq!(fiscal_year(date(2025, 4, 1), 4), 2025);
        assert_eq!(fiscal_year(date(2025, 12, 31), 4), 2025);
        assert_eq!(fiscal_year(date(2026, 1, 1), 1), 2026);
    }

    #[test]
    fn test_prior_year_labels() {
        assert_eq!(prior_year_labels(2025, 3), vec!["～2022", "2023", "2024"]);
        assert!(prior_year_labels(2025, 0).is_empty());
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(
            month_labels(2025, 4, 4),
            vec![
                "2025/04 (M0)",
                "2025/05 (M1)",
                "2025/06 (M2)",
                "2025/07～ (M3)",
            ]
        );
    }

    #[test]
    fn test_month_labels_wrap_december() {
        assert_eq!(month_labels(2025, 11, 3)[2], "2025/01～ (M2)");
    }

    #[test]
    fn test_write_header_labels() {
        let layout = SheetLayout::default();
        let mut sheet = Sheet::new("Data");
        write_header_labels(&mut sheet, &layout, date(2026, 2, 15)).unwrap();

        let d4: CellRef = "D4".parse().unwrap();
        let m4: CellRef = "M4".parse().unwrap();
        assert_eq!(sheet.value(d4), &CellValue::from("～2022"));
        assert_eq!(sheet.value(m4), &CellValue::from("2025/07～ (M3)"));
    }
}
