//! Row style duplication
//!
//! Copies every visual attribute of a source row onto a target row: the style
//! bundle of each cell (number format, fill, alignment), its font, border and
//! protection flags, and the row height. Values are never copied.

use crate::error::SheetResult;
use crate::types::{check_row, Border, CellStyle, Font, Protection, Sheet};
use tracing::debug;

/// Owned copy of one source cell's formatting
#[derive(Debug)]
struct CellFormat {
    col: u16,
    style: CellStyle,
    font: Option<Font>,
    border: Option<Border>,
    protection: Option<Protection>,
}

/// Owned copy of a source row's formatting, detached from the sheet
#[derive(Debug)]
struct RowFormat {
    height: Option<f64>,
    cells: Vec<CellFormat>,
}

impl RowFormat {
    fn capture(sheet: &Sheet, row: u32) -> SheetResult<Self> {
        let source = sheet.existing_row(row)?;

        // Gaps in the span read as default-styled empty cells.
        let cells = source
            .column_span()
            .into_iter()
            .flatten()
            .map(|col| match source.cell(col) {
                Some(cell) => CellFormat {
                    col,
                    style: cell.style.clone(),
                    font: cell.font.clone(),
                    border: cell.border.clone(),
                    protection: cell.protection.map(|p| Protection {
                        locked: p.locked,
                        hidden: p.hidden,
                    }),
                },
                None => CellFormat {
                    col,
                    style: CellStyle::default(),
                    font: None,
                    border: None,
                    protection: None,
                },
            })
            .collect();

        Ok(Self {
            height: source.height(),
            cells,
        })
    }
}

/// Copy the formatting of `source_row` onto `target_row` in the same sheet.
///
/// The target row is created if it does not exist. Every column in the
/// source span ends up with exactly the source's style, font, border and
/// protection; a sub-object missing on the source is cleared on the target.
/// The target's own value is left alone. The row height is copied only when
/// the source has an explicit one.
///
/// # Errors
/// * `MissingRow` - the source row does not exist
/// * `InvalidRow` - either row number is off the sheet
pub fn clone_row_style(sheet: &mut Sheet, source_row: u32, target_row: u32) -> SheetResult<()> {
    check_row(target_row)?;
    let format = RowFormat::capture(sheet, source_row)?;

    let target = sheet.row_or_insert(target_row)?;
    for cell_format in format.cells {
        let cell = target.cell_mut(cell_format.col)?;
        cell.style = cell_format.style;
        cell.font = cell_format.font;
        cell.border = cell_format.border;
        cell.protection = cell_format.protection;
    }

    if let Some(height) = format.height {
        target.set_height(Some(height));
    }

    debug!(
        sheet = sheet.name(),
        source_row, target_row, "cloned row style"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;
    use crate::types::{BorderEdge, BorderStyle, CellRef, CellValue, Fill};

    fn styled_sheet() -> Sheet {
        let mut sheet = Sheet::new("Data");
        let cell = sheet.cell_mut(CellRef::new(6, 0)).unwrap();
        cell.style.fill = Some(Fill {
            color: "#FFF2CC".to_string(),
        });
        cell.font = Some(Font {
            bold: true,
            ..Default::default()
        });
        sheet
    }

    #[test]
    fn test_missing_source_row() {
        let mut sheet = Sheet::new("Data");
        let result = clone_row_style(&mut sheet, 6, 7);
        assert!(matches!(result, Err(SheetError::MissingRow { row: 6, .. })));
        assert!(sheet.row(7).is_none(), "target must not be created on failure");
    }

    #[test]
    fn test_target_row_off_sheet() {
        let mut sheet = styled_sheet();
        assert!(matches!(
            clone_row_style(&mut sheet, 6, 0),
            Err(SheetError::InvalidRow(0))
        ));
    }

    #[test]
    fn test_values_are_not_copied() {
        let mut sheet = styled_sheet();
        sheet.set_value(CellRef::new(6, 0), "keep me here").unwrap();
        sheet.set_value(CellRef::new(7, 0), 42.0).unwrap();

        clone_row_style(&mut sheet, 6, 7).unwrap();

        assert_eq!(sheet.value(CellRef::new(7, 0)), &CellValue::Number(42.0));
        assert_eq!(
            sheet.cell(CellRef::new(7, 0)).unwrap().font,
            sheet.cell(CellRef::new(6, 0)).unwrap().font
        );
    }

    #[test]
    fn test_absent_sub_objects_clear_stale_target_formatting() {
        let mut sheet = styled_sheet();
        // B6 is a gap in the source span; C6 is stored but has no sub-objects
        sheet.cell_mut(CellRef::new(6, 2)).unwrap().style.num_format = Some("0".to_string());

        for col in 0..=2 {
            let stale = sheet.cell_mut(CellRef::new(7, col)).unwrap();
            stale.border = Some(Border {
                bottom: Some(BorderEdge {
                    style: BorderStyle::Thick,
                    color: None,
                }),
                ..Default::default()
            });
            stale.font = Some(Font {
                italic: true,
                ..Default::default()
            });
            stale.protection = Some(Protection {
                locked: false,
                hidden: true,
            });
        }

        clone_row_style(&mut sheet, 6, 7).unwrap();

        for col in 0..=2 {
            let target = sheet.cell(CellRef::new(7, col)).unwrap();
            let source = sheet.cell(CellRef::new(6, col)).cloned().unwrap_or_default();
            assert_eq!(target.style, source.style, "style of column {}", col);
            assert_eq!(target.font, source.font, "font of column {}", col);
            assert_eq!(target.border, source.border, "border of column {}", col);
            assert_eq!(target.protection, source.protection, "protection of column {}", col);
        }
        assert!(sheet.cell(CellRef::new(7, 2)).unwrap().border.is_none());
    }

    #[test]
    fn test_clone_onto_itself_is_noop() {
        let mut sheet = styled_sheet();
        let before = sheet.clone();
        clone_row_style(&mut sheet, 6, 6).unwrap();
        assert_eq!(sheet, before);
    }
}
