//! Excel exporter implementation - Workbook → .xlsx

use crate::error::{SheetError, SheetResult};
use crate::types::{
    Alignment, Border, BorderEdge, BorderStyle, Cell, CellValue, HorizontalAlign, Sheet,
    VerticalAlign, Workbook,
};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline, Worksheet,
};
use std::path::Path;

/// Writes an in-memory workbook, formatting included, to an .xlsx file
pub struct ExcelExporter<'a> {
    workbook: &'a Workbook,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Export the workbook to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> SheetResult<()> {
        let mut xlsx = self.build()?;
        xlsx.save(output_path)
            .map_err(|e| SheetError::Export(format!("Failed to save Excel file: {}", e)))?;
        Ok(())
    }

    /// Export the workbook to an in-memory .xlsx buffer
    pub fn export_to_buffer(&self) -> SheetResult<Vec<u8>> {
        let mut xlsx = self.build()?;
        xlsx.save_to_buffer()
            .map_err(|e| SheetError::Export(format!("Failed to build Excel file: {}", e)))
    }

    fn build(&self) -> SheetResult<rust_xlsxwriter::Workbook> {
        let mut xlsx = rust_xlsxwriter::Workbook::new();
        for sheet in self.workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            worksheet
                .set_name(sheet.name())
                .map_err(|e| SheetError::Export(format!("Failed to set worksheet name: {}", e)))?;
            self.export_sheet(worksheet, sheet)?;
        }
        Ok(xlsx)
    }

    /// Export a single sheet: column widths, row heights, then cells
    fn export_sheet(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> SheetResult<()> {
        for (col, width) in sheet.column_widths() {
            worksheet
                .set_column_width(col, width)
                .map_err(|e| SheetError::Export(format!("Failed to set column width: {}", e)))?;
        }

        for (row_num, row) in sheet.rows() {
            // Worksheet API rows are 0-indexed
            let row_idx = row_num - 1;

            if let Some(height) = row.height() {
                worksheet
                    .set_row_height(row_idx, height)
                    .map_err(|e| SheetError::Export(format!("Failed to set row height: {}", e)))?;
            }

            for (col, cell) in row.cells() {
                self.write_cell(worksheet, row_idx, col, cell)?;
            }
        }

        if sheet.is_protected() {
            worksheet.protect();
        }

        Ok(())
    }

    /// Write a single cell with its format
    fn write_cell(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &Cell,
    ) -> SheetResult<()> {
        let format = build_format(cell)?;
        let written = match &cell.value {
            CellValue::Number(n) => worksheet.write_number_with_format(row, col, *n, &format),
            CellValue::Text(s) => worksheet.write_string_with_format(row, col, s, &format),
            CellValue::Bool(b) => worksheet.write_boolean_with_format(row, col, *b, &format),
            CellValue::Empty if cell.has_formatting() => worksheet.write_blank(row, col, &format),
            CellValue::Empty => return Ok(()),
        };
        written.map_err(|e| {
            SheetError::Export(format!(
                "Failed to write cell {}: {}",
                crate::types::CellRef::new(row + 1, col),
                e
            ))
        })?;
        Ok(())
    }
}

/// Parse `#RRGGBB`, `RRGGBB` or `AARRGGBB` into an RGB color
pub fn parse_color(hex: &str) -> SheetResult<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let rgb = match digits.len() {
        6 => digits,
        8 => &digits[2..],
        _ => return Err(SheetError::Export(format!("Invalid color '{}'", hex))),
    };
    u32::from_str_radix(rgb, 16)
        .map(Color::RGB)
        .map_err(|_| SheetError::Export(format!("Invalid color '{}'", hex)))
}

/// Build the xlsx format for a cell's style bundle, font, border and protection
pub fn build_format(cell: &Cell) -> SheetResult<Format> {
    let mut format = Format::new();

    if let Some(num_format) = &cell.style.num_format {
        format = format.set_num_format(num_format);
    }
    if let Some(fill) = &cell.style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(parse_color(&fill.color)?);
    }
    if let Some(alignment) = &cell.style.alignment {
        format = apply_alignment(format, alignment);
    }

    if let Some(font) = &cell.font {
        if let Some(name) = &font.name {
            format = format.set_font_name(name);
        }
        if let Some(size) = font.size {
            format = format.set_font_size(size);
        }
        if font.bold {
            format = format.set_bold();
        }
        if font.italic {
            format = format.set_italic();
        }
        if font.underline {
            format = format.set_underline(FormatUnderline::Single);
        }
        if let Some(color) = &font.color {
            format = format.set_font_color(parse_color(color)?);
        }
    }

    if let Some(border) = &cell.border {
        format = apply_border(format, border)?;
    }

    if let Some(protection) = cell.protection {
        if !protection.locked {
            format = format.set_unlocked();
        }
        if protection.hidden {
            format = format.set_hidden();
        }
    }

    Ok(format)
}

fn apply_alignment(mut format: Format, alignment: &Alignment) -> Format {
    if let Some(horizontal) = alignment.horizontal {
        format = format.set_align(match horizontal {
            HorizontalAlign::General => FormatAlign::General,
            HorizontalAlign::Left => FormatAlign::Left,
            HorizontalAlign::Center => FormatAlign::Center,
            HorizontalAlign::Right => FormatAlign::Right,
            HorizontalAlign::Fill => FormatAlign::Fill,
            HorizontalAlign::Justify => FormatAlign::Justify,
        });
    }
    if let Some(vertical) = alignment.vertical {
        format = format.set_align(match vertical {
            VerticalAlign::Top => FormatAlign::Top,
            VerticalAlign::Center => FormatAlign::VerticalCenter,
            VerticalAlign::Bottom => FormatAlign::Bottom,
        });
    }
    if alignment.wrap_text {
        format = format.set_text_wrap();
    }
    format
}

fn border_style(style: BorderStyle) -> FormatBorder {
    match style {
        BorderStyle::Hair => FormatBorder::Hair,
        BorderStyle::Thin => FormatBorder::Thin,
        BorderStyle::Medium => FormatBorder::Medium,
        BorderStyle::Thick => FormatBorder::Thick,
        BorderStyle::Dashed => FormatBorder::Dashed,
        BorderStyle::Dotted => FormatBorder::Dotted,
        BorderStyle::Double => FormatBorder::Double,
    }
}

fn apply_border(mut format: Format, border: &Border) -> SheetResult<Format> {
    let edge_color = |edge: &BorderEdge| edge.color.as_deref().map(parse_color).transpose();

    if let Some(edge) = &border.top {
        format = format.set_border_top(border_style(edge.style));
        if let Some(color) = edge_color(edge)? {
            format = format.set_border_top_color(color);
        }
    }
    if let Some(edge) = &border.bottom {
        format = format.set_border_bottom(border_style(edge.style));
        if let Some(color) = edge_color(edge)? {
            format = format.set_border_bottom_color(color);
        }
    }
    if let Some(edge) = &border.left {
        format = format.set_border_left(border_style(edge.style));
        if let Some(color) = edge_color(edge)? {
            format = format.set_border_left_color(color);
        }
    }
    if let Some(edge) = &border.right {
        format = format.set_border_right(border_style(edge.style));
        if let Some(color) = edge_color(edge)? {
            format = format.set_border_right_color(color);
        }
    }

    Ok(format)
}
