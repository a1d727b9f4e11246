use crate::core::SheetLayout;
use crate::error::{SheetError, SheetResult};
use crate::types::{
    check_row, column_letter_to_index, Border, Cell, CellRef, CellStyle, CellValue, Font,
    Protection, Record, RecordSet, Sheet, Workbook,
};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed template: the styled workbook plus the column layout it uses
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub workbook: Workbook,
    pub layout: SheetLayout,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    #[serde(default)]
    layout: Option<LayoutDef>,
    sheets: Vec<SheetDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutDef {
    data_start_row: Option<u32>,
    id_column: Option<String>,
    name_column: Option<String>,
    price_column: Option<String>,
    three_years_ago_column: Option<String>,
    prev_prev_year_column: Option<String>,
    prev_year_column: Option<String>,
    sales_columns: Option<Vec<String>>,
    fiscal_year_cells: Option<Vec<String>>,
    month_cells: Option<Vec<String>>,
    fiscal_year_start_month: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetDef {
    name: String,
    #[serde(default)]
    protected: bool,
    #[serde(default)]
    column_widths: BTreeMap<String, f64>,
    #[serde(default)]
    rows: BTreeMap<u32, RowDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RowDef {
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    cells: BTreeMap<String, CellDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CellDef {
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    style: CellStyle,
    #[serde(default)]
    font: Option<Font>,
    #[serde(default)]
    border: Option<Border>,
    #[serde(default)]
    protection: Option<Protection>,
}

/// Parse a template YAML file into a styled workbook and its layout.
///
/// # Example
/// ```no_run
/// use salesheet::parser::parse_template;
/// use std::path::Path;
///
/// let template = parse_template(Path::new("template.yaml"))?;
/// println!("Sheets: {}", template.workbook.sheets().len());
/// println!("Data starts at row {}", template.layout.data_start_row);
/// # Ok::<(), salesheet::error::SheetError>(())
/// ```
pub fn parse_template(path: &Path) -> SheetResult<Template> {
    let content = std::fs::read_to_string(path)?;
    parse_template_str(&content)
}

/// Parse template YAML from a string
pub fn parse_template_str(content: &str) -> SheetResult<Template> {
    let file: TemplateFile = serde_yaml::from_str(content)?;

    let layout = build_layout(file.layout.unwrap_or_default())?;
    layout.validate()?;

    let mut workbook = Workbook::new();
    for sheet_def in file.sheets {
        workbook.add_sheet(build_sheet(sheet_def)?);
    }

    Ok(Template { workbook, layout })
}

/// Parse a records YAML file (`records: [...]`)
pub fn parse_records(path: &Path) -> SheetResult<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    let set: RecordSet = serde_yaml::from_str(&content)?;
    Ok(set.records)
}

fn column(letters: &str, field: &str) -> SheetResult<u16> {
    column_letter_to_index(letters)
        .map_err(|e| SheetError::Parse(format!("layout.{}: {}", field, e)))
}

fn cell_refs(refs: Vec<String>, field: &str) -> SheetResult<Vec<CellRef>> {
    refs.iter()
        .map(|s| {
            s.parse::<CellRef>()
                .map_err(|e| SheetError::Parse(format!("layout.{}: {}", field, e)))
        })
        .collect()
}

fn build_layout(def: LayoutDef) -> SheetResult<SheetLayout> {
    let mut layout = SheetLayout::default();

    if let Some(row) = def.data_start_row {
        layout.data_start_row = row;
    }
    if let Some(col) = def.id_column {
        layout.id_column = column(&col, "id_column")?;
    }
    if let Some(col) = def.name_column {
        layout.name_column = column(&col, "name_column")?;
    }
    if let Some(col) = def.price_column {
        layout.price_column = column(&col, "price_column")?;
    }
    if let Some(col) = def.three_years_ago_column {
        layout.three_years_ago_column = column(&col, "three_years_ago_column")?;
    }
    if let Some(col) = def.prev_prev_year_column {
        layout.prev_prev_year_column = column(&col, "prev_prev_year_column")?;
    }
    if let Some(col) = def.prev_year_column {
        layout.prev_year_column = column(&col, "prev_year_column")?;
    }
    if let Some(cols) = def.sales_columns {
        layout.sales_columns = cols
            .iter()
            .map(|c| column(c, "sales_columns"))
            .collect::<SheetResult<_>>()?;
    }
    if let Some(refs) = def.fiscal_year_cells {
        layout.fiscal_year_cells = cell_refs(refs, "fiscal_year_cells")?;
    }
    if let Some(refs) = def.month_cells {
        layout.month_cells = cell_refs(refs, "month_cells")?;
    }
    if let Some(month) = def.fiscal_year_start_month {
        layout.fiscal_year_start_month = month;
    }

    Ok(layout)
}

fn build_sheet(def: SheetDef) -> SheetResult<Sheet> {
    let mut sheet = Sheet::new(def.name);
    sheet.set_protected(def.protected);

    for (letters, width) in def.column_widths {
        let col = column_letter_to_index(&letters).map_err(|e| {
            SheetError::Parse(format!("sheet '{}' column_widths: {}", sheet.name(), e))
        })?;
        if !width.is_finite() || width < 0.0 {
            return Err(SheetError::Parse(format!(
                "sheet '{}': column {} has invalid width {}",
                sheet.name(),
                letters,
                width
            )));
        }
        sheet.set_column_width(col, width);
    }

    for (row_num, row_def) in def.rows {
        check_row(row_num)?;
        if let Some(height) = row_def.height {
            if !height.is_finite() || height <= 0.0 {
                return Err(SheetError::Parse(format!(
                    "sheet '{}': row {} has invalid height {}",
                    sheet.name(),
                    row_num,
                    height
                )));
            }
        }

        let sheet_name = sheet.name().to_string();
        let row = sheet.row_or_insert(row_num)?;
        row.set_height(row_def.height);

        for (letters, cell_def) in row_def.cells {
            let col = column_letter_to_index(&letters).map_err(|e| {
                SheetError::Parse(format!("sheet '{}' row {}: {}", sheet_name, row_num, e))
            })?;
            let value = match cell_def.value {
                Some(v) => yaml_to_cell_value(&v).map_err(|reason| {
                    SheetError::Parse(format!(
                        "sheet '{}' cell {}{}: {}",
                        sheet_name, letters, row_num, reason
                    ))
                })?,
                None => CellValue::Empty,
            };

            *row.cell_mut(col)? = Cell {
                value,
                style: cell_def.style,
                font: cell_def.font,
                border: cell_def.border,
                protection: cell_def.protection,
            };
        }
    }

    Ok(sheet)
}

fn yaml_to_cell_value(value: &Value) -> Result<CellValue, String> {
    match value {
        Value::Null => Ok(CellValue::Empty),
        Value::Bool(b) => Ok(CellValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .ok_or_else(|| format!("number {} is out of range", n)),
        Value::String(s) => Ok(CellValue::Text(s.clone())),
        other => Err(format!("unsupported cell value {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BorderStyle, HorizontalAlign};

    const TEMPLATE: &str = r##"
layout:
  data_start_row: 8
  sales_columns: [G, I]
sheets:
  - name: Sales
    protected: true
    column_widths:
      B: 18.5
    rows:
      8:
        height: 20.5
        cells:
          A:
            value: placeholder
            style:
              num_format: "0"
              alignment: { horizontal: center }
            border:
              bottom: { style: thin, color: "#000000" }
            protection: { locked: false }
          H:
            style:
              num_format: "0.0%"
"##;

    #[test]
    fn test_parse_template_str() {
        let template = parse_template_str(TEMPLATE).unwrap();
        assert_eq!(template.layout.data_start_row, 8);
        assert_eq!(template.layout.sales_columns, vec![6, 8]);

        let sheet = template.workbook.worksheet(0).unwrap();
        assert_eq!(sheet.name(), "Sales");
        assert!(sheet.is_protected());
        assert_eq!(sheet.column_width(1), Some(18.5));

        let row = sheet.row(8).unwrap();
        assert_eq!(row.height(), Some(20.5));

        let a8 = row.cell(0).unwrap();
        assert_eq!(a8.value, CellValue::from("placeholder"));
        assert_eq!(
            a8.style.alignment.as_ref().unwrap().horizontal,
            Some(HorizontalAlign::Center)
        );
        assert_eq!(
            a8.border.as_ref().unwrap().bottom.as_ref().unwrap().style,
            BorderStyle::Thin
        );
        let protection = a8.protection.unwrap();
        assert!(!protection.locked);
        assert!(!protection.hidden);

        assert_eq!(row.cell(7).unwrap().style.num_format.as_deref(), Some("0.0%"));
    }

    #[test]
    fn test_default_layout_when_omitted() {
        let template = parse_template_str("sheets:\n  - name: S\n").unwrap();
        assert_eq!(template.layout, SheetLayout::default());
    }

    #[test]
    fn test_bad_column_letter() {
        let yaml = "sheets:\n  - name: S\n    rows:\n      6:\n        cells:\n          A1: {}\n";
        assert!(matches!(
            parse_template_str(yaml),
            Err(SheetError::Parse(_))
        ));
    }

    #[test]
    fn test_layout_collision_rejected() {
        let yaml = "layout:\n  sales_columns: [G, H]\nsheets: []\n";
        assert!(matches!(
            parse_template_str(yaml),
            Err(SheetError::Layout(_))
        ));
    }

    #[test]
    fn test_unknown_style_field_rejected() {
        let yaml = "sheets:\n  - name: S\n    rows:\n      6:\n        cells:\n          A: { style: { colour: red } }\n";
        assert!(matches!(parse_template_str(yaml), Err(SheetError::Yaml(_))));
    }

    #[test]
    fn test_row_zero_rejected() {
        let yaml = "sheets:\n  - name: S\n    rows:\n      0: {}\n";
        assert!(matches!(
            parse_template_str(yaml),
            Err(SheetError::InvalidRow(0))
        ));
    }
}
