//! Template → .xlsx round trips through the exporter and the importer

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use salesheet::excel::{ExcelExporter, ExcelImporter};
use salesheet::parser::{parse_records, parse_template};
use salesheet::report::fill_template;
use salesheet::types::{CellRef, CellValue, RecordSet};
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "test-data/template.yaml";

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn cell(at: &str) -> CellRef {
    at.parse().unwrap()
}

#[test]
fn test_fixture_template_parses() {
    let template = parse_template(Path::new(TEMPLATE)).unwrap();
    let sheet = template.workbook.worksheet(0).unwrap();

    assert_eq!(sheet.name(), "販売実績");
    assert!(sheet.is_protected());

    let row = sheet.row(6).unwrap();
    assert_eq!(row.height(), Some(20.5));
    assert_eq!(row.column_span(), Some(0..=13));
    assert_eq!(row.cell(1).unwrap().value, CellValue::from("(記入例)"));
    assert_eq!(
        row.cell(7).unwrap().style.num_format.as_deref(),
        Some("0.0%")
    );
}

#[test]
fn test_fill_template_with_sample_records() {
    let mut template = parse_template(Path::new(TEMPLATE)).unwrap();
    let records = RecordSet::sample().records;

    let summary = fill_template(&mut template, &records, None, reference_date()).unwrap();
    assert_eq!(summary.rows, 6..11);

    let sheet = template.workbook.worksheet(0).unwrap();
    assert_eq!(sheet.value(cell("D4")), &CellValue::from("～2022"));
    assert_eq!(sheet.value(cell("F4")), &CellValue::from("2024"));
    assert_eq!(sheet.value(cell("G4")), &CellValue::from("2025/04 (M0)"));
    assert_eq!(sheet.value(cell("M4")), &CellValue::from("2025/07～ (M3)"));

    assert_eq!(sheet.value(cell("B10")), &CellValue::from("商品E"));
    let template_row = sheet.row(6).unwrap();
    let last_row = sheet.row(10).unwrap();
    assert_eq!(last_row.height(), template_row.height());
    for (col, template_cell) in template_row.cells() {
        let generated = last_row.cell(col).unwrap();
        assert_eq!(generated.style, template_cell.style);
        assert_eq!(generated.border, template_cell.border);
        assert_eq!(generated.protection, template_cell.protection);
    }
}

#[test]
fn test_fill_template_unknown_sheet() {
    let mut template = parse_template(Path::new(TEMPLATE)).unwrap();
    let result = fill_template(&mut template, &[], Some("Summary"), reference_date());
    assert!(matches!(
        result,
        Err(salesheet::SheetError::MissingWorksheet(name)) if name == "Summary"
    ));
}

#[test]
fn test_export_and_read_back() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report.xlsx");

    let mut template = parse_template(Path::new(TEMPLATE)).unwrap();
    let records = parse_records(Path::new("test-data/records.yaml")).unwrap();
    fill_template(&mut template, &records, None, reference_date()).unwrap();

    ExcelExporter::new(&template.workbook)
        .export(&output_path)
        .unwrap();
    assert!(output_path.exists(), "Output file should exist");

    let importer = ExcelImporter::new(&output_path);
    assert_eq!(importer.sheet_names().unwrap(), vec!["販売実績".to_string()]);

    let sheet = importer.import_sheet(None).unwrap();
    assert_eq!(sheet.value(cell("A1")), &CellValue::from("商品別販売実績表"));
    assert_eq!(sheet.value(cell("A6")), &CellValue::Number(101.0));
    assert_eq!(sheet.value(cell("B7")), &CellValue::from("ほうじ茶"));
    assert_eq!(sheet.value(cell("G8")), &CellValue::Number(460.0));

    // 1650 / 1500 = 110%
    let h6 = sheet.value(cell("H6")).as_number().unwrap();
    assert!((h6 - 1.1).abs() < 1e-12);
    // 700 / 720 = 97.22..% → 97.2%
    let h7 = sheet.value(cell("H7")).as_number().unwrap();
    assert!((h7 - 0.972).abs() < 1e-12);

    // Nothing past the third record
    assert_eq!(sheet.last_row(), Some(8));
}

#[test]
fn test_import_missing_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report.xlsx");

    let template = parse_template(Path::new(TEMPLATE)).unwrap();
    ExcelExporter::new(&template.workbook)
        .export(&output_path)
        .unwrap();

    let result = ExcelImporter::new(&output_path).import_sheet(Some("Nope"));
    assert!(matches!(
        result,
        Err(salesheet::SheetError::MissingWorksheet(_))
    ));
}

#[test]
fn test_import_nonexistent_file() {
    let result = ExcelImporter::new("does-not-exist.xlsx").import_sheet(None);
    assert!(matches!(result, Err(salesheet::SheetError::Import(_))));
}
