use crate::core::PopulateSummary;
use crate::error::{SheetError, SheetResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::parser;
use crate::report::fill_template;
use crate::types::{column_index_to_letter, CellValue, RecordSet};
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format_number(*n),
        other => other.to_string(),
    }
}

/// Execute the generate command
pub fn generate(
    template: PathBuf,
    output: PathBuf,
    records: Option<PathBuf>,
    sheet: Option<String>,
    date: Option<NaiveDate>,
    verbose: bool,
) -> SheetResult<PopulateSummary> {
    println!("{}", "📊 Salesheet - Generate".bold().green());
    println!("   Template: {}", template.display());
    println!("   Output:   {}\n", output.display());

    if verbose {
        println!("{}", "📖 Parsing template...".cyan());
    }
    let mut parsed = parser::parse_template(&template)?;

    let records = match records {
        Some(path) => {
            if verbose {
                println!("{}", format!("📖 Reading records from {}...", path.display()).cyan());
            }
            parser::parse_records(&path)?
        }
        None => {
            if verbose {
                println!("{}", "📖 Using built-in sample records...".cyan());
            }
            RecordSet::sample().records
        }
    };

    let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    if verbose {
        println!(
            "   {} records, data from row {}, reference date {}\n",
            records.len(),
            parsed.layout.data_start_row,
            today
        );
        println!("{}", "🧩 Filling template rows...".cyan());
    }

    let summary = fill_template(&mut parsed, &records, sheet.as_deref(), today)?;

    if verbose {
        println!("{}", "💾 Writing Excel file...".cyan());
    }
    ExcelExporter::new(&parsed.workbook).export(&output)?;

    println!("{}", "✅ Generate Complete!".bold().green());
    if summary.rows.is_empty() {
        println!("   No records written");
    } else {
        println!(
            "   {} rows written ({}–{})",
            summary.rows_written(),
            summary.rows.start,
            summary.rows.end - 1
        );
    }
    println!("   Excel file: {}\n", output.display());

    Ok(summary)
}

#[derive(Serialize)]
struct InspectedRow {
    row: u32,
    cells: BTreeMap<String, CellValue>,
}

#[derive(Serialize)]
struct InspectedSheet {
    sheet: String,
    rows: Vec<InspectedRow>,
}

/// Execute the inspect command
pub fn inspect(input: PathBuf, sheet: Option<String>, json: bool) -> SheetResult<()> {
    let importer = ExcelImporter::new(&input);
    let imported = importer.import_sheet(sheet.as_deref())?;

    let rows: Vec<InspectedRow> = imported
        .rows()
        .map(|(row, cells)| InspectedRow {
            row,
            cells: cells
                .cells()
                .filter(|(_, cell)| !cell.value.is_empty())
                .map(|(col, cell)| (column_index_to_letter(col), cell.value.clone()))
                .collect(),
        })
        .collect();

    if json {
        let report = InspectedSheet {
            sheet: imported.name().to_string(),
            rows,
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| SheetError::Import(format!("Failed to encode JSON: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", "🔍 Salesheet - Inspect".bold().green());
    println!("   File:  {}", input.display());
    println!("   Sheet: {}\n", imported.name().bright_blue());

    for row in &rows {
        let line = row
            .cells
            .iter()
            .map(|(col, value)| format!("{}={}", col.dimmed(), format_value(value)))
            .collect::<Vec<_>>()
            .join("  ");
        println!("   {:>5} │ {}", row.row.to_string().bold(), line);
    }
    println!();

    Ok(())
}

/// Execute the sample-records command
pub fn sample_records(output: PathBuf) -> SheetResult<()> {
    let yaml = serde_yaml::to_string(&RecordSet::sample())?;
    fs::write(&output, yaml)?;

    println!("{}", "✅ Sample records written".bold().green());
    println!("   YAML file: {}\n", output.display());

    Ok(())
}
