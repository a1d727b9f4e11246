use crate::error::{SheetError, SheetResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::OnceLock;

/// Last addressable row number (1-based), as in Excel 2007+.
pub const MAX_ROW: u32 = 1_048_576;

/// Last addressable column index (0-based, `XFD`).
pub const MAX_COLUMN: u16 = 16_383;

//==============================================================================
// Cell addressing
//==============================================================================

/// Convert a 0-based column index to its letter form
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
/// - 16383 → XFD
pub fn column_index_to_letter(index: u16) -> String {
    let mut result = String::new();
    let mut idx = index as u32;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Convert a column letter (`A`, `m`, `AA`, ...) to its 0-based index
pub fn column_letter_to_index(letters: &str) -> SheetResult<u16> {
    if letters.is_empty() {
        return Err(SheetError::InvalidCellRef("empty column letter".to_string()));
    }

    let mut acc: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(SheetError::InvalidCellRef(format!(
                "'{}' is not a column letter",
                letters
            )));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        acc = acc * 26 + digit;
        if acc > MAX_COLUMN as u32 + 1 {
            return Err(SheetError::InvalidCellRef(format!(
                "column '{}' is beyond XFD",
                letters
            )));
        }
    }

    Ok((acc - 1) as u16)
}

/// A single cell address: 1-based row number, 0-based column index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_index_to_letter(self.col), self.row)
    }
}

fn a1_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]{1,7})$").expect("A1 pattern is valid")
    })
}

impl FromStr for CellRef {
    type Err = SheetError;

    /// Parse A1 notation (`G4`, `$D$4`)
    fn from_str(s: &str) -> SheetResult<Self> {
        let caps = a1_pattern()
            .captures(s.trim())
            .ok_or_else(|| SheetError::InvalidCellRef(s.to_string()))?;

        let col = column_letter_to_index(&caps[1])?;
        let row: u32 = caps[2]
            .parse()
            .map_err(|_| SheetError::InvalidCellRef(s.to_string()))?;
        check_row(row)?;

        Ok(CellRef { row, col })
    }
}

/// Reject row numbers outside `1..=MAX_ROW`
pub fn check_row(row: u32) -> SheetResult<()> {
    if row == 0 || row > MAX_ROW {
        return Err(SheetError::InvalidRow(row));
    }
    Ok(())
}

//==============================================================================
// Cell values
//==============================================================================

/// A cell value. Formulas are out of scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

//==============================================================================
// Style bundle
//==============================================================================

/// Solid background fill. Colors are hex RGB (`"#DDEBF7"` or `"FFDDEBF7"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fill {
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alignment {
    #[serde(default)]
    pub horizontal: Option<HorizontalAlign>,
    #[serde(default)]
    pub vertical: Option<VerticalAlign>,
    #[serde(default)]
    pub wrap_text: bool,
}

/// Fill, alignment and number format of a cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellStyle {
    #[serde(default)]
    pub num_format: Option<String>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub alignment: Option<Alignment>,
}

impl CellStyle {
    pub fn is_default(&self) -> bool {
        *self == CellStyle::default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Font {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Hair,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderEdge {
    pub style: BorderStyle,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Border {
    #[serde(default)]
    pub top: Option<BorderEdge>,
    #[serde(default)]
    pub bottom: Option<BorderEdge>,
    #[serde(default)]
    pub left: Option<BorderEdge>,
    #[serde(default)]
    pub right: Option<BorderEdge>,
}

fn default_locked() -> bool {
    true
}

/// Cell protection flags. They only take effect on a protected sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Protection {
    #[serde(default = "default_locked")]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

//==============================================================================
// Cells, rows, sheets
//==============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
    pub font: Option<Font>,
    pub border: Option<Border>,
    pub protection: Option<Protection>,
}

impl Cell {
    pub fn with_value(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// True when the cell carries any formatting beyond the defaults
    pub fn has_formatting(&self) -> bool {
        !self.style.is_default()
            || self.font.is_some()
            || self.border.is_some()
            || self.protection.is_some()
    }
}

/// A sparse row: 0-based column index → cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    height: Option<f64>,
    cells: BTreeMap<u16, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit row height in points, `None` when the row uses the default
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn set_height(&mut self, height: Option<f64>) {
        self.height = height;
    }

    pub fn cell(&self, col: u16) -> Option<&Cell> {
        self.cells.get(&col)
    }

    /// Get a cell, creating an empty one if the column has none yet
    pub fn cell_mut(&mut self, col: u16) -> SheetResult<&mut Cell> {
        if col > MAX_COLUMN {
            return Err(SheetError::InvalidCellRef(format!(
                "column index {} is beyond XFD",
                col
            )));
        }
        Ok(self.cells.entry(col).or_default())
    }

    pub fn cells(&self) -> impl Iterator<Item = (u16, &Cell)> {
        self.cells.iter().map(|(col, cell)| (*col, cell))
    }

    pub fn max_column(&self) -> Option<u16> {
        self.cells.keys().next_back().copied()
    }

    /// Columns from `A` through the last stored cell, empty ones included
    pub fn column_span(&self) -> Option<RangeInclusive<u16>> {
        self.max_column().map(|max| 0..=max)
    }

    /// Reset every value in the row to empty. Formatting is kept.
    pub fn clear_values(&mut self) {
        for cell in self.cells.values_mut() {
            cell.value = CellValue::Empty;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: BTreeMap<u32, Row>,
    column_widths: BTreeMap<u16, f64>,
    protected: bool,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            protected: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row(&self, row: u32) -> Option<&Row> {
        self.rows.get(&row)
    }

    pub fn row_mut(&mut self, row: u32) -> Option<&mut Row> {
        self.rows.get_mut(&row)
    }

    /// Get a row, creating it if needed. Fails for row numbers off the sheet.
    pub fn row_or_insert(&mut self, row: u32) -> SheetResult<&mut Row> {
        check_row(row)?;
        Ok(self.rows.entry(row).or_default())
    }

    /// Get a row that must already exist
    pub fn existing_row(&self, row: u32) -> SheetResult<&Row> {
        check_row(row)?;
        self.rows.get(&row).ok_or_else(|| SheetError::MissingRow {
            sheet: self.name.clone(),
            row,
        })
    }

    pub fn existing_row_mut(&mut self, row: u32) -> SheetResult<&mut Row> {
        check_row(row)?;
        let name = &self.name;
        self.rows.get_mut(&row).ok_or_else(|| SheetError::MissingRow {
            sheet: name.clone(),
            row,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(n, row)| (*n, row))
    }

    pub fn last_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    pub fn cell(&self, at: CellRef) -> Option<&Cell> {
        self.rows.get(&at.row).and_then(|row| row.cell(at.col))
    }

    pub fn cell_mut(&mut self, at: CellRef) -> SheetResult<&mut Cell> {
        self.row_or_insert(at.row)?.cell_mut(at.col)
    }

    /// Value at `at`, `Empty` for cells that do not exist
    pub fn value(&self, at: CellRef) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cell(at).map(|cell| &cell.value).unwrap_or(&EMPTY)
    }

    pub fn set_value(&mut self, at: CellRef, value: impl Into<CellValue>) -> SheetResult<()> {
        self.cell_mut(at)?.value = value.into();
        Ok(())
    }

    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.column_widths.iter().map(|(col, w)| (*col, *w))
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn set_protected(&mut self, protected: bool) {
        self.protected = protected;
    }
}

/// Ordered collection of worksheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Worksheet by 0-based position
    pub fn worksheet(&self, index: usize) -> SheetResult<&Sheet> {
        self.sheets
            .get(index)
            .ok_or_else(|| SheetError::MissingWorksheet(format!("#{}", index + 1)))
    }

    pub fn worksheet_mut(&mut self, index: usize) -> SheetResult<&mut Sheet> {
        self.sheets
            .get_mut(index)
            .ok_or_else(|| SheetError::MissingWorksheet(format!("#{}", index + 1)))
    }

    pub fn worksheet_by_name_mut(&mut self, name: &str) -> SheetResult<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|sheet| sheet.name() == name)
            .ok_or_else(|| SheetError::MissingWorksheet(name.to_string()))
    }
}

//==============================================================================
// Sales records
//==============================================================================

/// One product line to render into a data row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub three_years_ago_sales: f64,
    pub prev_prev_year_sales: f64,
    pub prev_year_sales: f64,
    /// Current-period sales, one per sales column
    pub sales: Vec<f64>,
}

/// Top-level shape of a records YAML file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSet {
    pub records: Vec<Record>,
}

impl RecordSet {
    /// The five demo products used when no records file is given
    pub fn sample() -> Self {
        let record = |id: i64, name: &str, price: f64, prior: [f64; 3], sales: [f64; 4]| Record {
            id,
            name: name.to_string(),
            price,
            three_years_ago_sales: prior[0],
            prev_prev_year_sales: prior[1],
            prev_year_sales: prior[2],
            sales: sales.to_vec(),
        };

        Self {
            records: vec![
                record(1, "商品A", 1000.0, [85.0, 90.0, 95.0], [100.0, 150.0, 120.0, 180.0]),
                record(2, "商品B", 2000.0, [65.0, 70.0, 75.0], [80.0, 90.0, 100.0, 95.0]),
                record(3, "商品C", 1500.0, [185.0, 190.0, 195.0], [200.0, 180.0, 220.0, 210.0]),
                record(4, "商品D", 3000.0, [35.0, 40.0, 45.0], [50.0, 60.0, 45.0, 70.0]),
                record(5, "商品E", 2500.0, [140.0, 145.0, 148.0], [150.0, 140.0, 160.0, 155.0]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(1), "B");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(27), "AB");
        assert_eq!(column_index_to_letter(701), "ZZ");
        assert_eq!(column_index_to_letter(MAX_COLUMN), "XFD");
    }

    #[test]
    fn test_column_letter_to_index() {
        assert_eq!(column_letter_to_index("A").unwrap(), 0);
        assert_eq!(column_letter_to_index("g").unwrap(), 6);
        assert_eq!(column_letter_to_index("Z").unwrap(), 25);
        assert_eq!(column_letter_to_index("AA").unwrap(), 26);
        assert_eq!(column_letter_to_index("ZZ").unwrap(), 701);
        assert_eq!(column_letter_to_index("XFD").unwrap(), MAX_COLUMN);
    }

    #[test]
    fn test_column_letter_to_index_rejects_garbage() {
        assert!(column_letter_to_index("").is_err());
        assert!(column_letter_to_index("A1").is_err());
        assert!(column_letter_to_index("XFE").is_err());
    }

    #[test]
    fn test_next_column_past_z() {
        // Z + 1 is AA, not '['
        let z = column_letter_to_index("Z").unwrap();
        assert_eq!(column_index_to_letter(z + 1), "AA");
    }

    #[test]
    fn test_cell_ref_parse_and_display() {
        let at: CellRef = "G4".parse().unwrap();
        assert_eq!(at, CellRef::new(4, 6));
        assert_eq!(at.to_string(), "G4");

        let abs: CellRef = "$AA$10".parse().unwrap();
        assert_eq!(abs, CellRef::new(10, 26));
    }

    #[test]
    fn test_cell_ref_rejects_row_zero() {
        assert!(matches!(
            "A0".parse::<CellRef>(),
            Err(SheetError::InvalidRow(0))
        ));
        assert!("4G".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_row_column_span_includes_gaps() {
        let mut row = Row::new();
        row.cell_mut(3).unwrap().value = CellValue::from(1.0);
        assert_eq!(row.column_span(), Some(0..=3));
        assert_eq!(Row::new().column_span(), None);
    }

    #[test]
    fn test_sheet_missing_row() {
        let sheet = Sheet::new("Data");
        assert!(matches!(
            sheet.existing_row(6),
            Err(SheetError::MissingRow { row: 6, .. })
        ));
        assert!(matches!(sheet.existing_row(0), Err(SheetError::InvalidRow(0))));
    }

    #[test]
    fn test_workbook_missing_worksheet() {
        let mut workbook = Workbook::new();
        assert!(matches!(
            workbook.worksheet(0),
            Err(SheetError::MissingWorksheet(_))
        ));
        workbook.add_sheet(Sheet::new("Data"));
        assert!(workbook.worksheet_by_name_mut("Data").is_ok());
        assert!(workbook.worksheet_by_name_mut("Other").is_err());
    }

    #[test]
    fn test_sample_records_shape() {
        let samples = RecordSet::sample();
        assert_eq!(samples.records.len(), 5);
        assert!(samples.records.iter().all(|r| r.sales.len() == 4));
        assert_eq!(samples.records[0].name, "商品A");
    }
}
