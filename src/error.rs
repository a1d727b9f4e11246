use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Row {0} is outside the worksheet (1..=1048576)")]
    InvalidRow(u32),

    #[error("Worksheet not found: {0}")]
    MissingWorksheet(String),

    #[error("Row {row} not found in worksheet '{sheet}'")]
    MissingRow { sheet: String, row: u32 },

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: i64, reason: String },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),
}
