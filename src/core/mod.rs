//! Template row engine: style cloning and record population

pub mod fiscal;
pub mod layout;
pub mod row_populator;
pub mod style_cloner;

pub use layout::SheetLayout;
pub use row_populator::{clear_row_values, derived_percent, PopulateSummary, RowPopulator};
pub use style_cloner::clone_row_style;
