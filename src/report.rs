//! Report generation: header labels plus one styled row per record

use crate::core::fiscal::write_header_labels;
use crate::core::{PopulateSummary, RowPopulator};
use crate::error::SheetResult;
use crate::parser::Template;
use crate::types::Record;
use chrono::NaiveDate;

/// Fill a parsed template in place.
///
/// Targets the sheet named `sheet`, or the first sheet. Records are validated
/// before anything is written, so on error the template is unchanged.
pub fn fill_template(
    template: &mut Template,
    records: &[Record],
    sheet: Option<&str>,
    today: NaiveDate,
) -> SheetResult<PopulateSummary> {
    let layout = &template.layout;
    let target = match sheet {
        Some(name) => template.workbook.worksheet_by_name_mut(name)?,
        None => template.workbook.worksheet_mut(0)?,
    };

    let populator = RowPopulator::new(layout);
    let summary = populator.populate(target, records, layout.data_start_row)?;
    write_header_labels(target, layout, today)?;

    Ok(summary)
}
