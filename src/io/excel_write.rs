use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::{debug, instrument};

use crate::config::COLUMN_WIDTH_PADDING;
use crate::error::Result;
use crate::report::{CellValue, SheetTable, WorkbookData};

/// Writes the provided workbook data to the given path, replacing any
/// existing file.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (row_num, col_num) = (row_idx as u32, col_idx as u16);
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(value) => {
                        worksheet.write_string(row_num, col_num, value)?;
                    }
                    CellValue::Integer(value) => {
                        worksheet.write_number(row_num, col_num, *value as f64)?;
                    }
                }
            }
        }

        for (col_idx, width) in column_widths(table).into_iter().enumerate() {
            worksheet.set_column_width(col_idx as u16, width)?;
        }
        debug!(sheet = %table.sheet_name, rows = table.rows.len(), "worksheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}

/// Width of every column: the longest displayed cell in characters plus
/// [`COLUMN_WIDTH_PADDING`]. Empty cells do not count.
pub fn column_widths(table: &SheetTable) -> Vec<f64> {
    let column_count = table.rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut longest = vec![0usize; column_count];

    for row in &table.rows {
        for (col_idx, cell) in row.iter().enumerate() {
            if let Some(text) = cell.display() {
                longest[col_idx] = longest[col_idx].max(text.chars().count());
            }
        }
    }

    longest
        .into_iter()
        .map(|length| length as f64 + COLUMN_WIDTH_PADDING)
        .collect()
}
