//! Builds the two summary tables from the monthly records.

use tracing::warn;

use crate::config::StoreColumns;
use crate::model::MonthlyRecord;

/// Sheet holding one average per month.
pub const AVERAGES_SHEET: &str = "Monthly Averages";
/// Sheet holding the month × store totals.
pub const DETAILS_SHEET: &str = "Store Details";
/// Row label of the averages row.
pub const AVERAGE_ROW_LABEL: &str = "Monthly Average";
/// Header of the month label column in the details sheet.
pub const MONTH_HEADER: &str = "Month";

/// A single cell of a summary table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
}

impl CellValue {
    /// Text shown by a spreadsheet for this cell; `None` for empty cells.
    pub fn display(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(value) => Some(value.clone()),
            CellValue::Integer(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

/// A grid of cells materialised as one worksheet, anchored at A1.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub rows: Vec<Vec<CellValue>>,
}

/// Represents all tables required to materialise the summary workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

/// Lays out the monthly records as the "Monthly Averages" and "Store Details"
/// sheets. Months keep the order of `records`.
pub fn build_workbook(records: &[MonthlyRecord], policy: StoreColumns) -> WorkbookData {
    if records.is_empty() {
        warn!("no months were processed; summary sheets will only carry labels");
    }

    WorkbookData {
        tables: vec![averages_table(records), details_table(records, policy)],
    }
}

fn averages_table(records: &[MonthlyRecord]) -> SheetTable {
    let mut header = vec![CellValue::Empty];
    let mut averages = vec![CellValue::from(AVERAGE_ROW_LABEL)];
    for record in records {
        header.push(CellValue::from(record.month.as_str()));
        averages.push(CellValue::from(record.average));
    }

    SheetTable {
        sheet_name: AVERAGES_SHEET.to_string(),
        rows: vec![header, averages],
    }
}

fn details_table(records: &[MonthlyRecord], policy: StoreColumns) -> SheetTable {
    let stores = store_columns(records, policy);

    let mut header = vec![CellValue::from(MONTH_HEADER)];
    header.extend(stores.iter().map(|store| CellValue::from(store.as_str())));

    let mut rows = vec![header];
    for record in records {
        let mut row = vec![CellValue::from(record.month.as_str())];
        row.extend(
            stores
                .iter()
                .map(|store| CellValue::from(record.store_totals.get(store).unwrap_or(0))),
        );
        rows.push(row);
    }

    SheetTable {
        sheet_name: DETAILS_SHEET.to_string(),
        rows,
    }
}

/// Store columns of the details sheet under the given policy.
pub fn store_columns(records: &[MonthlyRecord], policy: StoreColumns) -> Vec<String> {
    let mut stores: Vec<String> = Vec::new();
    let considered = match policy {
        StoreColumns::FirstMonth => &records[..records.len().min(1)],
        StoreColumns::Union => records,
    };

    for record in considered {
        for store in record.store_totals.stores() {
            if !stores.iter().any(|known| known == store) {
                stores.push(store.to_string());
            }
        }
    }

    stores
}
