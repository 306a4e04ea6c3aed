use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::config::{MAX_SHEET_WORKERS, SheetLayout};
use crate::error::{ReportError, Result, SheetError};
use crate::model::{MonthlyRecord, StoreColumn, StoreTotals};
use crate::report::{AVERAGE_ROW_LABEL, AVERAGES_SHEET, DETAILS_SHEET, MONTH_HEADER};

type SheetResult = std::result::Result<Vec<f64>, SheetError>;

/// Reads the value column of every requested store sheet.
///
/// The workbook is loaded once and the sheets are parsed on a pool of at most
/// [`MAX_SHEET_WORKERS`] threads, each with its own reader over the shared
/// bytes. A sheet that fails is logged and left out of the result; only
/// failures affecting the whole workbook are returned as errors. Columns come
/// back in the order of `stores`.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_store_columns(
    path: &Path,
    stores: &[String],
    layout: &SheetLayout,
) -> Result<Vec<StoreColumn>> {
    if !path.is_file() {
        return Err(ReportError::MissingWorkbook(path.to_path_buf()));
    }
    let column = layout.column_index()?;
    let bytes = fs::read(path)?;

    // Surface a corrupt workbook once instead of once per sheet.
    Xlsx::new(Cursor::new(bytes.as_slice()))?;

    if stores.is_empty() {
        return Ok(Vec::new());
    }

    let workers = stores.len().min(MAX_SHEET_WORKERS);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("sheet-reader-{index}"))
        .build()?;
    debug!(workers, sheet_count = stores.len(), "reading store sheets");

    let results: Vec<(&String, SheetResult)> = pool.install(|| {
        stores
            .par_iter()
            .map(|store| (store, read_store_sheet(&bytes, store, column, layout)))
            .collect()
    });

    let mut columns = Vec::with_capacity(results.len());
    for (store, result) in results {
        match result {
            Ok(values) => columns.push(StoreColumn::new(store.as_str(), values)),
            Err(error) => warn!(sheet = %store, %error, "skipping unreadable sheet"),
        }
    }

    Ok(columns)
}

fn read_store_sheet(
    bytes: &[u8],
    store: &str,
    column: u32,
    layout: &SheetLayout,
) -> SheetResult {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range(store)
        .ok_or_else(|| SheetError::MissingSheet(store.to_string()))??;

    extract_column(&range, column, layout)
}

/// Collects the numeric values of `column` from row `layout.skip_rows`
/// (0-based, absolute) down to the last used row.
fn extract_column(
    range: &Range<DataType>,
    column: u32,
    layout: &SheetLayout,
) -> SheetResult {
    let (start, end) = match (range.start(), range.end()) {
        (Some(start), Some(end)) if end.1 >= column => (start, end),
        _ => {
            return Err(SheetError::ColumnOutOfRange {
                column: layout.value_column.to_ascii_uppercase(),
            });
        }
    };

    let first_row = layout.skip_rows.max(start.0);
    let mut values = Vec::new();
    if first_row > end.0 {
        return Ok(values);
    }

    for row in first_row..=end.0 {
        let value = match range.get_value((row, column)) {
            Some(DataType::Empty) | None => continue,
            Some(DataType::Float(value)) => *value,
            Some(DataType::Int(value)) => *value as f64,
            Some(DataType::Bool(value)) => f64::from(u8::from(*value)),
            Some(other) => {
                return Err(SheetError::NonNumeric {
                    address: format!("{}{}", layout.value_column.to_ascii_uppercase(), row + 1),
                    value: other.to_string(),
                });
            }
        };
        values.push(value);
    }

    Ok(values)
}

/// Reads a summary workbook produced by
/// [`write_workbook`](crate::io::excel_write::write_workbook) back into
/// monthly records.
///
/// Totals come from the "Store Details" sheet, so every record carries one
/// entry per store column, including the zeros written for absent stores.
pub fn read_summary(path: &Path) -> Result<Vec<MonthlyRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let averages_range = read_required_sheet(&mut workbook, AVERAGES_SHEET)?;
    let details_range = read_required_sheet(&mut workbook, DETAILS_SHEET)?;

    let averages = parse_averages(&averages_range)?;
    let (stores, rows) = parse_details(&details_range)?;

    if averages.len() != rows.len() {
        return Err(ReportError::InvalidWorkbook(format!(
            "{} months in '{AVERAGES_SHEET}' but {} in '{DETAILS_SHEET}'",
            averages.len(),
            rows.len()
        )));
    }

    averages
        .into_iter()
        .zip(rows)
        .map(|((month, average), (detail_month, totals))| {
            if month != detail_month {
                return Err(ReportError::InvalidWorkbook(format!(
                    "month '{month}' does not match '{detail_month}' in '{DETAILS_SHEET}'"
                )));
            }
            let store_totals: StoreTotals = stores.iter().cloned().zip(totals).collect();
            Ok(MonthlyRecord {
                month,
                average,
                store_totals,
            })
        })
        .collect()
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ReportError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ReportError::from)?;
    Ok(range)
}

fn parse_averages(range: &Range<DataType>) -> Result<Vec<(String, i64)>> {
    let label = cell_to_string(range.get_value((1, 0)));
    if label != AVERAGE_ROW_LABEL {
        return Err(ReportError::InvalidWorkbook(format!(
            "expected '{AVERAGE_ROW_LABEL}' in A2, found '{label}'"
        )));
    }

    let mut averages = Vec::new();
    for col in 1.. {
        let month = cell_to_string(range.get_value((0, col)));
        if month.is_empty() {
            break;
        }
        let average = cell_to_integer(range.get_value((1, col)), &month)?;
        averages.push((month, average));
    }

    Ok(averages)
}

type DetailRows = Vec<(String, Vec<i64>)>;

fn parse_details(range: &Range<DataType>) -> Result<(Vec<String>, DetailRows)> {
    let header = cell_to_string(range.get_value((0, 0)));
    if header != MONTH_HEADER {
        return Err(ReportError::InvalidWorkbook(format!(
            "expected '{MONTH_HEADER}' in A1, found '{header}'"
        )));
    }

    let mut stores = Vec::new();
    for col in 1.. {
        let store = cell_to_string(range.get_value((0, col)));
        if store.is_empty() {
            break;
        }
        stores.push(store);
    }

    let mut rows = Vec::new();
    for row in 1.. {
        let month = cell_to_string(range.get_value((row, 0)));
        if month.is_empty() {
            break;
        }
        let totals = (1..=stores.len() as u32)
            .map(|col| cell_to_integer(range.get_value((row, col)), &month))
            .collect::<Result<Vec<_>>>()?;
        rows.push((month, totals));
    }

    Ok((stores, rows))
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn cell_to_integer(cell: Option<&DataType>, month: &str) -> Result<i64> {
    match cell {
        Some(DataType::Int(value)) => Ok(*value),
        Some(DataType::Float(value)) if value.fract() == 0.0 => Ok(*value as i64),
        other => Err(ReportError::InvalidWorkbook(format!(
            "non-integer value '{}' in row of month '{month}'",
            cell_to_string(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[((u32, u32), DataType)]) -> Range<DataType> {
        let cells = cells
            .iter()
            .map(|(position, value)| calamine::Cell::new(*position, value.clone()))
            .collect();
        Range::from_sparse(cells)
    }

    fn layout(skip_rows: u32) -> SheetLayout {
        SheetLayout {
            skip_rows,
            value_column: "G".into(),
        }
    }

    #[test]
    fn extracts_values_below_skipped_rows() {
        let range = sheet(&[
            ((0, 0), DataType::String("header".into())),
            ((1, 6), DataType::Float(999.0)),
            ((2, 6), DataType::Float(10.5)),
            ((3, 6), DataType::Int(4)),
            ((5, 6), DataType::Float(1.5)),
        ]);

        let values = extract_column(&range, 6, &layout(2)).unwrap();
        assert_eq!(values, vec![10.5, 4.0, 1.5]);
    }

    #[test]
    fn rejects_text_inside_the_value_range() {
        let range = sheet(&[
            ((2, 6), DataType::Float(10.0)),
            ((3, 6), DataType::String("TOTAL".into())),
        ]);

        match extract_column(&range, 6, &layout(2)) {
            Err(SheetError::NonNumeric { address, value }) => {
                assert_eq!(address, "G4");
                assert_eq!(value, "TOTAL");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn narrow_sheet_is_out_of_range() {
        let range = sheet(&[((3, 2), DataType::Float(10.0))]);
        assert!(matches!(
            extract_column(&range, 6, &layout(2)),
            Err(SheetError::ColumnOutOfRange { .. })
        ));

        let empty: Range<DataType> = Range::empty();
        assert!(matches!(
            extract_column(&empty, 6, &layout(2)),
            Err(SheetError::ColumnOutOfRange { .. })
        ));
    }

    #[test]
    fn short_sheet_yields_empty_column() {
        let range = sheet(&[((0, 6), DataType::Float(10.0))]);
        assert_eq!(extract_column(&range, 6, &layout(42)).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn integers_accept_whole_floats_only() {
        assert_eq!(cell_to_integer(Some(&DataType::Float(200.0)), "M").unwrap(), 200);
        assert_eq!(cell_to_integer(Some(&DataType::Int(7)), "M").unwrap(), 7);
        assert!(cell_to_integer(Some(&DataType::Float(1.5)), "M").is_err());
        assert!(cell_to_integer(None, "M").is_err());
    }
}
