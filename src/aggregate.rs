//! Month aggregation: store totals and the cross-store average.

use tracing::{error, info, instrument};

use crate::config::SummaryConfig;
use crate::error::{ReportError, Result};
use crate::io::excel_read;
use crate::model::{MonthlyRecord, StoreColumn, StoreTotals, round_half_even};

/// Reduces the extracted columns of one month to its record.
///
/// Fails with [`ReportError::EmptyMonth`] when no store produced data, since
/// the average is undefined.
pub fn aggregate_month(month: &str, columns: &[StoreColumn]) -> Result<MonthlyRecord> {
    let store_totals: StoreTotals = columns
        .iter()
        .map(|column| (column.store.as_str(), column.total()))
        .collect();

    let average = monthly_average(&store_totals)
        .ok_or_else(|| ReportError::EmptyMonth(month.to_string()))?;

    Ok(MonthlyRecord {
        month: month.to_string(),
        average,
        store_totals,
    })
}

/// Rounded mean of the store totals, `None` when there are none.
pub fn monthly_average(store_totals: &StoreTotals) -> Option<i64> {
    if store_totals.is_empty() {
        return None;
    }
    Some(round_half_even(
        store_totals.sum() as f64 / store_totals.len() as f64,
    ))
}

/// Processes the configured months one after another.
///
/// A month whose workbook cannot be read, or whose sheets all failed, is
/// logged and left out; the remaining months are unaffected. Records keep the
/// order of `config.months`.
#[instrument(level = "info", skip_all, fields(input_dir = %config.input_dir.display()))]
pub fn calculate_monthly_averages(config: &SummaryConfig) -> Vec<MonthlyRecord> {
    let mut records = Vec::with_capacity(config.months.len());

    for month in &config.months {
        match process_month(config, month) {
            Ok(record) => {
                info!(
                    month = %record.month,
                    average = record.average,
                    store_count = record.store_totals.len(),
                    "month aggregated"
                );
                records.push(record);
            }
            Err(err) => {
                error!(
                    file = %config.workbook_file_name(month),
                    error = %err,
                    "skipping month"
                );
            }
        }
    }

    records
}

fn process_month(config: &SummaryConfig, month: &str) -> Result<MonthlyRecord> {
    let path = config.workbook_path(month);
    info!(path = %path.display(), "processing file");
    let columns = excel_read::read_store_columns(&path, &config.stores, &config.layout)?;
    aggregate_month(month, &columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, i64)]) -> StoreTotals {
        entries.iter().copied().collect()
    }

    #[test]
    fn averages_three_stores() {
        let columns = vec![
            StoreColumn::new("A", vec![60.0, 40.0]),
            StoreColumn::new("B", vec![200.0]),
            StoreColumn::new("C", vec![100.25, 199.75]),
        ];

        let record = aggregate_month("FEBRERO", &columns).unwrap();
        assert_eq!(record.month, "FEBRERO");
        assert_eq!(record.average, 200);
        assert_eq!(record.store_totals, totals(&[("A", 100), ("B", 200), ("C", 300)]));
    }

    #[test]
    fn single_store_month_averages_to_its_total() {
        let record = aggregate_month("MARZO", &[StoreColumn::new("A", vec![100.0])]).unwrap();
        assert_eq!(record.average, 100);
        assert_eq!(record.store_totals, totals(&[("A", 100)]));
    }

    #[test]
    fn empty_month_is_an_error_not_zero() {
        assert!(matches!(
            aggregate_month("ABRIL", &[]),
            Err(ReportError::EmptyMonth(month)) if month == "ABRIL"
        ));
        assert_eq!(monthly_average(&StoreTotals::new()), None);
    }

    #[test]
    fn average_rounds_half_to_even() {
        assert_eq!(monthly_average(&totals(&[("A", 100), ("B", 201)])), Some(150));
        assert_eq!(monthly_average(&totals(&[("A", 100), ("B", 203)])), Some(152));
        assert_eq!(monthly_average(&totals(&[("A", 1), ("B", 1), ("C", 2)])), Some(1));
    }

    #[test]
    fn stores_with_empty_columns_count_towards_the_average() {
        let columns = vec![
            StoreColumn::new("A", vec![300.0]),
            StoreColumn::new("B", Vec::new()),
        ];
        let record = aggregate_month("MAYO", &columns).unwrap();
        assert_eq!(record.store_totals.get("B"), Some(0));
        assert_eq!(record.average, 150);
    }
}
