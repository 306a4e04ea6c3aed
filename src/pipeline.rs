use tracing::{info, instrument};

use crate::aggregate::calculate_monthly_averages;
use crate::config::SummaryConfig;
use crate::error::Result;
use crate::io::excel_write;
use crate::model::MonthlyRecord;
use crate::report::build_workbook;

/// Aggregates every configured month and writes the summary workbook to
/// `config.output_path`.
///
/// Unreadable sheets and months only shrink the report; a failure to write
/// the output is returned.
#[instrument(
    level = "info",
    skip_all,
    fields(output = %config.output_path.display())
)]
pub fn run(config: &SummaryConfig) -> Result<Vec<MonthlyRecord>> {
    config.validate()?;

    let records = calculate_monthly_averages(config);
    info!(
        processed = records.len(),
        configured = config.months.len(),
        "months aggregated"
    );

    write_summary(config, &records)?;
    Ok(records)
}

/// Lays out and writes the two summary sheets for `records`.
pub fn write_summary(config: &SummaryConfig, records: &[MonthlyRecord]) -> Result<()> {
    let workbook = build_workbook(records, config.store_columns);
    excel_write::write_workbook(&config.output_path, &workbook)
}
