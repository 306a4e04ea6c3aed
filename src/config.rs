//! Run configuration.
//!
//! The layout constants encode the fixed structure of the workbooks delivered
//! by the stores; they are not inferred from the files. Everything a run needs
//! travels in [`SummaryConfig`] so the pipeline can be driven from tests with
//! temporary directories.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Number of leading rows skipped in every store sheet.
pub const DEFAULT_SKIP_ROWS: u32 = 42;
/// Column holding the sales figures in every store sheet.
pub const DEFAULT_VALUE_COLUMN: &str = "G";
/// Upper bound on concurrent sheet reads within one workbook.
pub const MAX_SHEET_WORKERS: usize = 4;
/// Extra character units added to the widest cell of a summary column.
pub const COLUMN_WIDTH_PADDING: f64 = 2.0;

pub const DEFAULT_INPUT_DIR: &str = "files";
pub const DEFAULT_REGION: &str = "ECUADOR";
pub const DEFAULT_YEAR: u16 = 2024;
pub const DEFAULT_OUTPUT_PATH: &str = "monthly_sales_summary_2024.xlsx";

/// Month labels as they appear in the input file names.
pub const DEFAULT_MONTHS: [&str; 10] = [
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
];

/// Store sheet names expected in every monthly workbook.
pub const DEFAULT_STORES: [&str; 11] = [
    "CUENCA",
    "MALL DEL SOL",
    "MALL DEL NORTE",
    "DORADO",
    "ENTRERIOS",
    "CEIBOS",
    "M PACIFICO",
    "PORTOVIEJO",
    "PASEO MANTA",
    "LA LIBERTAD",
    "BABAHOYO",
];

/// Location of the sales figures inside a store sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Rows skipped before the first value (0-based index of the first row read).
    pub skip_rows: u32,
    /// Column letter(s), e.g. `G`.
    pub value_column: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

impl SheetLayout {
    /// Zero-based index of the value column.
    pub fn column_index(&self) -> Result<u32> {
        column_letter_to_index(&self.value_column).ok_or_else(|| {
            ReportError::InvalidConfig(format!(
                "'{}' is not a valid column letter",
                self.value_column
            ))
        })
    }
}

/// Which stores become columns of the "Store Details" sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreColumns {
    /// Only the stores of the first processed month.
    FirstMonth,
    /// Every store seen in any month, first month's stores leading.
    #[default]
    Union,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub input_dir: PathBuf,
    pub region: String,
    pub year: u16,
    pub months: Vec<String>,
    pub stores: Vec<String>,
    pub layout: SheetLayout,
    pub store_columns: StoreColumns,
    pub output_path: PathBuf,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            region: DEFAULT_REGION.to_string(),
            year: DEFAULT_YEAR,
            months: DEFAULT_MONTHS.iter().map(|month| month.to_string()).collect(),
            stores: DEFAULT_STORES.iter().map(|store| store.to_string()).collect(),
            layout: SheetLayout::default(),
            store_columns: StoreColumns::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl SummaryConfig {
    /// File name of a month's workbook: `<REGION> - <MONTH>_ <YEAR>.xlsx`.
    pub fn workbook_file_name(&self, month: &str) -> String {
        format!("{} - {}_ {}.xlsx", self.region, month, self.year)
    }

    pub fn workbook_path(&self, month: &str) -> PathBuf {
        self.input_dir.join(self.workbook_file_name(month))
    }

    /// Checks the settings that would otherwise fail every month identically.
    pub fn validate(&self) -> Result<()> {
        self.layout.column_index()?;
        if self.months.is_empty() {
            return Err(ReportError::InvalidConfig("no months configured".into()));
        }
        if self.stores.is_empty() {
            return Err(ReportError::InvalidConfig("no store sheets configured".into()));
        }
        Ok(())
    }
}

/// Converts a column letter such as `G` or `AB` into its zero-based index.
pub fn column_letter_to_index(letters: &str) -> Option<u32> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }

    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    Some(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_map_to_zero_based_indices() {
        assert_eq!(column_letter_to_index("A"), Some(0));
        assert_eq!(column_letter_to_index("G"), Some(6));
        assert_eq!(column_letter_to_index("g"), Some(6));
        assert_eq!(column_letter_to_index("Z"), Some(25));
        assert_eq!(column_letter_to_index("AA"), Some(26));
        assert_eq!(column_letter_to_index("ZZ"), Some(701));
    }

    #[test]
    fn invalid_column_letters_are_rejected() {
        assert_eq!(column_letter_to_index(""), None);
        assert_eq!(column_letter_to_index("G1"), None);
        assert_eq!(column_letter_to_index("7"), None);
    }

    #[test]
    fn workbook_path_follows_naming_template() {
        let config = SummaryConfig::default();
        assert_eq!(
            config.workbook_path("FEBRERO"),
            PathBuf::from("files").join("ECUADOR - FEBRERO_ 2024.xlsx")
        );
    }

    #[test]
    fn default_layout_targets_column_g_after_42_rows() {
        let layout = SheetLayout::default();
        assert_eq!(layout.skip_rows, 42);
        assert_eq!(layout.column_index().unwrap(), 6);
    }

    #[test]
    fn validate_rejects_bad_column_and_empty_lists() {
        let mut config = SummaryConfig::default();
        assert!(config.validate().is_ok());

        config.layout.value_column = "7".into();
        assert!(matches!(config.validate(), Err(ReportError::InvalidConfig(_))));

        let mut config = SummaryConfig::default();
        config.stores.clear();
        assert!(matches!(config.validate(), Err(ReportError::InvalidConfig(_))));

        let mut config = SummaryConfig::default();
        config.months.clear();
        assert!(matches!(config.validate(), Err(ReportError::InvalidConfig(_))));
    }
}
