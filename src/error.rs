use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the failures that can occur while reading the monthly
/// workbooks, aggregating them, or emitting the summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the sheet reader pool cannot be started.
    #[error("failed to start sheet reader pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Raised when the configuration cannot drive a run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when a summary workbook does not follow the expected layout.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when no store sheet of a month produced data.
    #[error("no store data available for month {0}")]
    EmptyMonth(String),

    /// Raised when the monthly workbook does not exist.
    #[error("workbook not found: {0}")]
    MissingWorkbook(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Failure confined to a single store sheet. The sheet is dropped from its
/// month while the remaining sheets are still aggregated.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet '{0}' does not exist in the workbook")]
    MissingSheet(String),

    #[error("failed to read sheet: {0}")]
    Read(#[from] calamine::XlsxError),

    #[error("column {column} is outside the used range of the sheet")]
    ColumnOutOfRange { column: String },

    #[error("cell {address} holds a non-numeric value '{value}'")]
    NonNumeric { address: String, value: String },
}
