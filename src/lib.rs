//! Core library for the store-sales-summary command line application.
//!
//! A run reads one workbook per month, sums a fixed value column in every
//! store sheet and writes a two-sheet summary. Spreadsheet adapters live under
//! [`io`], the record types in [`model`], the month reduction in
//! [`aggregate`], the summary layout in [`report`] and the end-to-end
//! orchestration in [`pipeline`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use config::SummaryConfig;
pub use error::{ReportError, Result, SheetError};
