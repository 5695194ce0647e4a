use std::path::Path;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

use crate::domain::report::Report;

pub trait ReportWriter {
    fn write(&self, report: &Report, path: &Path) -> Result<(), ReportWriteError>;
}

#[derive(Debug, Error)]
pub enum ReportWriteError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write report file: {0}")]
    Io(#[from] std::io::Error),
}
