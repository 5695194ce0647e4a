use thiserror::Error;

use crate::adapters::log_file::LogFileError;
use crate::adapters::report_writer::ReportWriteError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read charger log: {0}")]
    Parse(#[from] LogFileError),
    #[error("failed to write report: {0}")]
    Report(#[from] ReportWriteError),
}

impl AppError {
    pub fn logging_init<E: std::fmt::Display>(error: E) -> Self {
        Self::LoggingInit(error.to_string())
    }

    pub fn config<E: std::fmt::Display>(error: E) -> Self {
        Self::Config(error.to_string())
    }
}
