pub mod json;
pub mod log_file;
pub mod report_writer;
pub mod xlsx;
