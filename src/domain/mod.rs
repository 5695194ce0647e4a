pub mod log_line;
pub mod metrics;
pub mod pipeline;
pub mod quantity;
pub mod report;
pub mod sessions;
