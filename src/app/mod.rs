mod config;
mod error;
mod logging;
mod runtime;

pub use config::{AppConfig, Cli, ReportFormat};
pub use error::AppError;
pub use logging::TracingObserver;
pub use runtime::generate;

pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let config = AppConfig::from_args()?;

    tracing::info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        format = ?config.format,
        target_filter = ?config.filter.target,
        metric_filter = ?config.filter.metric,
        "application bootstrap initialized"
    );

    runtime::run(config)
}
