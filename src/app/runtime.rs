use crate::adapters::json::JsonReportWriter;
use crate::adapters::log_file::parse_log_file;
use crate::adapters::report_writer::ReportWriter;
use crate::adapters::xlsx::XlsxReportWriter;
use crate::app::config::{AppConfig, ReportFormat};
use crate::app::error::AppError;
use crate::app::logging::TracingObserver;
use crate::domain::pipeline::{ParseObserver, ParsedLog};
use crate::domain::report::{Report, build_report};

pub fn run(config: AppConfig) -> Result<(), AppError> {
    let writer: Box<dyn ReportWriter> = match config.format {
        ReportFormat::Xlsx => Box::new(XlsxReportWriter),
        ReportFormat::Json => Box::new(JsonReportWriter),
    };

    let report = generate(&config, &TracingObserver, writer.as_ref())?;

    tracing::info!(
        output = %config.output_path.display(),
        session_sheets = report.session_sheets.len(),
        metric_sheets = report.metric_sheets.len(),
        combined_rows = report.combined.rows.len(),
        "report written"
    );

    Ok(())
}

/// Parses the whole log, then builds and writes the report.
pub fn generate<O, W>(config: &AppConfig, observer: &O, writer: &W) -> Result<Report, AppError>
where
    O: ParseObserver + ?Sized,
    W: ReportWriter + ?Sized,
{
    tracing::info!(input = %config.input_path.display(), "parsing charger log");
    let parsed = parse_log_file(&config.input_path, observer)?;
    log_summary(&parsed);

    let report = build_report(&parsed, &config.filter);
    for sheet in report.metric_sheets.iter().filter(|sheet| sheet.skipped > 0) {
        tracing::warn!(
            metric = %sheet.name,
            unit = sheet.unit.as_deref().unwrap_or(""),
            skipped = sheet.skipped,
            "samples without the metric's numeric unit left out of the combined table"
        );
    }

    writer.write(&report, &config.output_path)?;
    Ok(report)
}

fn log_summary(parsed: &ParsedLog) {
    let mut metric_names: Vec<&str> = parsed
        .samples
        .iter()
        .map(|sample| sample.name.as_str())
        .collect();
    metric_names.sort_unstable();
    metric_names.dedup();

    tracing::info!(
        targets = parsed.sessions.len(),
        periods = parsed.period_count(),
        open_periods = parsed.open_period_count(),
        samples = parsed.samples.len(),
        metrics = metric_names.len(),
        "charger log parsed"
    );

    for period in parsed.sessions.values().flatten() {
        tracing::debug!(
            charge_point = %period.target,
            start = %period.start,
            stop = ?period.stop,
            "charging period"
        );
    }
}
