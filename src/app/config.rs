use std::path::{Path, PathBuf};

use clap::Parser;

use crate::app::AppError;
use crate::domain::report::ReportFilter;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "evcc_log_report",
    version,
    about = "Extract charging sessions and metrics from an evcc log into a report"
)]
pub struct Cli {
    /// Charger log to read
    #[arg(index = 1, value_name = "INPUT", env = "EVCC_LOG_PATH")]
    pub input: String,

    /// Report to write (.xlsx or .json); defaults to INPUT with an .xlsx extension
    #[arg(index = 2, value_name = "OUTPUT", env = "EVCC_REPORT_PATH")]
    pub output: Option<String>,

    /// Only report this charge point / log target
    #[arg(long, value_name = "ID")]
    pub target: Option<String>,

    /// Only report this metric name
    #[arg(long, value_name = "NAME")]
    pub metric: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Json,
}

impl ReportFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub format: ReportFormat,
    pub filter: ReportFilter,
}

impl AppConfig {
    pub fn from_args() -> Result<Self, AppError> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        let input_path = non_empty(Some(cli.input))
            .map(PathBuf::from)
            .ok_or_else(|| AppError::config("INPUT must not be empty"))?;

        let output_path = non_empty(cli.output)
            .map(PathBuf::from)
            .unwrap_or_else(|| input_path.with_extension("xlsx"));

        if output_path == input_path {
            return Err(AppError::config("OUTPUT must differ from INPUT"));
        }

        let format = ReportFormat::from_path(&output_path).ok_or_else(|| {
            AppError::config(format!(
                "OUTPUT {} must end in .xlsx or .json",
                output_path.display()
            ))
        })?;

        Ok(Self {
            input_path,
            output_path,
            format,
            filter: ReportFilter {
                target: non_empty(cli.target),
                metric: non_empty(cli.metric),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    use super::{AppConfig, Cli, ReportFormat};

    fn config(args: &[&str]) -> Result<AppConfig, crate::app::AppError> {
        let argv = std::iter::once("evcc_log_report").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        AppConfig::from_cli(cli)
    }

    #[test]
    fn defaults_output_next_to_input() {
        let result = config(&["logs/evcc_20230525.log"]).expect("config should be valid");

        assert_eq!(result.input_path, PathBuf::from("logs/evcc_20230525.log"));
        assert_eq!(result.output_path, PathBuf::from("logs/evcc_20230525.xlsx"));
        assert_eq!(result.format, ReportFormat::Xlsx);
        assert_eq!(result.filter.target, None);
        assert_eq!(result.filter.metric, None);
    }

    #[test]
    fn selects_json_format_from_extension() {
        let result = config(&["evcc.log", "out/Report.JSON"]).expect("config should be valid");

        assert_eq!(result.format, ReportFormat::Json);
        assert_eq!(result.output_path, PathBuf::from("out/Report.JSON"));
    }

    #[test]
    fn trims_filters_and_drops_blank_ones() {
        let result = config(&["evcc.log", "--target", " lp-1 ", "--metric", "  "])
            .expect("config should be valid");

        assert_eq!(result.filter.target.as_deref(), Some("lp-1"));
        assert_eq!(result.filter.metric, None);
    }

    #[test]
    fn rejects_unknown_output_extension() {
        let result = config(&["evcc.log", "report.csv"]);

        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: OUTPUT report.csv must end in .xlsx or .json"
        );
    }

    #[test]
    fn rejects_blank_input() {
        let result = config(&["   "]);

        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: INPUT must not be empty"
        );
    }

    #[test]
    fn rejects_output_equal_to_input() {
        let result = config(&["report.xlsx"]);

        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: OUTPUT must differ from INPUT"
        );
    }

    #[test]
    fn requires_input_argument() {
        let error = Cli::command()
            .mut_arg("input", |arg| arg.env(None::<&str>))
            .try_get_matches_from(["evcc_log_report"])
            .expect_err("missing INPUT should be rejected");

        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }
}
