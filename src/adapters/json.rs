use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::adapters::report_writer::{ReportWriteError, ReportWriter};
use crate::domain::report::Report;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportWriter;

impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &Report, path: &Path) -> Result<(), ReportWriteError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::Value;

    use super::JsonReportWriter;
    use crate::adapters::report_writer::{ReportWriteError, ReportWriter};
    use crate::domain::pipeline::{NoopObserver, parse};
    use crate::domain::report::{Report, ReportFilter, build_report};

    #[test]
    fn writes_report_as_json_document() {
        let input = "X]: [lp-1] INFO 2023/05/31 08:00:00 start charging ->\n\
X]: [lp-1] DEBUG 2023/05/31 08:00:05 charge power: 11000W\n";
        let parsed = parse(Cursor::new(input), &NoopObserver).expect("parse should succeed");
        let report = build_report(&parsed, &ReportFilter::default());
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("report.json");

        JsonReportWriter
            .write(&report, &path)
            .expect("json report should be written");

        let content = std::fs::read_to_string(&path).expect("report should be readable");
        let document: Value = serde_json::from_str(&content).expect("report should be json");

        assert_eq!(document["session_sheets"][0]["target"], "lp-1");
        assert_eq!(
            document["session_sheets"][0]["rows"][0]["start"],
            "2023-05-31T08:00:00"
        );
        assert_eq!(document["session_sheets"][0]["rows"][0]["stop"], Value::Null);
        assert_eq!(document["metric_sheets"][0]["unit"], "W");
        assert_eq!(document["metric_sheets"][0]["rows"][0]["value"], 11000.0);
        assert_eq!(document["combined"]["rows"][0]["values"][0], 11000.0);
        assert_eq!(document["skipped_samples"], 0);
    }

    #[test]
    fn fails_when_target_directory_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("missing").join("report.json");

        let err = JsonReportWriter
            .write(&Report::default(), &path)
            .expect_err("missing directory must fail");

        assert!(matches!(err, ReportWriteError::Io(_)));
    }
}
