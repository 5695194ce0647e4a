use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::pipeline::{ParseObserver, ParsedLog, PipelineError, parse};

#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse log file: {0}")]
    Pipeline(#[from] PipelineError),
}

pub fn parse_log_file<O>(path: &Path, observer: &O) -> Result<ParsedLog, LogFileError>
where
    O: ParseObserver + ?Sized,
{
    let file = File::open(path).map_err(|source| LogFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    parse(BufReader::new(file), observer).map_err(LogFileError::from)
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::{LogFileError, parse_log_file};
    use crate::domain::pipeline::{NoopObserver, PipelineError};
    use crate::test_support::{fixture, write_log};

    #[test]
    fn parses_fixture_log() {
        let parsed = parse_log_file(&fixture("two_chargepoints.log"), &NoopObserver)
            .expect("fixture should parse");

        assert_eq!(parsed.sessions.len(), 2);
        assert_eq!(parsed.sessions["lp-1"].len(), 2);
        assert_eq!(parsed.sessions["lp-2"].len(), 1);
        assert!(parsed.sessions["lp-2"][0].is_open());
        assert_eq!(parsed.samples.len(), 7);
    }

    #[test]
    fn reports_missing_file_as_open_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let missing = dir.path().join("missing.log");

        let err = parse_log_file(&missing, &NoopObserver).expect_err("missing file must fail");

        match err {
            LogFileError::Open { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn reports_undecodable_content() {
        let (_dir, path) = write_log(&[
            b"X]: [lp-1] INFO 2023/05/31 08:00:00 start charging ->\n".as_slice(),
            b"X]: [lp-1] DEBUG 2023/05/31 08:00:05 temp: 21\xb0C\n".as_slice(),
        ]);

        let err = parse_log_file(&path, &NoopObserver).expect_err("latin-1 byte must fail");

        assert!(matches!(
            err,
            LogFileError::Pipeline(PipelineError::Encoding { line_number: 2 })
        ));
    }
}
