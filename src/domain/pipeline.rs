use std::collections::BTreeMap;
use std::io::BufRead;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::log_line::{Level, LogRecord, classify_line};
use crate::domain::metrics::{DataPoint, MetricAccumulator, SampleCollection};
use crate::domain::sessions::{
    ChargingPeriod, SessionCollection, SessionTracker, SessionTransition,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read log input: {0}")]
    Io(#[from] std::io::Error),
    #[error("log line {line_number} is not valid UTF-8")]
    Encoding { line_number: usize },
}

/// Side-channel notifications for lines that do not mutate the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    Unmatched {
        line_number: usize,
    },
    Suppressed {
        line_number: usize,
        level: Level,
    },
    Ignored {
        line_number: usize,
        message: &'a str,
    },
    UnmatchedStop {
        line_number: usize,
        target: &'a str,
        timestamp: NaiveDateTime,
    },
    MalformedPayload {
        line_number: usize,
        message: &'a str,
    },
}

pub trait ParseObserver {
    fn observe(&self, event: ParseEvent<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {
    fn observe(&self, _event: ParseEvent<'_>) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleFilter {
    pub name: Option<String>,
    pub target: Option<String>,
}

impl SampleFilter {
    pub fn matches(&self, sample: &DataPoint) -> bool {
        self.name.as_deref().is_none_or(|name| name == sample.name)
            && self
                .target
                .as_deref()
                .is_none_or(|target| target == sample.target)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub sessions: SessionCollection,
    pub samples: SampleCollection,
}

impl ParsedLog {
    pub fn list_sessions(&self, filter: &SessionFilter) -> BTreeMap<&str, &[ChargingPeriod]> {
        self.sessions
            .iter()
            .filter(|(target, _)| {
                filter
                    .target
                    .as_deref()
                    .is_none_or(|wanted| wanted == target.as_str())
            })
            .map(|(target, periods)| (target.as_str(), periods.as_slice()))
            .collect()
    }

    pub fn list_samples(&self, filter: &SampleFilter) -> Vec<&DataPoint> {
        self.samples
            .iter()
            .filter(|sample| filter.matches(sample))
            .collect()
    }

    pub fn period_count(&self) -> usize {
        self.sessions.values().map(Vec::len).sum()
    }

    pub fn open_period_count(&self) -> usize {
        self.sessions
            .values()
            .flatten()
            .filter(|period| period.is_open())
            .count()
    }
}

/// Consumes `reader` to the end in a single forward pass.
///
/// Content that does not fit the grammar is reported to `observer` and
/// skipped; only read failures and undecodable lines abort the run.
pub fn parse<R, O>(mut reader: R, observer: &O) -> Result<ParsedLog, PipelineError>
where
    R: BufRead,
    O: ParseObserver + ?Sized,
{
    let mut sessions = SessionTracker::new();
    let mut metrics = MetricAccumulator::new();
    let mut buffer = Vec::new();
    let mut line_number = 0_usize;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let line = std::str::from_utf8(&buffer)
            .map_err(|_| PipelineError::Encoding { line_number })?;
        let line = line.trim_end_matches(['\n', '\r']);

        let Some(record) = classify_line(line) else {
            observer.observe(ParseEvent::Unmatched { line_number });
            continue;
        };

        dispatch(&record, line_number, &mut sessions, &mut metrics, observer);
    }

    Ok(ParsedLog {
        sessions: sessions.into_periods(),
        samples: metrics.into_samples(),
    })
}

fn dispatch<O>(
    record: &LogRecord,
    line_number: usize,
    sessions: &mut SessionTracker,
    metrics: &mut MetricAccumulator,
    observer: &O,
) where
    O: ParseObserver + ?Sized,
{
    if record.level.is_suppressed() {
        observer.observe(ParseEvent::Suppressed {
            line_number,
            level: record.level,
        });
        return;
    }

    match record.level {
        Level::Info => match sessions.observe(record) {
            SessionTransition::Started { .. } | SessionTransition::Stopped { .. } => {}
            SessionTransition::UnmatchedStop => observer.observe(ParseEvent::UnmatchedStop {
                line_number,
                target: &record.target,
                timestamp: record.timestamp,
            }),
            SessionTransition::Ignored => observer.observe(ParseEvent::Ignored {
                line_number,
                message: &record.message,
            }),
        },
        Level::Debug => {
            if !metrics.observe(record) {
                observer.observe(ParseEvent::MalformedPayload {
                    line_number,
                    message: &record.message,
                });
            }
        }
        _ => observer.observe(ParseEvent::Ignored {
            line_number,
            message: &record.message,
        }),
    }
}
