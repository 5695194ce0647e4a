use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::domain::log_line::LogRecord;

static NAME_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*):\s(?P<value>.*)").expect("name/value pattern is valid")
});

/// One `name: value` sample. The value keeps its unit suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPoint {
    pub target: String,
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub value: String,
}

pub type SampleCollection = Vec<DataPoint>;

#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    samples: SampleCollection,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample for a DEBUG record; returns `false` when the message
    /// has no `name: value` shape.
    pub fn observe(&mut self, record: &LogRecord) -> bool {
        let Some(captures) = NAME_VALUE_PATTERN.captures(&record.message) else {
            return false;
        };
        let (Some(name), Some(value)) = (captures.name("name"), captures.name("value")) else {
            return false;
        };

        self.samples.push(DataPoint {
            target: record.target.clone(),
            timestamp: record.timestamp,
            name: name.as_str().to_string(),
            value: value.as_str().to_string(),
        });
        true
    }

    pub fn into_samples(self) -> SampleCollection {
        self.samples
    }
}
