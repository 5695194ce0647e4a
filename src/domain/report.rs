use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::pipeline::{ParsedLog, SampleFilter, SessionFilter};
use crate::domain::quantity::parse_quantity;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub target: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub start: NaiveDateTime,
    pub stop: Option<NaiveDateTime>,
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSheet {
    pub target: String,
    pub rows: Vec<SessionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub timestamp: NaiveDateTime,
    pub target: String,
    pub value: Option<f64>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSheet {
    pub name: String,
    pub unit: Option<String>,
    pub rows: Vec<MetricRow>,
    pub skipped: usize,
}

impl MetricSheet {
    pub fn value_header(&self) -> String {
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("value [{unit}]"),
            _ => "value".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedColumn {
    pub name: String,
    pub target: String,
    pub unit: Option<String>,
}

impl CombinedColumn {
    pub fn label(&self) -> String {
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => {
                format!("{} ({}) [{unit}]", self.name, self.target)
            }
            _ => format!("{} ({})", self.name, self.target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    pub timestamp: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedTable {
    pub columns: Vec<CombinedColumn>,
    pub rows: Vec<CombinedRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub session_sheets: Vec<SessionSheet>,
    pub metric_sheets: Vec<MetricSheet>,
    pub combined: CombinedTable,
    pub skipped_samples: usize,
}

/// Builds every report view from the parsed collections.
///
/// A metric's unit is the first unit that coerced for that name. Samples
/// that do not coerce, or carry a different unit, keep their raw text in
/// the metric sheet but are left out of the combined table.
pub fn build_report(parsed: &ParsedLog, filter: &ReportFilter) -> Report {
    let session_sheets = parsed
        .list_sessions(&SessionFilter {
            target: filter.target.clone(),
        })
        .into_iter()
        .map(|(target, periods)| SessionSheet {
            target: target.to_string(),
            rows: periods
                .iter()
                .map(|period| SessionRow {
                    start: period.start,
                    stop: period.stop,
                    duration_minutes: period
                        .duration()
                        .map(|duration| duration.num_seconds() as f64 / 60.0),
                })
                .collect(),
        })
        .collect();

    let samples = parsed.list_samples(&SampleFilter {
        name: filter.metric.clone(),
        target: filter.target.clone(),
    });

    let mut metric_sheets: Vec<MetricSheet> = Vec::new();
    let mut sheet_index: HashMap<&str, usize> = HashMap::new();
    let mut columns: Vec<CombinedColumn> = Vec::new();
    let mut column_index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut cells: Vec<(NaiveDateTime, usize, f64)> = Vec::new();

    for sample in samples {
        let index = *sheet_index.entry(sample.name.as_str()).or_insert_with(|| {
            metric_sheets.push(MetricSheet {
                name: sample.name.clone(),
                unit: None,
                rows: Vec::new(),
                skipped: 0,
            });
            metric_sheets.len() - 1
        });
        let sheet = &mut metric_sheets[index];

        let value = parse_quantity(&sample.value).and_then(|quantity| {
            let unit = sheet.unit.get_or_insert_with(|| quantity.unit.clone());
            (*unit == quantity.unit).then_some(quantity.value)
        });

        sheet.rows.push(MetricRow {
            timestamp: sample.timestamp,
            target: sample.target.clone(),
            value,
            raw: sample.value.clone(),
        });

        let Some(value) = value else {
            sheet.skipped += 1;
            continue;
        };

        let column = *column_index
            .entry((sample.name.as_str(), sample.target.as_str()))
            .or_insert_with(|| {
                columns.push(CombinedColumn {
                    name: sample.name.clone(),
                    target: sample.target.clone(),
                    unit: None,
                });
                columns.len() - 1
            });
        cells.push((sample.timestamp, column, value));
    }

    for column in &mut columns {
        column.unit = metric_sheets
            .iter()
            .find(|sheet| sheet.name == column.name)
            .and_then(|sheet| sheet.unit.clone());
    }

    let mut aligned: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
    for (timestamp, column, value) in cells {
        let row = aligned
            .entry(timestamp)
            .or_insert_with(|| vec![None; columns.len()]);
        row[column] = Some(value);
    }

    let skipped_samples = metric_sheets.iter().map(|sheet| sheet.skipped).sum();

    Report {
        session_sheets,
        metric_sheets,
        combined: CombinedTable {
            columns,
            rows: aligned
                .into_iter()
                .map(|(timestamp, values)| CombinedRow { timestamp, values })
                .collect(),
        },
        skipped_samples,
    }
}
