use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{
    ColNum, Format, FormatAlign, FormatBorder, RowNum, Workbook, Worksheet, XlsxError,
};

use crate::adapters::report_writer::{ReportWriteError, ReportWriter};
use crate::domain::report::{CombinedTable, MetricSheet, Report, SessionSheet};

const MAX_SHEET_NAME_CHARS: usize = 31;
const INVALID_SHEET_NAME_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const COMBINED_SHEET_NAME: &str = "All metrics";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const ZOOM_PERCENT: u16 = 150;

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReportWriter;

impl ReportWriter for XlsxReportWriter {
    fn write(&self, report: &Report, path: &Path) -> Result<(), ReportWriteError> {
        let mut workbook = build_workbook(report)?;
        workbook.save(path)?;
        Ok(())
    }
}

/// Session sheets per target, then one sheet per metric, then the combined table.
fn build_workbook(report: &Report) -> Result<Workbook, XlsxError> {
    let styles = Styles::new();
    let mut names = SheetNames::default();
    let combined_name = names.claim(COMBINED_SHEET_NAME);
    let mut workbook = Workbook::new();

    for sheet in &report.session_sheets {
        let name = names.claim(&sheet.target);
        workbook.push_worksheet(session_worksheet(&name, sheet, &styles)?);
    }

    for sheet in &report.metric_sheets {
        let name = names.claim(&sheet.name);
        workbook.push_worksheet(metric_worksheet(&name, sheet, &styles)?);
    }

    workbook.push_worksheet(combined_worksheet(&combined_name, &report.combined, &styles)?);

    Ok(workbook)
}

struct TableHeader {
    label: String,
    width: f64,
}

impl TableHeader {
    fn new(label: impl Into<String>, width: f64) -> Self {
        Self {
            label: label.into(),
            width,
        }
    }
}

struct Styles {
    header: Format,
    cell: Format,
    datetime: Format,
}

impl Styles {
    fn new() -> Self {
        let cell = Format::new()
            .set_font_size(12)
            .set_text_wrap()
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::Top);

        Self {
            header: Format::new()
                .set_bold()
                .set_font_size(13)
                .set_border_bottom(FormatBorder::Thin),
            datetime: cell.clone().set_num_format(DATETIME_FORMAT),
            cell,
        }
    }
}

fn session_worksheet(
    name: &str,
    sheet: &SessionSheet,
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let headers = [
        TableHeader::new("start", 22.0),
        TableHeader::new("stop", 22.0),
        TableHeader::new("duration [min]", 16.0),
    ];
    let mut worksheet = table_worksheet(name, &headers, styles)?;

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_num = data_row(index)?;
        worksheet.write_datetime_with_format(row_num, 0, &row.start, &styles.datetime)?;
        if let Some(stop) = &row.stop {
            worksheet.write_datetime_with_format(row_num, 1, stop, &styles.datetime)?;
        }
        if let Some(minutes) = row.duration_minutes {
            worksheet.write_number_with_format(row_num, 2, minutes, &styles.cell)?;
        }
    }

    Ok(worksheet)
}

fn metric_worksheet(
    name: &str,
    sheet: &MetricSheet,
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let headers = [
        TableHeader::new("timestamp", 22.0),
        TableHeader::new("target", 14.0),
        TableHeader::new(sheet.value_header(), 16.0),
        TableHeader::new("raw", 24.0),
    ];
    let mut worksheet = table_worksheet(name, &headers, styles)?;

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_num = data_row(index)?;
        worksheet.write_datetime_with_format(row_num, 0, &row.timestamp, &styles.datetime)?;
        worksheet.write_string_with_format(row_num, 1, &row.target, &styles.cell)?;
        if let Some(value) = row.value {
            worksheet.write_number_with_format(row_num, 2, value, &styles.cell)?;
        }
        worksheet.write_string_with_format(row_num, 3, &row.raw, &styles.cell)?;
    }

    Ok(worksheet)
}

fn combined_worksheet(
    name: &str,
    table: &CombinedTable,
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let headers: Vec<TableHeader> = std::iter::once(TableHeader::new("timestamp", 22.0))
        .chain(table.columns.iter().map(|column| {
            let label = column.label();
            let width = (label.chars().count() as f64 + 2.0).clamp(12.0, 40.0);
            TableHeader::new(label, width)
        }))
        .collect();
    let mut worksheet = table_worksheet(name, &headers, styles)?;

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = data_row(index)?;
        worksheet.write_datetime_with_format(row_num, 0, &row.timestamp, &styles.datetime)?;
        for (offset, value) in row.values.iter().enumerate() {
            if let Some(value) = value {
                worksheet.write_number_with_format(
                    row_num,
                    column(offset + 1)?,
                    *value,
                    &styles.cell,
                )?;
            }
        }
    }

    Ok(worksheet)
}

fn table_worksheet(
    name: &str,
    headers: &[TableHeader],
    styles: &Styles,
) -> Result<Worksheet, XlsxError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name)?;

    for (index, header) in headers.iter().enumerate() {
        let col = column(index)?;
        worksheet.write_string_with_format(0, col, &header.label, &styles.header)?;
        worksheet.set_column_width(col, header.width)?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    if let Some(last) = headers.len().checked_sub(1) {
        worksheet.autofilter(0, 0, 0, column(last)?)?;
    }
    worksheet.set_zoom(ZOOM_PERCENT);

    Ok(worksheet)
}

fn data_row(index: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column(index: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Hands out worksheet names Excel accepts, unique ignoring case.
#[derive(Debug, Default)]
struct SheetNames {
    used: HashSet<String>,
}

impl SheetNames {
    fn claim(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        let mut candidate = base.clone();
        let mut counter = 2_usize;

        while !self.used.insert(candidate.to_lowercase()) {
            let suffix = format!("~{counter}");
            let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            let prefix: String = base.chars().take(keep).collect();
            candidate = format!("{}{suffix}", prefix.trim_end_matches('\''));
            counter += 1;
        }

        candidate
    }
}

fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|char| {
            if INVALID_SHEET_NAME_CHARS.contains(&char) || char.is_control() {
                '_'
            } else {
                char
            }
        })
        .collect();

    let truncated: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let truncated = truncated.trim_end().trim_end_matches('\'');

    if truncated.is_empty() {
        "Sheet".to_string()
    } else {
        truncated.to_string()
    }
}
