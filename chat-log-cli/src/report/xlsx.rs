//! Excel export with styled header and auto-sized columns

use anyhow::{Context, Result};
use chat_log_decoder::{Event, Extraction, Status, StatusTable};
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet, XlsxError};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Write a workbook with a "Status" sheet and, optionally, a "Timeline" sheet
pub fn write_workbook(
    path: &Path,
    extraction: &Extraction,
    table: &StatusTable,
    include_timeline: bool,
) -> Result<()> {
    log::info!("Exporting to XLSX: {:?}", path);

    let mut workbook = Workbook::new();

    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|r| vec![r.user.clone(), r.status.to_string()])
        .collect();
    let statuses: Vec<Status> = table.iter().map(|r| r.status).collect();
    let sheet = workbook.add_worksheet().set_name("Status")?;
    write_sheet(sheet, &StatusTable::HEADERS, &rows, |i| Some(statuses[i]))?;

    if include_timeline {
        let events = extraction.sorted_events();
        let rows = timeline_rows(&events);
        let sheet = workbook.add_worksheet().set_name("Timeline")?;
        write_sheet(sheet, &["Timestamp", "User", "Action", "Line"], &rows, |_| None)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook: {:?}", path))?;

    log::info!("Workbook written: {} users", table.len());
    Ok(())
}

fn timeline_rows(events: &[Event]) -> Vec<Vec<String>> {
    events
        .iter()
        .map(|e| {
            vec![
                e.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                e.user.clone(),
                e.action.to_string(),
                e.line.to_string(),
            ]
        })
        .collect()
}

/// Header row, frozen; body rows banded, status cells tinted
fn write_sheet(
    sheet: &mut Worksheet,
    headers: &[&str],
    rows: &[Vec<String>],
    status_of_row: impl Fn(usize) -> Option<Status>,
) -> std::result::Result<(), XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    let mut col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();

    for (row_index, values) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 {
            Color::RGB(0xEAF3FB)
        } else {
            Color::RGB(0xFFFFFF)
        };

        for (col, value) in values.iter().enumerate() {
            let background = match (col, status_of_row(row_index)) {
                (1, Some(Status::In)) => Color::RGB(0xC6EFCE),
                (1, Some(Status::Out)) => Color::RGB(0xFFC7CE),
                _ => band,
            };
            let format = Format::new()
                .set_background_color(background)
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin);

            sheet.write_with_format(row, col as u16, value.as_str(), &format)?;
            col_widths[col] = col_widths[col].max(value.width());
        }
    }

    for (col, width) in col_widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width as f64 + 2.0)?;
    }

    Ok(())
}
