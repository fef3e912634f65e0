//! Plain-text tables

use chat_log_decoder::{Event, StatusTable};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the status table with aligned columns
pub fn render_table(table: &StatusTable) -> String {
    let [user_header, status_header] = StatusTable::HEADERS;
    let rows: Vec<[String; 2]> = table
        .iter()
        .map(|row| [row.user.clone(), row.status.to_string()])
        .collect();

    let mut out = render_columns(&[user_header, status_header], &rows);
    let _ = writeln!(
        out,
        "\n{} users: {} in, {} out",
        table.len(),
        table.count(chat_log_decoder::Status::In),
        table.count(chat_log_decoder::Status::Out)
    );
    out
}

/// Render events in the order given
pub fn render_timeline(events: &[Event]) -> String {
    let rows: Vec<[String; 4]> = events
        .iter()
        .map(|e| {
            [
                e.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                e.user.clone(),
                e.action.to_string(),
                e.line.to_string(),
            ]
        })
        .collect();

    render_columns(&["Timestamp", "User", "Action", "Line"], &rows)
}

fn render_columns<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
    let mut widths = (*headers).map(|h| h.width());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    write_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    write_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        write_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(cell.width());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
