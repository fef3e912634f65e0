//! JSON export
//!
//! The document carries the table plus the warnings gathered during
//! extraction, so callers can decide how to present skipped lines.

use anyhow::Result;
use chat_log_decoder::{Event, Extraction, LineWarning, StatusTable};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generator: String,
    lines_scanned: usize,
    statuses: &'a StatusTable,
    warnings: &'a [LineWarning],
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline: Option<Vec<Event>>,
}

pub fn write_report<W: Write>(
    extraction: &Extraction,
    table: &StatusTable,
    include_timeline: bool,
    mut writer: W,
) -> Result<()> {
    let report = JsonReport {
        generator: format!("chat-log {}", env!("CARGO_PKG_VERSION")),
        lines_scanned: extraction.lines_scanned,
        statuses: table,
        warnings: &extraction.warnings,
        timeline: include_timeline.then(|| extraction.sorted_events()),
    };

    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_log_decoder::{DecoderConfig, EventExtractor};

    #[test]
    fn test_json_report_shape() {
        let extraction = EventExtractor::new(DecoderConfig::new())
            .unwrap()
            .extract_str("1/2/2023, 10:00 - Alice left\n1/2, 11:00 - Bob left\n");
        let mut buf = Vec::new();
        write_report(&extraction, &extraction.status_table(), true, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["lines_scanned"], 2);
        assert_eq!(value["statuses"][0]["User"], "Alice");
        assert_eq!(value["statuses"][0]["Status"], "Out");
        assert_eq!(value["warnings"][0]["line"], 2);
        assert_eq!(value["warnings"][0]["kind"], "unparsable_timestamp");
        assert_eq!(value["timeline"][0]["action"], "Left");
        assert_eq!(value["timeline"][0]["timestamp"], "2023-01-02T10:00:00");
    }

    #[test]
    fn test_timeline_is_optional() {
        let extraction = Extraction::default();
        let mut buf = Vec::new();
        write_report(&extraction, &StatusTable::default(), false, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value.get("timeline").is_none());
        assert_eq!(value["statuses"], serde_json::json!([]));
    }
}
