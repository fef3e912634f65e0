//! Report generation
//!
//! Writes the status table (and optionally the event timeline) as plain
//! text, CSV, JSON or an Excel workbook.

pub mod csv;
pub mod json;
pub mod txt;
pub mod xlsx;

use anyhow::{Context, Result};
use chat_log_decoder::{Extraction, StatusTable};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Csv,
    Json,
    Xlsx,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("txt") => Some(OutputFormat::Txt),
            Some("csv") => Some(OutputFormat::Csv),
            Some("json") => Some(OutputFormat::Json),
            Some("xlsx") => Some(OutputFormat::Xlsx),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("The {0:?} format needs an output file (use --output)")]
    PathRequired(OutputFormat),
}

/// What to write and where
pub struct ReportRequest<'a> {
    pub format: OutputFormat,
    /// Output file; `None` means stdout
    pub path: Option<&'a Path>,
    pub include_timeline: bool,
}

/// Write a report for one processed transcript
pub fn write_report(
    request: &ReportRequest<'_>,
    extraction: &Extraction,
    table: &StatusTable,
) -> Result<()> {
    match request.path {
        Some(path) if request.format == OutputFormat::Xlsx => {
            xlsx::write_workbook(path, extraction, table, request.include_timeline)?;
        }
        Some(path) => {
            log::info!("Writing {:?} report to {:?}", request.format, path);
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            let mut writer = BufWriter::new(file);
            write_text_format(request, extraction, table, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_text_format(request, extraction, table, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn write_text_format<W: Write>(
    request: &ReportRequest<'_>,
    extraction: &Extraction,
    table: &StatusTable,
    writer: &mut W,
) -> Result<()> {
    match request.format {
        OutputFormat::Txt => {
            writer.write_all(txt::render_table(table).as_bytes())?;
            if request.include_timeline {
                writeln!(writer)?;
                writer.write_all(txt::render_timeline(&extraction.sorted_events()).as_bytes())?;
            }
        }
        OutputFormat::Csv => csv::write_table(table, &mut *writer)?,
        OutputFormat::Json => {
            json::write_report(extraction, table, request.include_timeline, &mut *writer)?
        }
        // Binary workbooks only go to files
        OutputFormat::Xlsx => return Err(ReportError::PathRequired(OutputFormat::Xlsx).into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_log_decoder::{DecoderConfig, EventExtractor};
    use std::path::PathBuf;

    fn sample() -> (Extraction, StatusTable) {
        let extractor = EventExtractor::new(DecoderConfig::new()).unwrap();
        let extraction = extractor.extract_str(
            "1/2/2023, 10:00 - Alice joined using this community's invite link\n\
             1/2/2023, 12:00 - Alice left\n",
        );
        let table = extraction.status_table();
        (extraction, table)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(&PathBuf::from("a.XLSX")), Some(OutputFormat::Xlsx));
        assert_eq!(OutputFormat::from_path(&PathBuf::from("a.csv")), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_path(&PathBuf::from("a")), None);
    }

    #[test]
    fn test_xlsx_requires_path() {
        let (extraction, table) = sample();
        let request = ReportRequest {
            format: OutputFormat::Xlsx,
            path: None,
            include_timeline: false,
        };
        assert!(write_report(&request, &extraction, &table).is_err());
    }

    #[test]
    fn test_write_csv_report_to_file() {
        let (extraction, table) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.csv");
        let request = ReportRequest {
            format: OutputFormat::Csv,
            path: Some(&path),
            include_timeline: false,
        };

        write_report(&request, &extraction, &table).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "User,Status\nAlice,Out\n");
    }
}
