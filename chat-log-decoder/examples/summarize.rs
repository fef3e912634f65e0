//! Standalone transcript summary tool
//!
//! Reads an exported chat transcript and prints every user's final
//! membership status, followed by any line warnings.
//!
//! Usage:
//!   summarize <transcript.txt> [--locale <tag>]...
//!
//! Example:
//!   summarize "WhatsApp Chat with Neighbours.txt" --locale en

use chat_log_decoder::{DecoderConfig, EventExtractor, Status};
use std::env;
use std::fs::File;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let mut transcript: Option<PathBuf> = None;
    let mut locales: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--locale" => match args.next() {
                Some(tag) => locales.push(tag),
                None => return Err("--locale needs a value".into()),
            },
            _ => transcript = Some(PathBuf::from(arg)),
        }
    }

    let Some(path) = transcript else {
        eprintln!("Usage: summarize <transcript.txt> [--locale <tag>]...");
        std::process::exit(2);
    };

    let mut config = DecoderConfig::new();
    if !locales.is_empty() {
        config = config.retain_locales(&locales);
    }

    let extractor = EventExtractor::new(config)?;
    let extraction = extractor.extract_reader(File::open(&path)?)?;
    let table = extraction.status_table();

    println!("=== MEMBERSHIP: {} ===", path.display());
    for row in &table {
        println!("{:<40} {}", row.user, row.status);
    }

    println!("\n=== SUMMARY ===");
    println!("Lines scanned: {}", extraction.lines_scanned);
    println!("Events found: {}", extraction.events.len());
    println!("Members in: {}", table.count(Status::In));
    println!("Members out: {}", table.count(Status::Out));

    if extraction.has_warnings() {
        println!("\nWarnings:");
        for warning in &extraction.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}
