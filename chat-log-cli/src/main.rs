//! Chat Log CLI Application
//!
//! Command-line front end for the chat-log-decoder library. It adds:
//! - Transcript file handling
//! - TOML configuration (locales, policies, output)
//! - Report generation (TXT/CSV/JSON/XLSX)

use anyhow::{bail, Context, Result};
use chat_log_decoder::{EventExtractor, MultiLeavePolicy, Status};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

mod config;
mod report;

use report::{OutputFormat, ReportRequest};

/// Chat Log - Work out group membership from exported chat transcripts
#[derive(Parser, Debug)]
#[command(name = "chat-log")]
#[command(about = "Compute who is in or out of a group from an exported chat transcript", long_about = None)]
#[command(version)]
struct Args {
    /// Exported transcript (.txt)
    #[arg(value_name = "TRANSCRIPT")]
    transcript: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (default: stdout; required for xlsx)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (default: from the output extension, else txt)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Only enable these locales (can be repeated)
    #[arg(long, value_name = "TAG")]
    locale: Vec<String>,

    /// How to treat "X, Y and N others left" lines: decompose, first-named, skip
    #[arg(long, value_name = "POLICY")]
    multi_leave: Option<MultiLeavePolicy>,

    /// Also output the chronological event timeline
    #[arg(long)]
    events: bool,

    /// Fail if any line had to be skipped
    #[arg(long)]
    strict: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Chat Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", chat_log_decoder::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    run(&args, &app_config)
}

fn run(args: &Args, app_config: &config::AppConfig) -> Result<()> {
    let Some(transcript) = args
        .transcript
        .as_ref()
        .or(app_config.input.transcript.as_ref())
    else {
        bail!("No transcript given (pass a file or set input.transcript in the config)");
    };

    // Command-line flags override file values
    let mut decoder_config = app_config.decoder_config();
    if !args.locale.is_empty() {
        decoder_config = decoder_config.retain_locales(&args.locale);
    }
    if let Some(policy) = args.multi_leave {
        decoder_config = decoder_config.with_multi_leave_policy(policy);
    }

    let extractor = EventExtractor::new(decoder_config).context("Invalid extraction settings")?;

    log::info!("Reading transcript: {:?}", transcript);
    let file = File::open(transcript)
        .with_context(|| format!("Failed to open transcript: {:?}", transcript))?;
    let extraction = extractor
        .extract_reader(file)
        .with_context(|| format!("Failed to process transcript: {:?}", transcript))?;
    let table = extraction.status_table();

    log::info!(
        "{} users: {} in, {} out",
        table.len(),
        table.count(Status::In),
        table.count(Status::Out)
    );

    let path = args.output.as_deref().or(app_config.output.path.as_deref());
    let format = args
        .format
        .or(app_config.output.format)
        .or_else(|| path.and_then(OutputFormat::from_path))
        .unwrap_or(OutputFormat::Txt);

    let request = ReportRequest {
        format,
        path,
        include_timeline: args.events || app_config.output.include_timeline,
    };
    report::write_report(&request, &extraction, &table)?;

    if extraction.has_warnings() {
        log::warn!("{} line(s) skipped or partly attributed", extraction.warnings.len());
        if args.strict || app_config.extraction.strict {
            bail!(
                "Strict mode: {} line warning(s) in {:?}",
                extraction.warnings.len(),
                transcript
            );
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
