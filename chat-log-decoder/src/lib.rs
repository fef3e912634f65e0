//! Chat Log Decoder Library
//!
//! A stateless, reusable library that reads exported group-chat transcripts
//! and works out who is still a member.
//!
//! # Architecture
//!
//! The library does two things:
//! - Scans transcript lines and emits join/leave events
//!   ([`EventExtractor`])
//! - Reduces those events to one final status per user ([`StatusReducer`])
//!
//! Locale pattern tables are plain configuration ([`LocaleSpec`]), so new
//! transcript languages are added without touching the extraction code.
//!
//! The library does NOT:
//! - Read files from fixed paths
//! - Render or export tables
//! - Guess the transcript language
//!
//! File handling and report writing live in the application layer
//! (chat-log-cli).
//!
//! # Example Usage
//!
//! ```
//! use chat_log_decoder::{DecoderConfig, EventExtractor, Status};
//!
//! let transcript = "\
//! 1/2/2023, 10:00 - Alice joined using this community's invite link
//! 1/2/2023, 11:00 - Bob joined using this community's invite link
//! 1/2/2023, 12:00 - Alice left
//! ";
//!
//! let extractor = EventExtractor::new(DecoderConfig::new()).unwrap();
//! let extraction = extractor.extract_str(transcript);
//! let table = extraction.status_table();
//!
//! assert_eq!(table.status_of("Bob"), Some(Status::In));
//! assert_eq!(table.status_of("Alice"), Some(Status::Out));
//!
//! for warning in &extraction.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod reducer;
pub mod text;
pub mod types;

// Re-export main types for convenience
pub use config::{DecoderConfig, LocaleSpec, MultiLeavePolicy, DEFAULT_SEPARATOR};
pub use extractor::{EventExtractor, ExtractingIterator};
pub use patterns::LineMatch;
pub use reducer::{sorted_events, StatusReducer};
pub use types::{
    Action, DecoderError, Event, Extraction, LineOutcome, LineWarning, Result, Status,
    StatusTable, Timestamp, UserStatus, WarningKind,
};

// Internal modules (not exposed in public API)
mod patterns;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract and reduce an in-memory transcript in one call
pub fn process_str(transcript: &str, config: DecoderConfig) -> Result<(Extraction, StatusTable)> {
    let extraction = EventExtractor::new(config)?.extract_str(transcript);
    let table = extraction.status_table();
    Ok((extraction, table))
}

/// Extract and reduce a transcript read from `reader` in one call
pub fn process_reader<R: std::io::Read>(
    reader: R,
    config: DecoderConfig,
) -> Result<(Extraction, StatusTable)> {
    let extraction = EventExtractor::new(config)?.extract_reader(reader)?;
    let table = extraction.status_table();
    Ok((extraction, table))
}
