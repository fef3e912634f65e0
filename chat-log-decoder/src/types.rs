//! Core types for the chat log decoder library
//!
//! This module defines the values the extractor emits while scanning a
//! transcript and the status table the reducer builds from them. The
//! extractor is stateless between runs: it only reports what each line says.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the decoder
///
/// Transcripts carry local wall-clock times without an offset, so no time
/// zone is attached.
pub type Timestamp = NaiveDateTime;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Fatal errors. Line-local problems are reported as [`LineWarning`] instead.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Transcript is not valid UTF-8 (line {line}): {source}")]
    Encoding {
        /// 1-based line holding the first invalid byte
        line: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Invalid pattern for locale '{locale}': {pattern}: {reason}")]
    InvalidPattern {
        locale: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Membership action carried by a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Joined,
    Left,
}

impl Action {
    /// Status a user ends up in when this is their latest action
    pub fn status(self) -> Status {
        match self {
            Action::Joined => Status::In,
            Action::Left => Status::Out,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Joined => write!(f, "Joined"),
            Action::Left => write!(f, "Left"),
        }
    }
}

/// Final membership state
///
/// The derived ordering (`In` < `Out`) is the table's primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    In,
    Out,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::In => write!(f, "In"),
            Status::Out => write!(f, "Out"),
        }
    }
}

/// A single join or leave detected in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Time the transcript exporter stamped on the line
    pub timestamp: Timestamp,
    /// Display name exactly as it appears (minus surrounding marks)
    pub user: String,
    pub action: Action,
    /// 1-based source line, used to order events with equal timestamps
    pub line: usize,
}

impl Event {
    pub fn new(timestamp: Timestamp, user: impl Into<String>, action: Action, line: usize) -> Self {
        Self {
            timestamp,
            user: user.into(),
            action,
            line,
        }
    }

    /// Chronological sort key
    pub fn order_key(&self) -> (Timestamp, usize) {
        (self.timestamp, self.line)
    }
}

/// A problem confined to one line; the line is skipped and scanning goes on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineWarning {
    /// 1-based source line
    pub line: usize,
    #[serde(flatten)]
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// The line matched an event pattern but its timestamp did not parse
    UnparsableTimestamp { raw: String },
    /// The captured name was empty once whitespace and marks were removed
    EmptyUser,
    /// A multi-user leave line mentioned participants without naming them
    UnattributedLeavers { named: Vec<String>, others: usize },
}

impl fmt::Display for LineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            WarningKind::UnparsableTimestamp { raw } => {
                write!(f, "unparsable timestamp '{}', line skipped", raw)
            }
            WarningKind::EmptyUser => write!(f, "empty user name, line skipped"),
            WarningKind::UnattributedLeavers { named, others } => write!(
                f,
                "{} unnamed participant(s) left alongside [{}]; they cannot be attributed",
                others,
                named.join(", ")
            ),
        }
    }
}

/// What one line produced during extraction
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Event(Event),
    Warning(LineWarning),
}

/// One row of the status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Status")]
    pub status: Status,
}

impl UserStatus {
    pub fn new(user: impl Into<String>, status: Status) -> Self {
        Self {
            user: user.into(),
            status,
        }
    }
}

/// Final membership table: one row per user, `In` rows first, then by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusTable {
    rows: Vec<UserStatus>,
}

impl StatusTable {
    /// Column headers for tabular writers
    pub const HEADERS: [&'static str; 2] = ["User", "Status"];

    pub(crate) fn from_sorted_rows(rows: Vec<UserStatus>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[UserStatus] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<UserStatus> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserStatus> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Status of a given user, if they appear in the table
    pub fn status_of(&self, user: &str) -> Option<Status> {
        self.rows.iter().find(|r| r.user == user).map(|r| r.status)
    }

    pub fn count(&self, status: Status) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    /// Rows as `(user, status-string)` pairs, in table order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .map(|r| (r.user.clone(), r.status.to_string()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a StatusTable {
    type Item = &'a UserStatus;
    type IntoIter = std::slice::Iter<'a, UserStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Everything a single extraction pass produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    /// Detected events in line order (not yet sorted by time)
    pub events: Vec<Event>,
    pub warnings: Vec<LineWarning>,
    /// Number of lines read, matching or not
    pub lines_scanned: usize,
}

impl Extraction {
    /// Reduce the extracted events into the final status table
    pub fn status_table(&self) -> StatusTable {
        crate::reducer::StatusReducer::reduce(&self.events)
    }

    /// Events in chronological order
    pub fn sorted_events(&self) -> Vec<Event> {
        crate::reducer::sorted_events(&self.events)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
