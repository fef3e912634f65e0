//! Decoder configuration types
//!
//! Locales are declared as data: each [`LocaleSpec`] names the separator
//! between timestamp and message, the join/leave patterns and the date-time
//! formats of one transcript flavour. Adding a locale never touches the
//! extraction logic.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator WhatsApp places between the timestamp and the message body
pub const DEFAULT_SEPARATOR: &str = " - ";

/// How to treat "X, Y and N others left" lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiLeavePolicy {
    /// One Left event per named participant
    #[default]
    Decompose,
    /// One Left event for the first named participant only
    FirstNamed,
    /// No events at all
    Skip,
}

impl fmt::Display for MultiLeavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiLeavePolicy::Decompose => write!(f, "decompose"),
            MultiLeavePolicy::FirstNamed => write!(f, "first-named"),
            MultiLeavePolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for MultiLeavePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decompose" => Ok(MultiLeavePolicy::Decompose),
            "first-named" | "first_named" => Ok(MultiLeavePolicy::FirstNamed),
            "skip" => Ok(MultiLeavePolicy::Skip),
            other => Err(format!(
                "unknown multi-leave policy '{}' (expected decompose, first-named or skip)",
                other
            )),
        }
    }
}

/// Pattern table for one transcript locale
///
/// Join and leave patterns must define a `user` capture group. Multi-leave
/// patterns define `users` (the named participants) and may define `others`
/// (the count of unnamed ones). Patterns run against the message body, i.e.
/// the text after the separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSpec {
    /// Short identifier, e.g. "en"
    pub tag: String,

    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub join: Vec<String>,

    #[serde(default)]
    pub leave: Vec<String>,

    #[serde(default)]
    pub multi_leave: Vec<String>,

    /// chrono `strftime` formats, tried in order
    #[serde(default)]
    pub datetime_formats: Vec<String>,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl LocaleSpec {
    /// Create an empty locale with the default separator
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            separator: default_separator(),
            join: Vec::new(),
            leave: Vec::new(),
            multi_leave: Vec::new(),
            datetime_formats: Vec::new(),
        }
    }

    /// English export: `M/D/YY[YY], H:MM[ AM|PM] - text`
    pub fn english() -> Self {
        Self::new("en")
            .with_join(r"^(?P<user>[^:]+?) joined using this (?:community|group)(?:'|’)s invite link$")
            // Name lists start with a name, not a separator
            .with_multi_leave(r"^(?P<users>[^:,\s][^:]*?),? and (?P<others>[0-9]+) others? left$")
            .with_leave(r"^(?P<user>[^:,\s][^:]*?) left$")
            // Two-digit years first: `%Y` would accept "23" as the year 23
            .with_datetime_format("%m/%d/%y, %H:%M")
            .with_datetime_format("%m/%d/%Y, %H:%M")
            .with_datetime_format("%m/%d/%y, %I:%M %p")
            .with_datetime_format("%m/%d/%Y, %I:%M %p")
    }

    /// Hebrew export: `D.M.YY[YY], H:MM - text`
    pub fn hebrew() -> Self {
        Self::new("he")
            .with_join(r"^ההצטרפות של (?P<user>.+?) בוצעה")
            .with_leave(r"^(?P<user>[^:]+?) יצא/ה$")
            .with_datetime_format("%d.%m.%y, %H:%M")
            .with_datetime_format("%d.%m.%Y, %H:%M")
    }

    /// All locales shipped with the library
    pub fn builtin() -> Vec<Self> {
        vec![Self::english(), Self::hebrew()]
    }

    /// Builder method: set the timestamp/body separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Builder method: add a join pattern
    pub fn with_join(mut self, pattern: impl Into<String>) -> Self {
        self.join.push(pattern.into());
        self
    }

    /// Builder method: add a leave pattern
    pub fn with_leave(mut self, pattern: impl Into<String>) -> Self {
        self.leave.push(pattern.into());
        self
    }

    /// Builder method: add a multi-user leave pattern
    pub fn with_multi_leave(mut self, pattern: impl Into<String>) -> Self {
        self.multi_leave.push(pattern.into());
        self
    }

    /// Builder method: add a date-time format
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_formats.push(format.into());
        self
    }
}

/// Configuration for the extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Locales tried in order for every line
    #[serde(default = "LocaleSpec::builtin")]
    pub locales: Vec<LocaleSpec>,

    #[serde(default)]
    pub multi_leave: MultiLeavePolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            locales: LocaleSpec::builtin(),
            multi_leave: MultiLeavePolicy::default(),
        }
    }
}

impl DecoderConfig {
    /// Create a configuration with the built-in locales
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration without any locale
    pub fn empty() -> Self {
        Self {
            locales: Vec::new(),
            multi_leave: MultiLeavePolicy::default(),
        }
    }

    /// Builder method: append a locale
    pub fn with_locale(mut self, locale: LocaleSpec) -> Self {
        self.locales.push(locale);
        self
    }

    /// Builder method: replace all locales
    pub fn with_locales(mut self, locales: Vec<LocaleSpec>) -> Self {
        self.locales = locales;
        self
    }

    /// Builder method: keep only locales whose tag is listed
    pub fn retain_locales<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.locales
            .retain(|l| tags.iter().any(|t| t.as_ref() == l.tag));
        self
    }

    /// Builder method: set the multi-user leave policy
    pub fn with_multi_leave_policy(mut self, policy: MultiLeavePolicy) -> Self {
        self.multi_leave = policy;
        self
    }

    /// Look up a locale by tag
    pub fn locale(&self, tag: &str) -> Option<&LocaleSpec> {
        self.locales.iter().find(|l| l.tag == tag)
    }

    /// Check structural requirements that do not need regex compilation
    pub fn validate(&self) -> Result<()> {
        if self.locales.is_empty() {
            return Err(DecoderError::InvalidConfig(
                "no locale enabled".to_string(),
            ));
        }

        for locale in &self.locales {
            if locale.separator.is_empty() {
                return Err(DecoderError::InvalidConfig(format!(
                    "locale '{}' has an empty separator",
                    locale.tag
                )));
            }
            if locale.datetime_formats.is_empty() {
                return Err(DecoderError::InvalidConfig(format!(
                    "locale '{}' has no date-time format",
                    locale.tag
                )));
            }
            if locale.join.is_empty() && locale.leave.is_empty() && locale.multi_leave.is_empty() {
                return Err(DecoderError::InvalidConfig(format!(
                    "locale '{}' has no join or leave pattern",
                    locale.tag
                )));
            }
        }

        Ok(())
    }
}
