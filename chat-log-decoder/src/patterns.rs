//! Compiled locale pattern sets
//!
//! A [`LocaleSpec`] holds pattern strings; [`CompiledLocale`] holds the
//! compiled regexes and classifies a single line.

use crate::config::LocaleSpec;
use crate::text;
use crate::types::{DecoderError, Result, Timestamp};
use chrono::NaiveDateTime;
use regex::Regex;

/// Classification of one transcript line, before timestamp parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch<'a> {
    /// A join line for a single user
    Join {
        locale: &'a str,
        timestamp: &'a str,
        user: &'a str,
    },
    /// A leave line for a single user
    Leave {
        locale: &'a str,
        timestamp: &'a str,
        user: &'a str,
    },
    /// A leave line naming several users and possibly counting unnamed ones
    MultiLeave {
        locale: &'a str,
        timestamp: &'a str,
        users: Vec<&'a str>,
        others: usize,
    },
    /// Ordinary chat content
    NoMatch,
}

impl LineMatch<'_> {
    pub fn is_match(&self) -> bool {
        !matches!(self, LineMatch::NoMatch)
    }
}

#[derive(Debug)]
pub(crate) struct CompiledLocale {
    tag: String,
    separator: String,
    join: Vec<Regex>,
    leave: Vec<Regex>,
    multi_leave: Vec<Regex>,
    datetime_formats: Vec<String>,
}

impl CompiledLocale {
    pub(crate) fn compile(spec: &LocaleSpec) -> Result<Self> {
        log::debug!(
            "Compiling locale '{}' ({} join, {} leave, {} multi-leave patterns)",
            spec.tag,
            spec.join.len(),
            spec.leave.len(),
            spec.multi_leave.len()
        );

        Ok(Self {
            tag: spec.tag.clone(),
            separator: spec.separator.clone(),
            join: compile_all(&spec.tag, &spec.join, "user")?,
            leave: compile_all(&spec.tag, &spec.leave, "user")?,
            multi_leave: compile_all(&spec.tag, &spec.multi_leave, "users")?,
            datetime_formats: spec.datetime_formats.clone(),
        })
    }

    pub(crate) fn tag(&self) -> &str {
        &self.tag
    }

    /// Classify a line: join patterns first, then multi-leave, then leave
    pub(crate) fn match_line<'a>(&'a self, line: &'a str) -> LineMatch<'a> {
        let Some((timestamp, body)) = line.split_once(self.separator.as_str()) else {
            return LineMatch::NoMatch;
        };
        let timestamp = text::trim_marks(timestamp);
        let body = text::trim_marks(body);
        let locale = self.tag.as_str();

        if let Some(user) = first_capture(&self.join, body, "user") {
            return LineMatch::Join {
                locale,
                timestamp,
                user,
            };
        }

        for regex in &self.multi_leave {
            if let Some(caps) = regex.captures(body) {
                let users = caps
                    .name("users")
                    .map(|m| text::split_names(m.as_str()))
                    .unwrap_or_default();
                // A count too large for usize still has to be reported
                let others = caps
                    .name("others")
                    .map(|m| m.as_str().parse().unwrap_or(usize::MAX))
                    .unwrap_or(0);
                return LineMatch::MultiLeave {
                    locale,
                    timestamp,
                    users,
                    others,
                };
            }
        }

        if let Some(user) = first_capture(&self.leave, body, "user") {
            return LineMatch::Leave {
                locale,
                timestamp,
                user,
            };
        }

        LineMatch::NoMatch
    }

    /// Parse a timestamp with this locale's formats, first success wins
    pub(crate) fn parse_timestamp(&self, raw: &str) -> Option<Timestamp> {
        let normalized = text::normalize_timestamp(raw);
        let raw = normalized.trim();
        self.datetime_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }
}

fn compile_all(locale: &str, patterns: &[String], group: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            let regex = Regex::new(pattern).map_err(|e| DecoderError::InvalidPattern {
                locale: locale.to_string(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(DecoderError::InvalidPattern {
                    locale: locale.to_string(),
                    pattern: pattern.clone(),
                    reason: format!("missing named capture group '{}'", group),
                });
            }

            Ok(regex)
        })
        .collect()
}

/// Trimmed `group` capture of the first matching regex
fn first_capture<'a>(regexes: &[Regex], body: &'a str, group: &str) -> Option<&'a str> {
    regexes.iter().find_map(|regex| {
        regex
            .captures(body)
            .and_then(|caps| caps.name(group))
            .map(|m| text::trim_marks(m.as_str()))
    })
}
