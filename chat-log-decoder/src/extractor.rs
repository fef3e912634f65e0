//! Main extraction API
//!
//! The [`EventExtractor`] is the entry point for turning transcript text into
//! membership events. It compiles the configured locales once and can then be
//! run over any number of transcripts.

use crate::config::{DecoderConfig, MultiLeavePolicy};
use crate::patterns::{CompiledLocale, LineMatch};
use crate::types::{
    Action, DecoderError, Event, Extraction, LineOutcome, LineWarning, Result, WarningKind,
};
use std::collections::VecDeque;
use std::io::Read;

/// Scans transcript lines for join and leave events
#[derive(Debug)]
pub struct EventExtractor {
    locales: Vec<CompiledLocale>,
    multi_leave: MultiLeavePolicy,
}

impl EventExtractor {
    /// Compile the configured locales
    ///
    /// # Arguments
    /// * `config` - Locales and multi-leave policy
    ///
    /// # Returns
    /// * `Result<EventExtractor>` - Err if the config is structurally invalid
    ///   or a pattern fails to compile
    ///
    /// # Example
    /// ```
    /// use chat_log_decoder::{DecoderConfig, EventExtractor};
    ///
    /// let extractor = EventExtractor::new(DecoderConfig::new()).unwrap();
    /// let extraction = extractor.extract_str("1/2/2023, 10:00 - Alice left\n");
    /// assert_eq!(extraction.events.len(), 1);
    /// ```
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;

        let locales = config
            .locales
            .iter()
            .map(CompiledLocale::compile)
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Extractor ready: locales [{}], multi-leave policy '{}'",
            locales.iter().map(|l| l.tag()).collect::<Vec<_>>().join(", "),
            config.multi_leave
        );

        Ok(Self {
            locales,
            multi_leave: config.multi_leave,
        })
    }

    /// Classify a single line against all locales, in configuration order
    pub fn match_line<'a>(&'a self, line: &'a str) -> LineMatch<'a> {
        let line = crate::text::strip_line(line);
        self.locales
            .iter()
            .map(|locale| locale.match_line(line))
            .find(|m| m.is_match())
            .unwrap_or(LineMatch::NoMatch)
    }

    /// Lazily extract events and warnings, in line order
    ///
    /// Non-matching lines produce nothing. A multi-user leave line may produce
    /// several items.
    pub fn events<I, S>(&self, lines: I) -> ExtractingIterator<'_, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ExtractingIterator::new(lines.into_iter(), self)
    }

    /// Extract everything from a sequence of lines
    pub fn extract_lines<I, S>(&self, lines: I) -> Extraction
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut iter = self.events(lines);
        let mut extraction = Extraction::default();

        for outcome in iter.by_ref() {
            match outcome {
                LineOutcome::Event(event) => extraction.events.push(event),
                LineOutcome::Warning(warning) => extraction.warnings.push(warning),
            }
        }
        extraction.lines_scanned = iter.lines_scanned();

        log::info!(
            "Scanned {} lines: {} events, {} warnings",
            extraction.lines_scanned,
            extraction.events.len(),
            extraction.warnings.len()
        );

        extraction
    }

    /// Extract everything from an in-memory transcript
    pub fn extract_str(&self, transcript: &str) -> Extraction {
        self.extract_lines(transcript.lines())
    }

    /// Extract from raw bytes, failing on invalid UTF-8
    ///
    /// No partial result is returned when the input is not UTF-8.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction> {
        let transcript = std::str::from_utf8(bytes).map_err(|source| {
            let valid = &bytes[..source.valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
            DecoderError::Encoding { line, source }
        })?;

        Ok(self.extract_str(transcript))
    }

    /// Read the whole input into memory, then extract
    pub fn extract_reader<R: Read>(&self, mut reader: R) -> Result<Extraction> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.extract_bytes(&bytes)
    }

    /// Turn one line into zero or more outcomes
    fn process_line(&self, line_no: usize, line: &str) -> Vec<LineOutcome> {
        let (locale_tag, timestamp, users, others) = match self.match_line(line) {
            LineMatch::NoMatch => {
                log::trace!("line {}: no event", line_no);
                return Vec::new();
            }
            LineMatch::Join {
                locale,
                timestamp,
                user,
            } => {
                return self.single_event(line_no, locale, timestamp, user, Action::Joined);
            }
            LineMatch::Leave {
                locale,
                timestamp,
                user,
            } => {
                return self.single_event(line_no, locale, timestamp, user, Action::Left);
            }
            LineMatch::MultiLeave {
                locale,
                timestamp,
                users,
                others,
            } => (locale, timestamp, users, others),
        };

        if users.is_empty() && others == 0 {
            return vec![self.warning(line_no, WarningKind::EmptyUser)];
        }

        let mut outcomes = Vec::new();

        if others > 0 || self.multi_leave != MultiLeavePolicy::Decompose {
            outcomes.push(self.warning(
                line_no,
                WarningKind::UnattributedLeavers {
                    named: users.iter().map(|u| u.to_string()).collect(),
                    others,
                },
            ));
        }

        let attributed: &[&str] = match self.multi_leave {
            MultiLeavePolicy::Decompose => users.as_slice(),
            MultiLeavePolicy::FirstNamed => &users[..users.len().min(1)],
            MultiLeavePolicy::Skip => &users[..0],
        };
        if attributed.is_empty() {
            return outcomes;
        }

        let Some(ts) = self.locale(locale_tag).and_then(|l| l.parse_timestamp(timestamp)) else {
            outcomes.push(self.warning(
                line_no,
                WarningKind::UnparsableTimestamp {
                    raw: timestamp.to_string(),
                },
            ));
            return outcomes;
        };

        for user in attributed {
            log::debug!("line {}: {} left (multi-user line)", line_no, user);
            outcomes.push(LineOutcome::Event(Event::new(ts, *user, Action::Left, line_no)));
        }
        outcomes
    }

    fn single_event(
        &self,
        line_no: usize,
        locale_tag: &str,
        timestamp: &str,
        user: &str,
        action: Action,
    ) -> Vec<LineOutcome> {
        if user.is_empty() {
            return vec![self.warning(line_no, WarningKind::EmptyUser)];
        }

        match self.locale(locale_tag).and_then(|l| l.parse_timestamp(timestamp)) {
            Some(ts) => {
                log::debug!("line {}: {} {} [{}]", line_no, user, action, locale_tag);
                vec![LineOutcome::Event(Event::new(ts, user, action, line_no))]
            }
            None => vec![self.warning(
                line_no,
                WarningKind::UnparsableTimestamp {
                    raw: timestamp.to_string(),
                },
            )],
        }
    }

    fn warning(&self, line: usize, kind: WarningKind) -> LineOutcome {
        let warning = LineWarning { line, kind };
        log::warn!("{}", warning);
        LineOutcome::Warning(warning)
    }

    fn locale(&self, tag: &str) -> Option<&CompiledLocale> {
        self.locales.iter().find(|l| l.tag() == tag)
    }
}

/// Iterator that turns lines into extraction outcomes
///
/// Lines that yield several outcomes (multi-user leaves) are buffered and
/// emitted one by one before the next line is read.
pub struct ExtractingIterator<'a, I> {
    lines: I,
    extractor: &'a EventExtractor,
    pending: VecDeque<LineOutcome>,
    line_no: usize,
}

impl<'a, I> ExtractingIterator<'a, I> {
    fn new(lines: I, extractor: &'a EventExtractor) -> Self {
        Self {
            lines,
            extractor,
            pending: VecDeque::new(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_scanned(&self) -> usize {
        self.line_no
    }
}

impl<I, S> Iterator for ExtractingIterator<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = LineOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(outcome) = self.pending.pop_front() {
                return Some(outcome);
            }

            let line = self.lines.next()?;
            self.line_no += 1;
            self.pending
                .extend(self.extractor.process_line(self.line_no, line.as_ref()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocaleSpec;

    fn extractor() -> EventExtractor {
        EventExtractor::new(DecoderConfig::new()).unwrap()
    }

    #[test]
    fn test_extract_join_and_leave() {
        let extraction = extractor().extract_lines([
            "1/2/2023, 10:00 - Alice joined using this community's invite link",
            "1/2/2023, 10:01 - Alice: hello everyone",
            "1/2/2023, 12:00 - Alice left",
        ]);

        assert_eq!(extraction.lines_scanned, 3);
        assert_eq!(extraction.events.len(), 2);
        assert_eq!(extraction.events[0].action, Action::Joined);
        assert_eq!(extraction.events[0].line, 1);
        assert_eq!(extraction.events[1].action, Action::Left);
        assert_eq!(extraction.events[1].line, 3);
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_unparsable_timestamp_is_a_warning() {
        let extraction = extractor().extract_lines([
            "1/2, 10:00 - Alice left",
            "1/2/2023, 11:00 - Bob left",
        ]);

        assert_eq!(extraction.events.len(), 1);
        assert_eq!(extraction.events[0].user, "Bob");
        assert_eq!(
            extraction.warnings,
            vec![LineWarning {
                line: 1,
                kind: WarningKind::UnparsableTimestamp {
                    raw: "1/2, 10:00".to_string()
                },
            }]
        );
    }

    #[test]
    fn test_empty_user_is_a_warning() {
        let config = DecoderConfig::empty().with_locale(
            LocaleSpec::new("xx")
                .with_leave(r"^(?P<user>.*)left$")
                .with_datetime_format("%m/%d/%Y, %H:%M"),
        );
        let extraction = EventExtractor::new(config)
            .unwrap()
            .extract_lines(["1/2/2023, 10:00 - \u{200E} left"]);

        assert!(extraction.events.is_empty());
        assert_eq!(extraction.warnings[0].kind, WarningKind::EmptyUser);
    }

    #[test]
    fn test_multi_leave_policies() {
        let line = "1/2/2023, 13:00 - Alice, Bob, and 2 others left";

        let decompose = extractor().extract_lines([line]);
        let users: Vec<_> = decompose.events.iter().map(|e| e.user.as_str()).collect();
        assert_eq!(users, vec!["Alice", "Bob"]);
        assert_eq!(
            decompose.warnings[0].kind,
            WarningKind::UnattributedLeavers {
                named: vec!["Alice".to_string(), "Bob".to_string()],
                others: 2,
            }
        );

        let first = EventExtractor::new(
            DecoderConfig::new().with_multi_leave_policy(MultiLeavePolicy::FirstNamed),
        )
        .unwrap()
        .extract_lines([line]);
        assert_eq!(first.events.len(), 1);
        assert_eq!(first.events[0].user, "Alice");
        assert_eq!(first.warnings.len(), 1);

        let skip = EventExtractor::new(
            DecoderConfig::new().with_multi_leave_policy(MultiLeavePolicy::Skip),
        )
        .unwrap()
        .extract_lines([line]);
        assert!(skip.events.is_empty());
        assert_eq!(skip.warnings.len(), 1);
    }

    #[test]
    fn test_oversized_others_count_is_still_reported() {
        let extraction = extractor()
            .extract_lines(["1/2/2023, 10:00 - Alice, and 99999999999999999999999 others left"]);

        assert_eq!(extraction.events.len(), 1);
        assert_eq!(extraction.events[0].user, "Alice");
        assert_eq!(
            extraction.warnings[0].kind,
            WarningKind::UnattributedLeavers {
                named: vec!["Alice".to_string()],
                others: usize::MAX,
            }
        );
    }

    #[test]
    fn test_multi_leave_with_unparsable_timestamp() {
        let extraction = extractor().extract_lines(["1/2, 13:00 - Alice, Bob, and 2 others left"]);

        assert!(extraction.events.is_empty());
        assert_eq!(
            extraction.warnings,
            vec![
                LineWarning {
                    line: 1,
                    kind: WarningKind::UnattributedLeavers {
                        named: vec!["Alice".to_string(), "Bob".to_string()],
                        others: 2,
                    },
                },
                LineWarning {
                    line: 1,
                    kind: WarningKind::UnparsableTimestamp {
                        raw: "1/2, 13:00".to_string()
                    },
                },
            ]
        );
    }

    #[test]
    fn test_multi_leave_without_names_is_empty_user() {
        let config = DecoderConfig::empty().with_locale(
            LocaleSpec::new("xx")
                .with_multi_leave(r"^(?P<users>[^:]*?),? and (?P<others>[0-9]+) others? left$")
                .with_datetime_format("%m/%d/%Y, %H:%M"),
        );
        let extraction = EventExtractor::new(config)
            .unwrap()
            .extract_lines(["1/2/2023, 13:00 -  , and 0 others left"]);

        assert!(extraction.events.is_empty());
        assert_eq!(extraction.warnings[0].kind, WarningKind::EmptyUser);
    }

    #[test]
    fn test_name_containing_and_is_one_user() {
        let extraction = extractor().extract_lines(["1/2/2023, 13:00 - Alice and Bob left"]);

        assert_eq!(extraction.events.len(), 1);
        assert_eq!(extraction.events[0].user, "Alice and Bob");
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_events_iterator_is_lazy_and_ordered() {
        let ex = extractor();
        let lines = vec![
            "1/2/2023, 13:00 - Alice, Bob, and 1 other left".to_string(),
            "1/2/2023, 14:00 - Carol left".to_string(),
        ];
        let outcomes: Vec<_> = ex.events(&lines).collect();

        assert_eq!(outcomes.len(), 4);
        assert!(matches!(outcomes[0], LineOutcome::Warning(_)));
        assert!(matches!(&outcomes[3], LineOutcome::Event(e) if e.user == "Carol" && e.line == 2));
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let bytes = b"1/2/2023, 10:00 - Alice left\n1/2/2023, 11:00 - B\xFFb left\n";
        let err = extractor().extract_bytes(bytes).unwrap_err();
        assert!(matches!(err, DecoderError::Encoding { line: 2, .. }));
    }

    #[test]
    fn test_extract_reader() {
        let input = "\u{FEFF}1/2/2023, 10:00 - Alice left\r\n".as_bytes();
        let extraction = extractor().extract_reader(input).unwrap();
        assert_eq!(extraction.events.len(), 1);
        assert_eq!(extraction.events[0].user, "Alice");
    }

    #[test]
    fn test_empty_config_is_rejected() {
        assert!(EventExtractor::new(DecoderConfig::empty()).is_err());
    }
}
