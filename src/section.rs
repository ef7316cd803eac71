//! Splits a log stream into activations and feeds their contact lines to the resolver.
//!
//! A normal line opens a new activation when it is the first one of the stream or follows a
//! blank line that came after at least one contact. Blank lines sandwiched between comments
//! do not count as separators.

use crate::errors::{AppError, LineError, LogError};
use crate::header::parse_header;
use crate::model::Log;
use crate::resolve::resolve_line;
use log::{debug, info, trace};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Where the stream stands with respect to activation separators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionState {
    /// Inside an activation, the last line was a header or contact.
    InSection,
    /// The last significant line was a comment.
    AfterComment,
    /// A separating blank line was seen; the next normal line is a header.
    AfterBlank,
    /// A blank line followed a comment. A following normal line confirms it as a separator, a
    /// following comment withdraws it.
    PendingBlankConfirmation,
}

impl SectionState {
    fn on_comment(self) -> Self {
        match self {
            SectionState::AfterBlank => SectionState::AfterBlank,
            _ => SectionState::AfterComment,
        }
    }

    /// Only called once the open activation holds a contact.
    fn on_blank(self) -> Self {
        match self {
            SectionState::AfterComment => SectionState::PendingBlankConfirmation,
            _ => SectionState::AfterBlank,
        }
    }

    fn separates(self) -> bool {
        matches!(self, SectionState::AfterBlank | SectionState::PendingBlankConfirmation)
    }
}

/// A physical line with its comment removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineClass<'a> {
    Comment,
    Blank,
    Normal(&'a str),
}

#[inline]
fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}

pub fn classify_line(raw: &str) -> LineClass<'_> {
    let raw = strip_bom(raw);
    let (content, commented) = match raw.split_once('#') {
        Some((before, _)) => (before, true),
        None => (raw, false),
    };
    let content = content.trim();
    match (content.is_empty(), commented) {
        (false, _) => LineClass::Normal(content),
        (true, true) => LineClass::Comment,
        (true, false) => LineClass::Blank,
    }
}

/// Incremental parser over the lines of one stream.
#[derive(Debug)]
pub struct LogParser {
    state: SectionState,
    log: Log,
    errors: Vec<LineError>,
    line_number: usize,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            state: SectionState::InSection,
            log: Log::default(),
            errors: Vec::new(),
            line_number: 0,
        }
    }

    pub fn feed_line(&mut self, raw: &str) {
        self.line_number += 1;
        match classify_line(raw) {
            LineClass::Comment => self.state = self.state.on_comment(),
            LineClass::Blank => {
                let has_contacts = self
                    .log
                    .activations
                    .last()
                    .is_some_and(|a| !a.records().is_empty());
                if has_contacts {
                    self.state = self.state.on_blank();
                }
            }
            LineClass::Normal(text) => {
                if self.state.separates() || self.log.activations.is_empty() {
                    self.open_activation(text);
                } else {
                    self.state = SectionState::InSection;
                    self.add_contact(text);
                }
            }
        }
        trace!("line {}: {:?}", self.line_number, self.state);
    }

    fn open_activation(&mut self, text: &str) {
        match parse_header(text, self.log.activations.last()) {
            Ok(activation) => {
                debug!(
                    "line {}: activation {} {} {}",
                    self.line_number,
                    activation.callsign,
                    activation.date,
                    if activation.is_chase() { "chase" } else { activation.sota_ref.as_str() }
                );
                self.log.activations.push(activation);
                self.state = SectionState::InSection;
            }
            Err(e) => {
                // a failed header leaves the separator pending so the next line retries
                if self.state.separates() {
                    self.state = SectionState::AfterBlank;
                }
                self.fail(text, e);
            }
        }
    }

    fn add_contact(&mut self, text: &str) {
        let Some(activation) = self.log.activations.last_mut() else {
            return;
        };
        match resolve_line(text, activation.last_record(), activation.contest.as_ref()) {
            Ok(record) => {
                debug!(
                    "line {}: qso {} {} {} {}",
                    self.line_number, record.time, record.callsign, record.frequency, record.mode
                );
                activation.push_record(record);
            }
            Err(e) => self.fail(text, e),
        }
    }

    fn fail(&mut self, text: &str, e: LogError) {
        debug!("line {}: {}", self.line_number, e);
        self.errors.push(LineError::from_log_error(self.line_number, text, e));
    }

    /// The parsed log, or every line error collected.
    pub fn finish(self) -> Result<Log, Vec<LineError>> {
        if self.errors.is_empty() {
            Ok(self.log)
        } else {
            Err(self.errors)
        }
    }
}

pub fn parse_str(input: &str) -> Result<Log, Vec<LineError>> {
    let mut parser = LogParser::new();
    for line in input.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

pub fn parse_file(path: &Path) -> Result<Log, AppError> {
    let f = File::open(path).map_err(|e| AppError::IO(format!("open {}: {}", path.display(), e)))?;
    parse_reader(BufReader::new(f), &path.display().to_string())
}

pub fn parse_reader<R: BufRead>(mut reader: R, source_name: &str) -> Result<Log, AppError> {
    #[inline]
    fn read_next_line<R: BufRead>(r: &mut R, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = r.read_line(buf)?;
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(n)
    }

    let mut parser = LogParser::new();
    let mut line = String::new();
    while read_next_line(&mut reader, &mut line)? > 0 {
        parser.feed_line(&line);
    }

    match parser.finish() {
        Ok(log) => {
            info!(
                "{}: {} activation(s), {} qso(s)",
                source_name,
                log.activations.len(),
                log.record_count()
            );
            Ok(log)
        }
        Err(errors) => Err(AppError::Log { source_name: source_name.to_string(), errors }),
    }
}
