//! Turns a contact line into a complete [`ContactRecord`].
//!
//! Slots the line leaves empty are inherited from the previous record of the same activation.
//! The first record of an activation must carry time, callsign, frequency and mode itself.

use crate::assign::{Assignment, assign};
use crate::classify::{Classified, classify_all};
use crate::contest::Contest;
use crate::errors::{LogError, LogErrorKind};
use crate::model::{ContactRecord, Mode, TimeOfDay};
use crate::patterns::{FieldKind, TimeToken};
use crate::token::tokenize;
use log::trace;

/// Resolve one contact line against the record before it.
pub fn resolve_line(
    line: &str,
    previous: Option<&ContactRecord>,
    contest: Option<&Contest>,
) -> Result<ContactRecord, LogError> {
    let tokens = tokenize(line);
    let classified = classify_all(&tokens, contest);
    let assignment = assign(&classified)?;
    Resolver { tokens: &classified, assignment: &assignment, previous }.resolve()
}

struct Resolver<'r, 'a> {
    tokens: &'r [Classified<'a>],
    assignment: &'r Assignment,
    previous: Option<&'r ContactRecord>,
}

impl<'r, 'a> Resolver<'r, 'a> {
    fn slot(&self, kind: FieldKind) -> Option<&'r Classified<'a>> {
        self.assignment.get(kind).map(|i| &self.tokens[i])
    }

    /// Offset of the first token on the line.
    fn line_start(&self) -> usize {
        self.tokens.first().map(|c| c.token.start).unwrap_or(0)
    }

    /// Value from the line, else from the previous record, else a missing-field error.
    fn required<T>(
        &self,
        kind: FieldKind,
        from_line: impl FnOnce(&Classified<'a>) -> Option<T>,
        inherit: impl FnOnce(&ContactRecord) -> T,
    ) -> Result<T, LogError> {
        if let Some(v) = self.slot(kind).and_then(from_line) {
            return Ok(v);
        }
        self.previous
            .map(inherit)
            .ok_or_else(|| LogError::missing(kind.name(), self.line_start()))
    }

    fn time(&self) -> Result<TimeOfDay, LogError> {
        let slot = self.slot(FieldKind::Time);
        match slot.and_then(|c| c.matches.time) {
            Some(TimeToken { hour: Some(hour), minute }) => Ok(TimeOfDay::new(hour, minute)),
            Some(TimeToken { hour: None, minute }) => {
                let column = slot.map(|c| c.token.start).unwrap_or(0);
                let prev = self.previous.ok_or_else(|| LogError::missing("time", column))?;
                let mut hour = prev.time.hour;
                if minute < prev.time.minute {
                    hour = (hour + 1) % 24;
                }
                Ok(TimeOfDay::new(hour, minute))
            }
            None => self
                .previous
                .map(|p| p.time)
                .ok_or_else(|| LogError::missing("time", self.line_start())),
        }
    }

    /// Sent or received report, checked against the resolved mode.
    fn report(&self, kind: FieldKind, mode: Mode) -> Result<String, LogError> {
        let (value, column) = match self.slot(kind) {
            Some(c) => (c.matches.rst.clone().unwrap_or_default(), c.token.start),
            None => {
                let inherited = self.previous.map(|p| match kind {
                    FieldKind::RstSent => p.rst_sent.clone(),
                    _ => p.rst_rcvd.clone(),
                });
                (
                    inherited.unwrap_or_else(|| mode.default_report().to_string()),
                    self.line_start(),
                )
            }
        };
        if value.len() != mode.report_len() {
            return Err(LogError::new(
                LogErrorKind::InvalidReportLength { mode, expected: mode.report_len() },
                column,
            ));
        }
        Ok(value)
    }

    fn optional(
        &self,
        kind: FieldKind,
        from_line: impl FnOnce(&Classified<'a>) -> Option<String>,
        inherit: impl FnOnce(&ContactRecord) -> Option<String>,
    ) -> Option<String> {
        match self.slot(kind) {
            Some(c) => from_line(c),
            None => self.previous.and_then(inherit),
        }
    }

    fn notes(&self) -> String {
        self.tokens[self.assignment.notes_from..]
            .iter()
            .map(|c| c.token.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn resolve(&self) -> Result<ContactRecord, LogError> {
        let time = self.time()?;
        let callsign = self.required(FieldKind::Call, |c| c.matches.call.clone(), |p| p.callsign.clone())?;
        let frequency = self.required(FieldKind::Freq, |c| c.matches.freq.clone(), |p| p.frequency.clone())?;
        let mode = self.required(FieldKind::Mode, |c| c.matches.mode, |p| p.mode)?;
        let rst_sent = self.report(FieldKind::RstSent, mode)?;
        let rst_rcvd = self.report(FieldKind::RstRcvd, mode)?;
        let exchange = self.optional(FieldKind::Exchange, |c| c.matches.exchange.clone(), |p| p.exchange.clone());
        let sota_ref = self.optional(FieldKind::SotaRef, |c| c.matches.sota_ref.clone(), |p| p.sota_ref.clone());

        let day_offset = match self.previous {
            Some(p) if time.minutes_of_day() < p.time.minutes_of_day() => p.day_offset + 1,
            Some(p) => p.day_offset,
            None => 0,
        };

        let record = ContactRecord {
            time,
            callsign,
            frequency,
            mode,
            rst_sent,
            rst_rcvd,
            exchange,
            sota_ref,
            notes: self.notes(),
            day_offset,
        };
        trace!("resolved {:?}", record);
        Ok(record)
    }
}

impl ContactRecord {
    /// The record with every field spelled out, in line order. Parsing it back yields the same
    /// record, unless the activation runs a contest and the record has no exchange: the received
    /// report then also reads as the exchange.
    pub fn canonical_line(&self) -> String {
        let mut parts = vec![
            self.time.to_string(),
            self.callsign.clone(),
            self.frequency.label.clone(),
            self.mode.to_string(),
            self.rst_sent.clone(),
            self.rst_rcvd.clone(),
        ];
        parts.extend(self.exchange.iter().cloned());
        parts.extend(self.sota_ref.iter().cloned());
        if !self.notes.is_empty() {
            parts.push(self.notes.clone());
        }
        parts.join(" ")
    }
}
