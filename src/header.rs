//! Activation header lines: `[callsign] [date] <reference | *> [notes...]`.

use crate::contest::Contest;
use crate::errors::LogError;
use crate::model::Activation;
use crate::patterns::{match_call, match_date, match_sota_ref};
use crate::token::{Token, tokenize};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static CONTEST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"contest:(\w+)\s*").unwrap());

/// Build an activation from its header line. Callsign and date fall back to the previous
/// activation; the reference must always be given, `*` meaning a chase.
pub fn parse_header(line: &str, previous: Option<&Activation>) -> Result<Activation, LogError> {
    let tokens = tokenize(line);
    let mut words = tokens.iter().peekable();
    // offset reported when the line runs out of words
    let eol = line.len();
    let pos = |t: Option<&Token<'_>>| t.map(|t| t.start).unwrap_or(eol);

    let callsign = match words.peek().and_then(|t| match_call(t.text)) {
        Some(call) => {
            words.next();
            call
        }
        None => match previous {
            Some(p) => p.callsign.clone(),
            None => return Err(LogError::missing("callsign", pos(words.peek().copied()))),
        },
    };

    let date = match words.peek().and_then(|t| match_date(t.text).map(|d| (t.start, d))) {
        Some((start, (y, m, d))) => {
            words.next();
            NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| LogError::header("invalid date", start))?
        }
        None => match previous {
            Some(p) => p.date,
            None => return Err(LogError::missing("date", pos(words.peek().copied()))),
        },
    };

    let reference = words.next();
    let sota_ref = match reference.map(|t| t.text) {
        Some("*") => String::new(),
        Some(text) => match match_sota_ref(text) {
            Some(r) => r,
            None => return Err(LogError::header("invalid SOTA reference", pos(reference))),
        },
        None => return Err(LogError::header("invalid SOTA reference", eol)),
    };

    let notes_start = reference.map(|t| t.end).unwrap_or(eol);
    let rest = &line[notes_start..];
    let (contest, notes) = match CONTEST_RE.captures(rest) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let contest = Contest::lookup(name).ok_or_else(|| {
                LogError::header(format!("undefined contest {}", name), notes_start + whole.start)
            })?;
            let notes = format!("{}{}", &rest[..whole.start], &rest[whole.end..]);
            (Some(contest), notes.trim().to_string())
        }
        None => (None, rest.trim().to_string()),
    };

    Ok(Activation::new(callsign, date, sota_ref, contest, notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LogErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_header() {
        let a = parse_header("yo3xyz 2024-06-01 yo/ec-001 nice wx", None).unwrap();
        assert_eq!(a.callsign, "YO3XYZ");
        assert_eq!(a.date, date(2024, 6, 1));
        assert_eq!(a.sota_ref, "YO/EC-001");
        assert_eq!(a.notes, "nice wx");
        assert!(a.contest.is_none());
        assert!(a.records().is_empty());
    }

    #[test]
    fn chase_and_dotted_date() {
        let a = parse_header("YO3XYZ 2024.06.01 *", None).unwrap();
        assert!(a.is_chase());
        assert_eq!(a.date, date(2024, 6, 1));
        assert_eq!(a.notes, "");
    }

    #[test]
    fn inherits_callsign_and_date() {
        let prev = parse_header("YO3XYZ 2024-06-01 YO/EC-001", None).unwrap();
        let a = parse_header("YO/EC-002", Some(&prev)).unwrap();
        assert_eq!(a.callsign, "YO3XYZ");
        assert_eq!(a.date, prev.date);
        assert_eq!(a.sota_ref, "YO/EC-002");

        let a = parse_header("2024-06-02 *", Some(&prev)).unwrap();
        assert_eq!(a.callsign, "YO3XYZ");
        assert_eq!(a.date, date(2024, 6, 2));
    }

    #[test]
    fn missing_callsign_without_previous() {
        let err = parse_header("2024-06-01 YO/EC-001", None).unwrap_err();
        assert_eq!(err.kind, LogErrorKind::MissingRequiredField("callsign"));
        assert_eq!(err.column, 0);
    }

    #[test]
    fn missing_date_without_previous() {
        let err = parse_header("YO3XYZ YO/EC-001", None).unwrap_err();
        assert_eq!(err.kind, LogErrorKind::MissingRequiredField("date"));
        assert_eq!(err.column, 7);
    }

    #[test]
    fn bad_date_and_reference() {
        let err = parse_header("YO3XYZ 2024-02-30 YO/EC-001", None).unwrap_err();
        assert_eq!(err.kind, LogErrorKind::MalformedHeader("invalid date".into()));
        assert_eq!(err.column, 7);

        let err = parse_header("YO3XYZ 2024-02-03 somewhere", None).unwrap_err();
        assert_eq!(
            err.kind,
            LogErrorKind::MalformedHeader("invalid SOTA reference".into())
        );
        assert_eq!(err.column, 18);

        let err = parse_header("YO3XYZ 2024-02-03", None).unwrap_err();
        assert!(matches!(err.kind, LogErrorKind::MalformedHeader(_)));
    }

    #[test]
    fn contest_marker_is_lifted_from_notes() {
        let a = parse_header("W1ABC/P 2024-06-22 W1/HA-001 contest:fd with club", None).unwrap();
        assert_eq!(a.contest.map(|c| c.name()), Some("fd"));
        assert_eq!(a.notes, "with club");

        let err = parse_header("W1ABC 2024-06-22 * contest:nope", None).unwrap_err();
        assert_eq!(err.kind, LogErrorKind::MalformedHeader("undefined contest nope".into()));
        assert_eq!(err.column, 19);
    }
}
