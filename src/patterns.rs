//! Recognizers for the fields of a contact line.
//!
//! Every recognizer matches a whole token. The field kinds have a fixed order which is both the
//! order they appear in on a line and the order the slot assigner fills them in.

use crate::model::{Frequency, Mode};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// prefix: one letter with an optional second character, a digit followed by a letter, or 3DA
const CALL_PREFIX: &str = r"(?:3da|[a-z][0-9a-z]?|[0-9][a-z])";

static CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:{p}[0-9]?/)?{p}[0-9][0-9a-z]*(?:/[0-9a-z]+)*$",
        p = CALL_PREFIX
    ))
    .unwrap()
});
static SOTA_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9]{1,3}/[a-z]{2}-[0-9]{3}$").unwrap());
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<hour>[01]?[0-9]|2[0-3]):?(?P<minute>[0-5][0-9])|(?P<bare>[0-5]?[0-9]))$")
        .unwrap()
});
static FREQ_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?:[0-9]+\.)?[0-9]+)([kMG]?Hz|[mc]?m)?$").unwrap());
static RST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-5][1-9][1-9]?$").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([0-9]{4})-([0-9]{2})-([0-9]{2})|([0-9]{4})\.([0-9]{2})\.([0-9]{2}))$").unwrap()
});

/// The structured slots of a contact line, in line order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    Time,
    Call,
    Freq,
    Mode,
    RstSent,
    RstRcvd,
    Exchange,
    SotaRef,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Time,
        FieldKind::Call,
        FieldKind::Freq,
        FieldKind::Mode,
        FieldKind::RstSent,
        FieldKind::RstRcvd,
        FieldKind::Exchange,
        FieldKind::SotaRef,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Highest token index at which this kind may still be recognised.
    pub fn window(self) -> Option<usize> {
        match self {
            FieldKind::Time => Some(0),
            FieldKind::Call => Some(1),
            FieldKind::Freq => Some(2),
            FieldKind::Mode => Some(3),
            FieldKind::RstSent | FieldKind::RstRcvd => Some(5),
            FieldKind::Exchange => Some(6),
            FieldKind::SotaRef => None,
        }
    }

    pub fn in_window(self, index: usize) -> bool {
        self.window().is_none_or(|w| index <= w)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Time => "time",
            FieldKind::Call => "callsign",
            FieldKind::Freq => "frequency",
            FieldKind::Mode => "mode",
            FieldKind::RstSent => "sent RST",
            FieldKind::RstRcvd => "received RST",
            FieldKind::Exchange => "exchange",
            FieldKind::SotaRef => "SOTA reference",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A time token; the hour is absent when only the minute was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeToken {
    pub hour: Option<u8>,
    pub minute: u8,
}

pub fn match_time(s: &str) -> Option<TimeToken> {
    let caps = TIME_RE.captures(s)?;
    if let Some(bare) = caps.name("bare") {
        return Some(TimeToken { hour: None, minute: bare.as_str().parse().ok()? });
    }
    Some(TimeToken {
        hour: Some(caps.name("hour")?.as_str().parse().ok()?),
        minute: caps.name("minute")?.as_str().parse().ok()?,
    })
}

/// Callsign, upper-cased.
pub fn match_call(s: &str) -> Option<String> {
    CALL_RE.is_match(s).then(|| s.to_uppercase())
}

/// SOTA summit reference, upper-cased.
pub fn match_sota_ref(s: &str) -> Option<String> {
    SOTA_REF_RE.is_match(s).then(|| s.to_uppercase())
}

pub fn match_rst(s: &str) -> Option<String> {
    RST_RE.is_match(s).then(|| s.to_string())
}

pub fn match_mode(s: &str) -> Option<Mode> {
    match s.to_lowercase().as_str() {
        "cw" => Some(Mode::Cw),
        "ssb" => Some(Mode::Ssb),
        "fm" => Some(Mode::Fm),
        "am" => Some(Mode::Am),
        "data" | "psk" | "psk31" | "psk63" | "rtty" | "fsk441" | "jt65" | "ft8" | "ft4" => {
            Some(Mode::Data)
        }
        "other" => Some(Mode::Other),
        _ => None,
    }
}

/// `(year, month, day)` of a `YYYY-MM-DD` or `YYYY.MM.DD` token; not checked against the calendar.
pub fn match_date(s: &str) -> Option<(i32, u32, u32)> {
    let caps = DATE_RE.captures(s)?;
    let base = if caps.get(1).is_some() { 1 } else { 4 };
    let part = |i: usize| caps.get(base + i).map(|m| m.as_str());
    Some((part(0)?.parse().ok()?, part(1)?.parse().ok()?, part(2)?.parse().ok()?))
}

/// Amateur bands, edges in MHz, inclusive.
pub const BANDS: [(&str, f64, f64); 25] = [
    ("160m", 1.8, 2.0),
    ("80m", 3.5, 4.0),
    ("40m", 7.0, 7.3),
    ("30m", 10.1, 10.15),
    ("20m", 14.0, 14.35),
    ("17m", 18.068, 18.168),
    ("15m", 21.0, 21.45),
    ("12m", 24.89, 24.99),
    ("10m", 28.0, 29.7),
    ("6m", 50.0, 54.0),
    ("2m", 144.0, 148.0),
    ("1.25m", 219.0, 225.0),
    ("70cm", 420.0, 450.0),
    ("35cm", 902.0, 928.0),
    ("23cm", 1240.0, 1300.0),
    ("13cm", 2300.0, 2450.0),
    ("9cm", 3400.0, 3475.0),
    ("6cm", 5650.0, 5850.0),
    ("3cm", 10000.0, 10500.0),
    ("1.25cm", 24000.0, 24250.0),
    ("6mm", 47000.0, 47200.0),
    ("4mm", 75500.0, 81500.0),
    ("2.5mm", 122250.0, 123000.0),
    ("2mm", 134000.0, 141000.0),
    ("1mm", 241000.0, 250000.0),
];

/// Band name for a frequency in MHz.
pub fn band_for(mhz: f64) -> Option<&'static str> {
    BANDS
        .iter()
        .find(|(_, lo, hi)| mhz >= *lo && mhz <= *hi)
        .map(|(name, _, _)| *name)
}

/// A frequency or band name inside an amateur band.
///
/// A number without unit is taken as MHz and keeps its digits; other units are converted and
/// printed with three decimals. Band names must be spelled exactly as in [`BANDS`].
pub fn match_freq(s: &str) -> Option<Frequency> {
    let caps = FREQ_RE.captures(s)?;
    let number = caps.get(1)?.as_str();
    let unit = caps.get(2).map(|m| m.as_str());

    if unit.is_some_and(|u| u.ends_with('m')) {
        return BANDS
            .iter()
            .find(|(name, _, _)| *name == s)
            .map(|(name, _, _)| Frequency { label: s.to_string(), band: *name });
    }

    let places = match unit {
        Some("Hz") => -6,
        Some("kHz") => -3,
        Some("GHz") => 3,
        _ => 0,
    };
    let mhz = shift_point(number, places).parse::<f64>().ok()?;
    let band = band_for(mhz)?;
    let label = if places == 0 {
        format!("{}MHz", number)
    } else {
        format!("{:.3}MHz", mhz)
    };
    Some(Frequency { label, band })
}

/// Move the decimal point of `number` by `places` digits, so a unit change is exact and a band
/// edge parses to the same value as its table entry.
fn shift_point(number: &str, places: i32) -> String {
    let (int, frac) = number.split_once('.').unwrap_or((number, ""));
    let digits = format!("{}{}", int, frac);
    let point = int.len() as i32 + places;
    if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
    } else {
        format!("{}.{}", &digits[..point as usize], &digits[point as usize..])
    }
}
