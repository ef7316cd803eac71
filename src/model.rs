use crate::contest::Contest;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn minutes_of_day(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    #[serde(rename = "CW")]
    Cw,
    #[serde(rename = "SSB")]
    Ssb,
    #[serde(rename = "FM")]
    Fm,
    #[serde(rename = "AM")]
    Am,
    Data,
    Other,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Cw => "CW",
            Mode::Ssb => "SSB",
            Mode::Fm => "FM",
            Mode::Am => "AM",
            Mode::Data => "Data",
            Mode::Other => "Other",
        }
    }

    /// Number of digits a signal report has in this mode (RST vs RS).
    pub fn report_len(&self) -> usize {
        match self {
            Mode::Cw | Mode::Data => 3,
            _ => 2,
        }
    }

    pub fn default_report(&self) -> &'static str {
        if self.report_len() == 3 { "599" } else { "59" }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A frequency as logged: normalised text plus the band it falls in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Frequency {
    pub label: String,
    pub band: &'static str,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// One resolved QSO.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub time: TimeOfDay,
    pub callsign: String,
    pub frequency: Frequency,
    pub mode: Mode,
    pub rst_sent: String,
    pub rst_rcvd: String,
    pub exchange: Option<String>,
    pub sota_ref: Option<String>,
    pub notes: String,
    /// Days since the activation date.
    pub day_offset: u32,
}

/// A dated operating session under one callsign.
#[derive(Clone, Debug, Serialize)]
pub struct Activation {
    pub callsign: String,
    pub date: NaiveDate,
    /// Empty for a chase.
    pub sota_ref: String,
    pub contest: Option<Contest>,
    pub notes: String,
    records: Vec<ContactRecord>,
}

impl Activation {
    pub fn new(
        callsign: String,
        date: NaiveDate,
        sota_ref: String,
        contest: Option<Contest>,
        notes: String,
    ) -> Self {
        Self { callsign, date, sota_ref, contest, notes, records: Vec::new() }
    }

    pub fn is_chase(&self) -> bool {
        self.sota_ref.is_empty()
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn last_record(&self) -> Option<&ContactRecord> {
        self.records.last()
    }

    pub(crate) fn push_record(&mut self, record: ContactRecord) {
        self.records.push(record);
    }

    /// Calendar date of a record, counting day rollovers from the activation date.
    pub fn date_of(&self, record: &ContactRecord) -> NaiveDate {
        self.date
            .checked_add_days(Days::new(u64::from(record.day_offset)))
            .unwrap_or(self.date)
    }
}

/// The ordered activation chain parsed from one input stream.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Log {
    pub activations: Vec<Activation>,
}

impl Log {
    /// Activation preceding the one at `index` in the stream, if any.
    pub fn previous(&self, index: usize) -> Option<&Activation> {
        index.checked_sub(1).and_then(|i| self.activations.get(i))
    }

    pub fn record_count(&self) -> usize {
        self.activations.iter().map(|a| a.records().len()).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = (&Activation, &ContactRecord)> {
        self.activations
            .iter()
            .flat_map(|a| a.records().iter().map(move |r| (a, r)))
    }
}
