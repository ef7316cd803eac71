//! Property tests over generated logs: determinism, inheritance of omitted fields, and
//! re-parsing the canonical rendering of every record, with and without a Field Day contest.

use proptest::prelude::*;
use sotalog::{ContactRecord, parse_str};

const HEADER: &str = "YO3XYZ 2024-06-01 YO/EC-001";
const FD_HEADER: &str = "W1ABC/P 2024-06-22 W1/HA-001 contest:fd";
const CALLS: &[&str] = &["W1ABC", "DL1AA/P", "G4XYZ", "yo3abc", "F/G4ABC/P", "9A1AA"];
const FREQS: &[&str] = &["14.250", "7.032", "145.500MHz", "70cm", "10.120", "14062kHz"];
const MODES: &[(&str, &str, &str)] = &[
    ("CW", "599", "579"),
    ("SSB", "59", "57"),
    ("FM", "55", "59"),
    ("PSK31", "599", "589"),
    ("am", "44", "33"),
];
const REFS: &[&str] = &["G/LD-001", "w1/ha-001", "YO/EC-045"];
const NOTES: &[&str] = &["tnx", "qrp", "nice wx", "fb"];
// none of these is also a band frequency, a report or a time past position 0
const SERIALS: &[&str] = &["0042", "0117", "0350", "0999", "1234"];

#[derive(Clone, Debug)]
enum TimeSpec {
    Full(u8, u8),
    Bare(u8),
    Omitted,
}

#[derive(Clone, Debug)]
struct LineSpec {
    time: TimeSpec,
    call: &'static str,
    freq: Option<&'static str>,
    mode: Option<(&'static str, &'static str, &'static str)>,
    exchange: Option<&'static str>,
    sota: Option<&'static str>,
    notes: Option<&'static str>,
}

impl LineSpec {
    fn render(&self) -> String {
        let mut parts = Vec::new();
        match self.time {
            TimeSpec::Full(h, m) => parts.push(format!("{:02}{:02}", h, m)),
            TimeSpec::Bare(m) => parts.push(m.to_string()),
            TimeSpec::Omitted => {}
        }
        parts.push(self.call.to_string());
        parts.extend(self.freq.map(str::to_string));
        if let Some((mode, sent, rcvd)) = self.mode {
            parts.extend([mode.to_string(), sent.to_string(), rcvd.to_string()]);
        }
        parts.extend(self.exchange.map(str::to_string));
        parts.extend(self.sota.map(str::to_string));
        parts.extend(self.notes.map(str::to_string));
        parts.join(" ")
    }
}

fn arb_time() -> impl Strategy<Value = TimeSpec> {
    prop_oneof![
        (0u8..24, 0u8..60).prop_map(|(h, m)| TimeSpec::Full(h, m)),
        (0u8..60).prop_map(TimeSpec::Bare),
        Just(TimeSpec::Omitted),
    ]
}

fn arb_line() -> impl Strategy<Value = LineSpec> {
    (
        arb_time(),
        prop::sample::select(CALLS),
        prop::option::of(prop::sample::select(FREQS)),
        prop::option::of(prop::sample::select(MODES)),
        prop::option::of(prop::sample::select(REFS)),
        prop::option::of(prop::sample::select(NOTES)),
    )
        .prop_map(|(time, call, freq, mode, sota, notes)| LineSpec {
            time,
            call,
            freq,
            mode,
            exchange: None,
            sota,
            notes,
        })
}

fn arb_first_line() -> impl Strategy<Value = LineSpec> {
    (
        (0u8..24, 0u8..60),
        arb_line(),
        prop::sample::select(FREQS),
        prop::sample::select(MODES),
    )
        .prop_map(|((h, m), line, freq, mode)| LineSpec {
            time: TimeSpec::Full(h, m),
            freq: Some(freq),
            mode: Some(mode),
            ..line
        })
}

fn arb_log() -> impl Strategy<Value = Vec<LineSpec>> {
    (arb_first_line(), prop::collection::vec(arb_line(), 0..12)).prop_map(|(first, rest)| {
        std::iter::once(first).chain(rest).collect()
    })
}

/// Field Day lines always carry a serial; without one a trailing report is read as the serial.
fn arb_fd_log() -> impl Strategy<Value = Vec<LineSpec>> {
    (arb_log(), prop::collection::vec(prop::sample::select(SERIALS), 13)).prop_map(|(lines, serials)| {
        lines
            .into_iter()
            .zip(serials)
            .map(|(line, serial)| LineSpec { exchange: Some(serial), ..line })
            .collect()
    })
}

fn records_under(header: &str, body: &str) -> Vec<ContactRecord> {
    let log = parse_str(&format!("{}\n{}\n", header, body)).expect("generated log parses");
    log.activations[0].records().to_vec()
}

fn records_of(body: &str) -> Vec<ContactRecord> {
    records_under(HEADER, body)
}

fn render_all(lines: &[LineSpec]) -> String {
    lines.iter().map(LineSpec::render).collect::<Vec<_>>().join("\n")
}

proptest! {
    #[test]
    fn parsing_is_deterministic(lines in arb_log()) {
        let body = render_all(&lines);
        prop_assert_eq!(records_of(&body), records_of(&body));
    }

    #[test]
    fn canonical_lines_round_trip(lines in arb_log()) {
        let records = records_of(&render_all(&lines));
        prop_assert_eq!(records.len(), lines.len());

        let canonical = records.iter().map(ContactRecord::canonical_line).collect::<Vec<_>>().join("\n");
        prop_assert_eq!(records_of(&canonical), records);
    }

    #[test]
    fn field_day_lines_round_trip(lines in arb_fd_log()) {
        let records = records_under(FD_HEADER, &render_all(&lines));
        prop_assert_eq!(records.len(), lines.len());
        for (given, record) in lines.iter().zip(&records) {
            prop_assert_eq!(record.exchange.as_deref(), given.exchange);
        }

        let canonical = records.iter().map(ContactRecord::canonical_line).collect::<Vec<_>>().join("\n");
        prop_assert_eq!(records_under(FD_HEADER, &canonical), records);
    }

    #[test]
    fn omitted_fields_are_inherited(lines in arb_log()) {
        let records = records_of(&render_all(&lines));
        for (i, given) in lines.iter().enumerate().skip(1) {
            let (prev, cur) = (&records[i - 1], &records[i]);
            if given.freq.is_none() {
                prop_assert_eq!(&cur.frequency, &prev.frequency);
            }
            if given.mode.is_none() {
                prop_assert_eq!(cur.mode, prev.mode);
                prop_assert_eq!(&cur.rst_sent, &prev.rst_sent);
                prop_assert_eq!(&cur.rst_rcvd, &prev.rst_rcvd);
            }
            if given.sota.is_none() {
                prop_assert_eq!(&cur.sota_ref, &prev.sota_ref);
            }
            match given.time {
                TimeSpec::Omitted => {
                    prop_assert_eq!(cur.time, prev.time);
                    prop_assert_eq!(cur.day_offset, prev.day_offset);
                }
                TimeSpec::Bare(m) => {
                    prop_assert_eq!(cur.time.minute, m);
                    let expected = if m < prev.time.minute { (prev.time.hour + 1) % 24 } else { prev.time.hour };
                    prop_assert_eq!(cur.time.hour, expected);
                }
                TimeSpec::Full(h, m) => {
                    prop_assert_eq!((cur.time.hour, cur.time.minute), (h, m));
                }
            }
            prop_assert!(cur.day_offset >= prev.day_offset);
        }
    }
}
