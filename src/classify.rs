use crate::contest::Contest;
use crate::model::{Frequency, Mode};
use crate::patterns::{self, FieldKind, TimeToken};
use crate::token::Token;

/// Everything a token could stand for, within the positional windows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matches {
    pub time: Option<TimeToken>,
    pub call: Option<String>,
    pub freq: Option<Frequency>,
    pub mode: Option<Mode>,
    pub rst: Option<String>,
    pub exchange: Option<String>,
    pub sota_ref: Option<String>,
}

impl Matches {
    pub fn satisfies(&self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Time => self.time.is_some(),
            FieldKind::Call => self.call.is_some(),
            FieldKind::Freq => self.freq.is_some(),
            FieldKind::Mode => self.mode.is_some(),
            FieldKind::RstSent | FieldKind::RstRcvd => self.rst.is_some(),
            FieldKind::Exchange => self.exchange.is_some(),
            FieldKind::SotaRef => self.sota_ref.is_some(),
        }
    }

    pub fn kinds(&self) -> Vec<FieldKind> {
        FieldKind::ALL.into_iter().filter(|k| self.satisfies(*k)).collect()
    }
}

#[derive(Clone, Debug)]
pub struct Classified<'a> {
    pub token: Token<'a>,
    pub matches: Matches,
}

/// Test a token at position `index` against every kind whose window still covers it.
pub fn classify(token: &Token<'_>, index: usize, contest: Option<&Contest>) -> Matches {
    let s = token.text;
    let within = |kind: FieldKind| kind.in_window(index);
    Matches {
        time: within(FieldKind::Time).then(|| patterns::match_time(s)).flatten(),
        call: within(FieldKind::Call).then(|| patterns::match_call(s)).flatten(),
        freq: within(FieldKind::Freq).then(|| patterns::match_freq(s)).flatten(),
        mode: within(FieldKind::Mode).then(|| patterns::match_mode(s)).flatten(),
        rst: within(FieldKind::RstSent).then(|| patterns::match_rst(s)).flatten(),
        exchange: contest
            .filter(|c| within(FieldKind::Exchange) && c.matches_exchange(s))
            .map(|_| s.to_string()),
        sota_ref: patterns::match_sota_ref(s),
    }
}

pub fn classify_all<'a>(tokens: &[Token<'a>], contest: Option<&Contest>) -> Vec<Classified<'a>> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| Classified { token: *t, matches: classify(t, i, contest) })
        .collect()
}
