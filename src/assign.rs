//! Maps classified tokens onto the record slots.
//!
//! Two passes over the token array: a greedy forward scan in field order, then a backward
//! correction that moves an ambiguous token from a middle slot to a later empty one.

use crate::classify::Classified;
use crate::errors::{LogError, LogErrorKind};
use crate::patterns::FieldKind;
use log::trace;

/// Middle slots whose token may be handed on to a later slot.
const HELD: [FieldKind; 4] = [
    FieldKind::Freq,
    FieldKind::Mode,
    FieldKind::RstSent,
    FieldKind::RstRcvd,
];

/// Slots that may receive a held token, latest first.
const TARGETS: [FieldKind; 3] = [FieldKind::Exchange, FieldKind::RstRcvd, FieldKind::RstSent];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    slots: [Option<usize>; 8],
    /// Index of the first token that belongs to the notes.
    pub notes_from: usize,
}

impl Assignment {
    /// Token index assigned to `kind`.
    pub fn get(&self, kind: FieldKind) -> Option<usize> {
        self.slots[kind.index()]
    }

    fn take(&mut self, kind: FieldKind) -> Option<usize> {
        self.slots[kind.index()].take()
    }

    fn set(&mut self, kind: FieldKind, token: usize) {
        self.slots[kind.index()] = Some(token);
    }
}

/// Assign tokens to slots and check the line carries a callsign, frequency or mode.
pub fn assign(tokens: &[Classified<'_>]) -> Result<Assignment, LogError> {
    let first = tokens
        .first()
        .ok_or_else(|| LogError::new(LogErrorKind::EmptyRecord, 0))?;

    let mut a = forward(tokens);
    backward(&mut a, tokens);

    if a.get(FieldKind::Call).is_none()
        && a.get(FieldKind::Freq).is_none()
        && a.get(FieldKind::Mode).is_none()
    {
        return Err(LogError::new(LogErrorKind::InvalidChange, first.token.start));
    }
    Ok(a)
}

/// Each token takes the earliest kind after the last filled slot that it satisfies. The first
/// token that satisfies none of them starts the notes.
fn forward(tokens: &[Classified<'_>]) -> Assignment {
    let mut a = Assignment { slots: [None; 8], notes_from: tokens.len() };
    let mut next = 0;
    for (i, c) in tokens.iter().enumerate() {
        match FieldKind::ALL[next..].iter().find(|k| c.matches.satisfies(**k)) {
            Some(kind) => {
                trace!("token {} {:?} -> {}", i, c.token.text, kind);
                a.set(*kind, i);
                next = kind.index() + 1;
            }
            None => {
                a.notes_from = i;
                break;
            }
        }
    }
    a
}

fn backward(a: &mut Assignment, tokens: &[Classified<'_>]) {
    let mut held: Vec<FieldKind> = HELD.into_iter().filter(|k| a.get(*k).is_some()).collect();
    for target in TARGETS {
        if a.get(target).is_none() {
            if let Some(&from) = held.last() {
                if let Some(i) = a.get(from).filter(|i| tokens[*i].matches.satisfies(target)) {
                    trace!("token {} {:?} moved {} -> {}", i, tokens[i].token.text, from, target);
                    a.take(from);
                    a.set(target, i);
                    held.pop();
                }
            }
        }
        if held.last() == Some(&target) {
            held.pop();
        }
    }
}
