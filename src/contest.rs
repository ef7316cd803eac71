//! Contest rules selected from an activation header with `contest:<name>`.
//!
//! A contest narrows what a contact line may carry as its received exchange.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static FIELD_DAY_EXCHANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,4}$").unwrap());

/// Handle to a known contest rule set.
#[derive(Clone, Copy)]
pub struct Contest {
    name: &'static str,
    exchange: &'static Lazy<Regex>,
}

static CONTESTS: [Contest; 1] = [Contest {
    name: "fd",
    exchange: &FIELD_DAY_EXCHANGE,
}];

impl Contest {
    /// Look up a contest by the name used in activation headers.
    pub fn lookup(name: &str) -> Option<Contest> {
        CONTESTS.iter().copied().find(|c| c.name == name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whole-token match against the received-exchange rule.
    pub fn matches_exchange(&self, text: &str) -> bool {
        self.exchange.is_match(text)
    }
}

impl PartialEq for Contest {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Contest {}

impl fmt::Debug for Contest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contest").field("name", &self.name).finish()
    }
}

impl Serialize for Contest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_day_exchange_is_a_serial() {
        let fd = Contest::lookup("fd").unwrap();
        assert_eq!(fd.name(), "fd");
        assert!(fd.matches_exchange("012"));
        assert!(fd.matches_exchange("1234"));
        assert!(!fd.matches_exchange("12"));
        assert!(!fd.matches_exchange("12345"));
        assert!(!fd.matches_exchange("12a"));
    }

    #[test]
    fn unknown_contest_is_absent() {
        assert!(Contest::lookup("cqww").is_none());
    }
}
