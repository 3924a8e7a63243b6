//! recur: recurrence rules for recurring tasks.
//!
//! A [`Rule`] says how often something repeats (daily, weekly, monthly or
//! yearly, every `interval` units, optionally on chosen weekdays or a day of
//! the month). Rules encode to and from a compact subset of iCalendar RRULE
//! text, and project lazily into the calendar dates they land on.
//!
//! # Examples
//!
//! ```
//! use jiff::civil::date;
//! use recur::{Frequency, Rule, RuleFields};
//!
//! let rule = RuleFields::new(Frequency::Daily).interval(3).build().unwrap();
//! assert_eq!(rule.to_string(), "FREQ=DAILY;INTERVAL=3");
//!
//! let dates: Vec<_> = rule.occurrences(date(2024, 3, 1)).take(4).collect();
//! assert_eq!(
//!     dates,
//!     [date(2024, 3, 1), date(2024, 3, 4), date(2024, 3, 7), date(2024, 3, 10)],
//! );
//!
//! let parsed: Rule = "FREQ=DAILY;INTERVAL=3".parse().unwrap();
//! assert_eq!(parsed, rule);
//! ```

pub mod calendar;
pub mod display;
pub mod error;
pub mod eval;
pub mod parser;
pub mod rule;

pub use display::serialize;
pub use error::{Error, InvalidRuleError, MalformedRuleError, RuleField, Span};
pub use eval::{
    between, is_occurrence, next_after, occurrences, preview, BoundedOccurrences, Occurrences,
    PREVIEW_LEN,
};
pub use parser::parse;
pub use rule::{Frequency, Rule, RuleFields, Weekday, WeekdaySet};

use jiff::civil::Date;
use std::str::FromStr;

/// Validate form input and build a [`Rule`].
pub fn validate_and_build_rule(fields: &RuleFields) -> Result<Rule, InvalidRuleError> {
    Rule::from_fields(fields)
}

// --- Rule convenience methods ---

impl Rule {
    /// Parse rule text.
    pub fn parse(input: &str) -> Result<Self, MalformedRuleError> {
        parser::parse(input)
    }

    /// Whether `input` is well-formed rule text.
    pub fn validate(input: &str) -> bool {
        parser::parse(input).is_ok()
    }

    /// Lazily project this rule from `start`.
    pub fn occurrences(&self, start: Date) -> Occurrences {
        eval::occurrences(self, start)
    }

    /// The first [`PREVIEW_LEN`] occurrences from `start`.
    pub fn preview(&self, start: Date) -> Vec<Date> {
        eval::preview(self, start)
    }

    /// First occurrence strictly after `after`.
    pub fn next_after(&self, start: Date, after: Date) -> Option<Date> {
        eval::next_after(self, start, after)
    }

    /// Occurrences in `(from, to]`.
    pub fn between(&self, start: Date, from: Date, to: Date) -> BoundedOccurrences {
        eval::between(self, start, from, to)
    }

    /// Whether the projection from `start` lands on `date`.
    pub fn is_occurrence(&self, start: Date, date: Date) -> bool {
        eval::is_occurrence(self, start, date)
    }
}

impl FromStr for Rule {
    type Err = MalformedRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&RuleFields> for Rule {
    type Error = InvalidRuleError;

    fn try_from(fields: &RuleFields) -> Result<Self, Self::Error> {
        Rule::from_fields(fields)
    }
}

// Rules serialize as their normalized fields and deserialize from either the
// fields or the rule text, so stored JSON and stored RRULE strings both load.

#[cfg(feature = "serde")]
impl serde::Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_fields(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RuleVisitor)
    }
}

#[cfg(feature = "serde")]
struct RuleVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for RuleVisitor {
    type Value = Rule;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("rule text or a map of rule fields")
    }

    fn visit_str<E: serde::de::Error>(self, s: &str) -> Result<Rule, E> {
        Rule::parse(s).map_err(E::custom)
    }

    fn visit_map<A: serde::de::MapAccess<'de>>(self, map: A) -> Result<Rule, A::Error> {
        let fields: RuleFields =
            serde::Deserialize::deserialize(serde::de::value::MapAccessDeserializer::new(map))?;
        Rule::from_fields(&fields).map_err(serde::de::Error::custom)
    }
}
