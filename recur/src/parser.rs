// Parser for rule text:
//
//   rule      = [ "RRULE:" ] part *( ";" part )
//   part      = "FREQ=" freq | "INTERVAL=" digits | "BYDAY=" code *( "," code )
//             | "BYMONTHDAY=" digits
//   freq      = "DAILY" | "WEEKLY" | "MONTHLY" | "YEARLY"
//   code      = "SU" | "MO" | "TU" | "WE" | "TH" | "FR" | "SA"
//
// Keys and values are ASCII case-insensitive and parts may come in any order,
// but each key may appear once and FREQ is required.

use crate::error::{MalformedRuleError, Span};
use crate::rule::{Frequency, Rule, Weekday, WeekdaySet};

const PREFIX: &str = "RRULE:";

/// One `KEY=VALUE` segment with the byte offsets of both halves.
#[derive(Debug, Clone, Copy)]
struct Part<'a> {
    key: &'a str,
    key_span: Span,
    value: &'a str,
    value_span: Span,
}

struct Parser<'a> {
    input: &'a str,
    frequency: Option<Frequency>,
    interval: Option<u32>,
    weekdays: Option<WeekdaySet>,
    month_day: Option<u8>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            frequency: None,
            interval: None,
            weekdays: None,
            month_day: None,
        }
    }

    fn error(&self, message: String, span: Span) -> MalformedRuleError {
        MalformedRuleError::new(message, span, self.input)
    }

    fn parse(mut self) -> Result<Rule, MalformedRuleError> {
        let (body, offset) = self.body();
        if body.is_empty() {
            return Err(self.error("expected a rule, e.g. FREQ=DAILY".into(), Span::new(0, 0)));
        }

        let mut pos = offset;
        for segment in body.split(';') {
            let span = Span::new(pos, pos + segment.len());
            pos = span.end + 1;
            let part = self.split_part(segment, span)?;
            self.apply(part)?;
        }

        let Some(frequency) = self.frequency else {
            let span = Span::new(offset, offset + body.len());
            return Err(self.error("missing FREQ".into(), span));
        };
        Ok(Rule::assemble(
            frequency,
            self.interval.unwrap_or(1),
            self.weekdays.unwrap_or_default(),
            self.month_day,
        ))
    }

    /// The input with surrounding whitespace and the optional `RRULE:` prefix
    /// removed, plus the byte offset where it starts.
    fn body(&self) -> (&'a str, usize) {
        let trimmed_start = self.input.trim_start();
        let mut offset = self.input.len() - trimmed_start.len();
        let mut body = trimmed_start.trim_end();
        let prefixed = body
            .get(..PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(PREFIX));
        if prefixed {
            body = &body[PREFIX.len()..];
            offset += PREFIX.len();
        }
        (body, offset)
    }

    fn split_part(&self, segment: &'a str, span: Span) -> Result<Part<'a>, MalformedRuleError> {
        if segment.is_empty() {
            return Err(self.error("empty rule part".into(), span));
        }
        let Some(eq) = segment.find('=') else {
            return Err(self.error(format!("expected KEY=VALUE, got '{segment}'"), span));
        };
        let (key, value) = (&segment[..eq], &segment[eq + 1..]);
        let key_span = Span::new(span.start, span.start + eq);
        let value_span = Span::new(key_span.end + 1, span.end);
        if key.is_empty() {
            return Err(self.error(format!("missing key in '{segment}'"), span));
        }
        if value.is_empty() {
            return Err(self.error(format!("missing value for {key}"), span));
        }
        Ok(Part {
            key,
            key_span,
            value,
            value_span,
        })
    }

    fn apply(&mut self, part: Part<'a>) -> Result<(), MalformedRuleError> {
        let key = part.key.to_ascii_uppercase();
        let duplicate = match key.as_str() {
            "FREQ" => self.frequency.is_some(),
            "INTERVAL" => self.interval.is_some(),
            "BYDAY" => self.weekdays.is_some(),
            "BYMONTHDAY" => self.month_day.is_some(),
            _ => {
                return Err(self.error(
                    format!(
                        "unsupported rule part '{}'; expected FREQ, INTERVAL, BYDAY or BYMONTHDAY",
                        part.key
                    ),
                    part.key_span,
                ));
            }
        };
        if duplicate {
            return Err(self.error(format!("duplicate {key}"), part.key_span));
        }

        match key.as_str() {
            "FREQ" => self.frequency = Some(self.parse_frequency(part)?),
            "INTERVAL" => self.interval = Some(self.parse_interval(part)?),
            "BYDAY" => self.weekdays = Some(self.parse_weekdays(part)?),
            _ => self.month_day = Some(self.parse_month_day(part)?),
        }
        Ok(())
    }

    fn parse_frequency(&self, part: Part<'a>) -> Result<Frequency, MalformedRuleError> {
        Frequency::from_token(part.value).ok_or_else(|| {
            self.error(
                format!(
                    "unknown frequency '{}'; expected DAILY, WEEKLY, MONTHLY or YEARLY",
                    part.value
                ),
                part.value_span,
            )
        })
    }

    fn parse_interval(&self, part: Part<'a>) -> Result<u32, MalformedRuleError> {
        let n = self.parse_digits(part.value, part.value_span, "INTERVAL")?;
        match u32::try_from(n) {
            Ok(0) => Err(self.error(
                "INTERVAL must be at least 1, got 0".into(),
                part.value_span,
            )),
            Ok(n) => Ok(n),
            Err(_) => Err(self.error(
                format!("INTERVAL is too large: {}", part.value),
                part.value_span,
            )),
        }
    }

    fn parse_weekdays(&self, part: Part<'a>) -> Result<WeekdaySet, MalformedRuleError> {
        let mut set = WeekdaySet::EMPTY;
        let mut pos = part.value_span.start;
        for code in part.value.split(',') {
            let span = Span::new(pos, pos + code.len());
            pos = span.end + 1;
            if code.is_empty() {
                return Err(self.error("empty weekday code in BYDAY".into(), span));
            }
            let day = Weekday::from_code(code).ok_or_else(|| {
                self.error(
                    format!("unknown weekday code '{code}'; expected SU, MO, TU, WE, TH, FR or SA"),
                    span,
                )
            })?;
            if !set.insert(day) {
                return Err(self.error(format!("duplicate weekday code '{code}'"), span));
            }
        }
        Ok(set)
    }

    fn parse_month_day(&self, part: Part<'a>) -> Result<u8, MalformedRuleError> {
        let n = self.parse_digits(part.value, part.value_span, "BYMONTHDAY")?;
        match u8::try_from(n) {
            Ok(day @ 1..=31) => Ok(day),
            _ => Err(self.error(
                format!("BYMONTHDAY must be between 1 and 31, got {}", part.value),
                part.value_span,
            )),
        }
    }

    /// Unsigned decimal. Signs are rejected; oversized values saturate so
    /// range checks report them.
    fn parse_digits(&self, value: &str, span: Span, key: &str) -> Result<u64, MalformedRuleError> {
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error(
                format!("{key} must be a number, got '{value}'"),
                span,
            ));
        }
        Ok(value.parse().unwrap_or(u64::MAX))
    }
}

/// Parse rule text into a [`Rule`].
pub fn parse(input: &str) -> Result<Rule, MalformedRuleError> {
    Parser::new(input).parse().inspect_err(|e| {
        log::debug!("malformed rule {input:?}: {e}");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleFields;

    fn err(input: &str) -> MalformedRuleError {
        parse(input).unwrap_err()
    }

    #[test]
    fn parse_daily() {
        let r = parse("FREQ=DAILY").unwrap();
        assert_eq!(r, Rule::daily());
    }

    #[test]
    fn parse_full_weekly() {
        let r = parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,FR").unwrap();
        let expected = RuleFields::new(Frequency::Weekly)
            .interval(2)
            .weekdays([1, 5])
            .build()
            .unwrap();
        assert_eq!(r, expected);
    }

    #[test]
    fn parse_monthly_day() {
        let r = parse("FREQ=MONTHLY;BYMONTHDAY=31").unwrap();
        assert_eq!(r.month_day(), Some(31));
    }

    #[test]
    fn parse_is_case_insensitive_and_order_free() {
        let r = parse("byday=fr,mo;interval=2;freq=weekly").unwrap();
        assert_eq!(r.to_string(), "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,FR");
    }

    #[test]
    fn parse_accepts_prefix_and_whitespace() {
        let r = parse("  RRULE:FREQ=YEARLY \n").unwrap();
        assert_eq!(r, Rule::yearly());
    }

    #[test]
    fn explicit_interval_one() {
        let r = parse("FREQ=DAILY;INTERVAL=1").unwrap();
        assert_eq!(r.to_string(), "FREQ=DAILY");
    }

    #[test]
    fn byday_outside_weekly_is_ignored() {
        let r = parse("FREQ=DAILY;BYDAY=MO").unwrap();
        assert_eq!(r, Rule::daily());
    }

    #[test]
    fn unknown_weekday_code() {
        let e = err("FREQ=WEEKLY;BYDAY=XX");
        assert!(e.message().contains("unknown weekday code 'XX'"));
        assert_eq!(e.span(), Span::new(18, 20));
    }

    #[test]
    fn unknown_weekday_code_in_list() {
        let e = err("FREQ=WEEKLY;BYDAY=MO,MON");
        assert_eq!(e.span(), Span::new(21, 24));
    }

    #[test]
    fn duplicate_weekday_code() {
        let e = err("FREQ=WEEKLY;BYDAY=MO,mo");
        assert!(e.message().contains("duplicate weekday"));
    }

    #[test]
    fn empty_weekday_code() {
        assert!(err("FREQ=WEEKLY;BYDAY=MO,").message().contains("empty"));
    }

    #[test]
    fn missing_freq() {
        let e = err("INTERVAL=2");
        assert_eq!(e.message(), "missing FREQ");
        assert_eq!(e.span(), Span::new(0, 10));
    }

    #[test]
    fn unknown_freq() {
        let e = err("FREQ=HOURLY");
        assert!(e.message().starts_with("unknown frequency 'HOURLY'"));
        assert_eq!(e.span(), Span::new(5, 11));
    }

    #[test]
    fn empty_input() {
        assert!(err("").message().starts_with("expected a rule"));
        assert!(err("   ").message().starts_with("expected a rule"));
        assert!(err("RRULE:").message().starts_with("expected a rule"));
    }

    #[test]
    fn bad_month_day() {
        assert!(err("FREQ=MONTHLY;BYMONTHDAY=abc").message().contains("must be a number"));
        assert!(err("FREQ=MONTHLY;BYMONTHDAY=0").message().contains("between 1 and 31"));
        assert!(err("FREQ=MONTHLY;BYMONTHDAY=32").message().contains("between 1 and 31"));
        assert!(err("FREQ=MONTHLY;BYMONTHDAY=-1").message().contains("must be a number"));
        assert!(err("FREQ=MONTHLY;BYMONTHDAY=99999999999999999999999")
            .message()
            .contains("between 1 and 31"));
    }

    #[test]
    fn bad_interval() {
        assert!(err("FREQ=DAILY;INTERVAL=0").message().contains("at least 1"));
        assert!(err("FREQ=DAILY;INTERVAL=+2").message().contains("must be a number"));
        assert!(err("FREQ=DAILY;INTERVAL=two").message().contains("must be a number"));
        assert!(err("FREQ=DAILY;INTERVAL=4294967296").message().contains("too large"));
    }

    #[test]
    fn structural_errors() {
        assert!(err("FREQ=DAILY;").message().contains("empty rule part"));
        assert!(err("FREQ=DAILY;;INTERVAL=2").message().contains("empty rule part"));
        assert!(err("FREQ").message().contains("expected KEY=VALUE"));
        assert!(err("FREQ=").message().contains("missing value"));
        assert!(err("=DAILY").message().contains("missing key"));
    }

    #[test]
    fn unsupported_and_duplicate_keys() {
        let e = err("FREQ=DAILY;COUNT=3");
        assert!(e.message().starts_with("unsupported rule part 'COUNT'"));
        assert_eq!(e.span(), Span::new(11, 16));
        let e = err("FREQ=DAILY;FREQ=WEEKLY");
        assert_eq!(e.message(), "duplicate FREQ");
    }

    #[test]
    fn spans_account_for_prefix_and_whitespace() {
        let e = err("  RRULE:FREQ=NEVER");
        assert_eq!(e.span(), Span::new(13, 18));
    }
}
