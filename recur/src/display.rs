use std::fmt;

use crate::rule::{Frequency, Rule, WeekdaySet};

/// Canonical rule text: `FREQ`, then `INTERVAL` (only above 1), then `BYDAY`
/// (weekly only), then `BYMONTHDAY` (monthly only).
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency().token())?;

        if self.interval() > 1 {
            write!(f, ";INTERVAL={}", self.interval())?;
        }

        let weekdays = self.weekdays();
        if self.frequency() == Frequency::Weekly && !weekdays.is_empty() {
            write!(f, ";BYDAY=")?;
            write_code_list(f, weekdays)?;
        }

        if let (Frequency::Monthly, Some(day)) = (self.frequency(), self.month_day()) {
            write!(f, ";BYMONTHDAY={day}")?;
        }

        Ok(())
    }
}

/// Encode `rule` as rule text.
pub fn serialize(rule: &Rule) -> String {
    rule.to_string()
}

impl Rule {
    /// Short English summary, e.g. `every 2 weeks on monday, friday`.
    pub fn describe(&self) -> String {
        Description(self).to_string()
    }
}

struct Description<'a>(&'a Rule);

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = self.0;
        let unit = rule.frequency().unit();
        match rule.interval() {
            1 => write!(f, "every {unit}")?,
            n => write!(f, "every {n} {unit}s")?,
        }
        if !rule.weekdays().is_empty() {
            write!(f, " on ")?;
            write_name_list(f, rule.weekdays())?;
        }
        if let Some(day) = rule.month_day() {
            write!(f, " on the {day}{}", ordinal_suffix(day))?;
        }
        Ok(())
    }
}

fn write_code_list(f: &mut fmt::Formatter<'_>, days: WeekdaySet) -> fmt::Result {
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", day.code())?;
    }
    Ok(())
}

fn write_name_list(f: &mut fmt::Formatter<'_>, days: WeekdaySet) -> fmt::Result {
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", day.as_str())?;
    }
    Ok(())
}

fn ordinal_suffix(n: u8) -> &'static str {
    match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleFields;

    fn rule(fields: RuleFields) -> Rule {
        fields.build().unwrap()
    }

    #[test]
    fn daily_with_interval() {
        let r = rule(RuleFields::new(Frequency::Daily).interval(3));
        assert_eq!(serialize(&r), "FREQ=DAILY;INTERVAL=3");
    }

    #[test]
    fn interval_one_is_omitted() {
        for freq in Frequency::ALL {
            let r = rule(RuleFields::new(freq));
            assert_eq!(r.to_string(), format!("FREQ={}", freq.token()));
        }
    }

    #[test]
    fn byday_is_in_weekday_order() {
        let r = rule(RuleFields::new(Frequency::Weekly).weekdays([5, 0, 3]));
        assert_eq!(r.to_string(), "FREQ=WEEKLY;BYDAY=SU,WE,FR");
    }

    #[test]
    fn weekly_without_days_has_no_byday() {
        let r = rule(RuleFields::new(Frequency::Weekly).interval(2));
        assert_eq!(r.to_string(), "FREQ=WEEKLY;INTERVAL=2");
    }

    #[test]
    fn monthly_with_day() {
        let r = rule(RuleFields::new(Frequency::Monthly).interval(2).month_day(31));
        assert_eq!(r.to_string(), "FREQ=MONTHLY;INTERVAL=2;BYMONTHDAY=31");
    }

    #[test]
    fn all_parts_in_order() {
        let r = rule(
            RuleFields::new(Frequency::Weekly)
                .interval(4)
                .weekdays([6, 1]),
        );
        assert_eq!(r.to_string(), "FREQ=WEEKLY;INTERVAL=4;BYDAY=MO,SA");
    }

    #[test]
    fn describe_rules() {
        assert_eq!(Rule::daily().describe(), "every day");
        assert_eq!(
            rule(RuleFields::new(Frequency::Daily).interval(3)).describe(),
            "every 3 days"
        );
        assert_eq!(
            rule(RuleFields::new(Frequency::Weekly).interval(2).weekdays([1, 3])).describe(),
            "every 2 weeks on monday, wednesday"
        );
        assert_eq!(
            rule(RuleFields::new(Frequency::Monthly).month_day(22)).describe(),
            "every month on the 22nd"
        );
        assert_eq!(
            rule(RuleFields::new(Frequency::Monthly).month_day(11)).describe(),
            "every month on the 11th"
        );
        assert_eq!(Rule::yearly().describe(), "every year");
    }
}
