use std::fmt;

use crate::error::{InvalidRuleError, RuleField};

/// The calendar unit a rule's interval counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    /// The `FREQ` value: `DAILY`, `WEEKLY`, ...
    pub fn token(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Case-insensitive inverse of [`Frequency::token`].
    pub fn from_token(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.token().eq_ignore_ascii_case(s))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Singular unit name: `day`, `week`, `month`, `year`.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week, numbered from Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 0 for Sunday through 6 for Saturday.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n)).copied()
    }

    /// Two-letter `BYDAY` code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Case-insensitive inverse of [`Weekday::code`].
    pub fn from_code(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.code().eq_ignore_ascii_case(s))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }

    pub fn to_jiff(self) -> jiff::civil::Weekday {
        match self {
            Self::Sunday => jiff::civil::Weekday::Sunday,
            Self::Monday => jiff::civil::Weekday::Monday,
            Self::Tuesday => jiff::civil::Weekday::Tuesday,
            Self::Wednesday => jiff::civil::Weekday::Wednesday,
            Self::Thursday => jiff::civil::Weekday::Thursday,
            Self::Friday => jiff::civil::Weekday::Friday,
            Self::Saturday => jiff::civil::Weekday::Saturday,
        }
    }

    pub fn from_jiff(wd: jiff::civil::Weekday) -> Self {
        match wd {
            jiff::civil::Weekday::Sunday => Self::Sunday,
            jiff::civil::Weekday::Monday => Self::Monday,
            jiff::civil::Weekday::Tuesday => Self::Tuesday,
            jiff::civil::Weekday::Wednesday => Self::Wednesday,
            jiff::civil::Weekday::Thursday => Self::Thursday,
            jiff::civil::Weekday::Friday => Self::Friday,
            jiff::civil::Weekday::Saturday => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of weekdays. Iteration is always Sunday-first ascending, whatever
/// order the days were inserted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn single(day: Weekday) -> Self {
        Self(1 << day.number())
    }

    /// Add `day`, returning false if it was already present.
    pub fn insert(&mut self, day: Weekday) -> bool {
        let bit = 1 << day.number();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.number()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> + Clone {
        Weekday::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Unvalidated rule input, as a form would submit it.
///
/// Numbers are kept wide and signed so that anything a form can send, such
/// as a negative interval or weekday 300, reaches validation and is reported
/// against its field instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleFields {
    pub frequency: Frequency,
    #[cfg_attr(feature = "serde", serde(default = "default_interval"))]
    pub interval: i64,
    /// 0 = Sunday .. 6 = Saturday.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weekdays: Vec<i64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "monthDay", alias = "month_day")
    )]
    pub month_day: Option<i64>,
}

#[cfg(feature = "serde")]
fn default_interval() -> i64 {
    1
}

impl RuleFields {
    /// Fields for `frequency` with every other field at its default.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            weekdays: Vec::new(),
            month_day: None,
        }
    }

    pub fn interval(mut self, interval: i64) -> Self {
        self.interval = interval;
        self
    }

    pub fn weekdays(mut self, weekdays: impl IntoIterator<Item = i64>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn month_day(mut self, day: i64) -> Self {
        self.month_day = Some(day);
        self
    }

    /// Validate into a [`Rule`].
    pub fn build(&self) -> Result<Rule, InvalidRuleError> {
        Rule::from_fields(self)
    }
}

/// A validated recurrence rule.
///
/// Fields that do not apply to the frequency are dropped on construction:
/// weekdays are kept only for weekly rules and the month day only for monthly
/// rules. Two rules that encode to the same text are therefore equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    frequency: Frequency,
    interval: u32,
    weekdays: WeekdaySet,
    month_day: Option<u8>,
}

impl Rule {
    /// Validate `fields` and build a rule.
    pub fn from_fields(fields: &RuleFields) -> Result<Self, InvalidRuleError> {
        let rule = Self::check(fields).inspect_err(|e| {
            log::debug!("rejected rule fields {fields:?}: {e}");
        })?;
        Ok(rule)
    }

    fn check(fields: &RuleFields) -> Result<Self, InvalidRuleError> {
        if fields.interval < 1 {
            return Err(InvalidRuleError::new(
                RuleField::Interval,
                format!("must be at least 1, got {}", fields.interval),
            ));
        }
        let interval = u32::try_from(fields.interval).map_err(|_| {
            InvalidRuleError::new(
                RuleField::Interval,
                format!("must be at most {}, got {}", u32::MAX, fields.interval),
            )
        })?;
        let mut weekdays = WeekdaySet::EMPTY;
        for &n in &fields.weekdays {
            let day = u8::try_from(n)
                .ok()
                .and_then(Weekday::from_number)
                .ok_or_else(|| {
                    InvalidRuleError::new(
                        RuleField::Weekdays,
                        format!("values must be between 0 (sunday) and 6 (saturday), got {n}"),
                    )
                })?;
            weekdays.insert(day);
        }
        let month_day = match fields.month_day {
            None => None,
            Some(day @ 1..=31) => Some(day as u8),
            Some(day) => {
                return Err(InvalidRuleError::new(
                    RuleField::MonthDay,
                    format!("must be between 1 and 31, got {day}"),
                ));
            }
        };
        Ok(Self::assemble(fields.frequency, interval, weekdays, month_day))
    }

    /// Build from parts already known to be in range.
    pub(crate) fn assemble(
        frequency: Frequency,
        interval: u32,
        weekdays: WeekdaySet,
        month_day: Option<u8>,
    ) -> Self {
        debug_assert!(interval >= 1);
        debug_assert!(month_day.map_or(true, |d| (1..=31).contains(&d)));
        Self {
            frequency,
            interval,
            weekdays: if frequency == Frequency::Weekly {
                weekdays
            } else {
                WeekdaySet::EMPTY
            },
            month_day: if frequency == Frequency::Monthly {
                month_day
            } else {
                None
            },
        }
    }

    /// Every day.
    pub fn daily() -> Self {
        Self::assemble(Frequency::Daily, 1, WeekdaySet::EMPTY, None)
    }

    /// Every week, on the start date's weekday.
    pub fn weekly() -> Self {
        Self::assemble(Frequency::Weekly, 1, WeekdaySet::EMPTY, None)
    }

    /// Every month, on the start date's day of month.
    pub fn monthly() -> Self {
        Self::assemble(Frequency::Monthly, 1, WeekdaySet::EMPTY, None)
    }

    /// Every year, on the start date's month and day.
    pub fn yearly() -> Self {
        Self::assemble(Frequency::Yearly, 1, WeekdaySet::EMPTY, None)
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Units of [`Rule::frequency`] between occurrences. Always at least 1.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Selected weekdays. Empty unless the rule is weekly; an empty set on a
    /// weekly rule means "the start date's weekday".
    pub fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    /// Day of month for monthly rules, `None` to follow the start date.
    pub fn month_day(&self) -> Option<u8> {
        self.month_day
    }

    /// The fields this rule was built from, in normalized form.
    pub fn to_fields(&self) -> RuleFields {
        RuleFields {
            frequency: self.frequency,
            interval: i64::from(self.interval),
            weekdays: self
                .weekdays
                .iter()
                .map(|day| i64::from(day.number()))
                .collect(),
            month_day: self.month_day.map(i64::from),
        }
    }
}
