use std::iter::FusedIterator;

use jiff::civil::Date;

use crate::calendar::{
    add_days, add_months, add_weeks, add_years, clamped, days_between, months_between,
    shift_month, week_start,
};
use crate::rule::{Frequency, Rule, Weekday, WeekdaySet};

/// How many occurrences a preview shows.
pub const PREVIEW_LEN: usize = 5;

/// Where an [`Occurrences`] iterator is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Nothing yielded yet; the start date comes next.
    Start,
    /// Occurrence `n` is the start advanced by `n * interval` units.
    Stepped(u64),
    /// Weekly rule: `week` counts `interval`-week buckets from the start's
    /// week, `day` is the lowest weekday number still to try in that bucket.
    Weekly { week: i64, day: u8 },
    Done,
}

/// Lazy iterator over the dates a rule produces from a start date.
///
/// The first item is always the start date. The sequence is unbounded and
/// only ends if it runs past the last representable date.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: Rule,
    start: Date,
    /// Weekdays a weekly rule lands on, with the start's weekday standing in
    /// for an empty set.
    days: WeekdaySet,
    /// Sunday of the start date's week.
    week_origin: Option<Date>,
    /// Only dates strictly after this are yielded.
    after: Option<Date>,
    cursor: Cursor,
}

impl Occurrences {
    /// Project `rule` from `start`.
    pub fn new(rule: Rule, start: Date) -> Self {
        log::trace!("projecting {rule} from {start}");
        let days = if rule.weekdays().is_empty() {
            if rule.frequency() == Frequency::Weekly {
                log::trace!("weekly rule without weekdays follows {:?}", start.weekday());
            }
            WeekdaySet::single(Weekday::from_jiff(start.weekday()))
        } else {
            rule.weekdays()
        };
        Self {
            rule,
            start,
            days,
            week_origin: week_start(start),
            after: None,
            cursor: Cursor::Start,
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn start(&self) -> Date {
        self.start
    }

    /// Restrict to occurrences strictly after `after`.
    ///
    /// On a fresh iterator this jumps straight to the right neighbourhood
    /// instead of walking from the start date.
    pub fn after(mut self, after: Date) -> Self {
        if self.cursor == Cursor::Start && after >= self.start {
            self.seek(after);
        }
        self.after = Some(self.after.map_or(after, |a| a.max(after)));
        self
    }

    /// Stop after the last occurrence on or before `end`.
    pub fn until(self, end: Date) -> BoundedOccurrences {
        BoundedOccurrences { inner: self, end }
    }

    /// Position the cursor at or before the first occurrence after `after`,
    /// but never past it.
    fn seek(&mut self, after: Date) {
        let interval = i64::from(self.rule.interval());
        let cursor = match self.rule.frequency() {
            Frequency::Daily => days_between(self.start, after)
                .map(|days| Cursor::Stepped((days / interval + 1) as u64)),
            Frequency::Weekly => self
                .week_origin
                .zip(week_start(after))
                .and_then(|(origin, week)| days_between(origin, week))
                .map(|days| Cursor::Weekly {
                    week: days / 7 / interval,
                    day: 0,
                }),
            Frequency::Monthly => {
                let months = months_between(self.start, after);
                Some(Cursor::Stepped((months / interval).max(1) as u64))
            }
            Frequency::Yearly => {
                let years = i64::from(after.year()) - i64::from(self.start.year());
                Some(Cursor::Stepped((years / interval).max(1) as u64))
            }
        };
        if let Some(cursor) = cursor {
            self.cursor = cursor;
        }
    }

    /// Occurrence `index` of a daily, monthly or yearly rule. Weekly rules
    /// move through [`Cursor::Weekly`] instead and yield `None` here.
    fn stepped(&self, index: u64) -> Option<Date> {
        let n = i64::try_from(index)
            .ok()?
            .checked_mul(i64::from(self.rule.interval()))?;
        match self.rule.frequency() {
            Frequency::Daily => add_days(self.start, n),
            Frequency::Weekly => None,
            Frequency::Monthly => match self.rule.month_day() {
                Some(day) => {
                    let (year, month) = shift_month(self.start.year(), self.start.month(), n)?;
                    clamped(year, month, day as i8)
                }
                None => add_months(self.start, n),
            },
            Frequency::Yearly => add_years(self.start, n),
        }
    }

    /// First weekly occurrence after the start at or beyond `(week, day)`,
    /// with the cursor that follows it.
    fn weekly(&self, mut week: i64, mut day: u8) -> Option<(Date, Cursor)> {
        let origin = self.week_origin?;
        let step = i64::from(self.rule.interval());
        loop {
            let sunday = add_weeks(origin, week.checked_mul(step)?)?;
            for wd in self.days.iter().filter(|wd| wd.number() >= day) {
                let date = add_days(sunday, i64::from(wd.number()))?;
                if date > self.start {
                    let next = Cursor::Weekly {
                        week,
                        day: wd.number() + 1,
                    };
                    return Some((date, next));
                }
            }
            week = week.checked_add(1)?;
            day = 0;
        }
    }

    fn advance(&mut self) -> Option<Date> {
        let step = match self.cursor {
            Cursor::Start => {
                let next = if self.rule.frequency() == Frequency::Weekly {
                    Cursor::Weekly { week: 0, day: 0 }
                } else {
                    Cursor::Stepped(1)
                };
                Some((self.start, next))
            }
            Cursor::Stepped(index) => self
                .stepped(index)
                .map(|date| (date, Cursor::Stepped(index + 1))),
            Cursor::Weekly { week, day } => self.weekly(week, day),
            Cursor::Done => return None,
        };
        match step {
            Some((date, next)) => {
                self.cursor = next;
                Some(date)
            }
            None => {
                log::trace!("projection of {} reached the end of the calendar", self.rule);
                self.cursor = Cursor::Done;
                None
            }
        }
    }
}

impl Iterator for Occurrences {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        loop {
            let date = self.advance()?;
            match self.after {
                Some(after) if date <= after => continue,
                _ => return Some(date),
            }
        }
    }
}

impl FusedIterator for Occurrences {}

/// Occurrences up to and including an end date.
#[derive(Debug, Clone)]
pub struct BoundedOccurrences {
    inner: Occurrences,
    end: Date,
}

impl BoundedOccurrences {
    pub fn end(&self) -> Date {
        self.end
    }
}

impl Iterator for BoundedOccurrences {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        match self.inner.next() {
            Some(date) if date <= self.end => Some(date),
            Some(_) => {
                // Past the end bound; the sequence never comes back down.
                self.inner.cursor = Cursor::Done;
                None
            }
            None => None,
        }
    }
}

impl FusedIterator for BoundedOccurrences {}

/// Lazily project `rule` from `start`. Each call starts afresh.
pub fn occurrences(rule: &Rule, start: Date) -> Occurrences {
    Occurrences::new(*rule, start)
}

/// The first [`PREVIEW_LEN`] occurrences.
pub fn preview(rule: &Rule, start: Date) -> Vec<Date> {
    occurrences(rule, start).take(PREVIEW_LEN).collect()
}

/// First occurrence strictly after `after`.
pub fn next_after(rule: &Rule, start: Date, after: Date) -> Option<Date> {
    occurrences(rule, start).after(after).next()
}

/// Occurrences in `(from, to]`.
pub fn between(rule: &Rule, start: Date, from: Date, to: Date) -> BoundedOccurrences {
    occurrences(rule, start).after(from).until(to)
}

/// Whether `date` is one of the occurrences of `rule` from `start`.
pub fn is_occurrence(rule: &Rule, start: Date, date: Date) -> bool {
    if date <= start {
        return date == start;
    }
    match add_days(date, -1) {
        Some(day_before) => next_after(rule, start, day_before) == Some(date),
        None => false,
    }
}
