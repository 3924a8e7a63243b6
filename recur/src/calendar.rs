//! Calendar arithmetic on civil dates.
//!
//! Month and year shifts clamp the day-of-month to the last day of the target
//! month: `2024-01-31 + 1 month = 2024-02-29`, `2024-02-29 + 1 year =
//! 2025-02-28`. They never roll over into the following month.
//!
//! Every function returns `None` only when the result falls outside the range
//! `jiff::civil::Date` supports (years -9999 through 9999).

use jiff::civil::{Date, Weekday};
use jiff::Span;

/// Shift `date` by `n` days.
pub fn add_days(date: Date, n: i64) -> Option<Date> {
    let span = Span::new().try_days(n).ok()?;
    date.checked_add(span).ok()
}

/// Shift `date` by `n` weeks (`7 * n` days).
pub fn add_weeks(date: Date, n: i64) -> Option<Date> {
    add_days(date, n.checked_mul(7)?)
}

/// Shift `date` by `n` months, clamping the day to the target month's length.
pub fn add_months(date: Date, n: i64) -> Option<Date> {
    let (year, month) = shift_month(date.year(), date.month(), n)?;
    clamped(year, month, date.day())
}

/// Shift `date` by `n` years. Feb 29 on a non-leap target becomes Feb 28.
pub fn add_years(date: Date, n: i64) -> Option<Date> {
    add_months(date, n.checked_mul(12)?)
}

/// The date in `year`/`month` with day `day`, or the month's last day if the
/// month is shorter.
pub(crate) fn clamped(year: i16, month: i8, day: i8) -> Option<Date> {
    let first = Date::new(year, month, 1).ok()?;
    let day = day.min(first.days_in_month());
    Date::new(year, month, day).ok()
}

/// `(year, month)` moved by `n` months.
pub(crate) fn shift_month(year: i16, month: i8, n: i64) -> Option<(i16, i8)> {
    let index = i64::from(year) * 12 + i64::from(month) - 1;
    let shifted = index.checked_add(n)?;
    let year = i16::try_from(shifted.div_euclid(12)).ok()?;
    let month = (shifted.rem_euclid(12) + 1) as i8;
    Some((year, month))
}

/// Whole months from `a`'s month to `b`'s month, ignoring days.
pub(crate) fn months_between(a: Date, b: Date) -> i64 {
    (i64::from(b.year()) * 12 + i64::from(b.month()))
        - (i64::from(a.year()) * 12 + i64::from(a.month()))
}

/// Signed number of days from `a` to `b`.
pub(crate) fn days_between(a: Date, b: Date) -> Option<i64> {
    let span = a.until(b).ok()?;
    Some(i64::from(span.get_days()))
}

/// Sunday that opens the week containing `date`.
pub(crate) fn week_start(date: Date) -> Option<Date> {
    add_days(date, -i64::from(sunday_offset(date.weekday())))
}

/// 0 for Sunday through 6 for Saturday.
pub(crate) fn sunday_offset(weekday: Weekday) -> i8 {
    weekday.to_sunday_zero_offset()
}
