//! Iterator behaviour of `occurrences()`, `between()` and friends:
//! laziness, early termination, bounds and interaction with std combinators.

use jiff::civil::{date, Date};
use recur::{Frequency, Rule, RuleFields};

fn rule(s: &str) -> Rule {
    s.parse().expect("valid rule")
}

// =============================================================================
// Laziness
// =============================================================================

#[test]
fn occurrences_is_lazy() {
    // Unbounded; creating the iterator and taking one must not walk it.
    let r = rule("FREQ=DAILY");
    let first: Vec<_> = r.occurrences(date(2024, 1, 1)).take(1).collect();
    assert_eq!(first, vec![date(2024, 1, 1)]);
}

#[test]
fn between_is_lazy() {
    let r = rule("FREQ=DAILY");
    let first_three: Vec<_> = r
        .between(date(2024, 1, 1), date(2024, 1, 1), date(9999, 12, 31))
        .take(3)
        .collect();
    assert_eq!(
        first_three,
        vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]
    );
}

// =============================================================================
// Early termination
// =============================================================================

#[test]
fn take_while_stops_at_cutoff() {
    let r = rule("FREQ=WEEKLY;BYDAY=MO,FR");
    let cutoff = date(2024, 1, 20);
    let got: Vec<_> = r
        .occurrences(date(2024, 1, 1))
        .take_while(|d| *d < cutoff)
        .collect();
    assert_eq!(
        got,
        vec![
            date(2024, 1, 1),
            date(2024, 1, 5),
            date(2024, 1, 8),
            date(2024, 1, 12),
            date(2024, 1, 15),
            date(2024, 1, 19),
        ]
    );
}

#[test]
fn until_is_inclusive() {
    let r = rule("FREQ=MONTHLY;BYMONTHDAY=15");
    let got: Vec<_> = r
        .occurrences(date(2024, 1, 15))
        .until(date(2024, 4, 15))
        .collect();
    assert_eq!(
        got,
        vec![
            date(2024, 1, 15),
            date(2024, 2, 15),
            date(2024, 3, 15),
            date(2024, 4, 15),
        ]
    );
}

#[test]
fn until_before_start_is_empty() {
    let r = rule("FREQ=DAILY");
    assert_eq!(
        r.occurrences(date(2024, 5, 1)).until(date(2024, 4, 30)).count(),
        0
    );
}

#[test]
fn bounded_iterator_is_fused() {
    let r = rule("FREQ=DAILY;INTERVAL=2");
    let mut it = r.occurrences(date(2024, 1, 1)).until(date(2024, 1, 4));
    assert_eq!(it.next(), Some(date(2024, 1, 1)));
    assert_eq!(it.next(), Some(date(2024, 1, 3)));
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
    assert_eq!(it.end(), date(2024, 1, 4));
}

// =============================================================================
// Windows
// =============================================================================

#[test]
fn between_excludes_from_and_includes_to() {
    let r = rule("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO");
    let start = date(2024, 1, 1);
    let got: Vec<_> = r
        .between(start, date(2024, 1, 15), date(2024, 2, 12))
        .collect();
    assert_eq!(got, vec![date(2024, 1, 29), date(2024, 2, 12)]);
}

#[test]
fn between_far_from_start() {
    let r = rule("FREQ=DAILY;INTERVAL=7");
    let start = date(2000, 1, 1);
    // 2000-01-01 plus 1305 weeks is 2025-01-04.
    let got: Vec<_> = r
        .between(start, date(2025, 1, 1), date(2025, 1, 20))
        .collect();
    assert_eq!(
        got,
        vec![date(2025, 1, 4), date(2025, 1, 11), date(2025, 1, 18)]
    );
}

#[test]
fn after_skips_the_start() {
    let r = rule("FREQ=YEARLY");
    let start = date(2024, 2, 29);
    let got: Vec<_> = r.occurrences(start).after(start).take(2).collect();
    assert_eq!(got, vec![date(2025, 2, 28), date(2026, 2, 28)]);
}

#[test]
fn after_a_date_before_start_keeps_start() {
    let r = rule("FREQ=DAILY");
    let got = r.occurrences(date(2024, 6, 1)).after(date(2020, 1, 1)).next();
    assert_eq!(got, Some(date(2024, 6, 1)));
}

// =============================================================================
// Restartability and Clone
// =============================================================================

#[test]
fn each_call_starts_afresh() {
    let r = rule("FREQ=MONTHLY;BYMONTHDAY=31");
    let start = date(2024, 1, 31);
    let a: Vec<_> = r.occurrences(start).take(4).collect();
    let b: Vec<_> = r.occurrences(start).take(4).collect();
    assert_eq!(a, b);
    assert_eq!(r.preview(start), r.occurrences(start).take(5).collect::<Vec<_>>());
}

#[test]
fn cloned_iterator_continues_independently() {
    let r = rule("FREQ=WEEKLY;BYDAY=TU,TH");
    let mut it = r.occurrences(date(2024, 3, 3));
    it.next();
    let fork = it.clone();
    let rest: Vec<_> = it.take(3).collect();
    let forked: Vec<_> = fork.take(3).collect();
    assert_eq!(rest, forked);
    assert_eq!(
        rest,
        vec![date(2024, 3, 5), date(2024, 3, 7), date(2024, 3, 12)]
    );
}

#[test]
fn iterator_reports_its_rule_and_start() {
    let r = RuleFields::new(Frequency::Daily).interval(4).build().unwrap();
    let it = r.occurrences(date(2024, 1, 1));
    assert_eq!(*it.rule(), r);
    assert_eq!(it.start(), date(2024, 1, 1));
}

// =============================================================================
// Combinators
// =============================================================================

#[test]
fn works_with_filter_and_nth() {
    let r = rule("FREQ=DAILY");
    let fridays: Vec<Date> = r
        .occurrences(date(2024, 3, 1))
        .filter(|d| d.weekday() == jiff::civil::Weekday::Friday)
        .take(3)
        .collect();
    assert_eq!(
        fridays,
        vec![date(2024, 3, 1), date(2024, 3, 8), date(2024, 3, 15)]
    );
    assert_eq!(r.occurrences(date(2024, 3, 1)).nth(31), Some(date(2024, 4, 1)));
}

#[test]
fn count_within_a_year() {
    // 2024 has 53 Mondays; the start itself is one of them.
    let r = rule("FREQ=WEEKLY;BYDAY=MO");
    let n = r
        .occurrences(date(2024, 1, 1))
        .until(date(2024, 12, 31))
        .count();
    assert_eq!(n, 53);
}

#[test]
fn ends_at_the_last_representable_date() {
    let r = rule("FREQ=DAILY");
    let got: Vec<_> = r.occurrences(date(9999, 12, 30)).collect();
    assert_eq!(got, vec![date(9999, 12, 30), date(9999, 12, 31)]);
}
