use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jiff::civil::{date, Date};
use recur::Rule;

fn fixed_start() -> Date {
    date(2024, 1, 31)
}

// ---------------------------------------------------------------------------
// Parse benchmarks
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("simple", |b| {
        b.iter(|| Rule::parse(black_box("FREQ=DAILY")).unwrap());
    });

    group.bench_function("weekly_all_days", |b| {
        b.iter(|| {
            Rule::parse(black_box(
                "RRULE:FREQ=WEEKLY;INTERVAL=3;BYDAY=SU,MO,TU,WE,TH,FR,SA",
            ))
            .unwrap()
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Projection benchmarks
// ---------------------------------------------------------------------------

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let start = fixed_start();

    let weekly = Rule::parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR").unwrap();
    group.bench_function("preview_weekly", |b| {
        b.iter(|| black_box(&weekly).preview(black_box(start)));
    });

    let monthly = Rule::parse("FREQ=MONTHLY;BYMONTHDAY=31").unwrap();
    group.bench_function("preview_monthly", |b| {
        b.iter(|| black_box(&monthly).preview(black_box(start)));
    });

    // next_after seeks instead of walking, so a far-off date costs the same.
    let daily = Rule::parse("FREQ=DAILY;INTERVAL=3").unwrap();
    let far = date(2999, 6, 15);
    group.bench_function("next_after_far", |b| {
        b.iter(|| black_box(&daily).next_after(start, black_box(far)));
    });
    group.bench_function("next_after_far_weekly", |b| {
        b.iter(|| black_box(&weekly).next_after(start, black_box(far)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Display benchmark
// ---------------------------------------------------------------------------

fn bench_display(c: &mut Criterion) {
    let mut group = c.benchmark_group("display");

    let rule = Rule::parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=SU,TU,TH,SA").unwrap();
    group.bench_function("to_string", |b| {
        b.iter(|| black_box(&rule).to_string());
    });
    group.bench_function("describe", |b| {
        b.iter(|| black_box(&rule).describe());
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_eval, bench_display);
criterion_main!(benches);
