use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use markdown_review_engine::diff::{DiffEngine, generate_changes};
use markdown_review_engine::DiffOptions;
use std::time::Duration;
mod common;

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    group.sample_size(10);

    let old = common::generate_document(20);
    let new = common::edit_every_nth_line(&old, 4);

    for (name, engine) in [
        ("chars", DiffEngine::chars()),
        ("words", DiffEngine::words()),
        ("lines", DiffEngine::lines()),
    ] {
        group.bench_with_input(BenchmarkId::new("engine", name), &engine, |b, engine| {
            b.iter(|| {
                let result = engine.diff(std::hint::black_box(&old), std::hint::black_box(&new));
                std::hint::black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_budgets(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_budgets");
    group.sample_size(10);

    let old = common::generate_document(50);
    let new = common::edit_every_nth_line(&old, 4);

    let timed = DiffEngine::chars()
        .with_options(DiffOptions::default().with_timeout(Duration::from_millis(5)));
    group.bench_function("chars_with_timeout", |b| {
        b.iter(|| std::hint::black_box(timed.diff(&old, &new)));
    });

    let capped = DiffEngine::chars().with_options(DiffOptions::default().with_max_edit_length(64));
    group.bench_function("chars_with_edit_cap", |b| {
        b.iter(|| std::hint::black_box(capped.diff(&old, &new)));
    });

    group.bench_function("generate_changes", |b| {
        b.iter(|| {
            std::hint::black_box(generate_changes(&old, &new, &DiffOptions::default()));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_engines, bench_budgets);
criterion_main!(benches);
