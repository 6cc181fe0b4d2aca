use criterion::{Criterion, criterion_group, criterion_main};
use markdown_review_engine::annotations::{accept_all, parse, reject_all};
use markdown_review_engine::render::AnnotationRenderer;
mod common;

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(10);

    let renderer = AnnotationRenderer::default();
    for sections in [5, 25] {
        let old = common::generate_document(sections);
        let new = common::edit_every_nth_line(&old, 3);
        group.bench_function(format!("render_{sections}_sections"), |b| {
            b.iter(|| {
                let annotated =
                    renderer.render(std::hint::black_box(&old), std::hint::black_box(&new));
                std::hint::black_box(annotated);
            });
        });
    }

    group.finish();
}

fn bench_annotations(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotations");
    group.sample_size(10);

    let old = common::generate_document(25);
    let new = common::edit_every_nth_line(&old, 3);
    let annotated = AnnotationRenderer::default().render(&old, &new);

    group.bench_function("parse", |b| {
        b.iter(|| std::hint::black_box(parse(std::hint::black_box(&annotated))));
    });
    group.bench_function("accept_all", |b| {
        b.iter(|| std::hint::black_box(accept_all(&annotated)));
    });
    group.bench_function("reject_all", |b| {
        b.iter(|| std::hint::black_box(reject_all(&annotated)));
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_annotations);
criterion_main!(benches);
