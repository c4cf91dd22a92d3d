//! Benchmarks for search highlighting and suggestion filtering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pagewise::search::{KeywordSet, filter, highlight};

fn sample_markup() -> String {
    (1..=200)
        .map(|i| format!("<p>Line {i}: Invoice <b>#{i}</b> total $130.00 &amp; tax</p>"))
        .collect()
}

fn bench_highlight(c: &mut Criterion) {
    let markup = sample_markup();
    c.bench_function("highlight_200_paragraphs", |b| {
        b.iter(|| highlight(black_box(&markup), black_box("$130")).len())
    });
}

fn bench_filter(c: &mut Criterion) {
    let words = (0..2000).map(|i| format!("keyword{i:04}"));
    let keywords = KeywordSet::new(words);
    c.bench_function("filter_2000_keywords", |b| {
        b.iter(|| filter(black_box(&keywords), black_box("WORD19")).count())
    });
}

criterion_group!(benches, bench_highlight, bench_filter);
criterion_main!(benches);
