//! Benchmarks for delimiter matching and end-to-end rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdweave_pipeline::PipelineBuilder;

/// Generate a paragraph-heavy document with nested emphasis.
fn generate_markdown(paragraphs: usize) -> String {
    let mut md = String::with_capacity(paragraphs * 120);
    md.push_str("# Title\n\n");
    for i in 0..paragraphs {
        md.push_str(&format!(
            "Paragraph {i} has *em*, **strong with *nested* text**, `code` and a [link](https://e.dev/{i}).\n\n"
        ));
    }
    md
}

/// Many unmatched openers force the matcher to walk the whole stack.
fn generate_unmatched(runs: usize) -> String {
    let mut md = String::with_capacity(runs * 4);
    for _ in 0..runs {
        md.push_str("*a _");
    }
    md
}

fn bench_to_html(c: &mut Criterion) {
    let pipeline = PipelineBuilder::new().build().unwrap();
    let mut group = c.benchmark_group("to_html_by_size");

    for paragraphs in [10, 100, 1000] {
        let markdown = generate_markdown(paragraphs);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", paragraphs), &markdown, |b, md| {
            b.iter(|| pipeline.to_html(md));
        });
    }

    group.finish();
}

fn bench_unmatched_delimiters(c: &mut Criterion) {
    let pipeline = PipelineBuilder::new().build().unwrap();
    let markdown = generate_unmatched(2000);

    c.bench_function("parse_unmatched_delimiters", |b| {
        b.iter(|| pipeline.parse(&markdown));
    });
}

fn bench_with_extensions(c: &mut Criterion) {
    let pipeline = PipelineBuilder::new()
        .with_citations()
        .with_custom_containers()
        .with_auto_links()
        .build()
        .unwrap();
    let markdown = generate_markdown(100);

    c.bench_function("normalize_with_extensions", |b| {
        b.iter(|| pipeline.normalize(&markdown));
    });
}

criterion_group!(benches, bench_to_html, bench_unmatched_delimiters, bench_with_extensions);
criterion_main!(benches);
