//! Criterion benchmarks for docwalk.
//!
//! Covers:
//! - Intersections driven by the rarest child
//! - Word-boundary checks
//! - Phrase and windowed proximity matching
//! - Anchored matching
//! - Scoring of collected hits

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use docwalk::index::MemoryIndex;
use docwalk::query::NodeFactory;
use docwalk::scoring::{ScoreArgument, create_calculator};
use docwalk::search::Searcher;
use docwalk::types::DocumentId;
use std::hint::black_box;

/// Generate tokenized test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<(DocumentId, Vec<String>)> {
    let words = [
        "search", "engine", "full", "text", "index", "query", "document", "field", "term", "phrase",
        "##s", "vector", "similarity", "relevance", "score", "##ing", "cursor", "position", "word",
        "boundary", "head", "tail", "window", "ranking",
    ];

    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100); // Variable length documents
        let tokens = (0..doc_length)
            .map(|j| words[(i * 7 + j * 13 + j / 5) % words.len()].to_string())
            .collect();
        documents.push((i as DocumentId + 1, tokens));
    }

    documents
}

fn build_index(count: usize) -> MemoryIndex {
    MemoryIndex::from_documents(generate_test_documents(count)).unwrap()
}

/// Benchmark intersections and word checks.
fn bench_intersection(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersection");
    let index = build_index(2000);
    let factory = NodeFactory::default();
    let searcher = Searcher::new(index.search_information(), create_calculator("").unwrap());

    group.throughput(Throughput::Elements(2000));
    group.bench_function("and_three_terms", |b| {
        let mut root = factory
            .and(vec![
                factory.term_in(&index, "cursor"),
                factory.term_in(&index, "window"),
                factory.term_in(&index, "engine"),
            ])
            .unwrap();
        b.iter(|| black_box(searcher.collect(root.as_mut())))
    });

    group.bench_function("word_single_term", |b| {
        let mut root = factory.word_in(&index, "phrase");
        b.iter(|| black_box(searcher.collect(root.as_mut())))
    });

    group.finish();
}

/// Benchmark positional verification.
fn bench_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("positional");
    group.sample_size(20);
    let index = build_index(2000);
    let factory = NodeFactory::default();
    let searcher = Searcher::new(index.search_information(), create_calculator("").unwrap());

    group.throughput(Throughput::Elements(2000));
    group.bench_function("phrase_two_words", |b| {
        let mut root = factory
            .ordered_distance(vec![factory.word_in(&index, "full"), factory.word_in(&index, "text")])
            .unwrap();
        b.iter(|| black_box(searcher.collect(root.as_mut())))
    });

    group.bench_function("within_three_words", |b| {
        let mut root = factory
            .within(
                vec![
                    factory.word_in(&index, "query"),
                    factory.word_in(&index, "field"),
                    factory.word_in(&index, "score"),
                ],
                0,
                20,
            )
            .unwrap();
        b.iter(|| black_box(searcher.collect(root.as_mut())))
    });

    group.bench_function("head_and_tail", |b| {
        let mut head = factory.head(factory.word_in(&index, "search"), 1).unwrap();
        let mut tail = factory.tail(factory.word_in(&index, "ranking"), 0, index.search_information());
        b.iter(|| {
            black_box(searcher.collect(head.as_mut()));
            black_box(searcher.collect(tail.as_mut()));
        })
    });

    group.finish();
}

/// Benchmark score calculation.
fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    let arguments: Vec<ScoreArgument> = (1..=1000u32)
        .map(|i| ScoreArgument {
            term_frequency: 1 + i % 7,
            document_frequency: 1 + i % 500,
            total_document_count: 10_000,
            document_length: 50 + i % 100,
            average_document_length: 100.0,
        })
        .collect();

    group.throughput(Throughput::Elements(arguments.len() as u64));
    for specification in ["OkapiTfIdf", "OkapiTfIdf:1.2:0.75:2", "OkapiTf", "TfIdf"] {
        let calculator = create_calculator(specification).unwrap();
        group.bench_function(specification, |b| {
            b.iter(|| {
                let total: f64 = arguments.iter().map(|a| calculator.score(black_box(a))).sum();
                black_box(total)
            })
        });
    }

    group.bench_function("search_and_score", |b| {
        let index = build_index(500);
        let factory = NodeFactory::default();
        let searcher = Searcher::new(index.search_information(), create_calculator("").unwrap());
        let mut root = factory
            .ordered_distance(vec![factory.word_in(&index, "word"), factory.word_in(&index, "boundary")])
            .unwrap();
        b.iter(|| black_box(searcher.search(root.as_mut()).unwrap()))
    });

    group.finish();
}

/// Index sizes.
fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");
    group.sample_size(10);

    for size in [1000, 4000].iter() {
        group.bench_with_input(format!("phrase_{size}_documents"), size, |b, &count| {
            let index = build_index(count);
            let factory = NodeFactory::default();
            let searcher = Searcher::new(index.search_information(), create_calculator("").unwrap());
            let mut root = factory
                .ordered_distance(vec![
                    factory.word_in(&index, "document"),
                    factory.word_in(&index, "term"),
                ])
                .unwrap();
            b.iter(|| black_box(searcher.collect(root.as_mut())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_intersection,
    bench_positional,
    bench_scoring,
    bench_scalability
);
criterion_main!(benches);
