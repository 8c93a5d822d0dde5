//! Benchmark suite for prepa-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prepa_algo::types::{MasteryParams, MasteryState, ScheduleParams};
use prepa_algo::{mastery, schedule, tfidf};

fn bench_mastery_fold(c: &mut Criterion) {
    let params = MasteryParams::default();
    c.bench_function("mastery::fold_attempt", |b| {
        let mut state = MasteryState::default();
        let mut ts = 0i64;
        b.iter(|| {
            ts += 1;
            state = mastery::fold_attempt(black_box(&state), ts % 3 != 0, ts, &params);
        })
    });
}

fn bench_schedule_record(c: &mut Criterion) {
    let params = ScheduleParams::default();
    c.bench_function("schedule::record", |b| {
        let mut entry = schedule::record(None, true, 0, &params);
        let mut ts = 0i64;
        b.iter(|| {
            ts += params.min_interval_ms;
            entry = schedule::record(black_box(Some(&entry)), ts % 5 != 0, ts, &params);
        })
    });
}

fn bench_tfidf_similarity(c: &mut Criterion) {
    let texts: Vec<String> = (0..200)
        .map(|i| {
            format!(
                "A particle number {i} moves in a straight line with constant \
                 acceleration and initial velocity {i} meters per second"
            )
        })
        .collect();
    let counts: Vec<tfidf::SparseVector> = texts
        .iter()
        .map(|t| tfidf::term_counts(&tfidf::tokenize(t)))
        .collect();
    let df = tfidf::document_frequencies(counts.iter());
    let vectors: Vec<tfidf::SparseVector> = counts
        .iter()
        .map(|c| tfidf::tfidf_vector(c, &df, texts.len()))
        .collect();

    c.bench_function("tfidf::cosine x200", |b| {
        b.iter(|| {
            let mut best = 0.0f64;
            for v in &vectors[1..] {
                best = best.max(tfidf::cosine(black_box(&vectors[0]), v));
            }
            best
        })
    });
}

criterion_group!(
    benches,
    bench_mastery_fold,
    bench_schedule_record,
    bench_tfidf_similarity
);
criterion_main!(benches);
