//! Signal Benchmarks - Per-Market Evaluation Cost
//!
//! Benchmarks the pure work done for every market on every poll:
//! signal evaluation and the activity cache comparison.
//!
//! Run with: cargo bench --bench signal_bench

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use manifold_contrarian_bot::domain::market::{Bet, Market, Outcome};
use manifold_contrarian_bot::domain::signal::SignalEvaluator;
use manifold_contrarian_bot::usecases::ActivityCache;

fn market() -> Market {
    serde_json::from_value(serde_json::json!({
        "id": "m1",
        "slug": "m1",
        "probability": 0.6,
        "volume": 100.0,
    }))
    .unwrap()
}

fn snapshot(len: usize) -> Vec<Bet> {
    (0..len)
        .map(|i| {
            let outcome = if i % 3 == 0 { Outcome::No } else { Outcome::Yes };
            Bet::new(1.0 + i as f64, outcome)
        })
        .collect()
}

/// Benchmark evaluating the default 5-bet snapshot.
fn bench_evaluate_default(c: &mut Criterion) {
    let evaluator = SignalEvaluator::default();
    let market = market();
    let bets = snapshot(5);

    c.bench_function("signal_evaluate_5_bets", |b| {
        b.iter(|| {
            let _order = evaluator.evaluate(black_box(&market), black_box(&bets));
        });
    });
}

/// Benchmark evaluating a full 1000-bet page.
fn bench_evaluate_full_page(c: &mut Criterion) {
    let evaluator = SignalEvaluator::default();
    let market = market();
    let bets = snapshot(1000);

    c.bench_function("signal_evaluate_1000_bets", |b| {
        b.iter(|| {
            let _order = evaluator.evaluate(black_box(&market), black_box(&bets));
        });
    });
}

/// Benchmark the unchanged-snapshot path of the activity cache.
fn bench_cache_observe_unchanged(c: &mut Criterion) {
    let mut cache = ActivityCache::new(1024, Duration::from_secs(3600));
    let bets = snapshot(5);
    cache.observe("m1", bets.clone());

    c.bench_function("cache_observe_unchanged", |b| {
        b.iter(|| {
            let _obs = cache.observe(black_box("m1"), black_box(bets.clone()));
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate_default,
    bench_evaluate_full_page,
    bench_cache_observe_unchanged,
);
criterion_main!(benches);
