//! Criterion benchmarks for proximity search and end-to-end scoring.
//!
//! Catalogs of 1 000, 10 000 and 100 000 buildings are laid out on a regular
//! grid with a few metres of spacing so every query finds a dense
//! neighbourhood.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package lightscore-core
//! ```

#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Coord;
use lightscore_core::test_support::{FixedSunProvider, building_at};
use lightscore_core::{BuildingCatalog, Direction, LightScorer, ObservationPoint, ProximityIndex};

const CATALOG_SIZES: &[usize] = &[1_000, 10_000, 100_000];

/// Grid spacing in degrees, roughly 11 m.
const GRID_STEP: f64 = 0.000_1;

/// Deterministic square grid of buildings centred on the origin with heights
/// cycling between 5 and 95 metres.
fn grid_catalog(count: usize) -> BuildingCatalog {
    let side = (count as f64).sqrt().ceil() as usize;
    let half = side as f64 * GRID_STEP / 2.0;
    (0..count)
        .map(|i| {
            let row = (i / side) as f64;
            let col = (i % side) as f64;
            let height = 5.0 + (i % 10) as f64 * 10.0;
            building_at(row * GRID_STEP - half, col * GRID_STEP - half, height)
        })
        .collect()
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity_query");
    for &size in CATALOG_SIZES {
        let index = ProximityIndex::build(&grid_catalog(size));
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &index, |b, index| {
            b.iter(|| index.query(black_box(Coord { x: 0.0, y: 0.0 }), black_box(100.0)));
        });
    }
    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_window");
    let point = ObservationPoint::new(Coord { x: 0.0, y: 0.0 }, 4, Direction::S)
        .expect("valid observation point");
    for &size in CATALOG_SIZES {
        let index = Arc::new(ProximityIndex::build(&grid_catalog(size)));
        let scorer = LightScorer::new(index, FixedSunProvider::new(35.0, 180.0));
        group.bench_with_input(BenchmarkId::from_parameter(size), &scorer, |b, scorer| {
            b.iter(|| scorer.score(black_box(&point), None).expect("score"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_query, bench_score);
criterion_main!(benches);
