//! Criterion benchmarks for whole runs through reference instruments.

use std::hint::black_box;

use beamline_bench::{monitor_stack, reference_instrument};
use beamline_engine::{RunConfig, Simulation};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const EVENTS: u64 = 20_000;

/// Benchmark: 20K events through source → slit → PSD at several worker counts.
fn bench_reference_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_instrument");
    group.throughput(Throughput::Elements(EVENTS));
    group.sample_size(20);
    for workers in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &w| {
            b.iter(|| {
                let config = RunConfig::with_events(EVENTS).seed(42).workers(w);
                let mut sim = Simulation::new(config, reference_instrument().unwrap()).unwrap();
                black_box(sim.run().unwrap());
            });
        });
    }
    group.finish();
}

/// Benchmark: restore overhead of a deep stack of restoring monitors.
fn bench_monitor_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("monitor_stack");
    group.throughput(Throughput::Elements(EVENTS));
    group.sample_size(20);
    for depth in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &d| {
            b.iter(|| {
                let config = RunConfig::with_events(EVENTS).seed(42).workers(1);
                let mut sim = Simulation::new(config, monitor_stack(d).unwrap()).unwrap();
                black_box(sim.run().unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reference_workers, bench_monitor_stack);
criterion_main!(benches);
