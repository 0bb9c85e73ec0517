//! Generation and end-to-end run benchmarks
//!
//! # Test Scenarios
//!
//! 1. **Segment generation**: primes and tuplets into a discarding emitter
//! 2. **Print formatting**: the text sink on a real segment
//! 3. **Full runs**: counting vs. generating, sequential vs. parallel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use primecraft::core::Segment;
use primecraft::segment::{Generation, SegmentGenerator};
use primecraft::sink::{NullEmitter, PrintEmitter};
use primecraft::{PrimeSieveBuilder, TupletKind};
use std::io;

mod common;
use common::*;

const LOW: u64 = 1_000_000_020;

fn bench_generate_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_segment");
    let bytes = sieved_segment(LOW, 32 << 10);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    let generations = [
        Generation::Primes,
        Generation::Tuplets(TupletKind::Twins),
        Generation::Tuplets(TupletKind::Quadruplets),
    ];
    for generation in generations {
        let generator = SegmentGenerator::new(generation);
        group.bench_with_input(BenchmarkId::from_parameter(generation.name()), &bytes, |b, bytes| {
            let segment = Segment::from_bytes(bytes, LOW);
            let mut sink = NullEmitter;
            b.iter(|| generator.generate(black_box(&segment), &mut sink));
        });
    }
    group.finish();
}

fn bench_print_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("print_segment");
    let bytes = sieved_segment(LOW, 32 << 10);
    let generator = SegmentGenerator::new(Generation::Primes);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("primes_to_sink", |b| {
        let segment = Segment::from_bytes(&bytes, LOW);
        let mut out = PrintEmitter::new(io::sink());
        b.iter(|| generator.generate(black_box(&segment), &mut out));
    });
    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);
    let stop = 100_000_000u64;
    group.throughput(Throughput::Elements(stop));

    for threads in [1usize, 4] {
        group.bench_with_input(BenchmarkId::new("count_all", threads), &threads, |b, &threads| {
            b.iter(|| {
                PrimeSieveBuilder::new()
                    .range(0, stop)
                    .count_all()
                    .threads(threads)
                    .build()
                    .unwrap()
                    .run()
                    .unwrap()
            });
        });
        group.bench_with_input(BenchmarkId::new("callback", threads), &threads, |b, &threads| {
            b.iter(|| {
                PrimeSieveBuilder::new()
                    .range(0, stop)
                    .callback64(|p| {
                        black_box(p);
                    })
                    .threads(threads)
                    .build()
                    .unwrap()
                    .run()
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_generate_segment,
    bench_print_segment,
    bench_full_run,
);
criterion_main!(benches);
