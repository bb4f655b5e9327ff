//! Per-codec round-trip benchmarks
//!
//! Measures one profiled sample per family at its default parameters, the
//! unit of work a sweep repeats for every grid point.

use codecsweep_codecs::{CodecAdapter, CodecRegistry};
use codecsweep_engine::{ProfileSampler, TrackingAllocator};
use codecsweep_tests::test_utils::{generate_test_data, CommonFileSizes, TestDataPattern};
use codecsweep_types::{CodecFamily, ParameterSet};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new();

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");

    for (size_name, size) in CommonFileSizes::micro() {
        let data = generate_test_data(size, TestDataPattern::Text);
        group.throughput(Throughput::Bytes(size as u64));

        for family in CodecFamily::ALL {
            let codec = CodecRegistry::adapter_for(family);
            let params = ParameterSet::default_for(family);
            group.bench_with_input(
                BenchmarkId::new(family.name(), size_name),
                &data,
                |b, data| {
                    b.iter(|| {
                        let compressed = codec.compress(data, &params).unwrap();
                        black_box(codec.decompress(&compressed).unwrap())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_profiled_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("profiled_sample");
    let data = generate_test_data(CommonFileSizes::MEDIUM, TestDataPattern::Mixed);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for family in CodecFamily::ALL {
        let codec = CodecRegistry::adapter_for(family);
        let sampler = ProfileSampler::new(codec.as_ref());
        let params = ParameterSet::default_for(family);
        group.bench_function(family.name(), |b| {
            b.iter(|| black_box(sampler.sample(&data, params).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_round_trip, bench_profiled_sample);
criterion_main!(benches);
