//! Integration tests for codecsweep
//!
//! These tests drive real codecs through the configuration layer and the
//! sweep engine, with the tracking allocator installed as it is in the CLI.

use std::collections::BTreeSet;
use std::hint::black_box;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use codecsweep_codecs::{CodecAdapter, CodecRegistry};
use codecsweep_config::{build_space, ConfigLoader, RangeOverrides};
use codecsweep_engine::{ProfileSampler, SweepConfig, SweepRunner, TrackingAllocator};
use codecsweep_tests::test_utils::{create_test_file, generate_test_data, TestDataPattern};
use codecsweep_types::{
    CellTimeout, CodecFamily, CompressionResult, ErrorKind, Objective, ParameterSet,
    Lz4BlockSize, ParameterSpace, Result, WorkerCount,
};
use proptest::prelude::*;
use proptest::sample::subsequence;
use tempfile::TempDir;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new();

/// Collect every successful measurement of a sequential sweep
fn sweep_all(
    space: &ParameterSpace,
    data: &[u8],
) -> (codecsweep_types::SweepReport, Vec<CompressionResult>) {
    let codec = CodecRegistry::adapter_for(space.family());
    let mut measured = Vec::new();
    let report = SweepRunner::default()
        .run_sequential(space, codec.as_ref(), data, |point| {
            if let Ok(result) = &point.outcome {
                measured.push(result.clone());
            }
        })
        .unwrap();
    (report, measured)
}

#[test]
fn test_brotli_grid_visits_every_combination() {
    let data = generate_test_data(512, TestDataPattern::Text);
    let space = ParameterSpace::default_for(CodecFamily::Brotli);
    let codec = CodecRegistry::adapter_for(CodecFamily::Brotli);

    let mut seen = BTreeSet::new();
    let report = SweepRunner::default()
        .run_sequential(&space, codec.as_ref(), &data, |point| {
            seen.insert(point.params.to_string());
        })
        .unwrap();

    assert_eq!(report.points_evaluated, 540);
    assert_eq!(seen.len(), 540);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.optimal.len(), 4);
}

#[test]
fn test_winners_match_exhaustive_search() {
    let data = generate_test_data(32 * 1024, TestDataPattern::Mixed);
    let space = ParameterSpace::default_for(CodecFamily::Gzip);
    let (report, measured) = sweep_all(&space, &data);
    assert_eq!(measured.len(), 9);

    let min_time = measured.iter().map(|r| r.time_taken).min().unwrap();
    let min_peak = measured.iter().map(|r| r.peak_memory_bytes).min().unwrap();
    let min_size = measured.iter().map(|r| r.compressed_size).min().unwrap();

    let winner = |objective| report.optimal.get(objective).unwrap();
    assert_eq!(winner(Objective::MinTime).time_taken, min_time);
    assert_eq!(winner(Objective::MinPeakMemory).peak_memory_bytes, min_peak);
    assert_eq!(winner(Objective::MaxCompressionRatio).compressed_size, min_size);
    assert_eq!(
        winner(Objective::MaxCompressionPercentage).compressed_size,
        min_size
    );

    // Ties keep the first point in grid order
    let first_smallest = measured
        .iter()
        .find(|r| r.compressed_size == min_size)
        .unwrap();
    assert_eq!(
        winner(Objective::MaxCompressionRatio).params,
        first_smallest.params
    );
}

#[test]
fn test_single_point_wins_everything() {
    let data = generate_test_data(4096, TestDataPattern::Text);
    let params = ParameterSet::Lz4 {
        level: 4,
        block_size: Lz4BlockSize::Max64KB,
    };
    let (report, _) = sweep_all(&ParameterSpace::single(params), &data);

    assert_eq!(report.points_evaluated, 1);
    for objective in Objective::ALL {
        assert_eq!(report.optimal.get(objective).unwrap().params, params);
    }
}

#[test]
fn test_zero_length_input_only_ranks_time_and_memory() {
    for family in CodecFamily::ALL {
        let space = ParameterSpace::single(ParameterSet::default_for(family));
        let (report, measured) = sweep_all(&space, &[]);

        assert_eq!(measured.len(), 1, "{} failed on empty input", family);
        let result = &measured[0];
        assert!(!result.compression_ratio().is_defined());
        assert!(!result.compression_percentage().is_defined());

        assert!(report.optimal.get(Objective::MinTime).is_some());
        assert!(report.optimal.get(Objective::MinPeakMemory).is_some());
        assert!(report.optimal.get(Objective::MaxCompressionRatio).is_none());
        assert!(report.optimal.get(Objective::MaxCompressionPercentage).is_none());
    }
}

#[test]
fn test_out_of_range_points_fail_without_aborting() {
    let data = generate_test_data(4096, TestDataPattern::Text);
    let space = ParameterSpace::gzip(vec![0, 5, 10]).unwrap();
    let (report, measured) = sweep_all(&space, &data);

    assert_eq!(report.points_evaluated, 3);
    assert_eq!(measured.len(), 1);
    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|f| f.error.kind() == ErrorKind::UnsupportedParameter));
    assert_eq!(
        report.optimal.get(Objective::MinTime).unwrap().params,
        ParameterSet::Gzip { level: 5 }
    );

    let (report, _) = sweep_all(&ParameterSpace::gzip(vec![0, 12]).unwrap(), &data);
    assert!(report.all_failed());
    assert!(report.optimal.is_empty());
}

/// Allocates a large scratch buffer and frees it before returning
struct ScratchHeavy;

const SCRATCH_BYTES: usize = 8 * 1024 * 1024;

impl CodecAdapter for ScratchHeavy {
    fn family(&self) -> CodecFamily {
        CodecFamily::Snappy
    }

    fn compress(&self, data: &[u8], _params: &ParameterSet) -> Result<Vec<u8>> {
        let scratch = black_box(vec![7u8; SCRATCH_BYTES]);
        drop(scratch);
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

#[test]
fn test_peak_memory_includes_freed_scratch() {
    let data = generate_test_data(1024, TestDataPattern::Zeros);
    let result = ProfileSampler::new(&ScratchHeavy)
        .sample(&data, ParameterSet::Snappy)
        .unwrap();

    assert!(result.peak_memory_bytes >= SCRATCH_BYTES as u64);
    assert!(result.peak_memory_mb() >= 8.0);
}

#[tokio::test]
async fn test_parallel_sweep_matches_sequential_winners() {
    let data: Arc<[u8]> = generate_test_data(16 * 1024, TestDataPattern::Text).into();
    let space = ParameterSpace::default_for(CodecFamily::Zstd);

    let (sequential, _) = sweep_all(&space, &data);

    let runner = SweepRunner::new(SweepConfig {
        workers: WorkerCount::new(4).unwrap(),
        ..SweepConfig::default()
    });
    let mut order = Vec::new();
    let parallel = runner
        .run(
            &space,
            CodecRegistry::shared(CodecFamily::Zstd),
            Arc::clone(&data),
            |point| order.push(point.index),
        )
        .await
        .unwrap();

    assert_eq!(order, (0..22).collect::<Vec<_>>());
    assert_eq!(parallel.points_evaluated, sequential.points_evaluated);
    for objective in [
        Objective::MaxCompressionRatio,
        Objective::MaxCompressionPercentage,
    ] {
        let (a, b) = (
            sequential.optimal.get(objective).unwrap(),
            parallel.optimal.get(objective).unwrap(),
        );
        assert_eq!(a.params, b.params);
        assert_eq!(a.compressed_size, b.compressed_size);
    }
}

/// Sleeps on high levels to simulate a runaway codec call
struct Sluggish;

impl CodecAdapter for Sluggish {
    fn family(&self) -> CodecFamily {
        CodecFamily::Zstd
    }

    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
        if matches!(params, ParameterSet::Zstd { level } if *level >= 20) {
            std::thread::sleep(Duration::from_millis(400));
        }
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

#[tokio::test]
async fn test_cell_timeout_marks_only_the_slow_point() {
    let runner = SweepRunner::new(SweepConfig {
        workers: WorkerCount::new(2).unwrap(),
        cell_timeout: Some(CellTimeout::new(Duration::from_millis(150)).unwrap()),
        warmup: false,
    });
    let space = ParameterSpace::zstd(vec![1, 20, 2]).unwrap();

    let report = runner
        .run(&space, Arc::new(Sluggish), Arc::from(&b"payload"[..]), |_| {})
        .await
        .unwrap();

    assert_eq!(report.points_evaluated, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].error.kind(), ErrorKind::Timeout);
    assert_eq!(
        report.optimal.get(Objective::MinTime).unwrap().params,
        ParameterSet::Zstd { level: 1 }
    );
}

#[test]
fn test_config_file_drives_the_sweep() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("codecsweep.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        r#"
sweep:
  workers: 2
ranges:
  lz4:
    level: "1,9"
    block_size: "max64kb,max4mb"
"#
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    assert_eq!(config.sweep.workers.get(), 2);

    let space = build_space(CodecFamily::Lz4, &config.ranges, &RangeOverrides::default()).unwrap();
    assert_eq!(space.cardinality(), 4);

    let input = create_test_file(&dir, "input.txt", 8192, TestDataPattern::Text);
    let data = std::fs::read(input).unwrap();
    let (report, measured) = sweep_all(&space, &data);

    assert_eq!(report.points_evaluated, 4);
    assert_eq!(measured.len(), 4);
    assert!(measured.iter().all(|r| r.compressed_size < r.original_size));
}

#[test]
fn test_overrides_narrow_the_configured_space() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.toml");
    ConfigLoader::generate_default_config(&path).unwrap();
    let config = ConfigLoader::load_from_file(&path).unwrap();

    let overrides = RangeOverrides {
        quality: Some("9..=11".to_string()),
        mode: Some("text".to_string()),
        ..RangeOverrides::default()
    };
    let space = build_space(CodecFamily::Brotli, &config.ranges, &overrides).unwrap();
    assert_eq!(space.radices(), vec![3, 1, 15]);

    let data = generate_test_data(1024, TestDataPattern::Text);
    let (report, _) = sweep_all(&space, &data);
    assert_eq!(report.points_evaluated, 45);
    assert!(report.failures.is_empty());
}

/// Non-empty ordered subsets of the default gzip and lz4 axes
fn sub_space_strategy() -> impl Strategy<Value = ParameterSpace> {
    let gzip = subsequence((1..10).collect::<Vec<u32>>(), 1..=9)
        .prop_map(|level| ParameterSpace::gzip(level).unwrap());
    let lz4 = (
        subsequence((-5..17).collect::<Vec<i32>>(), 1..=4),
        subsequence(Lz4BlockSize::ALL.to_vec(), 1..=2),
    )
        .prop_map(|(level, block_size)| ParameterSpace::lz4(level, block_size).unwrap());
    prop_oneof![gzip, lz4]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Any subset of a supported grid sweeps cleanly and its winners come from it
    #[test]
    fn test_sub_space_sweeps_round_trip(
        space in sub_space_strategy(),
        pattern in prop::sample::select(TestDataPattern::ALL.to_vec())
    ) {
        let data = generate_test_data(2048, pattern);
        let (report, measured) = sweep_all(&space, &data);

        prop_assert_eq!(report.points_evaluated, space.cardinality());
        prop_assert!(report.failures.is_empty(), "{:?}", report.failures);
        prop_assert_eq!(measured.len(), space.cardinality());
        prop_assert!(measured.iter().all(|r| r.original_size == data.len() as u64));

        let min_size = measured.iter().map(|r| r.compressed_size).min().unwrap();
        let winner = report.optimal.get(Objective::MaxCompressionRatio).unwrap();
        prop_assert_eq!(winner.compressed_size, min_size);
        for objective in Objective::ALL {
            let params = report.optimal.get(objective).unwrap().params;
            prop_assert!(measured.iter().any(|r| r.params == params));
        }
    }
}
