//! Property tests for codecsweep-codecs adapters

use crate::algorithms::CodecRegistry;
use codecsweep_types::{BrotliMode, Lz4BlockSize, ParameterSet};
use proptest::prelude::*;

/// Generate any legal parameter set across all families
fn legal_params_strategy() -> impl Strategy<Value = ParameterSet> {
    prop_oneof![
        (
            0u32..=11,
            prop::sample::select(BrotliMode::ALL.to_vec()),
            10u32..=24
        )
            .prop_map(|(quality, mode, window_bits)| ParameterSet::Brotli {
                quality,
                mode,
                window_bits
            }),
        (1u32..=9).prop_map(|level| ParameterSet::Gzip { level }),
        (-5i32..=16, prop::sample::select(Lz4BlockSize::ALL.to_vec()))
            .prop_map(|(level, block_size)| ParameterSet::Lz4 { level, block_size }),
        (1i32..=22).prop_map(|level| ParameterSet::Zstd { level }),
        Just(ParameterSet::Snappy),
    ]
}

/// Generate various data patterns for testing
fn data_pattern_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        // Empty data
        Just(vec![]),
        // Small random data
        prop::collection::vec(any::<u8>(), 1..=1024),
        // Highly compressible data
        (any::<u8>(), 1usize..=16 * 1024).prop_map(|(byte, size)| vec![byte; size]),
        // Text-like data
        prop::collection::vec(32u8..=126, 1..=4096),
        // Repeated binary pattern
        (prop::collection::vec(any::<u8>(), 1..=64), 1usize..=128)
            .prop_map(|(pattern, repeats)| pattern.repeat(repeats)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every legal parameter set round-trips every input
    #[test]
    fn fuzz_round_trip(params in legal_params_strategy(), data in data_pattern_strategy()) {
        let codec = CodecRegistry::adapter_for(params.family());

        let compressed = codec.compress(&data, &params).unwrap();
        let decompressed = codec.decompress(&compressed).unwrap();

        prop_assert!(codec.verify(&data, &decompressed));
    }

    /// Compression is deterministic for a fixed parameter set
    #[test]
    fn fuzz_compress_is_deterministic(params in legal_params_strategy(), data in data_pattern_strategy()) {
        let codec = CodecRegistry::adapter_for(params.family());

        let first = codec.compress(&data, &params).unwrap();
        let second = codec.compress(&data, &params).unwrap();

        prop_assert_eq!(first, second);
    }
}

mod empty_input {
    use super::*;
    use codecsweep_types::CodecFamily;

    #[test]
    fn test_empty_input_round_trips_for_every_family() {
        for family in CodecFamily::ALL {
            let codec = CodecRegistry::adapter_for(family);
            let params = ParameterSet::default_for(family);

            let compressed = codec.compress(&[], &params).unwrap();
            let decompressed = codec.decompress(&compressed).unwrap();

            assert!(decompressed.is_empty(), "{} produced bytes from empty input", family);
        }
    }
}
