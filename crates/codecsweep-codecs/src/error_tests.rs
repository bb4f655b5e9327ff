//! Error handling tests for codecsweep-codecs

use crate::algorithms::{CodecAdapter, CodecRegistry, GzipCodec, Lz4Codec, ZstdCodec};
use codecsweep_types::{CodecFamily, ErrorKind, ParameterSet};

fn payload() -> Vec<u8> {
    (0..8192u32).map(|i| (i % 251) as u8).collect()
}

/// Streams with a magic number reject foreign bytes outright
#[test]
fn test_invalid_stream_is_corrupt_data() {
    let invalid_data = vec![0xFF; 100];
    let codecs: Vec<Box<dyn CodecAdapter>> =
        vec![Box::new(GzipCodec), Box::new(Lz4Codec), Box::new(ZstdCodec)];

    for codec in codecs {
        let error = codec.decompress(&invalid_data).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::CorruptData);
        assert!(matches!(
            error,
            codecsweep_types::Error::CorruptData { family, .. } if family == codec.family()
        ));
    }
}

/// Truncated streams either fail or fail verification; they never pass
#[test]
fn test_truncated_stream_never_verifies() {
    let data = payload();

    for family in CodecFamily::ALL {
        let codec = CodecRegistry::adapter_for(family);
        let compressed = codec
            .compress(&data, &ParameterSet::default_for(family))
            .unwrap();
        let truncated = &compressed[..compressed.len() / 2];

        match codec.decompress(truncated) {
            Ok(output) => assert!(!codec.verify(&data, &output), "{} verified truncated data", family),
            Err(error) => assert_eq!(error.kind(), ErrorKind::CorruptData),
        }
    }
}

/// Streams from one family are not accepted as another's
#[test]
fn test_cross_family_stream_is_rejected() {
    let data = payload();
    let compressed = ZstdCodec
        .compress(&data, &ParameterSet::Zstd { level: 3 })
        .unwrap();

    let error = GzipCodec.decompress(&compressed).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CorruptData);
}

/// Unsupported parameters report the full parameter set
#[test]
fn test_unsupported_parameter_message() {
    let params = ParameterSet::Gzip { level: 12 };
    let error = GzipCodec.compress(&payload(), &params).unwrap_err();

    assert_eq!(error.params(), Some(&params));
    let message = error.to_string();
    assert!(message.contains("gzip(level=12)"));
    assert!(message.contains("outside 1..=9"));
}
