//! Codec adapter implementations
//!
//! Each adapter wraps one registry codec behind the [`CodecAdapter`] contract
//! so that the sweep engine can drive every family the same way. Adapters are
//! stateless; all tuning arrives with the [`ParameterSet`] of each call.

use codecsweep_types::{BrotliMode, CodecFamily, Error, Lz4BlockSize, ParameterSet, Result};
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::debug;

/// Uniform compress/decompress/verify contract over one codec family
pub trait CodecAdapter: Send + Sync {
    /// Family this adapter implements
    fn family(&self) -> CodecFamily;

    /// Compress `data` with `params`
    ///
    /// Fails with [`Error::UnsupportedParameter`] when `params` belongs to a
    /// different family or holds a value the codec does not accept.
    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>>;

    /// Decompress a stream produced by [`CodecAdapter::compress`]
    ///
    /// Fails with [`Error::CorruptData`] when `data` is not a valid stream.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Whether a round trip reproduced the original bytes exactly
    fn verify(&self, original: &[u8], roundtripped: &[u8]) -> bool {
        original == roundtripped
    }
}

/// Adapter factory keyed by family
pub struct CodecRegistry;

impl CodecRegistry {
    /// Create the adapter for a family
    pub fn adapter_for(family: CodecFamily) -> Box<dyn CodecAdapter> {
        debug!("Creating {} codec adapter", family);
        match family {
            CodecFamily::Brotli => Box::new(BrotliCodec),
            CodecFamily::Gzip => Box::new(GzipCodec),
            CodecFamily::Lz4 => Box::new(Lz4Codec),
            CodecFamily::Zstd => Box::new(ZstdCodec),
            CodecFamily::Snappy => Box::new(SnappyCodec),
        }
    }

    /// Create a shareable adapter for a family
    pub fn shared(family: CodecFamily) -> Arc<dyn CodecAdapter> {
        Arc::from(Self::adapter_for(family))
    }

    /// Get all available families
    pub fn all_families() -> Vec<CodecFamily> {
        CodecFamily::ALL.to_vec()
    }
}

fn wrong_family(expected: CodecFamily, params: &ParameterSet) -> Error {
    Error::unsupported(
        *params,
        format!("{} adapter cannot run {} parameters", expected, params.family()),
    )
}

/// Brotli adapter (quality 0-11, window bits 10-24)
#[derive(Debug, Clone, Copy, Default)]
pub struct BrotliCodec;

impl BrotliCodec {
    /// Highest quality level
    pub const MAX_QUALITY: u32 = 11;
    /// Smallest window (log2)
    pub const MIN_WINDOW_BITS: u32 = 10;
    /// Largest window (log2)
    pub const MAX_WINDOW_BITS: u32 = 24;

    fn encoder_mode(mode: BrotliMode) -> brotli::enc::backward_references::BrotliEncoderMode {
        use brotli::enc::backward_references::BrotliEncoderMode;
        match mode {
            BrotliMode::Generic => BrotliEncoderMode::BROTLI_MODE_GENERIC,
            BrotliMode::Text => BrotliEncoderMode::BROTLI_MODE_TEXT,
            BrotliMode::Font => BrotliEncoderMode::BROTLI_MODE_FONT,
        }
    }
}

impl CodecAdapter for BrotliCodec {
    fn family(&self) -> CodecFamily {
        CodecFamily::Brotli
    }

    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
        let ParameterSet::Brotli {
            quality,
            mode,
            window_bits,
        } = *params
        else {
            return Err(wrong_family(self.family(), params));
        };

        if quality > Self::MAX_QUALITY {
            return Err(Error::unsupported(
                *params,
                format!("quality {} exceeds maximum {}", quality, Self::MAX_QUALITY),
            ));
        }
        if !(Self::MIN_WINDOW_BITS..=Self::MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(Error::unsupported(
                *params,
                format!(
                    "window bits {} outside {}..={}",
                    window_bits,
                    Self::MIN_WINDOW_BITS,
                    Self::MAX_WINDOW_BITS
                ),
            ));
        }

        let encoder_params = brotli::enc::BrotliEncoderParams {
            quality: quality as i32,
            lgwin: window_bits as i32,
            mode: Self::encoder_mode(mode),
            size_hint: data.len(),
            ..Default::default()
        };

        let mut input = data;
        let mut compressed = Vec::new();
        brotli::BrotliCompress(&mut input, &mut compressed, &encoder_params).map_err(|e| {
            Error::unsupported(*params, format!("Brotli compression failed: {}", e))
        })?;
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decompressed = Vec::new();
        let mut decompressor = brotli::Decompressor::new(data, 4096);

        decompressor
            .read_to_end(&mut decompressed)
            .map_err(|e| Error::corrupt(self.family(), format!("Brotli decompression failed: {}", e)))?;

        Ok(decompressed)
    }
}

/// Gzip adapter (level 1-9)
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCodec;

impl GzipCodec {
    /// Lowest accepted level
    pub const MIN_LEVEL: u32 = 1;
    /// Highest accepted level
    pub const MAX_LEVEL: u32 = 9;
}

impl CodecAdapter for GzipCodec {
    fn family(&self) -> CodecFamily {
        CodecFamily::Gzip
    }

    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
        let ParameterSet::Gzip { level } = *params else {
            return Err(wrong_family(self.family(), params));
        };
        if !(Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&level) {
            return Err(Error::unsupported(
                *params,
                format!("level {} outside {}..={}", level, Self::MIN_LEVEL, Self::MAX_LEVEL),
            ));
        }

        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::new(level));
        encoder
            .write_all(data)
            .map_err(|e| Error::unsupported(*params, format!("Gzip compression failed: {}", e)))?;
        encoder
            .finish()
            .map_err(|e| Error::unsupported(*params, format!("Gzip finish failed: {}", e)))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decompressed = Vec::new();
        flate2::read::GzDecoder::new(data)
            .read_to_end(&mut decompressed)
            .map_err(|e| Error::corrupt(self.family(), format!("Gzip decompression failed: {}", e)))?;
        Ok(decompressed)
    }
}

/// LZ4 frame adapter (level -5 to 16, five block sizes)
///
/// Negative levels select liblz4's accelerated mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Lz4Codec {
    /// Fastest accepted level
    pub const MIN_LEVEL: i32 = -5;
    /// Highest accepted level
    pub const MAX_LEVEL: i32 = 16;

    fn block_size(block_size: Lz4BlockSize) -> lz4::BlockSize {
        match block_size {
            Lz4BlockSize::Default => lz4::BlockSize::Default,
            Lz4BlockSize::Max64KB => lz4::BlockSize::Max64KB,
            Lz4BlockSize::Max256KB => lz4::BlockSize::Max256KB,
            Lz4BlockSize::Max1MB => lz4::BlockSize::Max1MB,
            Lz4BlockSize::Max4MB => lz4::BlockSize::Max4MB,
        }
    }
}

impl CodecAdapter for Lz4Codec {
    fn family(&self) -> CodecFamily {
        CodecFamily::Lz4
    }

    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
        let ParameterSet::Lz4 { level, block_size } = *params else {
            return Err(wrong_family(self.family(), params));
        };
        if !(Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&level) {
            return Err(Error::unsupported(
                *params,
                format!("level {} outside {}..={}", level, Self::MIN_LEVEL, Self::MAX_LEVEL),
            ));
        }

        // liblz4 reads the preference as a signed int; the bit pattern carries negatives.
        let mut encoder = lz4::EncoderBuilder::new()
            .level(level as u32)
            .block_size(Self::block_size(block_size))
            .build(Vec::new())
            .map_err(|e| Error::unsupported(*params, format!("LZ4 encoder setup failed: {}", e)))?;
        encoder
            .write_all(data)
            .map_err(|e| Error::unsupported(*params, format!("LZ4 compression failed: {}", e)))?;

        let (compressed, result) = encoder.finish();
        result.map_err(|e| Error::unsupported(*params, format!("LZ4 finish failed: {}", e)))?;
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = lz4::Decoder::new(data)
            .map_err(|e| Error::corrupt(self.family(), format!("LZ4 frame header invalid: {}", e)))?;
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| Error::corrupt(self.family(), format!("LZ4 decompression failed: {}", e)))?;
        Ok(decompressed)
    }
}

/// Zstandard adapter (level 1-22)
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdCodec;

impl ZstdCodec {
    /// Lowest accepted level
    pub const MIN_LEVEL: i32 = 1;
    /// Highest accepted level
    pub const MAX_LEVEL: i32 = 22;
}

impl CodecAdapter for ZstdCodec {
    fn family(&self) -> CodecFamily {
        CodecFamily::Zstd
    }

    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
        let ParameterSet::Zstd { level } = *params else {
            return Err(wrong_family(self.family(), params));
        };
        if !(Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&level) {
            return Err(Error::unsupported(
                *params,
                format!("level {} outside {}..={}", level, Self::MIN_LEVEL, Self::MAX_LEVEL),
            ));
        }

        zstd::bulk::compress(data, level)
            .map_err(|e| Error::unsupported(*params, format!("Zstd compression failed: {}", e)))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::decode_all(data)
            .map_err(|e| Error::corrupt(self.family(), format!("Zstd decompression failed: {}", e)))
    }
}

/// Snappy raw-format adapter (no parameters)
#[derive(Debug, Clone, Copy, Default)]
pub struct SnappyCodec;

impl CodecAdapter for SnappyCodec {
    fn family(&self) -> CodecFamily {
        CodecFamily::Snappy
    }

    fn compress(&self, data: &[u8], params: &ParameterSet) -> Result<Vec<u8>> {
        if *params != ParameterSet::Snappy {
            return Err(wrong_family(self.family(), params));
        }
        snap::raw::Encoder::new()
            .compress_vec(data)
            .map_err(|e| Error::unsupported(*params, format!("Snappy compression failed: {}", e)))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        snap::raw::Decoder::new()
            .decompress_vec(data)
            .map_err(|e| Error::corrupt(self.family(), format!("Snappy decompression failed: {}", e)))
    }
}
