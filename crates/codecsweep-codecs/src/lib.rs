//! Codec adapters for codecsweep
//!
//! This crate puts every compression family a sweep can drive behind one
//! contract, [`CodecAdapter`], and provides a factory, [`CodecRegistry`],
//! keyed by [`CodecFamily`](codecsweep_types::CodecFamily).
//!
//! # Supported Families
//!
//! - **Brotli**: quality, mode and window size (`brotli`)
//! - **Gzip**: deflate level in a gzip container (`flate2`)
//! - **LZ4**: frame format with level and block size (`lz4`)
//! - **Zstandard**: level (`zstd`)
//! - **Snappy**: raw format, no parameters (`snap`)
//!
//! # Examples
//!
//! ```rust
//! use codecsweep_codecs::CodecRegistry;
//! use codecsweep_types::{CodecFamily, ParameterSet};
//!
//! let codec = CodecRegistry::adapter_for(CodecFamily::Zstd);
//! let data = b"Hello, world! This is test data for compression.";
//!
//! let compressed = codec.compress(data, &ParameterSet::Zstd { level: 19 })?;
//! let decompressed = codec.decompress(&compressed)?;
//!
//! assert!(codec.verify(data, &decompressed));
//! # Ok::<(), codecsweep_types::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod fuzz_tests;

// Re-export main types
pub use algorithms::{
    BrotliCodec, CodecAdapter, CodecRegistry, GzipCodec, Lz4Codec, SnappyCodec, ZstdCodec,
};
