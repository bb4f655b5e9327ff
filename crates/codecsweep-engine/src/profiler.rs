//! Single-call measurement of a codec
//!
//! [`ProfileSampler`] runs compress, decompress and verify for one parameter
//! set inside a [`ProfilingContext`] and turns the outcome into a
//! [`CompressionResult`].

use crate::memory::{self, MemoryTrace};
use codecsweep_codecs::CodecAdapter;
use codecsweep_types::{CompressionResult, Error, ParameterSet, Result};
use std::sync::Once;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

static ALLOCATOR_WARNING: Once = Once::new();

/// Time and peak memory of one measured window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Wall-clock time of the window
    pub elapsed: Duration,
    /// Peak bytes above the window's baseline
    pub peak_memory_bytes: u64,
}

/// Timer and memory trace for one measured window
///
/// The trace is released when the context is dropped, on every exit path.
#[derive(Debug)]
pub struct ProfilingContext {
    trace: MemoryTrace,
    started: Instant,
}

impl ProfilingContext {
    /// Open a window on the current thread
    pub fn begin() -> Self {
        if !memory::is_installed() {
            ALLOCATOR_WARNING.call_once(|| {
                warn!("Tracking allocator is not installed; peak memory will read as zero");
            });
        }
        let trace = MemoryTrace::start();
        Self {
            trace,
            started: Instant::now(),
        }
    }

    /// Close the window
    pub fn finish(self) -> Measurement {
        let elapsed = self.started.elapsed();
        Measurement {
            elapsed,
            peak_memory_bytes: self.trace.peak_bytes(),
        }
    }
}

/// Measures single codec invocations
pub struct ProfileSampler<'a> {
    adapter: &'a dyn CodecAdapter,
}

impl<'a> ProfileSampler<'a> {
    /// Create a sampler for an adapter
    pub fn new(adapter: &'a dyn CodecAdapter) -> Self {
        Self { adapter }
    }

    /// Compress, decompress and verify `data` once with `params`
    ///
    /// A round trip that does not reproduce `data` fails with
    /// [`Error::Integrity`]; codec errors are returned unchanged.
    pub fn sample(&self, data: &[u8], params: ParameterSet) -> Result<CompressionResult> {
        let context = ProfilingContext::begin();

        let compressed = self.adapter.compress(data, &params)?;
        let roundtripped = self.adapter.decompress(&compressed)?;
        let intact = self.adapter.verify(data, &roundtripped);
        let compressed_size = compressed.len() as u64;
        drop(roundtripped);
        drop(compressed);

        let measurement = context.finish();
        if !intact {
            return Err(Error::integrity(params));
        }

        trace!(
            "{}: {} -> {} bytes in {:?}, peak {} bytes",
            params,
            data.len(),
            compressed_size,
            measurement.elapsed,
            measurement.peak_memory_bytes
        );

        Ok(CompressionResult {
            params,
            original_size: data.len() as u64,
            compressed_size,
            time_taken: measurement.elapsed,
            peak_memory_bytes: measurement.peak_memory_bytes,
        })
    }

    /// Run one untimed round trip to settle lazy initialization
    pub fn warm_up(&self, data: &[u8], params: ParameterSet) {
        let outcome = self
            .adapter
            .compress(data, &params)
            .and_then(|compressed| self.adapter.decompress(&compressed));
        if let Err(error) = outcome {
            trace!("Warm-up with {} failed: {}", params, error);
        }
    }
}
