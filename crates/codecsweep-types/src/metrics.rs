//! Compression metrics
//!
//! Every ratio and percentage shown by codecsweep is computed here. The ratio
//! is `original / compressed`, so values above 1 mean the data shrank, and the
//! percentage is the share of the input that was saved.

use crate::params::ParameterSet;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bytes per megabyte for display (decimal)
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// A derived metric that may be undefined
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Metric {
    /// A finite value
    Defined(f64),
    /// Not computable for this input (e.g. zero-length)
    Undefined,
}

impl Metric {
    /// The value, if defined
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// Whether the metric has a value
    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// Strictly greater, where an undefined metric never wins
    pub fn beats(self, other: Option<f64>) -> bool {
        match (self, other) {
            (Self::Defined(v), Some(best)) => v > best,
            (Self::Defined(_), None) => true,
            (Self::Undefined, _) => false,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match (self, f.precision()) {
            (Self::Defined(v), Some(p)) => format!("{:.*}", p, v),
            (Self::Defined(v), None) => v.to_string(),
            (Self::Undefined, _) => "undefined".to_string(),
        };
        // Precision applies to the number only, width to both.
        match (f.width(), f.align()) {
            (Some(w), Some(fmt::Alignment::Left)) => write!(f, "{:<w$}", text),
            (Some(w), Some(fmt::Alignment::Center)) => write!(f, "{:^w$}", text),
            (Some(w), _) => write!(f, "{:>w$}", text),
            (None, _) => f.write_str(&text),
        }
    }
}

/// `original / compressed`
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> Metric {
    if original_size == 0 || compressed_size == 0 {
        Metric::Undefined
    } else {
        Metric::Defined(original_size as f64 / compressed_size as f64)
    }
}

/// `(1 - compressed / original) * 100`
pub fn compression_percentage(original_size: u64, compressed_size: u64) -> Metric {
    if original_size == 0 {
        Metric::Undefined
    } else {
        Metric::Defined((1.0 - compressed_size as f64 / original_size as f64) * 100.0)
    }
}

/// Measurements for one evaluated grid point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionResult {
    /// Parameters the point was evaluated with
    pub params: ParameterSet,
    /// Input size in bytes
    pub original_size: u64,
    /// Compressed size in bytes
    pub compressed_size: u64,
    /// Wall-clock time for compress, decompress and verify
    pub time_taken: Duration,
    /// Peak bytes allocated above the baseline during the call
    pub peak_memory_bytes: u64,
}

impl CompressionResult {
    /// Compression ratio of this point
    pub fn compression_ratio(&self) -> Metric {
        compression_ratio(self.original_size, self.compressed_size)
    }

    /// Space saved, as a percentage of the input
    pub fn compression_percentage(&self) -> Metric {
        compression_percentage(self.original_size, self.compressed_size)
    }

    /// Elapsed time in seconds
    pub fn time_secs(&self) -> f64 {
        self.time_taken.as_secs_f64()
    }

    /// Peak memory in decimal megabytes
    pub fn peak_memory_mb(&self) -> f64 {
        self.peak_memory_bytes as f64 / BYTES_PER_MB
    }
}
