//! Parameter spaces
//!
//! A [`ParameterSpace`] holds one ordered list of values per tunable axis of
//! a codec family. The grid of a sweep is the Cartesian product of those
//! lists, first axis outermost.

use crate::params::{BrotliMode, CodecFamily, Lz4BlockSize, ParameterSet};
use crate::{Error, Result};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered axes of a codec family's parameter grid
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "lowercase"))]
pub enum ParameterSpace {
    /// Brotli: quality × mode × window bits
    Brotli {
        /// Quality values
        quality: Vec<u32>,
        /// Encoder modes
        mode: Vec<BrotliMode>,
        /// Window sizes (log2)
        window_bits: Vec<u32>,
    },
    /// Gzip: level
    Gzip {
        /// Levels
        level: Vec<u32>,
    },
    /// LZ4: level × block size
    Lz4 {
        /// Levels
        level: Vec<i32>,
        /// Block sizes
        block_size: Vec<Lz4BlockSize>,
    },
    /// Zstd: level
    Zstd {
        /// Levels
        level: Vec<i32>,
    },
    /// Snappy has no axes
    Snappy,
}

/// Display summary of one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSummary {
    /// Axis name
    pub name: &'static str,
    /// Values, rendered
    pub values: Vec<String>,
}

fn non_empty<T>(family: CodecFamily, axis: &str, values: Vec<T>) -> Result<Vec<T>> {
    if values.is_empty() {
        Err(Error::config(format!(
            "{} axis '{}' has no values; the parameter space is empty",
            family, axis
        )))
    } else {
        Ok(values)
    }
}

fn render<T: ToString>(values: &[T]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl ParameterSpace {
    /// Brotli space; every axis must be non-empty
    pub fn brotli(quality: Vec<u32>, mode: Vec<BrotliMode>, window_bits: Vec<u32>) -> Result<Self> {
        let family = CodecFamily::Brotli;
        Ok(Self::Brotli {
            quality: non_empty(family, "quality", quality)?,
            mode: non_empty(family, "mode", mode)?,
            window_bits: non_empty(family, "window_bits", window_bits)?,
        })
    }

    /// Gzip space
    pub fn gzip(level: Vec<u32>) -> Result<Self> {
        Ok(Self::Gzip {
            level: non_empty(CodecFamily::Gzip, "level", level)?,
        })
    }

    /// LZ4 space
    pub fn lz4(level: Vec<i32>, block_size: Vec<Lz4BlockSize>) -> Result<Self> {
        let family = CodecFamily::Lz4;
        Ok(Self::Lz4 {
            level: non_empty(family, "level", level)?,
            block_size: non_empty(family, "block_size", block_size)?,
        })
    }

    /// Zstd space
    pub fn zstd(level: Vec<i32>) -> Result<Self> {
        Ok(Self::Zstd {
            level: non_empty(CodecFamily::Zstd, "level", level)?,
        })
    }

    /// Snappy's single-point space
    pub fn snappy() -> Self {
        Self::Snappy
    }

    /// The full default sweep for a family
    ///
    /// Brotli quality 0..12 × 3 modes × window 10..25, gzip 1..10,
    /// lz4 -5..17 × 5 block sizes, zstd 1..23 (all half-open).
    pub fn default_for(family: CodecFamily) -> Self {
        match family {
            CodecFamily::Brotli => Self::Brotli {
                quality: (0..12).collect(),
                mode: BrotliMode::ALL.to_vec(),
                window_bits: (10..25).collect(),
            },
            CodecFamily::Gzip => Self::Gzip {
                level: (1..10).collect(),
            },
            CodecFamily::Lz4 => Self::Lz4 {
                level: (-5..17).collect(),
                block_size: Lz4BlockSize::ALL.to_vec(),
            },
            CodecFamily::Zstd => Self::Zstd {
                level: (1..23).collect(),
            },
            CodecFamily::Snappy => Self::Snappy,
        }
    }

    /// A space containing exactly `params`
    pub fn single(params: ParameterSet) -> Self {
        match params {
            ParameterSet::Brotli {
                quality,
                mode,
                window_bits,
            } => Self::Brotli {
                quality: vec![quality],
                mode: vec![mode],
                window_bits: vec![window_bits],
            },
            ParameterSet::Gzip { level } => Self::Gzip { level: vec![level] },
            ParameterSet::Lz4 { level, block_size } => Self::Lz4 {
                level: vec![level],
                block_size: vec![block_size],
            },
            ParameterSet::Zstd { level } => Self::Zstd { level: vec![level] },
            ParameterSet::Snappy => Self::Snappy,
        }
    }

    /// Family of every point in this space
    pub fn family(&self) -> CodecFamily {
        match self {
            Self::Brotli { .. } => CodecFamily::Brotli,
            Self::Gzip { .. } => CodecFamily::Gzip,
            Self::Lz4 { .. } => CodecFamily::Lz4,
            Self::Zstd { .. } => CodecFamily::Zstd,
            Self::Snappy => CodecFamily::Snappy,
        }
    }

    /// Length of each axis, outermost first
    pub fn radices(&self) -> Vec<usize> {
        match self {
            Self::Brotli {
                quality,
                mode,
                window_bits,
            } => vec![quality.len(), mode.len(), window_bits.len()],
            Self::Gzip { level } => vec![level.len()],
            Self::Lz4 { level, block_size } => vec![level.len(), block_size.len()],
            Self::Zstd { level } => vec![level.len()],
            Self::Snappy => Vec::new(),
        }
    }

    /// Number of grid points; 1 for a space with no axes
    pub fn cardinality(&self) -> usize {
        self.radices().iter().product()
    }

    /// Whether the grid has no points
    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// Parameter set at a mixed-radix coordinate
    ///
    /// # Panics
    ///
    /// Panics if `coords` has the wrong arity or a coordinate is out of
    /// range for its axis.
    pub fn params_at(&self, coords: &[usize]) -> ParameterSet {
        assert_eq!(coords.len(), self.radices().len(), "coordinate arity mismatch");
        match self {
            Self::Brotli {
                quality,
                mode,
                window_bits,
            } => ParameterSet::Brotli {
                quality: quality[coords[0]],
                mode: mode[coords[1]],
                window_bits: window_bits[coords[2]],
            },
            Self::Gzip { level } => ParameterSet::Gzip {
                level: level[coords[0]],
            },
            Self::Lz4 { level, block_size } => ParameterSet::Lz4 {
                level: level[coords[0]],
                block_size: block_size[coords[1]],
            },
            Self::Zstd { level } => ParameterSet::Zstd {
                level: level[coords[0]],
            },
            Self::Snappy => ParameterSet::Snappy,
        }
    }

    /// Axis names and rendered values, outermost first
    pub fn axes(&self) -> Vec<AxisSummary> {
        let values = match self {
            Self::Brotli {
                quality,
                mode,
                window_bits,
            } => vec![render(quality), render(mode), render(window_bits)],
            Self::Gzip { level } => vec![render(level)],
            Self::Lz4 { level, block_size } => vec![render(level), render(block_size)],
            Self::Zstd { level } => vec![render(level)],
            Self::Snappy => Vec::new(),
        };
        self.family()
            .axis_names()
            .iter()
            .copied()
            .zip(values)
            .map(|(name, values)| AxisSummary { name, values })
            .collect()
    }
}

impl fmt::Display for ParameterSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = self.axes();
        if axes.is_empty() {
            return write!(f, "{} (single point)", self.family());
        }
        let summary = axes
            .iter()
            .map(|axis| format!("{}[{}]", axis.name, axis.values.len()))
            .collect::<Vec<_>>()
            .join(" x ");
        write!(f, "{} {}", self.family(), summary)
    }
}
