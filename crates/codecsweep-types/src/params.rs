//! Codec families and the parameter sets that select one point of a sweep
//!
//! A [`ParameterSet`] is a tagged variant with one case per codec family.
//! Values are not range-checked here: sweep ranges come from the caller and
//! an out-of-range value is rejected by the codec itself at compress time.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Compression family a codec adapter implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CodecFamily {
    /// Brotli (quality, mode, window bits)
    Brotli,
    /// Gzip container over deflate (level)
    Gzip,
    /// LZ4 frame format (level, block size)
    Lz4,
    /// Zstandard (level)
    Zstd,
    /// Snappy raw format (no parameters)
    Snappy,
}

impl CodecFamily {
    /// Every supported family, in the order they are listed to users
    pub const ALL: [CodecFamily; 5] = [
        CodecFamily::Brotli,
        CodecFamily::Gzip,
        CodecFamily::Lz4,
        CodecFamily::Zstd,
        CodecFamily::Snappy,
    ];

    /// Lowercase family name
    pub fn name(self) -> &'static str {
        match self {
            Self::Brotli => "brotli",
            Self::Gzip => "gzip",
            Self::Lz4 => "lz4",
            Self::Zstd => "zstd",
            Self::Snappy => "snappy",
        }
    }

    /// Names of the tunable axes, outermost first
    pub fn axis_names(self) -> &'static [&'static str] {
        match self {
            Self::Brotli => &["quality", "mode", "window_bits"],
            Self::Gzip | Self::Zstd => &["level"],
            Self::Lz4 => &["level", "block_size"],
            Self::Snappy => &[],
        }
    }
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for CodecFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.name() == wanted)
            .ok_or_else(|| Error::config(format!("unknown codec family '{}'", s.trim())))
    }
}

/// Brotli encoder mode hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BrotliMode {
    /// Arbitrary data
    Generic,
    /// UTF-8 text
    Text,
    /// WOFF 2.0 fonts
    Font,
}

impl BrotliMode {
    /// All modes in their numeric order (0, 1, 2)
    pub const ALL: [BrotliMode; 3] = [BrotliMode::Generic, BrotliMode::Text, BrotliMode::Font];

    /// Lowercase label
    pub fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Text => "text",
            Self::Font => "font",
        }
    }
}

impl fmt::Display for BrotliMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for BrotliMode {
    type Err = Error;

    /// Accepts the label (any case) or the numeric mode id.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "0" => Ok(Self::Generic),
            "text" | "1" => Ok(Self::Text),
            "font" | "2" => Ok(Self::Font),
            other => Err(Error::config(format!(
                "unknown brotli mode '{}' (expected generic, text or font)",
                other
            ))),
        }
    }
}

/// LZ4 frame block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lz4BlockSize {
    /// Library default (64KB)
    Default,
    /// 64KB blocks
    Max64KB,
    /// 256KB blocks
    Max256KB,
    /// 1MB blocks
    Max1MB,
    /// 4MB blocks
    Max4MB,
}

impl Lz4BlockSize {
    /// All block sizes in frame-descriptor order
    pub const ALL: [Lz4BlockSize; 5] = [
        Lz4BlockSize::Default,
        Lz4BlockSize::Max64KB,
        Lz4BlockSize::Max256KB,
        Lz4BlockSize::Max1MB,
        Lz4BlockSize::Max4MB,
    ];

    /// Lowercase label
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Max64KB => "max64kb",
            Self::Max256KB => "max256kb",
            Self::Max1MB => "max1mb",
            Self::Max4MB => "max4mb",
        }
    }

    /// Block size id as written in the LZ4 frame descriptor
    pub fn frame_id(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Max64KB => 4,
            Self::Max256KB => 5,
            Self::Max1MB => 6,
            Self::Max4MB => 7,
        }
    }
}

impl fmt::Display for Lz4BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Lz4BlockSize {
    type Err = Error;

    /// Accepts the label, a short size (`64kb`, `1mb`) or the frame id.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "auto" | "0" => Ok(Self::Default),
            "max64kb" | "64kb" | "4" => Ok(Self::Max64KB),
            "max256kb" | "256kb" | "5" => Ok(Self::Max256KB),
            "max1mb" | "1mb" | "6" => Ok(Self::Max1MB),
            "max4mb" | "4mb" | "7" => Ok(Self::Max4MB),
            other => Err(Error::config(format!("unknown lz4 block size '{}'", other))),
        }
    }
}

/// One point of a codec family's parameter space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "lowercase"))]
pub enum ParameterSet {
    /// Brotli parameters
    Brotli {
        /// Quality, 0-11
        quality: u32,
        /// Encoder mode
        mode: BrotliMode,
        /// Log2 of the sliding window, 10-24
        window_bits: u32,
    },
    /// Gzip parameters
    Gzip {
        /// Compression level, 1-9
        level: u32,
    },
    /// LZ4 parameters
    Lz4 {
        /// Compression level, -5 (fastest) to 16
        level: i32,
        /// Frame block size
        block_size: Lz4BlockSize,
    },
    /// Zstd parameters
    Zstd {
        /// Compression level, 1-22
        level: i32,
    },
    /// Snappy takes no parameters
    Snappy,
}

impl ParameterSet {
    /// Family this parameter set belongs to
    pub fn family(&self) -> CodecFamily {
        match self {
            Self::Brotli { .. } => CodecFamily::Brotli,
            Self::Gzip { .. } => CodecFamily::Gzip,
            Self::Lz4 { .. } => CodecFamily::Lz4,
            Self::Zstd { .. } => CodecFamily::Zstd,
            Self::Snappy => CodecFamily::Snappy,
        }
    }

    /// The parameters a family uses when none are given
    pub fn default_for(family: CodecFamily) -> Self {
        match family {
            CodecFamily::Brotli => Self::Brotli {
                quality: 11,
                mode: BrotliMode::Generic,
                window_bits: 22,
            },
            CodecFamily::Gzip => Self::Gzip { level: 6 },
            CodecFamily::Lz4 => Self::Lz4 {
                level: 1,
                block_size: Lz4BlockSize::Default,
            },
            CodecFamily::Zstd => Self::Zstd { level: 3 },
            CodecFamily::Snappy => Self::Snappy,
        }
    }

    /// Axis values as `(name, value)` pairs, outermost axis first
    pub fn assignments(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Brotli {
                quality,
                mode,
                window_bits,
            } => vec![
                ("quality", quality.to_string()),
                ("mode", mode.to_string()),
                ("window_bits", window_bits.to_string()),
            ],
            Self::Gzip { level } => vec![("level", level.to_string())],
            Self::Lz4 { level, block_size } => vec![
                ("level", level.to_string()),
                ("block_size", block_size.to_string()),
            ],
            Self::Zstd { level } => vec![("level", level.to_string())],
            Self::Snappy => Vec::new(),
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assignments = self
            .assignments()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.family(), assignments)
    }
}
