//! Configuration management for codecsweep
//!
//! This crate loads sweep settings, output preferences and the default
//! parameter ranges of every codec family, and turns range expressions into
//! parameter spaces.
//!
//! # Features
//!
//! - **Multiple formats**: YAML, TOML and JSON, detected by file extension
//! - **Validation**: worker count, cell timeout and every default range are
//!   checked when the configuration is built
//! - **Environment overrides**: `CODECSWEEP_SWEEP__WORKERS=4` and friends
//! - **Defaults**: the full default sweep for each family
//!
//! # Examples
//!
//! ```rust
//! use codecsweep_config::{build_space, ConfigBuilder, RangeOverrides};
//! use codecsweep_types::CodecFamily;
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! let space = build_space(CodecFamily::Lz4, &config.ranges, &RangeOverrides::default())?;
//! assert_eq!(space.cardinality(), 110);
//! # Ok::<(), codecsweep_config::ConfigError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use codecsweep_types::{CellTimeout, WorkerCount};
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod error;
pub mod loader;
pub mod range;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use range::{build_params, build_space, parse_int_range, parse_labels, RangeOverrides};

/// Main configuration structure for codecsweep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How sweeps are executed
    pub sweep: SweepSettings,
    /// How results are rendered
    pub output: OutputSettings,
    /// Default ranges per family
    pub ranges: RangeDefaults,
}

/// Sweep execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSettings {
    /// Grid cells evaluated concurrently
    pub workers: WorkerCount,
    /// Optional deadline per grid cell, in seconds
    pub cell_timeout_secs: Option<f64>,
    /// Run one untimed sample before the sweep
    pub warmup: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            workers: WorkerCount::sequential(),
            cell_timeout_secs: None,
            warmup: false,
        }
    }
}

impl SweepSettings {
    /// Validated cell deadline
    pub fn cell_timeout(&self) -> ConfigResult<Option<CellTimeout>> {
        self.cell_timeout_secs
            .map(|secs| {
                CellTimeout::from_secs_f64(secs)
                    .map_err(|e| ConfigError::invalid_value("sweep.cell_timeout_secs", e))
            })
            .transpose()
    }
}

/// Result rendering format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON document
    Json,
}

/// Unit for peak memory in tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryUnit {
    /// Decimal megabytes
    #[default]
    Mb,
    /// Raw bytes
    Bytes,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Table or JSON
    pub format: OutputFormat,
    /// Peak memory unit in tables
    pub memory_unit: MemoryUnit,
}

/// Brotli range expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrotliRanges {
    /// Quality values
    pub quality: String,
    /// Mode labels
    pub mode: String,
    /// Window bits
    pub window_bits: String,
}

/// Single-axis level range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    /// Level values
    pub level: String,
}

/// LZ4 range expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lz4Ranges {
    /// Level values
    pub level: String,
    /// Block size labels
    pub block_size: String,
}

/// Default range expressions for every family with parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDefaults {
    /// Brotli axes
    pub brotli: BrotliRanges,
    /// Gzip level
    pub gzip: LevelRange,
    /// LZ4 axes
    pub lz4: Lz4Ranges,
    /// Zstd level
    pub zstd: LevelRange,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self {
            brotli: BrotliRanges {
                quality: "0..12".to_string(),
                mode: "generic,text,font".to_string(),
                window_bits: "10..25".to_string(),
            },
            gzip: LevelRange {
                level: "1..10".to_string(),
            },
            lz4: Lz4Ranges {
                level: "-5..17".to_string(),
                block_size: "default,max64kb,max256kb,max1mb,max4mb".to_string(),
            },
            zstd: LevelRange {
                level: "1..23".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed, config);
        assert!(yaml.contains("workers: 1"));
        assert!(yaml.contains("format: table"));
    }

    #[test]
    fn test_cell_timeout_validation() {
        let mut settings = SweepSettings::default();
        assert_eq!(settings.cell_timeout().unwrap(), None);

        settings.cell_timeout_secs = Some(2.5);
        assert_eq!(
            settings.cell_timeout().unwrap().map(CellTimeout::get),
            Some(std::time::Duration::from_millis(2500))
        );

        settings.cell_timeout_secs = Some(0.0);
        assert!(settings.cell_timeout().is_err());

        settings.cell_timeout_secs = Some(1e20);
        assert!(settings.cell_timeout().is_err());
    }
}
