//! Core types and error handling for codecsweep
//!
//! This crate provides the data model shared by every codecsweep crate:
//!
//! - **Parameters**: codec families and the [`ParameterSet`] variant that
//!   selects one point of a sweep
//! - **Spaces**: [`ParameterSpace`], the ordered axes a sweep enumerates
//! - **Metrics**: [`CompressionResult`] and the canonical ratio/percentage
//! - **Reports**: objectives, per-objective winners and the sweep report
//! - **Error handling**: one error enum separating point failures from
//!   sweep-level errors
//!
//! # Features
//!
//! - `std` (default): Enable standard library features
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use codecsweep_types::{CodecFamily, ParameterSpace, Result};
//!
//! fn gzip_grid() -> Result<ParameterSpace> {
//!     let family: CodecFamily = "gzip".parse()?;
//!     let space = ParameterSpace::gzip(vec![1, 6, 9])?;
//!     assert_eq!(space.family(), family);
//!     Ok(space)
//! }
//! # assert_eq!(gzip_grid().unwrap().cardinality(), 3);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod params;
pub mod report;
pub mod result;
pub mod space;

// Re-export commonly used types
pub use config::{CellTimeout, WorkerCount};
pub use error::{Error, ErrorKind};
pub use metrics::{compression_percentage, compression_ratio, CompressionResult, Metric};
pub use params::{BrotliMode, CodecFamily, Lz4BlockSize, ParameterSet};
pub use report::{FailedPoint, Objective, OptimalResultSet, SweepReport};
pub use result::Result;
pub use space::{AxisSummary, ParameterSpace};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_params_lie_in_default_space() {
        for family in CodecFamily::ALL {
            let space = ParameterSpace::default_for(family);
            let params = ParameterSet::default_for(family);
            let radices = space.radices();

            let mut found = false;
            let mut coords = vec![0; radices.len()];
            'outer: loop {
                if space.params_at(&coords) == params {
                    found = true;
                    break;
                }
                for axis in (0..coords.len()).rev() {
                    coords[axis] += 1;
                    if coords[axis] < radices[axis] {
                        continue 'outer;
                    }
                    coords[axis] = 0;
                }
                break;
            }
            assert!(found, "{} missing from default {} space", params, family);
        }
    }

    #[test]
    fn test_zero_length_result_is_undefined() {
        let result = CompressionResult {
            params: ParameterSet::Snappy,
            original_size: 0,
            compressed_size: 1,
            time_taken: Duration::from_micros(3),
            peak_memory_bytes: 0,
        };
        assert!(!result.compression_ratio().is_defined());
        assert!(!result.compression_percentage().is_defined());
    }
}
