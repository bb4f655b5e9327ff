//! Sweep engine for codecsweep
//!
//! This crate measures codecs over parameter grids and selects the best
//! configuration for each objective.
//!
//! # Features
//!
//! - **Peak memory**: a per-thread tracking allocator and scoped traces
//! - **Profiling**: time and peak memory of one compress/decompress/verify call
//! - **Enumeration**: an arity-agnostic Cartesian product over parameter axes
//! - **Selection**: strict, first-seen-wins winners per objective
//! - **Parallel sweeps**: bounded blocking workers with per-cell deadlines
//!
//! # Examples
//!
//! ```rust
//! use codecsweep_codecs::CodecRegistry;
//! use codecsweep_engine::SweepRunner;
//! use codecsweep_types::{CodecFamily, Objective, ParameterSpace};
//!
//! # fn main() -> codecsweep_types::Result<()> {
//! let space = ParameterSpace::gzip(vec![1, 6, 9])?;
//! let codec = CodecRegistry::adapter_for(CodecFamily::Gzip);
//! let data = b"Hello, world! ".repeat(100);
//!
//! let report = SweepRunner::default().run_sequential(&space, codec.as_ref(), &data, |_| {})?;
//! assert_eq!(report.points_evaluated, 3);
//! assert!(report.optimal.get(Objective::MaxCompressionRatio).is_some());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod memory;
pub mod profiler;
pub mod selector;
pub mod sweep;

pub use grid::{CartesianProduct, GridEnumerator, GridPoint};
pub use memory::{MemoryTrace, TrackingAllocator};
pub use profiler::{Measurement, ProfileSampler, ProfilingContext};
pub use selector::OptimalSelector;
pub use sweep::{SweepConfig, SweepRunner};

#[cfg(test)]
#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new();
