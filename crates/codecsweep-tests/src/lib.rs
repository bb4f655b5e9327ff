//! codecsweep Testing Suite
//!
//! Integration tests and benchmarks that drive the codecs, the configuration
//! layer and the sweep engine together.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Deterministic inputs shared by the integration tests and benchmarks.
pub mod test_utils;
