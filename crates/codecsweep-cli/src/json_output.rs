//! JSON output structures for the codecsweep CLI

use codecsweep_types::{CodecFamily, CompressionResult, FailedPoint, ParameterSet, SweepReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete JSON output for a sweep
#[derive(Debug, Serialize, Deserialize)]
pub struct SweepReportJson {
    /// Run metadata
    pub metadata: RunMetadata,
    /// Sweep totals
    pub summary: SweepSummaryJson,
    /// Winners keyed by canonical objective name
    pub objectives: BTreeMap<String, ResultJson>,
    /// Points that did not produce a measurement
    pub failures: Vec<FailureJson>,
}

/// Run metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct RunMetadata {
    /// codecsweep version
    pub version: String,
    /// Operation type
    pub operation: String,
    /// Timestamp when the report was produced
    pub timestamp: String,
    /// Codec family
    pub family: CodecFamily,
    /// Input path
    pub input_path: String,
    /// Input size in bytes
    pub input_size_bytes: u64,
}

impl RunMetadata {
    fn new(operation: &str, family: CodecFamily, input: &Path, input_size_bytes: u64) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            operation: operation.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            family,
            input_path: input.display().to_string(),
            input_size_bytes,
        }
    }
}

/// Sweep totals
#[derive(Debug, Serialize, Deserialize)]
pub struct SweepSummaryJson {
    /// Grid description
    pub space: String,
    /// Points attempted
    pub points_evaluated: usize,
    /// Points measured
    pub points_succeeded: usize,
    /// Points failed
    pub points_failed: usize,
    /// Wall-clock duration in seconds
    pub elapsed_seconds: f64,
}

/// One measured point
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultJson {
    /// Parameters, tagged by family
    pub parameters: ParameterSet,
    /// Parameters as shown in tables
    pub parameters_display: String,
    /// Input size in bytes
    pub original_size_bytes: u64,
    /// Output size in bytes
    pub compressed_size_bytes: u64,
    /// Share of the input saved; null when undefined
    pub compression_percentage: Option<f64>,
    /// `original / compressed`; null when undefined
    pub compression_ratio: Option<f64>,
    /// Round-trip time in seconds
    pub time_seconds: f64,
    /// Peak heap growth in bytes
    pub peak_memory_bytes: u64,
    /// Peak heap growth in decimal megabytes
    pub peak_memory_mb: f64,
}

impl From<&CompressionResult> for ResultJson {
    fn from(result: &CompressionResult) -> Self {
        Self {
            parameters: result.params,
            parameters_display: result.params.to_string(),
            original_size_bytes: result.original_size,
            compressed_size_bytes: result.compressed_size,
            compression_percentage: result.compression_percentage().value(),
            compression_ratio: result.compression_ratio().value(),
            time_seconds: result.time_secs(),
            peak_memory_bytes: result.peak_memory_bytes,
            peak_memory_mb: result.peak_memory_mb(),
        }
    }
}

/// One failed point
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureJson {
    /// Grid index
    pub index: usize,
    /// Parameters as shown in tables
    pub parameters: String,
    /// Error category
    pub kind: String,
    /// Error message
    pub message: String,
}

impl From<&FailedPoint> for FailureJson {
    fn from(failure: &FailedPoint) -> Self {
        Self {
            index: failure.index,
            parameters: failure.params.to_string(),
            kind: format!("{:?}", failure.error.kind()),
            message: failure.error.to_string(),
        }
    }
}

impl SweepReportJson {
    /// Build the JSON document for a finished sweep
    pub fn new(report: &SweepReport, input: &Path) -> Self {
        Self {
            metadata: RunMetadata::new("sweep", report.family, input, report.input_size),
            summary: SweepSummaryJson {
                space: report.space.to_string(),
                points_evaluated: report.points_evaluated,
                points_succeeded: report.points_succeeded(),
                points_failed: report.failures.len(),
                elapsed_seconds: report.elapsed.as_secs_f64(),
            },
            objectives: report
                .optimal
                .iter()
                .map(|(objective, result)| (objective.name().to_string(), result.into()))
                .collect(),
            failures: report.failures.iter().map(FailureJson::from).collect(),
        }
    }
}

/// JSON output for a single profiled point
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileJson {
    /// Run metadata
    pub metadata: RunMetadata,
    /// The measurement
    pub result: ResultJson,
}

impl ProfileJson {
    /// Build the JSON document for one measurement
    pub fn new(result: &CompressionResult, input: &Path) -> Self {
        Self {
            metadata: RunMetadata::new(
                "profile",
                result.params.family(),
                input,
                result.original_size,
            ),
            result: result.into(),
        }
    }
}
