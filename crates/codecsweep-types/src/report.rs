//! Sweep outcomes: objectives, per-objective winners and the final report

use crate::error::Error;
use crate::metrics::CompressionResult;
use crate::params::{CodecFamily, ParameterSet};
use crate::space::ParameterSpace;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metric a sweep optimizes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Objective {
    /// Shortest wall-clock time
    MinTime,
    /// Smallest peak memory
    MinPeakMemory,
    /// Largest share of the input saved
    MaxCompressionPercentage,
    /// Largest original/compressed ratio
    MaxCompressionRatio,
}

impl Objective {
    /// All objectives in report order
    pub const ALL: [Objective; 4] = [
        Objective::MinTime,
        Objective::MinPeakMemory,
        Objective::MaxCompressionPercentage,
        Objective::MaxCompressionRatio,
    ];

    /// Canonical camelCase name
    pub fn name(self) -> &'static str {
        match self {
            Self::MinTime => "minTime",
            Self::MinPeakMemory => "minPeakMemory",
            Self::MaxCompressionPercentage => "maxCompressionPercentage",
            Self::MaxCompressionRatio => "maxCompressionRatio",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::MinTime => "Time",
            Self::MinPeakMemory => "Peak Memory",
            Self::MaxCompressionPercentage => "Compression %",
            Self::MaxCompressionRatio => "Compression Ratio",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Best result per objective, frozen once built
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OptimalResultSet {
    winners: BTreeMap<Objective, CompressionResult>,
}

impl OptimalResultSet {
    /// Winner for an objective, if any point qualified
    pub fn get(&self, objective: Objective) -> Option<&CompressionResult> {
        self.winners.get(&objective)
    }

    /// Winners in objective order
    pub fn iter(&self) -> impl Iterator<Item = (Objective, &CompressionResult)> {
        self.winners.iter().map(|(objective, result)| (*objective, result))
    }

    /// Number of objectives with a winner
    pub fn len(&self) -> usize {
        self.winners.len()
    }

    /// True when no point qualified for any objective
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}

impl FromIterator<(Objective, CompressionResult)> for OptimalResultSet {
    fn from_iter<I: IntoIterator<Item = (Objective, CompressionResult)>>(iter: I) -> Self {
        Self {
            winners: iter.into_iter().collect(),
        }
    }
}

/// A grid point that produced an error instead of a result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FailedPoint {
    /// Position in grid order
    pub index: usize,
    /// Parameters of the point
    pub params: ParameterSet,
    /// What went wrong
    pub error: Error,
}

/// Everything a formatter needs to present a finished sweep
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepReport {
    /// Family that was swept
    pub family: CodecFamily,
    /// Grid that was enumerated
    pub space: ParameterSpace,
    /// Input size in bytes
    pub input_size: u64,
    /// Points attempted, successful or not
    pub points_evaluated: usize,
    /// Winners per objective
    pub optimal: OptimalResultSet,
    /// Failed points in grid order
    pub failures: Vec<FailedPoint>,
    /// Wall-clock duration of the whole sweep
    pub elapsed: Duration,
}

impl SweepReport {
    /// Points that produced a result
    pub fn points_succeeded(&self) -> usize {
        self.points_evaluated.saturating_sub(self.failures.len())
    }

    /// True when points were attempted but none succeeded
    pub fn all_failed(&self) -> bool {
        self.points_evaluated > 0 && self.points_succeeded() == 0
    }
}
