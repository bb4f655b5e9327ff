//! Per-objective winner tracking
//!
//! The [`OptimalSelector`] keeps the best result seen so far for each
//! [`Objective`]. Comparisons are strict, so when two results tie the one
//! observed first stays the winner. Feeding results in grid order therefore
//! makes the outcome deterministic.

use codecsweep_types::{CompressionResult, Objective, OptimalResultSet};

/// Running winners of a sweep
///
/// `finalize` consumes the selector, so nothing can be observed once the
/// result set has been produced.
#[derive(Debug, Default)]
pub struct OptimalSelector {
    min_time: Option<CompressionResult>,
    min_peak_memory: Option<CompressionResult>,
    max_percentage: Option<(f64, CompressionResult)>,
    max_ratio: Option<(f64, CompressionResult)>,
    observed: usize,
}

impl OptimalSelector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one successful result to every objective
    pub fn observe(&mut self, result: &CompressionResult) {
        self.observed += 1;

        if self
            .min_time
            .as_ref()
            .map_or(true, |best| result.time_taken < best.time_taken)
        {
            self.min_time = Some(result.clone());
        }

        if self
            .min_peak_memory
            .as_ref()
            .map_or(true, |best| result.peak_memory_bytes < best.peak_memory_bytes)
        {
            self.min_peak_memory = Some(result.clone());
        }

        let percentage = result.compression_percentage();
        if percentage.beats(self.max_percentage.as_ref().map(|(best, _)| *best)) {
            if let Some(value) = percentage.value() {
                self.max_percentage = Some((value, result.clone()));
            }
        }

        let ratio = result.compression_ratio();
        if ratio.beats(self.max_ratio.as_ref().map(|(best, _)| *best)) {
            if let Some(value) = ratio.value() {
                self.max_ratio = Some((value, result.clone()));
            }
        }
    }

    /// Number of results observed so far
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Freeze the winners
    pub fn finalize(self) -> OptimalResultSet {
        [
            (Objective::MinTime, self.min_time),
            (Objective::MinPeakMemory, self.min_peak_memory),
            (
                Objective::MaxCompressionPercentage,
                self.max_percentage.map(|(_, result)| result),
            ),
            (
                Objective::MaxCompressionRatio,
                self.max_ratio.map(|(_, result)| result),
            ),
        ]
        .into_iter()
        .filter_map(|(objective, winner)| winner.map(|result| (objective, result)))
        .collect()
    }
}
