//! Sweep progress reporting

use codecsweep_engine::GridPoint;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over the grid cardinality
pub struct SweepProgress {
    progress_bar: Option<ProgressBar>,
    failed: u64,
}

impl SweepProgress {
    /// Create a tracker for `total` points, hidden when `quiet`
    pub fn new(total: u64, quiet: bool) -> Self {
        let progress_bar = if quiet {
            None
        } else {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ");
            pb.set_style(style);
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        };

        Self {
            progress_bar,
            failed: 0,
        }
    }

    /// Record one finished grid point
    pub fn observe(&mut self, point: &GridPoint) {
        if point.outcome.is_err() {
            self.failed += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
            if self.failed > 0 {
                pb.set_message(format!(
                    "{} {}",
                    point.params,
                    style(format!("({} failed)", self.failed)).red()
                ));
            } else {
                pb.set_message(point.params.to_string());
            }
        }
    }

    /// Points that failed so far
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecsweep_types::{CodecFamily, Error, ParameterSet};

    #[test]
    fn test_quiet_progress_counts_failures() {
        let params = ParameterSet::default_for(CodecFamily::Gzip);
        let mut progress = SweepProgress::new(2, true);

        progress.observe(&GridPoint {
            index: 0,
            params: params,
            outcome: Err(Error::integrity(params)),
        });
        progress.observe(&GridPoint {
            index: 1,
            params: params,
            outcome: Err(Error::unsupported(params, "bad level")),
        });
        progress.finish_and_clear();

        assert_eq!(progress.failed(), 2);
    }
}
