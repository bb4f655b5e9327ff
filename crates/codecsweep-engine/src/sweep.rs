//! Sweep orchestration
//!
//! [`SweepRunner`] evaluates every point of a [`ParameterSpace`] and folds
//! the outcomes into a [`SweepReport`]. The parallel path runs each cell on a
//! blocking worker bounded by a semaphore; a single consumer reorders the
//! results by grid index before they reach the selector, so parallel and
//! sequential sweeps break ties identically.

use crate::grid::{check_space, panic_message, sample_point, CartesianProduct, GridEnumerator, GridPoint};
use crate::profiler::ProfileSampler;
use crate::selector::OptimalSelector;
use codecsweep_codecs::CodecAdapter;
use codecsweep_types::{
    CellTimeout, Error, FailedPoint, ParameterSet, ParameterSpace, Result, SweepReport, WorkerCount,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Sweep execution settings
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// Cells evaluated concurrently
    pub workers: WorkerCount,
    /// Deadline per cell; `None` waits indefinitely
    pub cell_timeout: Option<CellTimeout>,
    /// Run one untimed round trip before measuring
    pub warmup: bool,
}

/// Folds grid points into a report
struct SweepAccumulator {
    selector: OptimalSelector,
    failures: Vec<FailedPoint>,
    evaluated: usize,
}

impl SweepAccumulator {
    fn new() -> Self {
        Self {
            selector: OptimalSelector::new(),
            failures: Vec::new(),
            evaluated: 0,
        }
    }

    fn record(&mut self, point: &GridPoint) {
        self.evaluated += 1;
        match &point.outcome {
            Ok(result) => {
                debug!(
                    "{} | {:.2}% | {:.6}s | {:.6} MB | ratio {:.4}",
                    point.params,
                    result.compression_percentage(),
                    result.time_secs(),
                    result.peak_memory_mb(),
                    result.compression_ratio()
                );
                self.selector.observe(result);
            }
            Err(error) => {
                warn!("Point {} failed: {}", point.index, error);
                self.failures.push(FailedPoint {
                    index: point.index,
                    params: point.params,
                    error: error.clone(),
                });
            }
        }
    }

    fn into_report(self, space: &ParameterSpace, input_size: usize, elapsed: Duration) -> SweepReport {
        info!(
            "Sweep finished: {} evaluated, {} failed in {:.3}s",
            self.evaluated,
            self.failures.len(),
            elapsed.as_secs_f64()
        );
        SweepReport {
            family: space.family(),
            space: space.clone(),
            input_size: input_size as u64,
            points_evaluated: self.evaluated,
            optimal: self.selector.finalize(),
            failures: self.failures,
            elapsed,
        }
    }
}

fn first_params(space: &ParameterSpace) -> ParameterSet {
    space.params_at(&vec![0; space.radices().len()])
}

fn join_outcome(
    joined: std::result::Result<Result<codecsweep_types::CompressionResult>, JoinError>,
    params: ParameterSet,
) -> Result<codecsweep_types::CompressionResult> {
    match joined {
        Ok(outcome) => outcome,
        Err(error) if error.is_panic() => {
            Err(Error::panicked(params, panic_message(error.into_panic().as_ref())))
        }
        Err(error) => Err(Error::panicked(params, error.to_string())),
    }
}

/// Drives whole sweeps
#[derive(Debug, Clone, Default)]
pub struct SweepRunner {
    config: SweepConfig,
}

impl SweepRunner {
    /// Create a runner
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Runner settings
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    fn log_start(&self, space: &ParameterSpace, workers: usize) {
        info!(
            "Starting sweep over {} ({} combinations, {} workers)",
            space,
            space.cardinality(),
            workers
        );
    }

    /// Evaluate every point on the calling thread
    ///
    /// The cell timeout does not apply here; use [`SweepRunner::run`] for
    /// deadlines.
    pub fn run_sequential<F>(
        &self,
        space: &ParameterSpace,
        adapter: &dyn CodecAdapter,
        data: &[u8],
        mut on_point: F,
    ) -> Result<SweepReport>
    where
        F: FnMut(&GridPoint),
    {
        let grid = GridEnumerator::new(space, adapter, data)?;
        self.log_start(space, 1);
        let started = Instant::now();

        if self.config.warmup {
            ProfileSampler::new(adapter).warm_up(data, first_params(space));
        }

        let mut accumulator = SweepAccumulator::new();
        for point in grid {
            on_point(&point);
            accumulator.record(&point);
        }
        Ok(accumulator.into_report(space, data.len(), started.elapsed()))
    }

    /// Evaluate every point on blocking workers
    ///
    /// `on_point` is called from the calling task in grid order.
    pub async fn run<F>(
        &self,
        space: &ParameterSpace,
        adapter: Arc<dyn CodecAdapter>,
        data: Arc<[u8]>,
        mut on_point: F,
    ) -> Result<SweepReport>
    where
        F: FnMut(&GridPoint),
    {
        check_space(space, adapter.family())?;
        let workers = self.config.workers.get();
        self.log_start(space, workers);
        let started = Instant::now();

        if self.config.warmup {
            let warm_adapter = Arc::clone(&adapter);
            let warm_data = Arc::clone(&data);
            let params = first_params(space);
            if let Err(error) = tokio::task::spawn_blocking(move || {
                ProfileSampler::new(warm_adapter.as_ref()).warm_up(&warm_data, params);
            })
            .await
            {
                warn!("Warm-up worker failed: {}", error);
            }
        }

        let semaphore = Arc::new(Semaphore::new(workers));
        let (tx, mut rx) = mpsc::channel::<GridPoint>(workers * 2);
        let deadline = self.config.cell_timeout.map(CellTimeout::get);
        let producer_space = space.clone();
        let input = Arc::clone(&data);

        let producer = tokio::spawn(async move {
            let coords = CartesianProduct::new(producer_space.radices());
            for (index, coords) in coords.enumerate() {
                let params = producer_space.params_at(&coords);
                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    break;
                };

                let adapter = Arc::clone(&adapter);
                let input = Arc::clone(&input);
                let tx = tx.clone();
                tokio::spawn(async move {
                    // The permit stays with the codec call, even past its deadline.
                    let cell = tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        sample_point(adapter.as_ref(), &input, params)
                    });
                    let outcome = match deadline {
                        Some(deadline) => match tokio::time::timeout(deadline, cell).await {
                            Ok(joined) => join_outcome(joined, params),
                            Err(_) => Err(Error::timeout(params, deadline)),
                        },
                        None => join_outcome(cell.await, params),
                    };
                    let _ = tx
                        .send(GridPoint {
                            index,
                            params,
                            outcome,
                        })
                        .await;
                });
            }
        });

        let mut accumulator = SweepAccumulator::new();
        let mut pending = BTreeMap::new();
        let mut next_index = 0;
        while let Some(point) = rx.recv().await {
            pending.insert(point.index, point);
            while let Some(point) = pending.remove(&next_index) {
                on_point(&point);
                accumulator.record(&point);
                next_index += 1;
            }
        }

        if let Err(error) = producer.await {
            warn!("Grid producer stopped early: {}", error);
        }
        for point in pending.into_values() {
            on_point(&point);
            accumulator.record(&point);
        }

        Ok(accumulator.into_report(space, data.len(), started.elapsed()))
    }
}
