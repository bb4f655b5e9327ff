//! Validated configuration values shared by the engine and the CLI

use std::time::Duration;

/// Number of grid cells evaluated concurrently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub struct WorkerCount(usize);

impl WorkerCount {
    /// Minimum worker count
    pub const MIN: usize = 1;
    /// Maximum worker count
    pub const MAX: usize = 256;

    /// Create a new worker count with validation
    pub fn new(count: usize) -> Result<Self, String> {
        if count < Self::MIN {
            Err(format!("Worker count {} is below minimum {}", count, Self::MIN))
        } else if count > Self::MAX {
            Err(format!("Worker count {} exceeds maximum {}", count, Self::MAX))
        } else {
            Ok(Self(count))
        }
    }

    /// One worker; points run strictly one after another
    pub fn sequential() -> Self {
        Self(1)
    }

    /// One worker per available CPU
    pub fn available() -> Self {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self(cpu_count.min(Self::MAX))
    }

    /// Get the worker count value
    pub fn get(self) -> usize {
        self.0
    }

    /// Whether the sweep runs on a single worker
    pub fn is_sequential(self) -> bool {
        self.0 == 1
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self::sequential()
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = String;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<WorkerCount> for usize {
    fn from(count: WorkerCount) -> Self {
        count.0
    }
}

/// Deadline for a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTimeout(Duration);

impl CellTimeout {
    /// Create a deadline; zero is rejected
    pub fn new(deadline: Duration) -> Result<Self, String> {
        if deadline.is_zero() {
            Err("Cell timeout must be greater than zero".to_string())
        } else {
            Ok(Self(deadline))
        }
    }

    /// Create a deadline from fractional seconds
    pub fn from_secs_f64(seconds: f64) -> Result<Self, String> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(format!("Cell timeout {} must be a positive number of seconds", seconds));
        }
        let deadline = Duration::try_from_secs_f64(seconds)
            .map_err(|e| format!("Cell timeout {} is out of range: {}", seconds, e))?;
        Self::new(deadline)
    }

    /// Get the deadline
    pub fn get(self) -> Duration {
        self.0
    }
}
