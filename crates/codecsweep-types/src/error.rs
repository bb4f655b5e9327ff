//! Error types and handling for codecsweep
//!
//! Errors fall in two groups. Point failures (a codec rejected its
//! parameters, a round trip did not match, a cell ran past its deadline)
//! are recorded against one grid point and the sweep carries on. Sweep-level
//! errors (bad configuration, unreadable input) abort before any point runs.

use crate::params::{CodecFamily, ParameterSet};
use std::time::Duration;

/// Main error type for codecsweep operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// The codec refused this parameter combination
    #[error("Unsupported parameters {params}: {message}")]
    UnsupportedParameter {
        /// Parameters that were rejected
        params: ParameterSet,
        /// Reason given by the codec
        message: String,
    },

    /// Decompressed bytes did not match the original input
    #[error("Round-trip integrity check failed for {params}")]
    Integrity {
        /// Parameters of the failing point
        params: ParameterSet,
    },

    /// Input was not a valid compressed stream for the family
    #[error("Corrupt {family} stream: {message}")]
    CorruptData {
        /// Family whose decoder rejected the stream
        family: CodecFamily,
        /// Decoder error message
        message: String,
    },

    /// A grid cell exceeded its deadline
    #[error("{params} timed out after {seconds} seconds")]
    Timeout {
        /// Parameters of the point that timed out
        params: ParameterSet,
        /// Deadline that was exceeded, in seconds
        seconds: f64,
    },

    /// A codec call panicked
    #[error("Codec panicked while running {params}: {message}")]
    WorkerPanicked {
        /// Parameters of the point that panicked
        params: ParameterSet,
        /// Panic payload, when it was a string
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected parameters
    UnsupportedParameter,
    /// Round-trip mismatch
    Integrity,
    /// Invalid compressed stream
    CorruptData,
    /// Deadline exceeded
    Timeout,
    /// Codec panic
    WorkerPanicked,
    /// Configuration errors
    Config,
    /// I/O related errors
    Io,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedParameter { .. } => ErrorKind::UnsupportedParameter,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::CorruptData { .. } => ErrorKind::CorruptData,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::WorkerPanicked { .. } => ErrorKind::WorkerPanicked,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether this error is confined to a single grid point
    pub fn is_point_failure(&self) -> bool {
        !self.is_fatal()
    }

    /// Whether this error aborts the whole sweep
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Io { .. })
    }

    /// Parameters of the failing point, if the error carries them
    pub fn params(&self) -> Option<&ParameterSet> {
        match self {
            Self::UnsupportedParameter { params, .. }
            | Self::Integrity { params }
            | Self::Timeout { params, .. }
            | Self::WorkerPanicked { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Create an unsupported-parameter error
    pub fn unsupported<S: Into<String>>(params: ParameterSet, message: S) -> Self {
        Self::UnsupportedParameter {
            params,
            message: message.into(),
        }
    }

    /// Create an integrity error
    pub fn integrity(params: ParameterSet) -> Self {
        Self::Integrity { params }
    }

    /// Create a corrupt-data error
    pub fn corrupt<S: Into<String>>(family: CodecFamily, message: S) -> Self {
        Self::CorruptData {
            family,
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(params: ParameterSet, deadline: Duration) -> Self {
        Self::Timeout {
            params,
            seconds: deadline.as_secs_f64(),
        }
    }

    /// Create a worker-panicked error
    pub fn panicked<S: Into<String>>(params: ParameterSet, message: S) -> Self {
        Self::WorkerPanicked {
            params,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
