//! Result type alias for codecsweep operations

use crate::Error;

/// Result type alias for codecsweep operations
pub type Result<T> = std::result::Result<T, Error>;
