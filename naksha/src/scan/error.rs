//! Scan errors.

use thiserror::Error;

/// Errors raised while ingesting range readings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("short reading {range:.3} m at sample {index} (min_range {min_range:.3} m)")]
    ShortReading {
        index: usize,
        range: f64,
        min_range: f64,
    },
}
