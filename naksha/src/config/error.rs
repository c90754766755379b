//! Configuration loading errors.

use thiserror::Error;

/// Error while loading or checking a [`NakshaConfig`](super::NakshaConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
