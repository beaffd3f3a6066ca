//! Unified error type for the loadglow-lib crate.
//!
//! [`LoadglowError`] wraps module-specific errors (`DeviceError`, `StatError`)
//! and configuration problems. `From` impls allow `?` to propagate across
//! module boundaries.

use std::fmt;

use crate::device::DeviceError;
use crate::stat::StatError;

/// Unified error type for loadglow-lib operations.
#[derive(Debug)]
pub enum LoadglowError {
    /// Keyboard communication error (open, mode, color writes).
    Device(DeviceError),
    /// CPU counter source could not be read or parsed.
    Stat(StatError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for LoadglowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadglowError::Device(e) => write!(f, "{e}"),
            LoadglowError::Stat(e) => write!(f, "{e}"),
            LoadglowError::Io(e) => write!(f, "I/O error: {e}"),
            LoadglowError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for LoadglowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadglowError::Device(e) => Some(e),
            LoadglowError::Stat(e) => Some(e),
            LoadglowError::Io(e) => Some(e),
            LoadglowError::Config(_) => None,
        }
    }
}

impl From<DeviceError> for LoadglowError {
    fn from(e: DeviceError) -> Self {
        LoadglowError::Device(e)
    }
}

impl From<StatError> for LoadglowError {
    fn from(e: StatError) -> Self {
        LoadglowError::Stat(e)
    }
}

impl From<std::io::Error> for LoadglowError {
    fn from(e: std::io::Error) -> Self {
        LoadglowError::Io(e)
    }
}

/// Crate-level Result alias using [`LoadglowError`].
pub type Result<T> = std::result::Result<T, LoadglowError>;
