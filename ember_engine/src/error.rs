//! Error types for the Ember engine
//!
//! This module defines the error types used throughout the engine,
//! including descriptor allocation, device calls and resource validation.

use std::fmt;

/// Result type for Ember engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ember engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, mock device, etc.)
    BackendError(String),

    /// Out of host, device or descriptor pool memory
    OutOfMemory,

    /// Invalid resource (binding, layout, stale descriptor set, etc.)
    InvalidResource(String),

    /// Initialization failed (device wrapper, technique layouts)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
