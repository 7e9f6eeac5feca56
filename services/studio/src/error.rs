//! services/studio/src/error.rs
//!
//! Defines the primary error type for the studio service.

use crate::config::ConfigError;
use podcast_studio_core::{PortError, StoreError};

/// The primary error type for the `studio` service.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A store operation was rejected.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A pipeline did not reach a terminal state in time.
    #[error("Pipeline timed out: {0}")]
    PipelineTimeout(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Pipeline cancelled")]
    Cancelled,

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

pub type StudioResult<T> = Result<T, StudioError>;
