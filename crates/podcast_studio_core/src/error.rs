//! crates/podcast_studio_core/src/error.rs
//!
//! Error types for store operations. Every rejected operation leaves the
//! store unchanged.

use crate::domain::{DocumentStatus, GenerationStatus};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Project name must not be empty")]
    EmptyName,

    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Generation not found: {0}")]
    GenerationNotFound(Uuid),

    #[error("Unsupported file format: {name} ({mime_type})")]
    UnsupportedFormat { name: String, mime_type: String },

    #[error("File {name} is {size} bytes, the limit is {max} bytes")]
    FileTooLarge { name: String, size: u64, max: u64 },

    #[error("A generation needs between {min} and {max} personas, got {count}")]
    InvalidPersonaCount { count: usize, min: usize, max: usize },

    #[error("Persona {0} appears more than once in the cast")]
    DuplicatePersona(String),

    #[error("Progress must be between 0 and 100, got {0}")]
    InvalidProgress(u8),

    #[error("Progress cannot go backwards ({from} -> {to})")]
    ProgressRegression { from: u8, to: u8 },

    #[error("Invalid document transition: {from:?} -> {to:?}")]
    InvalidDocumentTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    #[error("Invalid generation transition: {from:?} -> {to:?}")]
    InvalidGenerationTransition {
        from: GenerationStatus,
        to: GenerationStatus,
    },

    #[error("Project {0} has no ready documents")]
    NoReadyDocuments(Uuid),

    #[error("A generation is already in progress")]
    GenerationInProgress,
}

impl StoreError {
    /// Check if this error indicates a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound(_) | Self::DocumentNotFound(_) | Self::GenerationNotFound(_)
        )
    }
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
