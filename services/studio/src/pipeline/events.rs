//! services/studio/src/pipeline/events.rs
//!
//! Defines the events the pipelines publish after every store update. A
//! presentation layer subscribes to these instead of polling the store.

use serde::Serialize;
use uuid::Uuid;

/// Represents a change made by a pipeline task.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudioEvent {
    /// Upload progress for a document, 0-100.
    DocumentProgress {
        project_id: Uuid,
        document_id: Uuid,
        progress: u8,
    },

    /// The upload finished and the document is being processed.
    DocumentProcessing { project_id: Uuid, document_id: Uuid },

    DocumentReady {
        project_id: Uuid,
        document_id: Uuid,
        preview: String,
    },

    DocumentFailed {
        project_id: Uuid,
        document_id: Uuid,
        reason: String,
    },

    GenerationProgress {
        project_id: Uuid,
        generation_id: Uuid,
        progress: u8,
        step: String,
        estimated_time: Option<u32>,
    },

    /// Carries the terminal payload of a finished podcast.
    GenerationCompleted {
        project_id: Uuid,
        generation_id: Uuid,
        audio_url: String,
        transcript_url: String,
        duration: u32,
    },

    GenerationFailed {
        project_id: Uuid,
        generation_id: Uuid,
        reason: String,
    },
}
