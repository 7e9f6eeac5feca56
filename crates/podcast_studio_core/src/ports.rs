//! crates/podcast_studio_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the work that happens outside the store.
//! Document processing and podcast synthesis report back through store operations;
//! these traits let the pipelines stay independent of whether that work is simulated
//! or backed by a real parser and speech engine.

use crate::domain::{Document, GenerationSettings};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Port Payloads
//=========================================================================================

/// The output of processing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    pub content: String,
    pub preview: String,
}

/// The terminal artifacts of a finished generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedPodcast {
    pub audio_url: String,
    pub transcript_url: String,
    /// Length in seconds.
    pub duration: u32,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DocumentProcessingService: Send + Sync {
    /// Extracts the text content and a short preview from an uploaded document.
    async fn process_document(&self, document: &Document) -> PortResult<ProcessedDocument>;
}

#[async_trait]
pub trait PodcastSynthesisService: Send + Sync {
    /// Produces the audio and transcript for a discussion of the given documents.
    async fn synthesize(
        &self,
        settings: &GenerationSettings,
        documents: &[Document],
    ) -> PortResult<SynthesizedPodcast>;
}
