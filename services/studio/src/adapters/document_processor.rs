//! services/studio/src/adapters/document_processor.rs
//!
//! A stand-in for real text extraction. It implements the
//! `DocumentProcessingService` port from the core crate and produces canned
//! content and preview text derived from the file name.

use async_trait::async_trait;
use podcast_studio_core::domain::Document;
use podcast_studio_core::ports::{
    DocumentProcessingService, PortError, PortResult, ProcessedDocument,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Debug, Default)]
pub struct SimulatedDocumentProcessor;

impl SimulatedDocumentProcessor {
    pub fn new() -> Self {
        Self
    }
}

//=========================================================================================
// `DocumentProcessingService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentProcessingService for SimulatedDocumentProcessor {
    async fn process_document(&self, document: &Document) -> PortResult<ProcessedDocument> {
        // An empty file has no text to extract.
        if document.size == 0 {
            return Err(PortError::Unexpected(format!(
                "No text could be extracted from {}",
                document.name
            )));
        }

        debug!(document_id = %document.id, "Simulating text extraction");
        Ok(ProcessedDocument {
            content: format!("Processed content for {}", document.name),
            preview: format!(
                "This is a preview of {}. The document contains important information that will be used to generate engaging podcast discussions.",
                document.name
            ),
        })
    }
}
