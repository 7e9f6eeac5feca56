//! services/studio/src/pipeline/studio.rs
//!
//! The coordinating service. It owns the application state, validates user
//! actions against the store, and spawns the pipeline tasks that finish them.

use crate::{
    adapters::{SimulatedDocumentProcessor, SimulatedPodcastSynthesizer},
    config::Config,
    error::StudioResult,
    pipeline::{
        events::StudioEvent, generation_task::generation_process, handle::PipelineHandle,
        state::AppState, upload_task::upload_process,
    },
};
use podcast_studio_core::{
    domain::{AudioGeneration, Document, FileDescriptor, GenerationSettings, Project},
    ports::{DocumentProcessingService, PodcastSynthesisService},
    store::Store,
    StoreError,
};
use std::sync::Arc;
use tokio::sync::{broadcast, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// The result of offering one file for upload.
#[derive(Debug)]
pub enum UploadOutcome {
    Accepted {
        document: Document,
        handle: PipelineHandle,
    },
    Rejected {
        file: FileDescriptor,
        error: StoreError,
    },
}

pub struct Studio {
    state: Arc<AppState>,
}

impl Studio {
    pub fn new(
        config: Config,
        processor: Arc<dyn DocumentProcessingService>,
        synthesizer: Arc<dyn PodcastSynthesisService>,
    ) -> Self {
        Self {
            state: Arc::new(AppState::new(Arc::new(config), processor, synthesizer)),
        }
    }

    /// A studio backed by the simulated processor and synthesizer.
    pub fn simulated(config: Config) -> Self {
        let processor = Arc::new(SimulatedDocumentProcessor::new());
        let synthesizer = Arc::new(SimulatedPodcastSynthesizer::new(
            config.demo_audio_url.clone(),
            config.demo_transcript_url.clone(),
            config.demo_duration_secs,
        ));
        Self::new(config, processor, synthesizer)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.state.events.subscribe()
    }

    /// Exclusive access to the store for operations without a pipeline.
    pub async fn store(&self) -> MutexGuard<'_, Store> {
        self.state.store.lock().await
    }

    pub async fn create_project(&self, name: &str, description: Option<&str>) -> StudioResult<Project> {
        Ok(self.store().await.create_project(name, description)?)
    }

    pub async fn delete_project(&self, id: Uuid) -> StudioResult<Project> {
        Ok(self.store().await.delete_project(id)?)
    }

    /// A copy of the project as it is right now.
    pub async fn snapshot_project(&self, id: Uuid) -> StudioResult<Project> {
        Ok(self.store().await.project(id)?.clone())
    }

    /// Accepts a batch of files. Each accepted file gets its own upload task;
    /// rejected files are reported without affecting the rest of the batch.
    pub async fn upload_files(&self, project_id: Uuid, files: Vec<FileDescriptor>) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let added = self.store().await.add_document(project_id, &file);
            match added {
                Ok(document) => {
                    let token = CancellationToken::new();
                    let task = tokio::spawn(upload_process(
                        self.state.clone(),
                        project_id,
                        document.id,
                        token.clone(),
                    ));
                    let handle = PipelineHandle::new(document.id, token, task);
                    outcomes.push(UploadOutcome::Accepted { document, handle });
                }
                Err(error) => {
                    warn!(name = %file.name, "File rejected: {}", error);
                    outcomes.push(UploadOutcome::Rejected { file, error });
                }
            }
        }
        outcomes
    }

    /// Starts a generation once the project has a ready document and no other
    /// generation is running.
    pub async fn generate(
        &self,
        project_id: Uuid,
        settings: GenerationSettings,
    ) -> StudioResult<(AudioGeneration, PipelineHandle)> {
        let generation = {
            let mut store = self.store().await;
            store.can_generate(project_id, &settings)?;
            store.start_generation(project_id, settings)?
        };
        info!(
            %project_id,
            generation_id = %generation.id,
            cast = generation.settings.personas.len(),
            "Starting generation"
        );

        let token = CancellationToken::new();
        let task = tokio::spawn(generation_process(
            self.state.clone(),
            project_id,
            generation.id,
            token.clone(),
        ));
        Ok((generation.clone(), PipelineHandle::new(generation.id, token, task)))
    }
}
