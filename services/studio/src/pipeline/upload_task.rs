//! services/studio/src/pipeline/upload_task.rs
//!
//! This module contains the asynchronous "worker" function that simulates a
//! document upload followed by text processing.

use crate::{
    error::{StudioError, StudioResult},
    pipeline::{events::StudioEvent, state::AppState},
};
use podcast_studio_core::domain::{DocumentStatus, DocumentUpdate};
use rand::Rng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// The largest progress jump a single upload tick can make.
const MAX_UPLOAD_INCREMENT: f64 = 20.0;

/// Drives one document from `uploading` through `processing` to `ready`.
///
/// Cancellation and the pipeline timeout both end the task early; in either
/// case, or when processing fails, the document is moved to `error`.
pub async fn upload_process(
    app_state: Arc<AppState>,
    project_id: Uuid,
    document_id: Uuid,
    cancellation_token: CancellationToken,
) -> StudioResult<()> {
    info!(%document_id, "Upload process started.");
    let timeout = app_state.config.pipeline_timeout;

    let outcome = tokio::select! {
        _ = cancellation_token.cancelled() => Err(StudioError::Cancelled),
        result = tokio::time::timeout(timeout, run_upload(&app_state, project_id, document_id)) => {
            result.unwrap_or_else(|_| {
                Err(StudioError::PipelineTimeout(format!(
                    "document {} did not finish within {:?}",
                    document_id, timeout
                )))
            })
        }
    };

    match &outcome {
        Ok(()) => info!(%document_id, "Upload process finished."),
        Err(e) => {
            error!(%document_id, "Upload process failed: {}", e);
            mark_failed(&app_state, project_id, document_id, e).await;
        }
    }
    outcome
}

async fn run_upload(app_state: &AppState, project_id: Uuid, document_id: Uuid) -> StudioResult<()> {
    let config = &app_state.config;

    // --- 1. Upload ---
    let mut progress = 0.0;
    loop {
        tokio::time::sleep(config.upload_tick).await;
        progress += upload_increment();
        if progress >= 100.0 {
            break;
        }

        let percent = progress as u8;
        app_state.store.lock().await.update_document(
            project_id,
            document_id,
            DocumentUpdate {
                upload_progress: Some(percent),
                ..Default::default()
            },
        )?;
        app_state.emit(StudioEvent::DocumentProgress {
            project_id,
            document_id,
            progress: percent,
        });
    }

    app_state.store.lock().await.update_document(
        project_id,
        document_id,
        DocumentUpdate {
            status: Some(DocumentStatus::Processing),
            upload_progress: Some(100),
            ..Default::default()
        },
    )?;
    app_state.emit(StudioEvent::DocumentProgress {
        project_id,
        document_id,
        progress: 100,
    });
    app_state.emit(StudioEvent::DocumentProcessing {
        project_id,
        document_id,
    });

    // --- 2. Processing ---
    tokio::time::sleep(config.processing_delay).await;
    let document = app_state
        .store
        .lock()
        .await
        .document(project_id, document_id)?
        .clone();
    let processed = app_state.processor.process_document(&document).await?;
    debug!(%document_id, chars = processed.content.len(), "Document processed");

    app_state.store.lock().await.update_document(
        project_id,
        document_id,
        DocumentUpdate {
            status: Some(DocumentStatus::Ready),
            content: Some(processed.content),
            preview: Some(processed.preview.clone()),
            ..Default::default()
        },
    )?;
    app_state.emit(StudioEvent::DocumentReady {
        project_id,
        document_id,
        preview: processed.preview,
    });
    Ok(())
}

fn upload_increment() -> f64 {
    rand::thread_rng().gen_range(0.0..MAX_UPLOAD_INCREMENT)
}

/// Moves the document to `error`. A document that was removed mid-upload is left alone.
async fn mark_failed(app_state: &AppState, project_id: Uuid, document_id: Uuid, cause: &StudioError) {
    let result = app_state.store.lock().await.update_document(
        project_id,
        document_id,
        DocumentUpdate {
            status: Some(DocumentStatus::Error),
            ..Default::default()
        },
    );
    match result {
        Ok(_) => app_state.emit(StudioEvent::DocumentFailed {
            project_id,
            document_id,
            reason: cause.to_string(),
        }),
        Err(e) if e.is_not_found() => debug!(%document_id, "Document no longer exists"),
        Err(e) => warn!(%document_id, "Could not mark document as failed: {}", e),
    }
}
