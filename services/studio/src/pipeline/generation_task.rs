//! services/studio/src/pipeline/generation_task.rs
//!
//! This module contains the asynchronous "worker" function that walks one
//! audio generation through its scripted steps.

use crate::{
    error::{StudioError, StudioResult},
    pipeline::{events::StudioEvent, state::AppState},
};
use chrono::Utc;
use podcast_studio_core::domain::{GenerationStatus, GenerationUpdate};
use podcast_studio_core::ports::SynthesizedPodcast;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Progress milestones and the step label shown at each one.
pub const GENERATION_STEPS: [(u8, &str); 7] = [
    (10, "Analyzing documents..."),
    (25, "Extracting key concepts..."),
    (40, "Generating conversation outline..."),
    (60, "Creating dialogue..."),
    (80, "Synthesizing audio..."),
    (95, "Finalizing podcast..."),
    (100, "Complete!"),
];

/// The milestone at which the synthesis port is called.
const SYNTHESIS_PROGRESS: u8 = 80;

/// Drives one generation from `queued` to `completed`, one step per tick.
///
/// Synthesis errors, cancellation and the pipeline timeout all end in `failed`.
pub async fn generation_process(
    app_state: Arc<AppState>,
    project_id: Uuid,
    generation_id: Uuid,
    cancellation_token: CancellationToken,
) -> StudioResult<()> {
    info!(%generation_id, "Generation process started.");
    let timeout = app_state.config.pipeline_timeout;

    let outcome = tokio::select! {
        _ = cancellation_token.cancelled() => Err(StudioError::Cancelled),
        result = tokio::time::timeout(timeout, run_generation(&app_state, project_id, generation_id)) => {
            result.unwrap_or_else(|_| {
                Err(StudioError::PipelineTimeout(format!(
                    "generation {} did not finish within {:?}",
                    generation_id, timeout
                )))
            })
        }
    };

    match &outcome {
        Ok(()) => info!(%generation_id, "Generation process finished."),
        Err(e) => {
            error!(%generation_id, "Generation process failed: {}", e);
            mark_failed(&app_state, project_id, generation_id, e).await;
        }
    }
    outcome
}

async fn run_generation(
    app_state: &AppState,
    project_id: Uuid,
    generation_id: Uuid,
) -> StudioResult<()> {
    let tick = app_state.config.generation_tick;
    let (settings, documents) = {
        let store = app_state.store.lock().await;
        let settings = store.generation(project_id, generation_id)?.settings.clone();
        let documents: Vec<_> = store.project(project_id)?.ready_documents().cloned().collect();
        (settings, documents)
    };

    let mut podcast: Option<SynthesizedPodcast> = None;
    for (index, &(progress, step)) in GENERATION_STEPS.iter().enumerate() {
        tokio::time::sleep(tick).await;

        if progress == 100 {
            let podcast = podcast.take().ok_or_else(|| {
                StudioError::Internal("Generation reached completion without audio".to_string())
            })?;
            complete(app_state, project_id, generation_id, step, podcast).await?;
            break;
        }

        let estimated_time = remaining_seconds(GENERATION_STEPS.len() - index - 1, tick);
        app_state.store.lock().await.update_generation(
            project_id,
            generation_id,
            GenerationUpdate {
                status: Some(GenerationStatus::Processing),
                progress: Some(progress),
                current_step: Some(step.to_string()),
                estimated_time: Some(estimated_time),
                ..Default::default()
            },
        )?;
        app_state.emit(StudioEvent::GenerationProgress {
            project_id,
            generation_id,
            progress,
            step: step.to_string(),
            estimated_time: Some(estimated_time),
        });

        if progress == SYNTHESIS_PROGRESS {
            let synthesized = app_state
                .synthesizer
                .synthesize(&settings, &documents)
                .await
                .map_err(|e| StudioError::GenerationFailed(e.to_string()))?;
            debug!(%generation_id, audio_url = %synthesized.audio_url, "Audio synthesized");
            podcast = Some(synthesized);
        }
    }
    Ok(())
}

async fn complete(
    app_state: &AppState,
    project_id: Uuid,
    generation_id: Uuid,
    step: &str,
    podcast: SynthesizedPodcast,
) -> StudioResult<()> {
    app_state.store.lock().await.update_generation(
        project_id,
        generation_id,
        GenerationUpdate {
            status: Some(GenerationStatus::Completed),
            progress: Some(100),
            current_step: Some(step.to_string()),
            audio_url: Some(podcast.audio_url.clone()),
            transcript_url: Some(podcast.transcript_url.clone()),
            duration: Some(podcast.duration),
            completed_at: Some(Utc::now()),
            ..Default::default()
        },
    )?;
    app_state.emit(StudioEvent::GenerationCompleted {
        project_id,
        generation_id,
        audio_url: podcast.audio_url,
        transcript_url: podcast.transcript_url,
        duration: podcast.duration,
    });
    Ok(())
}

fn remaining_seconds(steps_left: usize, tick: Duration) -> u32 {
    (tick.as_secs_f64() * steps_left as f64).ceil() as u32
}

async fn mark_failed(app_state: &AppState, project_id: Uuid, generation_id: Uuid, cause: &StudioError) {
    let reason = cause.to_string();
    let result = app_state.store.lock().await.update_generation(
        project_id,
        generation_id,
        GenerationUpdate::failed(reason.clone()),
    );
    match result {
        Ok(_) => app_state.emit(StudioEvent::GenerationFailed {
            project_id,
            generation_id,
            reason,
        }),
        Err(e) if e.is_not_found() => debug!(%generation_id, "Generation no longer exists"),
        Err(e) => warn!(%generation_id, "Could not mark generation as failed: {}", e),
    }
}
