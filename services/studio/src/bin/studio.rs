//! services/studio/src/bin/studio.rs
//!
//! Runs one simulated session: creates a project, uploads the files named on
//! the command line (or a demo paper when none are given), generates a
//! podcast and prints every pipeline event as a JSON line.

use futures::future::join_all;
use podcast_studio_core::domain::{FileDescriptor, GenerationSettings};
use std::path::Path;
use studio_lib::{
    config::Config,
    error::{StudioError, StudioResult},
    pipeline::{Studio, UploadOutcome},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_FILE: (&str, u64) = ("paper.pdf", 500_000);

#[tokio::main]
async fn main() -> Result<(), StudioError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting studio...");

    let studio = Studio::simulated(config);

    // --- 2. Print Events ---
    let mut events = studio.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("Failed to serialize event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => warn!("Event printer skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // --- 3. Create the Project & Upload ---
    let project = studio.create_project("Research", Some("Demo session")).await?;
    let files = describe_files(std::env::args().skip(1)).await?;

    let mut uploads = Vec::new();
    for outcome in studio.upload_files(project.id, files).await {
        match outcome {
            UploadOutcome::Accepted { document, handle } => {
                info!(document_id = %handle.id(), name = %document.name, "Upload started");
                uploads.push(handle.join());
            }
            UploadOutcome::Rejected { file, error } => warn!("Skipping {}: {}", file.name, error),
        }
    }
    for result in join_all(uploads).await {
        if let Err(e) = result {
            warn!("Upload failed: {}", e);
        }
    }

    // --- 4. Generate ---
    let (generation, handle) = studio
        .generate(project.id, GenerationSettings::default())
        .await?;
    info!(
        generation_id = %handle.id(),
        cast = generation.settings.personas.len(),
        "Generation started"
    );
    handle.join().await?;

    // --- 5. Report ---
    let finished = studio.snapshot_project(project.id).await?;
    let report = serde_json::to_string_pretty(&finished)
        .map_err(|e| StudioError::Internal(e.to_string()))?;
    eprintln!("{}", report);

    drop(studio);
    printer
        .await
        .map_err(|e| StudioError::Internal(e.to_string()))?;
    Ok(())
}

/// Builds descriptors from file paths, falling back to the demo paper.
async fn describe_files(paths: impl Iterator<Item = String>) -> StudioResult<Vec<FileDescriptor>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = tokio::fs::metadata(&path).await?;
        let name = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&path)
            .to_string();
        files.push(FileDescriptor::from_name(name, metadata.len()));
    }
    if files.is_empty() {
        let (name, size) = DEMO_FILE;
        files.push(FileDescriptor::from_name(name, size));
    }
    Ok(files)
}
