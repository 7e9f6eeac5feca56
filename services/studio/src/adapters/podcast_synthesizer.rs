//! services/studio/src/adapters/podcast_synthesizer.rs
//!
//! A stand-in for script writing and speech synthesis. It implements the
//! `PodcastSynthesisService` port and hands back the configured demo assets.

use async_trait::async_trait;
use podcast_studio_core::domain::{Document, GenerationSettings};
use podcast_studio_core::ports::{
    PodcastSynthesisService, PortError, PortResult, SynthesizedPodcast,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Returns the same audio and transcript for every request. The configured
/// duration is clamped into the requested duration bucket.
#[derive(Clone, Debug)]
pub struct SimulatedPodcastSynthesizer {
    audio_url: String,
    transcript_url: String,
    duration: u32,
}

impl SimulatedPodcastSynthesizer {
    pub fn new(audio_url: String, transcript_url: String, duration: u32) -> Self {
        Self {
            audio_url,
            transcript_url,
            duration,
        }
    }
}

//=========================================================================================
// `PodcastSynthesisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PodcastSynthesisService for SimulatedPodcastSynthesizer {
    async fn synthesize(
        &self,
        settings: &GenerationSettings,
        documents: &[Document],
    ) -> PortResult<SynthesizedPodcast> {
        if documents.is_empty() {
            return Err(PortError::NotFound("No documents found".to_string()));
        }

        let cast: Vec<&str> = settings.personas.iter().map(|p| p.name.as_str()).collect();
        debug!(
            documents = documents.len(),
            cast = %cast.join(", "),
            tone = ?settings.tone,
            "Simulating podcast synthesis"
        );

        let (min_minutes, max_minutes) = settings.duration.minutes();
        Ok(SynthesizedPodcast {
            audio_url: self.audio_url.clone(),
            transcript_url: self.transcript_url.clone(),
            duration: self.duration.clamp(min_minutes * 60, max_minutes * 60),
        })
    }
}
