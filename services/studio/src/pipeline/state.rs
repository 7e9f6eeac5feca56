//! services/studio/src/pipeline/state.rs
//!
//! Defines the shared application state handed to every pipeline task.

use crate::config::Config;
use crate::pipeline::events::StudioEvent;
use podcast_studio_core::ports::{DocumentProcessingService, PodcastSynthesisService};
use podcast_studio_core::store::Store;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::trace;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The shared application state, created once at startup.
///
/// The store sits behind a single mutex; each pipeline tick holds the lock for
/// exactly one store operation, never across a call into a port.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub config: Arc<Config>,
    pub processor: Arc<dyn DocumentProcessingService>,
    pub synthesizer: Arc<dyn PodcastSynthesisService>,
    pub events: broadcast::Sender<StudioEvent>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        processor: Arc<dyn DocumentProcessingService>,
        synthesizer: Arc<dyn PodcastSynthesisService>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: Arc::new(Mutex::new(Store::new(config.store_config()))),
            config,
            processor,
            synthesizer,
            events,
        }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn emit(&self, event: StudioEvent) {
        if self.events.send(event).is_err() {
            trace!("No event subscribers");
        }
    }
}
