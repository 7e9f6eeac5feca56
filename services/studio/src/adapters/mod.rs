pub mod document_processor;
pub mod podcast_synthesizer;

pub use document_processor::SimulatedDocumentProcessor;
pub use podcast_synthesizer::SimulatedPodcastSynthesizer;
