pub mod domain;
pub mod error;
pub mod personas;
pub mod ports;
pub mod store;

pub use domain::{
    AudioGeneration, CitationStyle, Document, DocumentFormat, DocumentStatus, DocumentUpdate,
    DurationBucket, FileDescriptor, GenerationSettings, GenerationStatus, GenerationUpdate,
    Persona, Project, ProjectUpdate, Tone,
};
pub use error::{StoreError, StoreResult};
pub use ports::{
    DocumentProcessingService, PodcastSynthesisService, PortError, PortResult,
    ProcessedDocument, SynthesizedPodcast,
};
pub use store::{Store, StoreConfig};
