pub mod events;
pub mod generation_task;
pub mod handle;
pub mod state;
pub mod studio;
pub mod upload_task;

pub use events::StudioEvent;
pub use handle::PipelineHandle;
pub use state::AppState;
pub use studio::{Studio, UploadOutcome};
