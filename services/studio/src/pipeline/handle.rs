//! services/studio/src/pipeline/handle.rs

use crate::error::{StudioError, StudioResult};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A running pipeline task for one document or generation.
#[derive(Debug)]
pub struct PipelineHandle {
    id: Uuid,
    token: CancellationToken,
    task: JoinHandle<StudioResult<()>>,
}

impl PipelineHandle {
    pub(crate) fn new(id: Uuid, token: CancellationToken, task: JoinHandle<StudioResult<()>>) -> Self {
        Self { id, token, task }
    }

    /// The id of the document or generation this task drives.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stops the task. The entity it drives ends up in its failure state.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits for the task and returns its outcome.
    pub async fn join(self) -> StudioResult<()> {
        self.task
            .await
            .map_err(|e| StudioError::Internal(format!("Pipeline task panicked: {}", e)))?
    }
}
