//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between a front end (UI or embedding application) and the refinement
//! core.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from the front end to the core
//! - `Event`: Status updates sent from the core to the front end
//!
//! Communication is asynchronous and channel-based, allowing the front
//! end to remain responsive while the core drives refinement runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline_models::{PipelineStatus, Progress};
use crate::stage_models::Stage;
use crate::task_models::TaskStatus;

/// Operations sent from the front end to the refinement core.
///
/// These represent user commands against an already-created pipeline.
/// The core processes these operations and responds with Events.
///
/// Uses tagged enum serialization for JSON clients:
/// ```json
/// {
///   "type": "startPipeline",
///   "payload": {
///     "pipeline_id": "uuid-here"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Begin or re-drive a pipeline run.
    ///
    /// Re-driving picks up pending and paused tasks; a pipeline with
    /// nothing runnable is left untouched.
    StartPipeline { pipeline_id: Uuid },

    /// Suspend a running pipeline.
    ///
    /// The run stops after the in-flight stage completes.
    PausePipeline { pipeline_id: Uuid },

    /// Resume a paused pipeline from where it was suspended.
    ResumePipeline { pipeline_id: Uuid },

    /// Terminate a pipeline.
    ///
    /// In-flight tasks are parked as paused and the pipeline becomes
    /// completed. This is not resumable.
    StopPipeline { pipeline_id: Uuid },

    /// Requeue every failed task so a subsequent start retries them.
    RetryFailedTasks { pipeline_id: Uuid },
}

/// Events sent from the refinement core to the front end.
///
/// These represent state changes and progress updates that the front end
/// should reflect to the user.
///
/// Uses tagged enum serialization for JSON clients:
/// ```json
/// {
///   "type": "progressUpdated",
///   "payload": {
///     "pipeline_id": "uuid-here",
///     "progress": { "total": 8, "completed": 1, "failed": 0, "percentage": 13 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A pipeline run has started.
    PipelineStarted { pipeline_id: Uuid },

    /// A pipeline's lifecycle status has changed.
    PipelineStatusUpdate {
        pipeline_id: Uuid,
        status: PipelineStatus,
    },

    /// A transform for one task's current stage has been dispatched.
    TaskStageStarted {
        pipeline_id: Uuid,
        task_id: Uuid,
        stage: Stage,
    },

    /// A stage finished and the task's working content was replaced.
    TaskStageCompleted {
        pipeline_id: Uuid,
        task_id: Uuid,
        stage: Stage,
        status: TaskStatus,
    },

    /// A task has passed every stage.
    TaskCompleted { pipeline_id: Uuid, task_id: Uuid },

    /// A task's transform failed and the task was parked as failed.
    ///
    /// The pipeline keeps running its other tasks.
    TaskFailed {
        pipeline_id: Uuid,
        task_id: Uuid,
        stage: Stage,
        error: String,
    },

    /// Aggregate progress was recomputed after a task mutation.
    ProgressUpdated {
        pipeline_id: Uuid,
        progress: Progress,
    },

    /// A pipeline reached its terminal status.
    PipelineCompleted {
        pipeline_id: Uuid,
        progress: Progress,
    },
}
