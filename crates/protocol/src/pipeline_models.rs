//! Refinement pipeline models.
//!
//! This module defines the aggregate for one batch refinement run: the
//! tasks, the stage sequence they share, pipeline-level status, and the
//! recomputed progress counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stage_models::{PromptOverrides, Stage};
use crate::task_models::Task;

/// Represents the current lifecycle status of a refinement pipeline.
///
/// A pipeline is created `Idle`, driven to `Running`, may cycle between
/// `Running` and `Paused` any number of times, and terminates in
/// `Completed`. `Completed` is reached both by exhausting every task and
/// by an explicit stop; callers that need to tell the two apart check
/// `progress.percentage == 100`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    /// Created but not yet driven.
    Idle,

    /// A driver is actively pushing tasks through stages.
    Running,

    /// Suspended by the user; resumable.
    Paused,

    /// Terminal. No further work will run under this pipeline.
    Completed,
}

/// Pipeline-wide aggregate progress, recomputed from the task set.
///
/// `completed` counts completed stage-units across all tasks while
/// `failed` counts failed tasks. Consumers depend on this asymmetry;
/// it is deliberate, not a bug.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Total stage-units: task count times stage count.
    pub total: usize,

    /// Completed stage-units summed over all tasks.
    pub completed: usize,

    /// Number of tasks currently in the failed status.
    pub failed: usize,

    /// `round(completed / total * 100)`, or `0` when `total` is zero.
    pub percentage: u8,
}

/// The aggregate of tasks plus shared stage list, status, and progress.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Pipeline {
    /// Unique identifier for this pipeline run.
    pub id: Uuid,

    /// Tasks in creation order. Membership is fixed after creation.
    pub tasks: Vec<Task>,

    /// The ordered stage sequence shared by all tasks.
    pub stages: Vec<Stage>,

    /// Per-stage prompt template overrides applied to every prompt build
    /// for this pipeline.
    #[serde(default)]
    pub prompt_overrides: PromptOverrides,

    /// Cursor hint for drivers.
    ///
    /// Not authoritative: the scheduler re-derives the runnable task by
    /// scanning the task list.
    pub current_task_index: Option<usize>,

    /// Current lifecycle status.
    pub status: PipelineStatus,

    /// Aggregate progress. A pure function of `tasks`, never hand-mutated.
    pub progress: Progress,

    /// Set when the pipeline first transitions to `Running`.
    pub started_at: Option<DateTime<Utc>>,

    /// Set when the pipeline transitions to `Completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Options accepted at pipeline creation.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PipelineOptions {
    /// Stage sequence to apply. `None` or an empty list selects the full
    /// default refinement order.
    pub stages: Option<Vec<Stage>>,

    /// Prompt template overrides threaded into every prompt build.
    pub prompt_overrides: PromptOverrides,
}
