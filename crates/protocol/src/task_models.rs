//! Refinement task models.
//!
//! This module defines the structures for tracking a single chapter
//! through the pipeline's stage sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stage_models::Stage;

/// A source chapter handed to the pipeline for refinement.
///
/// The pipeline treats chapters as opaque: `id` and `title` are echoed
/// back in reports and exports, and `content` seeds the task's working
/// text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Identifier of the chapter in the owning collection.
    pub id: String,

    /// Title shown in reports and exports.
    pub title: String,

    /// The chapter text to refine.
    pub content: String,
}

/// Represents the current lifecycle status of a refinement task.
///
/// The status cycles through these states as stages complete:
/// Pending -> Processing -> Pending -> ... -> Completed
///
/// Special states:
/// - Paused: Suspended by a pipeline pause or stop; accumulated work kept
/// - Failed: The transformer reported an error for the current stage
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting to be picked up by the scheduler.
    Pending,

    /// A transform for the current stage is in flight.
    Processing,

    /// Suspended with its accumulated stages and content intact.
    Paused,

    /// Every stage has been applied.
    Completed,

    /// The transformer failed; the error message is kept on the task.
    Failed,
}

impl TaskStatus {
    /// Whether the scheduler may pick a task in this status up.
    ///
    /// `Paused` counts as runnable so a resumed pipeline makes progress
    /// even when an interrupted task was never explicitly requeued.
    pub fn is_runnable(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Paused)
    }
}

/// The per-chapter unit of work tracked through the stage sequence.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Task {
    /// Unique identifier, generated at creation and never reused.
    pub id: Uuid,

    /// Identifier of the source chapter (opaque to the pipeline).
    pub chapter_id: String,

    /// Title of the source chapter, used in reports and exports.
    pub chapter_title: String,

    /// The chapter text as handed in at creation. Never modified.
    pub original_content: String,

    /// The working text, replaced wholesale after each completed stage.
    pub current_content: String,

    /// The ordered stage sequence this task must pass through.
    ///
    /// Copied from the owning pipeline at creation and fixed thereafter.
    pub stages: Vec<Stage>,

    /// Stages completed so far, in order.
    ///
    /// Always a prefix of `stages`: its length is the index of the next
    /// stage to run.
    pub completed_stages: Vec<Stage>,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Set on the first transition into `Processing`.
    pub started_at: Option<DateTime<Utc>>,

    /// Set on the transition into `Completed` or `Failed`.
    pub completed_at: Option<DateTime<Utc>>,

    /// The transformer's error message. Present only while `Failed`.
    pub error: Option<String>,
}

impl Task {
    /// The next stage to run, or `None` once every stage is done.
    pub fn current_stage(&self) -> Option<Stage> {
        self.stages.get(self.completed_stages.len()).copied()
    }
}
