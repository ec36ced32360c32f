//! Task state machine implementation.
//!
//! This module provides functions for managing the lifecycle of a Task:
//! creation, status transitions, and stage completion. All of them are
//! pure state transformations over `&mut Task`; emitting events and
//! re-aggregating pipeline progress are the caller's concern.
//!
//! No transition legality matrix is enforced. The lifecycle controller
//! and the driving engine are trusted to call these in a sensible order;
//! the only hard guards are the panics on stage-list misuse, which would
//! otherwise corrupt the completed-stages prefix invariant.

use chrono::Utc;
use rd_protocol::stage_models::Stage;
use rd_protocol::task_models::{Chapter, Task, TaskStatus};
use uuid::Uuid;

/// Create a new Task with Pending status.
///
/// The working content starts equal to the chapter text and no stages
/// are completed yet.
///
/// # Panics
///
/// Panics if `stages` is empty. Pipeline construction normalizes an
/// empty or absent stage selection to the default order before creating
/// tasks, so an empty list here is caller misuse.
pub fn create_task(chapter: &Chapter, stages: Vec<Stage>) -> Task {
    assert!(!stages.is_empty(), "task created with an empty stage list");

    Task {
        id: Uuid::new_v4(),
        chapter_id: chapter.id.clone(),
        chapter_title: chapter.title.clone(),
        original_content: chapter.content.clone(),
        current_content: chapter.content.clone(),
        stages,
        completed_stages: Vec::new(),
        status: TaskStatus::Pending,
        started_at: None,
        completed_at: None,
        error: None,
    }
}

/// Transition the task to Processing.
///
/// Sets `started_at` on the first transition only; `completed_at` is
/// left untouched.
pub fn start_task(task: &mut Task) {
    task.status = TaskStatus::Processing;
    if task.started_at.is_none() {
        task.started_at = Some(Utc::now());
    }
}

/// Transition the task to Paused.
///
/// No timestamp side effects; accumulated stages and content are kept.
pub fn pause_task(task: &mut Task) {
    task.status = TaskStatus::Paused;
}

/// Transition the task back to Pending so the scheduler can pick it up.
///
/// No timestamp side effects. A stored error message is left in place;
/// only a retry clears it.
pub fn requeue_task(task: &mut Task) {
    task.status = TaskStatus::Pending;
}

/// Mark the task as completed and set `completed_at`.
pub fn complete_task(task: &mut Task) {
    task.status = TaskStatus::Completed;
    task.completed_at = Some(Utc::now());
}

/// Mark the task as failed, storing the error message and setting
/// `completed_at`.
pub fn fail_task(task: &mut Task, error: String) {
    task.status = TaskStatus::Failed;
    task.completed_at = Some(Utc::now());
    task.error = Some(error);
}

/// Record the result of one completed stage.
///
/// Appends the current stage to `completed_stages`, replaces the working
/// content wholesale with `new_content` (stages re-emit the entire text,
/// they are not diffs), and then either completes the task or requeues
/// it as Pending for its next stage.
///
/// # Panics
///
/// Panics when called on a task with no remaining stages. Silently
/// growing `completed_stages` past the stage list would corrupt the
/// prefix invariant, so this fails loudly instead.
pub fn complete_task_stage(task: &mut Task, new_content: String) {
    let stage = match task.current_stage() {
        Some(stage) => stage,
        None => panic!(
            "stage completion past the end of the stage list for task {}",
            task.id
        ),
    };

    task.completed_stages.push(stage);
    task.current_content = new_content;

    if task.completed_stages.len() == task.stages.len() {
        complete_task(task);
    } else {
        requeue_task(task);
    }
}
