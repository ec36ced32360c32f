//! Pipeline state machine implementation.
//!
//! This module provides construction, progress aggregation, scheduling,
//! and lifecycle control for a refinement pipeline. All functions are
//! pure state transformations over `Pipeline` values; the driving engine
//! owns event emission and locking.
//!
//! Progress is never mutated piecemeal: after any task mutation the
//! caller runs [`refresh_progress`] to recompute the counters from the
//! task set. Lifecycle operations deliberately do not re-aggregate
//! internally, keeping the aggregation a single pure function.

use chrono::Utc;
use rd_protocol::pipeline_models::{Pipeline, PipelineOptions, PipelineStatus, Progress};
use rd_protocol::stage_models::Stage;
use rd_protocol::task_models::{Chapter, Task, TaskStatus};
use uuid::Uuid;

use crate::state::task::{create_task, fail_task, pause_task, requeue_task};

/// Create a new Pipeline with Idle status, one task per chapter.
///
/// Every task shares the pipeline's stage sequence. An absent or empty
/// stage selection is normalized to the full default order, so tasks are
/// never created with an empty stage list.
pub fn create_pipeline(chapters: &[Chapter], options: PipelineOptions) -> Pipeline {
    let stages = match options.stages {
        Some(stages) if !stages.is_empty() => stages,
        _ => Stage::ALL.to_vec(),
    };

    let tasks: Vec<Task> = chapters
        .iter()
        .map(|chapter| create_task(chapter, stages.clone()))
        .collect();

    let mut pipeline = Pipeline {
        id: Uuid::new_v4(),
        tasks,
        stages,
        prompt_overrides: options.prompt_overrides,
        current_task_index: None,
        status: PipelineStatus::Idle,
        progress: Progress::default(),
        started_at: None,
        completed_at: None,
    };
    refresh_progress(&mut pipeline);
    pipeline
}

/// Recompute aggregate progress from the current task set.
///
/// `completed` counts stage-units summed over all tasks; `failed` counts
/// tasks in the failed status. The asymmetry is deliberate and consumers
/// depend on it. Idempotent and side-effect-free.
pub fn refresh_progress(pipeline: &mut Pipeline) {
    let total = pipeline.tasks.len() * pipeline.stages.len();
    let completed: usize = pipeline
        .tasks
        .iter()
        .map(|task| task.completed_stages.len())
        .sum();
    let failed = pipeline
        .tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Failed)
        .count();

    let percentage = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    };

    pipeline.progress = Progress {
        total,
        completed,
        failed,
        percentage,
    };
}

/// Index of the next runnable task, scanning in creation order.
///
/// A task is runnable while Pending or Paused, so a paused task that was
/// never requeued is still picked up. Returns `None` when every task is
/// completed or failed.
pub fn next_task_index(pipeline: &Pipeline) -> Option<usize> {
    pipeline
        .tasks
        .iter()
        .position(|task| task.status.is_runnable())
}

/// The next runnable task, if any.
pub fn next_task(pipeline: &Pipeline) -> Option<&Task> {
    next_task_index(pipeline).map(|index| &pipeline.tasks[index])
}

/// Transition the pipeline to Running.
///
/// Sets `started_at` on the first transition only.
pub fn start_pipeline(pipeline: &mut Pipeline) {
    pipeline.status = PipelineStatus::Running;
    if pipeline.started_at.is_none() {
        pipeline.started_at = Some(Utc::now());
    }
}

/// Suspend the pipeline.
///
/// Every Processing task is parked as Paused with its accumulated stages
/// and content untouched; tasks in other statuses are left alone.
pub fn pause_pipeline(pipeline: &mut Pipeline) {
    pipeline.status = PipelineStatus::Paused;
    for task in &mut pipeline.tasks {
        if task.status == TaskStatus::Processing {
            pause_task(task);
        }
    }
}

/// Resume a suspended pipeline.
///
/// Every Paused task is requeued as Pending so the scheduler picks it up
/// again at its next stage.
pub fn resume_pipeline(pipeline: &mut Pipeline) {
    pipeline.status = PipelineStatus::Running;
    for task in &mut pipeline.tasks {
        if task.status == TaskStatus::Paused {
            requeue_task(task);
        }
    }
}

/// Terminate the pipeline.
///
/// The pipeline becomes Completed and `completed_at` is set. In-flight
/// tasks are parked as Paused, keeping their accumulated work, even
/// though the owning pipeline is now terminal. Reached both by
/// exhausting every task and by an explicit stop; callers tell the two
/// apart via `progress.percentage == 100`.
pub fn stop_pipeline(pipeline: &mut Pipeline) {
    pipeline.status = PipelineStatus::Completed;
    pipeline.completed_at = Some(Utc::now());
    for task in &mut pipeline.tasks {
        if task.status == TaskStatus::Processing {
            pause_task(task);
        }
    }
}

/// Requeue every failed task with its error cleared.
///
/// Accumulated stages and content are preserved, so a retried task
/// resumes at the stage that failed rather than starting over. A no-op
/// when nothing has failed; the pipeline status is untouched.
pub fn retry_failed_tasks(pipeline: &mut Pipeline) {
    for task in &mut pipeline.tasks {
        if task.status == TaskStatus::Failed {
            requeue_task(task);
            task.error = None;
        }
    }
}

/// Mark one task as failed and keep the rest of the pipeline going.
///
/// Thin wrapper so the engine fails tasks by index without borrowing
/// through the task list itself.
pub fn fail_task_at(pipeline: &mut Pipeline, index: usize, error: String) {
    fail_task(&mut pipeline.tasks[index], error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::task::{complete_task_stage, start_task};

    fn test_chapters(count: usize) -> Vec<Chapter> {
        (1..=count)
            .map(|i| Chapter {
                id: format!("ch{}", i),
                title: format!("Chapter {}", i),
                content: format!("Draft of chapter {}.", i),
            })
            .collect()
    }

    fn complete_one_stage(pipeline: &mut Pipeline, index: usize, content: &str) {
        start_task(&mut pipeline.tasks[index]);
        complete_task_stage(&mut pipeline.tasks[index], content.to_string());
        refresh_progress(pipeline);
    }

    #[test]
    fn test_create_pipeline_defaults() {
        let pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());

        assert_eq!(pipeline.status, PipelineStatus::Idle);
        assert_eq!(pipeline.tasks.len(), 2);
        assert_eq!(pipeline.stages, Stage::ALL.to_vec());
        assert_eq!(pipeline.tasks[0].stages, pipeline.stages);
        assert_eq!(pipeline.progress.total, 8);
        assert_eq!(pipeline.progress.completed, 0);
        assert_eq!(pipeline.progress.percentage, 0);
        assert!(pipeline.started_at.is_none());
        assert!(pipeline.current_task_index.is_none());
    }

    #[test]
    fn test_create_pipeline_normalizes_empty_stage_list() {
        let options = PipelineOptions {
            stages: Some(Vec::new()),
            ..Default::default()
        };
        let pipeline = create_pipeline(&test_chapters(1), options);

        assert_eq!(pipeline.stages, Stage::ALL.to_vec());
    }

    #[test]
    fn test_create_pipeline_custom_stages() {
        let options = PipelineOptions {
            stages: Some(vec![Stage::EnhanceTension, Stage::AddTechniques]),
            ..Default::default()
        };
        let pipeline = create_pipeline(&test_chapters(3), options);

        assert_eq!(pipeline.progress.total, 6);
        assert_eq!(pipeline.tasks[2].current_stage(), Some(Stage::EnhanceTension));
    }

    #[test]
    fn test_create_pipeline_with_no_chapters() {
        let pipeline = create_pipeline(&[], PipelineOptions::default());

        assert_eq!(pipeline.progress.total, 0);
        assert_eq!(pipeline.progress.percentage, 0);
        assert!(next_task(&pipeline).is_none());
    }

    #[test]
    fn test_progress_counts_stage_units_and_rounds() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());

        complete_one_stage(&mut pipeline, 0, "refined once");

        // round(1/8 * 100) = 13
        assert_eq!(pipeline.progress.completed, 1);
        assert_eq!(pipeline.progress.percentage, 13);
    }

    #[test]
    fn test_progress_failed_counts_tasks_not_stages() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());

        // Two completed stages on ch1, then a failure on its third.
        complete_one_stage(&mut pipeline, 0, "one");
        complete_one_stage(&mut pipeline, 0, "two");
        fail_task_at(&mut pipeline, 0, "timeout".to_string());
        refresh_progress(&mut pipeline);

        assert_eq!(pipeline.progress.completed, 2);
        assert_eq!(pipeline.progress.failed, 1);
    }

    #[test]
    fn test_refresh_progress_is_idempotent() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());
        complete_one_stage(&mut pipeline, 1, "refined");

        let first = pipeline.progress;
        refresh_progress(&mut pipeline);
        assert_eq!(pipeline.progress, first);
    }

    #[test]
    fn test_scheduler_scans_in_order() {
        let mut pipeline = create_pipeline(&test_chapters(3), PipelineOptions::default());

        assert_eq!(next_task_index(&pipeline), Some(0));

        // First task in flight: the scan skips it.
        start_task(&mut pipeline.tasks[0]);
        assert_eq!(next_task_index(&pipeline), Some(1));
    }

    #[test]
    fn test_scheduler_treats_paused_as_runnable() {
        let mut pipeline = create_pipeline(&test_chapters(1), PipelineOptions::default());
        pause_task(&mut pipeline.tasks[0]);

        assert_eq!(next_task_index(&pipeline), Some(0));
    }

    #[test]
    fn test_scheduler_returns_none_when_exhausted() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());

        for _ in 0..Stage::ALL.len() {
            complete_one_stage(&mut pipeline, 0, "done");
        }
        fail_task_at(&mut pipeline, 1, "boom".to_string());

        assert!(next_task(&pipeline).is_none());
    }

    #[test]
    fn test_start_pipeline_sets_started_at_once() {
        let mut pipeline = create_pipeline(&test_chapters(1), PipelineOptions::default());

        start_pipeline(&mut pipeline);
        assert_eq!(pipeline.status, PipelineStatus::Running);
        let started = pipeline.started_at;
        assert!(started.is_some());

        pause_pipeline(&mut pipeline);
        start_pipeline(&mut pipeline);
        assert_eq!(pipeline.started_at, started);
    }

    #[test]
    fn test_pause_parks_processing_tasks_only() {
        let mut pipeline = create_pipeline(&test_chapters(3), PipelineOptions::default());
        start_pipeline(&mut pipeline);
        start_task(&mut pipeline.tasks[1]);
        fail_task_at(&mut pipeline, 2, "boom".to_string());

        pause_pipeline(&mut pipeline);

        assert_eq!(pipeline.status, PipelineStatus::Paused);
        assert_eq!(pipeline.tasks[0].status, TaskStatus::Pending);
        assert_eq!(pipeline.tasks[1].status, TaskStatus::Paused);
        assert_eq!(pipeline.tasks[2].status, TaskStatus::Failed);
    }

    #[test]
    fn test_pause_resume_cycle_preserves_work() {
        let mut pipeline = create_pipeline(&test_chapters(1), PipelineOptions::default());
        start_pipeline(&mut pipeline);
        complete_one_stage(&mut pipeline, 0, "after stage one");
        start_task(&mut pipeline.tasks[0]);

        pause_pipeline(&mut pipeline);
        resume_pipeline(&mut pipeline);

        assert_eq!(pipeline.status, PipelineStatus::Running);
        let task = &pipeline.tasks[0];
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.completed_stages, vec![Stage::RemoveAiFlavor]);
        assert_eq!(task.current_content, "after stage one");
    }

    #[test]
    fn test_stop_is_terminal_and_parks_in_flight_work() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());
        start_pipeline(&mut pipeline);
        complete_one_stage(&mut pipeline, 0, "kept");
        start_task(&mut pipeline.tasks[0]);

        stop_pipeline(&mut pipeline);

        assert_eq!(pipeline.status, PipelineStatus::Completed);
        assert!(pipeline.completed_at.is_some());
        assert_eq!(pipeline.tasks[0].status, TaskStatus::Paused);
        assert_eq!(pipeline.tasks[0].current_content, "kept");
        // Early stop is distinguishable from natural completion.
        assert!(pipeline.progress.percentage < 100);
    }

    #[test]
    fn test_retry_failed_tasks_resumes_at_failed_stage() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());
        complete_one_stage(&mut pipeline, 0, "stage one result");
        fail_task_at(&mut pipeline, 0, "timeout".to_string());
        refresh_progress(&mut pipeline);
        assert_eq!(pipeline.progress.failed, 1);

        retry_failed_tasks(&mut pipeline);
        refresh_progress(&mut pipeline);

        let task = &pipeline.tasks[0];
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.error.is_none());
        assert_eq!(task.completed_stages, vec![Stage::RemoveAiFlavor]);
        assert_eq!(task.current_content, "stage one result");
        assert_eq!(task.current_stage(), Some(Stage::EnhanceTension));
        assert_eq!(pipeline.progress.failed, 0);
        // The untouched task is still pending.
        assert_eq!(pipeline.tasks[1].status, TaskStatus::Pending);
    }

    #[test]
    fn test_retry_with_no_failures_is_a_noop() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());
        let before = pipeline.clone();

        retry_failed_tasks(&mut pipeline);

        for (task, original) in pipeline.tasks.iter().zip(&before.tasks) {
            assert_eq!(task.status, original.status);
            assert_eq!(task.completed_stages, original.completed_stages);
        }
        assert_eq!(pipeline.status, before.status);
    }

    #[test]
    fn test_full_run_reaches_one_hundred_percent() {
        let mut pipeline = create_pipeline(&test_chapters(2), PipelineOptions::default());
        start_pipeline(&mut pipeline);

        while let Some(index) = next_task_index(&pipeline) {
            complete_one_stage(&mut pipeline, index, "refined");
        }
        stop_pipeline(&mut pipeline);

        assert_eq!(pipeline.progress.completed, 8);
        assert_eq!(pipeline.progress.percentage, 100);
        assert!(pipeline.tasks.iter().all(|t| t.status == TaskStatus::Completed));
    }
}
