//! Refinement execution engine.
//!
//! The RefineEngine is the driver loop: it repeatedly picks the next
//! runnable task, builds the prompt for that task's current stage, awaits
//! the content transformer, and records the result back into the pipeline.
//!
//! The pipeline lives behind an `Arc<Mutex<_>>` shared with the state
//! manager. Every state mutation happens under the lock; only the
//! transformer call itself is awaited without it, so a concurrent pause or
//! stop is observed at stage boundaries only. At most one transform is in
//! flight per pipeline. An in-flight stage result is always recorded, even
//! when a pause or stop landed while the transform was running.

use crate::catalog::StageCatalog;
use crate::config::models::AppConfig;
use crate::state::pipeline::{
    fail_task_at, next_task_index, refresh_progress, start_pipeline, stop_pipeline,
};
use crate::state::task::{complete_task_stage, start_task};
use crate::transform::{TransformRequest, TransformerManager};
use anyhow::Result;
use rd_protocol::ipc::Event;
use rd_protocol::pipeline_models::{Pipeline, PipelineStatus};
use rd_protocol::task_models::TaskStatus;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The main refinement execution engine.
///
/// RefineEngine drives one pipeline at a time through its stage sequence,
/// delegating the actual rewrites to the TransformerManager.
pub struct RefineEngine {
    transformers: TransformerManager,
    catalog: StageCatalog,
    provider: String,
}

/// Everything the engine needs for one transform call, captured under the
/// lock so the await holds no borrow into the pipeline.
struct StageDispatch {
    task_index: usize,
    task_id: Uuid,
    request: TransformRequest,
}

impl RefineEngine {
    /// Create a new RefineEngine.
    ///
    /// # Arguments
    ///
    /// * `transformers` - Registered rewrite providers
    /// * `catalog` - Prompt templates for the stage set
    /// * `provider` - Name of the provider used for every transform call
    pub fn new(transformers: TransformerManager, catalog: StageCatalog, provider: String) -> Self {
        Self {
            transformers,
            catalog,
            provider,
        }
    }

    /// Build an engine from loaded `.redraft/` configuration.
    ///
    /// The provider and fallback selections come from `config.toml`; the
    /// stage templates loaded from `stages/*.md` are layered over the
    /// built-in catalog. The caller supplies the provider registry, since
    /// providers are code, not configuration.
    pub fn from_config(config: &AppConfig, transformers: TransformerManager) -> Self {
        let transformers = match &config.global.fallback {
            Some(fallback) => transformers.with_fallback(fallback.clone()),
            None => transformers,
        };
        Self::new(
            transformers,
            StageCatalog::with_overrides(config.prompt_overrides()),
            config.global.provider.clone(),
        )
    }

    /// Drive the pipeline until it is no longer running.
    ///
    /// Exits when the task list is exhausted (the pipeline is stopped and
    /// a completion event is emitted) or when a concurrent pause or stop
    /// flipped the pipeline status. Event send failures are ignored; the
    /// pipeline state is authoritative, the channel is observability.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration mistakes: a pipeline stage
    /// without a resolvable prompt template fails the run before any
    /// status change. Transform failures are not errors; they are
    /// recorded on the failing task and the run continues.
    pub async fn run(&self, pipeline: Arc<Mutex<Pipeline>>, events_tx: Sender<Event>) -> Result<()> {
        let pipeline_id = {
            let mut guard = pipeline.lock().await;

            // Pre-flight every stage template so a configuration error
            // surfaces here instead of as a runtime task failure.
            for &stage in &guard.stages {
                self.catalog.template(stage, &guard.prompt_overrides)?;
            }

            // Re-running a terminal pipeline with nothing runnable is a
            // guarded no-op.
            if guard.status == PipelineStatus::Completed && next_task_index(&guard).is_none() {
                tracing::debug!(pipeline_id = %guard.id, "pipeline already completed, nothing to run");
                return Ok(());
            }

            start_pipeline(&mut guard);
            tracing::info!(pipeline_id = %guard.id, tasks = guard.tasks.len(), "pipeline run started");

            let _ = events_tx
                .send(Event::PipelineStarted { pipeline_id: guard.id })
                .await;
            let _ = events_tx
                .send(Event::PipelineStatusUpdate {
                    pipeline_id: guard.id,
                    status: guard.status,
                })
                .await;

            guard.id
        };

        loop {
            // Schedule under the lock.
            let dispatch = {
                let mut guard = pipeline.lock().await;

                if guard.status != PipelineStatus::Running {
                    tracing::info!(pipeline_id = %guard.id, status = ?guard.status, "pipeline run suspended");
                    return Ok(());
                }

                let Some(task_index) = next_task_index(&guard) else {
                    stop_pipeline(&mut guard);
                    tracing::info!(
                        pipeline_id = %guard.id,
                        percentage = guard.progress.percentage,
                        "pipeline exhausted its tasks"
                    );
                    let _ = events_tx
                        .send(Event::PipelineStatusUpdate {
                            pipeline_id: guard.id,
                            status: guard.status,
                        })
                        .await;
                    let _ = events_tx
                        .send(Event::PipelineCompleted {
                            pipeline_id: guard.id,
                            progress: guard.progress,
                        })
                        .await;
                    return Ok(());
                };

                // Build the prompt before mutating the task: if the
                // template cannot be resolved, the run aborts with the
                // task still schedulable rather than stranded in
                // Processing.
                let task = &guard.tasks[task_index];

                // The task is runnable, so a current stage exists.
                let Some(stage) = task.current_stage() else {
                    unreachable!("runnable task has no remaining stage");
                };
                let prompt =
                    self.catalog.prompt(stage, &task.current_content, &guard.prompt_overrides)?;

                let dispatch = StageDispatch {
                    task_index,
                    task_id: task.id,
                    request: TransformRequest::new(prompt, stage, task.chapter_id.clone()),
                };

                guard.current_task_index = Some(task_index);
                start_task(&mut guard.tasks[task_index]);

                tracing::debug!(
                    pipeline_id = %pipeline_id,
                    task_id = %dispatch.task_id,
                    stage = %stage,
                    "dispatching stage transform"
                );
                let _ = events_tx
                    .send(Event::TaskStageStarted {
                        pipeline_id,
                        task_id: dispatch.task_id,
                        stage,
                    })
                    .await;

                dispatch
            };

            // The one await outside the lock.
            let outcome = self
                .transformers
                .transform(&self.provider, &dispatch.request)
                .await;

            // Record the result. This happens even if a pause or stop
            // landed mid-transform; suspension is observed at the top of
            // the next iteration.
            {
                let mut guard = pipeline.lock().await;
                let stage = dispatch.request.stage;

                match outcome {
                    Ok(new_content) => {
                        let task = &mut guard.tasks[dispatch.task_index];
                        complete_task_stage(task, new_content);
                        let status = task.status;

                        let _ = events_tx
                            .send(Event::TaskStageCompleted {
                                pipeline_id,
                                task_id: dispatch.task_id,
                                stage,
                                status,
                            })
                            .await;
                        if status == TaskStatus::Completed {
                            tracing::info!(
                                pipeline_id = %pipeline_id,
                                task_id = %dispatch.task_id,
                                "task passed every stage"
                            );
                            let _ = events_tx
                                .send(Event::TaskCompleted {
                                    pipeline_id,
                                    task_id: dispatch.task_id,
                                })
                                .await;
                        }
                    }
                    Err(error) => {
                        // Expected at runtime: the task is parked as
                        // failed and the pipeline keeps going.
                        let message = error.to_string();
                        tracing::warn!(
                            pipeline_id = %pipeline_id,
                            task_id = %dispatch.task_id,
                            stage = %stage,
                            error = %message,
                            "stage transform failed"
                        );
                        fail_task_at(&mut guard, dispatch.task_index, message.clone());
                        let _ = events_tx
                            .send(Event::TaskFailed {
                                pipeline_id,
                                task_id: dispatch.task_id,
                                stage,
                                error: message,
                            })
                            .await;
                    }
                }

                refresh_progress(&mut guard);
                let _ = events_tx
                    .send(Event::ProgressUpdated {
                        pipeline_id,
                        progress: guard.progress,
                    })
                    .await;
            }
        }
    }
}
