//! State manager for coordinating multiple refinement pipelines.
//!
//! The StateManager is the central orchestrator for all pipeline runs.
//! It maintains a registry of pipelines and their driver tasks, and
//! provides the operations a front end dispatches: start, pause, resume,
//! stop, retry, and state queries.

use crate::engine::RefineEngine;
use crate::report::{export_results, generate_pipeline_report};
use crate::state::pipeline::{
    create_pipeline, pause_pipeline, refresh_progress, resume_pipeline, retry_failed_tasks,
    stop_pipeline,
};
use anyhow::Result;
use rd_protocol::export_models::RefinedExport;
use rd_protocol::ipc::{Event, Op};
use rd_protocol::pipeline_models::{Pipeline, PipelineOptions};
use rd_protocol::task_models::Chapter;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Manages all registered pipelines and their driver tasks.
///
/// The StateManager provides a centralized interface for:
/// - Creating pipelines from chapter batches
/// - Spawning and tracking driver runs
/// - Pausing, resuming, stopping, and retrying pipelines
/// - Querying pipeline state, reports, and exports
pub struct StateManager {
    /// Registry of all pipelines, indexed by their UUID.
    ///
    /// Each pipeline sits behind its own `Arc<Mutex<_>>` shared with the
    /// driver task, so control operations and the engine serialize on
    /// the same lock.
    pipelines: Arc<Mutex<HashMap<Uuid, Arc<Mutex<Pipeline>>>>>,

    /// Driver task handles, indexed by pipeline UUID.
    ///
    /// A live handle means a driver currently owns that pipeline;
    /// `start` refuses to double-spawn while one is live.
    drivers: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,

    /// The refinement engine driving runs.
    engine: Arc<RefineEngine>,

    /// Channel for sending events to the front end.
    events_tx: mpsc::Sender<Event>,
}

impl StateManager {
    /// Create a new StateManager.
    ///
    /// # Arguments
    ///
    /// * `engine` - The engine used for every driver run
    /// * `events_tx` - Channel for sending events to the front end
    pub fn new(engine: RefineEngine, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            pipelines: Arc::new(Mutex::new(HashMap::new())),
            drivers: Arc::new(Mutex::new(HashMap::new())),
            engine: Arc::new(engine),
            events_tx,
        }
    }

    /// Create and register an idle pipeline over the given chapters.
    ///
    /// No driver is spawned; call [`StateManager::start`] to begin the
    /// run.
    pub async fn create_pipeline(&self, chapters: &[Chapter], options: PipelineOptions) -> Uuid {
        let pipeline = create_pipeline(chapters, options);
        let id = pipeline.id;

        tracing::info!(pipeline_id = %id, chapters = chapters.len(), "pipeline registered");
        self.pipelines
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(pipeline)));
        id
    }

    /// Spawn a driver for the pipeline.
    ///
    /// The driver runs in the background; events arrive through the
    /// events channel as the run progresses. Refuses to spawn a second
    /// driver while one is still live for the same pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found or a driver is
    /// already running for it.
    pub async fn start(&self, pipeline_id: Uuid) -> Result<()> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;

        let mut drivers = self.drivers.lock().await;
        if let Some(handle) = drivers.get(&pipeline_id) {
            if !handle.is_finished() {
                return Err(anyhow::anyhow!(
                    "Pipeline {} already has a running driver",
                    pipeline_id
                ));
            }
        }

        let engine = Arc::clone(&self.engine);
        let events_tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = engine.run(pipeline, events_tx).await {
                tracing::error!(pipeline_id = %pipeline_id, error = %e, "pipeline run aborted");
            }
        });
        drivers.insert(pipeline_id, handle);

        Ok(())
    }

    /// Suspend a running pipeline.
    ///
    /// The driver exits after the in-flight stage completes; in-flight
    /// tasks are parked with their work intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found.
    pub async fn pause(&self, pipeline_id: Uuid) -> Result<()> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;
        let mut guard = pipeline.lock().await;

        pause_pipeline(&mut guard);
        tracing::info!(pipeline_id = %pipeline_id, "pipeline paused");
        let _ = self
            .events_tx
            .send(Event::PipelineStatusUpdate {
                pipeline_id,
                status: guard.status,
            })
            .await;
        Ok(())
    }

    /// Resume a paused pipeline and re-spawn its driver.
    ///
    /// Paused tasks are requeued as pending before the driver starts, so
    /// they are immediately eligible again.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found or its previous
    /// driver has not exited yet.
    pub async fn resume(&self, pipeline_id: Uuid) -> Result<()> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;
        {
            let mut guard = pipeline.lock().await;
            resume_pipeline(&mut guard);
            tracing::info!(pipeline_id = %pipeline_id, "pipeline resumed");
            let _ = self
                .events_tx
                .send(Event::PipelineStatusUpdate {
                    pipeline_id,
                    status: guard.status,
                })
                .await;
        }

        self.start(pipeline_id).await
    }

    /// Terminate a pipeline.
    ///
    /// The pipeline becomes completed and its driver exits at the next
    /// stage boundary. Not resumable.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found.
    pub async fn stop(&self, pipeline_id: Uuid) -> Result<()> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;
        let mut guard = pipeline.lock().await;

        stop_pipeline(&mut guard);
        tracing::info!(
            pipeline_id = %pipeline_id,
            percentage = guard.progress.percentage,
            "pipeline stopped"
        );
        let _ = self
            .events_tx
            .send(Event::PipelineStatusUpdate {
                pipeline_id,
                status: guard.status,
            })
            .await;
        let _ = self
            .events_tx
            .send(Event::PipelineCompleted {
                pipeline_id,
                progress: guard.progress,
            })
            .await;
        Ok(())
    }

    /// Requeue every failed task in the pipeline.
    ///
    /// Accumulated work is preserved, so a retried task resumes at the
    /// stage that failed. This revives tasks only; the caller re-drives
    /// with [`StateManager::start`].
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found.
    pub async fn retry_failed(&self, pipeline_id: Uuid) -> Result<()> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;
        let mut guard = pipeline.lock().await;

        retry_failed_tasks(&mut guard);
        refresh_progress(&mut guard);
        tracing::info!(pipeline_id = %pipeline_id, "failed tasks requeued");
        let _ = self
            .events_tx
            .send(Event::ProgressUpdated {
                pipeline_id,
                progress: guard.progress,
            })
            .await;
        Ok(())
    }

    /// Dispatch one front-end operation.
    pub async fn handle_op(&self, op: Op) -> Result<()> {
        match op {
            Op::StartPipeline { pipeline_id } => self.start(pipeline_id).await,
            Op::PausePipeline { pipeline_id } => self.pause(pipeline_id).await,
            Op::ResumePipeline { pipeline_id } => self.resume(pipeline_id).await,
            Op::StopPipeline { pipeline_id } => self.stop(pipeline_id).await,
            Op::RetryFailedTasks { pipeline_id } => self.retry_failed(pipeline_id).await,
        }
    }

    /// Get a snapshot of a pipeline's current state.
    pub async fn get_pipeline(&self, pipeline_id: Uuid) -> Option<Pipeline> {
        let pipelines = self.pipelines.lock().await;
        if let Some(pipeline_arc) = pipelines.get(&pipeline_id) {
            Some(pipeline_arc.lock().await.clone())
        } else {
            None
        }
    }

    /// Get snapshots of all registered pipelines.
    pub async fn all_pipelines(&self) -> Vec<Pipeline> {
        let pipelines = self.pipelines.lock().await;
        let mut result = Vec::new();
        for pipeline_arc in pipelines.values() {
            result.push(pipeline_arc.lock().await.clone());
        }
        result
    }

    /// Get the number of registered pipelines.
    pub async fn pipeline_count(&self) -> usize {
        self.pipelines.lock().await.len()
    }

    /// Whether a driver task is currently live for the pipeline.
    pub async fn is_driving(&self, pipeline_id: Uuid) -> bool {
        self.drivers
            .lock()
            .await
            .get(&pipeline_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the pipeline's driver task to exit, if one was spawned.
    pub async fn wait_for_driver(&self, pipeline_id: Uuid) {
        let handle = self.drivers.lock().await.remove(&pipeline_id);
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Build the human-readable report for a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found.
    pub async fn report(&self, pipeline_id: Uuid) -> Result<String> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;
        let guard = pipeline.lock().await;
        Ok(generate_pipeline_report(&guard))
    }

    /// Export the completed results of a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline is not found.
    pub async fn export(&self, pipeline_id: Uuid) -> Result<Vec<RefinedExport>> {
        let pipeline = self.get_pipeline_arc(pipeline_id).await?;
        let guard = pipeline.lock().await;
        Ok(export_results(&guard))
    }

    async fn get_pipeline_arc(&self, pipeline_id: Uuid) -> Result<Arc<Mutex<Pipeline>>> {
        self.pipelines
            .lock()
            .await
            .get(&pipeline_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Pipeline {} not found", pipeline_id))
    }
}
