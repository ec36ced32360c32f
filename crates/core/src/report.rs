//! Report generation and result export.
//!
//! The report is a plain-text summary for a human operator; the export
//! is the structured hand-off of finished chapters to downstream
//! consumers. Only tasks that passed every stage are exported, so a
//! consumer cannot mistake an interrupted rewrite for a finished one.

use rd_protocol::export_models::RefinedExport;
use rd_protocol::pipeline_models::Pipeline;
use rd_protocol::task_models::{Task, TaskStatus};
use std::fmt::Write;

/// Build a multi-section plain-text report for the pipeline.
///
/// Sections: pipeline id and status, timing (with elapsed duration when
/// both timestamps are present), aggregate statistics, and one line per
/// task with its completed stages.
pub fn generate_pipeline_report(pipeline: &Pipeline) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "Refinement Pipeline Report");
    let _ = writeln!(report, "==========================");
    let _ = writeln!(report, "Pipeline: {}", pipeline.id);
    let _ = writeln!(report, "Status:   {:?}", pipeline.status);
    report.push('\n');

    if let Some(started_at) = pipeline.started_at {
        let _ = writeln!(report, "Started:  {}", started_at.to_rfc3339());
        if let Some(completed_at) = pipeline.completed_at {
            let _ = writeln!(report, "Finished: {}", completed_at.to_rfc3339());
            let elapsed = completed_at.signed_duration_since(started_at);
            let _ = writeln!(report, "Elapsed:  {}s", elapsed.num_seconds());
        }
        report.push('\n');
    }

    let progress = &pipeline.progress;
    let _ = writeln!(
        report,
        "Progress: {}/{} stage-units ({}%), {} failed task(s)",
        progress.completed, progress.total, progress.percentage, progress.failed
    );
    report.push('\n');

    let _ = writeln!(report, "Tasks");
    let _ = writeln!(report, "-----");
    for task in &pipeline.tasks {
        let _ = writeln!(report, "{}", task_summary_line(task));
        if let Some(error) = &task.error {
            let _ = writeln!(report, "    error: {}", error);
        }
    }

    report
}

fn task_summary_line(task: &Task) -> String {
    let stages = if task.completed_stages.is_empty() {
        "none".to_string()
    } else {
        task.completed_stages
            .iter()
            .map(|stage| stage.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "  {} [{:?}] completed stages: {}",
        task.chapter_title, task.status, stages
    )
}

/// Export the results of every completed task.
///
/// Tasks in any other status are silently excluded; partial results are
/// never exported.
pub fn export_results(pipeline: &Pipeline) -> Vec<RefinedExport> {
    pipeline
        .tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .map(|task| RefinedExport {
            chapter_id: task.chapter_id.clone(),
            chapter_title: task.chapter_title.clone(),
            original_content: task.original_content.clone(),
            refined_content: task.current_content.clone(),
            completed_stages: task
                .completed_stages
                .iter()
                .map(|stage| stage.display_name().to_string())
                .collect(),
        })
        .collect()
}
