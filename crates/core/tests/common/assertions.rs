//! Custom assertion helpers for E2E tests.

use rd_protocol::ipc::Event;
use rd_protocol::pipeline_models::PipelineStatus;
use std::time::Duration;
use tokio::sync::mpsc;

/// Collect events from a channel until the pipeline completes, the
/// channel closes, or the timeout elapses.
pub async fn collect_events_until_timeout(
    rx: &mut mpsc::Receiver<Event>,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let start = tokio::time::Instant::now();

    while start.elapsed() < timeout {
        match tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Some(event)) => {
                let is_terminal = matches!(&event, Event::PipelineCompleted { .. });
                events.push(event);
                if is_terminal {
                    break;
                }
            }
            Ok(None) => break,  // Channel closed
            Err(_) => continue, // Timeout, keep waiting
        }
    }

    events
}

/// Whether the sequence contains a PipelineStarted event.
pub fn has_pipeline_started(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::PipelineStarted { .. }))
}

/// Whether the sequence contains a PipelineCompleted event.
pub fn has_pipeline_completed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::PipelineCompleted { .. }))
}

/// Whether the sequence contains a PipelineStatusUpdate with the given
/// status.
pub fn has_status_update(events: &[Event], status: PipelineStatus) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            Event::PipelineStatusUpdate { status: s, .. } if *s == status
        )
    })
}

/// Whether the sequence contains a TaskFailed event.
#[allow(dead_code)]
pub fn has_task_failed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::TaskFailed { .. }))
}

/// Assert that a completed run's events are in the correct order.
///
/// Checks that:
/// 1. PipelineStarted comes first
/// 2. PipelineStatusUpdate(Running) comes before completion
/// 3. PipelineCompleted comes last
#[allow(dead_code)]
pub fn assert_event_sequence(events: &[Event]) {
    assert!(!events.is_empty(), "Event sequence is empty");

    assert!(
        matches!(events[0], Event::PipelineStarted { .. }),
        "First event should be PipelineStarted, got: {:?}",
        events[0]
    );

    assert!(
        has_status_update(events, PipelineStatus::Running),
        "Should contain a Running status update"
    );

    let last = events.last().expect("checked non-empty");
    assert!(
        matches!(last, Event::PipelineCompleted { .. }),
        "Last event should be PipelineCompleted, got: {:?}",
        last
    );
}
