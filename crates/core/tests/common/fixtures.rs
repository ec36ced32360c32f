//! Test fixtures for creating sample chapters, engines, and managers.

use rd_core::catalog::StageCatalog;
use rd_core::engine::RefineEngine;
use rd_core::state::manager::StateManager;
use rd_core::transform::adapters::MockTransformer;
use rd_core::transform::{TransformError, TransformerManager};
use rd_protocol::ipc::Event;
use rd_protocol::task_models::Chapter;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Create `count` sample chapters named ch1..chN.
pub fn create_test_chapters(count: usize) -> Vec<Chapter> {
    (1..=count)
        .map(|i| Chapter {
            id: format!("ch{}", i),
            title: format!("Chapter {}", i),
            content: format!("It was chapter {} of the long draft.", i),
        })
        .collect()
}

/// Build an engine backed by the given mock transformer, registered
/// under the name "mock".
pub fn create_test_engine(transformer: MockTransformer) -> RefineEngine {
    let transformers = TransformerManager::new().register("mock", Arc::new(transformer));
    RefineEngine::new(transformers, StageCatalog::default(), "mock".to_string())
}

/// Build a state manager around a mock engine plus its event receiver.
pub fn create_test_manager(
    transformer: MockTransformer,
) -> (StateManager, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(256);
    (StateManager::new(create_test_engine(transformer), tx), rx)
}

/// A script where every call succeeds except the calls at the given
/// zero-based positions, which fail with the given message.
#[allow(dead_code)]
pub fn scripted_with_failures(
    total_calls: usize,
    failing_calls: &[usize],
    message: &str,
) -> MockTransformer {
    let outputs = (0..total_calls)
        .map(|i| {
            if failing_calls.contains(&i) {
                Err(TransformError::RequestFailed(message.to_string()))
            } else {
                Ok(format!("refined pass {}", i + 1))
            }
        })
        .collect();
    MockTransformer::scripted(outputs)
}
