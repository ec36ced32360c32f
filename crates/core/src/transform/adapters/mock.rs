//! Mock transformer implementation for testing.

use crate::transform::base::{TransformError, TransformRequest, Transformer};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Canned behaviors for a [`MockTransformer`].
enum MockBehavior {
    /// Return a fixed rewrite derived from the request.
    Success,
    /// Fail every request with the stored message.
    Fail(String),
    /// Pop the next scripted result per call; fail when exhausted.
    Scripted(Mutex<VecDeque<Result<String, TransformError>>>),
}

pub struct MockTransformer {
    available: bool,
    behavior: MockBehavior,
}

impl MockTransformer {
    /// A provider that succeeds with a marker rewrite of every request.
    pub fn success() -> Self {
        Self {
            available: true,
            behavior: MockBehavior::Success,
        }
    }

    /// A provider that reports itself unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            behavior: MockBehavior::Success,
        }
    }

    /// A provider that fails every request with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            available: true,
            behavior: MockBehavior::Fail(message.to_string()),
        }
    }

    /// A provider that replays the given results one per call.
    ///
    /// Once the script runs out, further calls fail.
    pub fn scripted(outputs: Vec<Result<String, TransformError>>) -> Self {
        Self {
            available: true,
            behavior: MockBehavior::Scripted(Mutex::new(outputs.into())),
        }
    }
}

#[async_trait]
impl Transformer for MockTransformer {
    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn transform(&self, request: &TransformRequest) -> Result<String, TransformError> {
        if !self.available {
            return Err(TransformError::NotAvailable(
                "Mock transformer not available".to_string(),
            ));
        }

        match &self.behavior {
            MockBehavior::Success => Ok(format!(
                "[{}] refined {}",
                request.stage, request.chapter_id
            )),
            MockBehavior::Fail(message) => Err(TransformError::RequestFailed(message.clone())),
            MockBehavior::Scripted(queue) => {
                let next = queue
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();
                next.unwrap_or_else(|| {
                    Err(TransformError::RequestFailed(
                        "Mock script exhausted".to_string(),
                    ))
                })
            }
        }
    }
}
