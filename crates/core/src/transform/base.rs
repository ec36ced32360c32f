//! Base Transformer trait and supporting types.

use async_trait::async_trait;
use rd_protocol::stage_models::Stage;
use thiserror::Error;

/// Context handed to a transformer for one stage of one task.
///
/// The prompt already carries the substituted chapter text; the stage and
/// chapter id are included so providers can log or route the request.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// The fully built prompt, with the chapter text substituted in.
    pub prompt: String,

    /// The stage this request belongs to.
    pub stage: Stage,

    /// Identifier of the chapter being refined.
    pub chapter_id: String,
}

impl TransformRequest {
    pub fn new(prompt: String, stage: Stage, chapter_id: String) -> Self {
        Self {
            prompt,
            stage,
            chapter_id,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Transformer not available: {0}")]
    NotAvailable(String),
    #[error("Transform request failed: {0}")]
    RequestFailed(String),
}

/// The opaque generative-rewrite function.
///
/// A provider takes the prompt for one stage and returns the whole
/// replacement text for the chapter. There is no streaming: the pipeline
/// only consumes complete stage results.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn check_availability(&self) -> bool;
    async fn transform(&self, request: &TransformRequest) -> Result<String, TransformError>;
}
