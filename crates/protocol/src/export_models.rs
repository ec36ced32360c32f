//! Structured export of completed refinement results.
//!
//! Exports are the hand-off from the pipeline to downstream consumers
//! (persistence, HTML/Markdown rendering). Only fully refined chapters
//! appear here; partial results are never exported, so a consumer cannot
//! mistake an interrupted rewrite for a finished one.

use serde::{Deserialize, Serialize};

/// One completed chapter's refinement result.
///
/// Field names are camelCase on the wire so JavaScript consumers can
/// read exports without a mapping layer:
///
/// ```json
/// {
///   "chapterId": "ch1",
///   "chapterTitle": "The Long Night",
///   "originalContent": "...",
///   "refinedContent": "...",
///   "completedStages": ["Remove AI Flavor", "Enhance Tension"]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefinedExport {
    /// Identifier of the source chapter.
    pub chapter_id: String,

    /// Title of the source chapter.
    pub chapter_title: String,

    /// The chapter text before any stage ran.
    pub original_content: String,

    /// The fully refined text after the final stage.
    pub refined_content: String,

    /// Display names of the completed stages, in execution order.
    pub completed_stages: Vec<String>,
}
