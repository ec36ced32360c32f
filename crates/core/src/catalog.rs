//! Stage catalog: prompt templates and display names.
//!
//! The catalog owns the prompt template table for the stage set. Building
//! a prompt selects the per-pipeline override if one exists, else the
//! catalog entry, and substitutes the chapter text into the template.

use rd_protocol::stage_models::{InvalidStageError, PromptOverrides, Stage};
use std::collections::HashMap;
use std::str::FromStr;

/// Placeholder replaced with the chapter text when building a prompt.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Built-in prompt template for a stage.
fn default_template(stage: Stage) -> &'static str {
    match stage {
        Stage::RemoveAiFlavor => {
            "Rewrite the chapter below so it reads like a human author wrote it: \
             vary sentence rhythm, cut stock transitions and filler phrases, and \
             drop summary-style closing lines. Keep the plot and facts unchanged.\n\n\
             Chapter:\n{content}"
        }
        Stage::EnhanceTension => {
            "Revise the chapter below to heighten dramatic tension: tighten the \
             pacing, sharpen what is at stake in each scene, and end sections on \
             forward pressure rather than resolution.\n\nChapter:\n{content}"
        }
        Stage::ImproveCharacter => {
            "Revise the chapter below to deepen its characters: give each speaker \
             a distinct voice, replace labeled emotions with concrete gestures, \
             and make motivation visible in action.\n\nChapter:\n{content}"
        }
        Stage::AddTechniques => {
            "Polish the chapter below with craft techniques: sensory grounding, \
             subtext in dialogue, and showing over telling wherever the draft \
             states feelings directly.\n\nChapter:\n{content}"
        }
    }
}

/// Owns the prompt template table for the stage set.
///
/// The default catalog carries a built-in template for every stage. A
/// catalog built with [`StageCatalog::new`] uses exactly the given
/// table, which may be partial; a stage missing from both the table and
/// the per-pipeline overrides fails with
/// [`InvalidStageError::MissingTemplate`].
#[derive(Debug, Clone)]
pub struct StageCatalog {
    templates: HashMap<Stage, String>,
}

impl Default for StageCatalog {
    fn default() -> Self {
        let templates = Stage::ALL
            .iter()
            .map(|&stage| (stage, default_template(stage).to_string()))
            .collect();
        Self { templates }
    }
}

impl StageCatalog {
    /// Create a catalog from an explicit template table.
    ///
    /// The table replaces the built-ins entirely and may be partial.
    pub fn new(templates: HashMap<Stage, String>) -> Self {
        Self { templates }
    }

    /// Create the default catalog with the given templates layered on top.
    ///
    /// Stages absent from `overrides` keep their built-in template; this
    /// is how templates loaded from `.redraft/stages/` are applied.
    pub fn with_overrides(overrides: HashMap<Stage, String>) -> Self {
        let mut catalog = Self::default();
        catalog.templates.extend(overrides);
        catalog
    }

    /// Resolve the template for a stage.
    ///
    /// The per-pipeline override wins over the catalog entry.
    pub fn template<'a>(
        &'a self,
        stage: Stage,
        overrides: &'a PromptOverrides,
    ) -> Result<&'a str, InvalidStageError> {
        overrides
            .get(&stage)
            .or_else(|| self.templates.get(&stage))
            .map(String::as_str)
            .ok_or(InvalidStageError::MissingTemplate(stage))
    }

    /// Build the prompt for one stage over the given chapter text.
    ///
    /// Substitutes the first occurrence of `{content}` with `content`.
    /// There is no other templating: no loops, no conditionals, no
    /// repeated substitution.
    pub fn prompt(
        &self,
        stage: Stage,
        content: &str,
        overrides: &PromptOverrides,
    ) -> Result<String, InvalidStageError> {
        let template = self.template(stage, overrides)?;
        Ok(template.replacen(CONTENT_PLACEHOLDER, content, 1))
    }
}

/// Display name for a stage identifier held as a string.
///
/// Unknown identifiers fail with [`InvalidStageError::Unknown`]. Callers
/// already holding a [`Stage`] use [`Stage::display_name`] directly.
pub fn stage_name(id: &str) -> Result<&'static str, InvalidStageError> {
    Stage::from_str(id).map(|stage| stage.display_name())
}
