//! Configuration models for the `.redraft/` project directory.
//!
//! This module defines the structures parsed from the three kinds of
//! configuration file: global settings (TOML), stage prompt templates
//! (Markdown with YAML front matter), and named refinement plans (YAML).

use serde::{Deserialize, Serialize};

use crate::stage_models::Stage;

/// Represents global settings from `.redraft/config.toml`.
///
/// This structure contains project-wide options that affect every
/// refinement run.
///
/// # Example
///
/// ```toml
/// # .redraft/config.toml
/// provider = "mock"
/// fallback = "mock"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Name of the transformer provider used for refinement calls.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Optional fallback provider tried when the primary is unavailable.
    #[serde(default)]
    pub fallback: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            fallback: None,
        }
    }
}

fn default_provider() -> String {
    "mock".to_string()
}

/// A stage prompt template parsed from `.redraft/stages/*.md`.
///
/// Template files are Markdown with YAML front matter naming the stage;
/// the file body is the prompt template itself and must contain the
/// `{content}` placeholder.
///
/// # Example
///
/// ```markdown
/// ---
/// stage: remove-ai-flavor
/// ---
///
/// Rewrite the chapter below in a natural human register.
///
/// {content}
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StageTemplate {
    /// The stage this template overrides.
    pub stage: Stage,

    /// The prompt template body, taken from the Markdown after the front
    /// matter.
    ///
    /// Note: this field is skipped during serialization as it is not part
    /// of the front matter metadata.
    #[serde(skip)]
    pub template: String,
}

/// A named stage sequence from `.redraft/plans/*.yaml`.
///
/// Plans let a project define shorter or reordered refinement runs
/// without touching the built-in stage order.
///
/// # Example
///
/// ```yaml
/// name: full-refine
/// stages:
///   - remove-ai-flavor
///   - enhance-tension
///   - improve-character
///   - add-techniques
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RefinePlan {
    /// Unique name identifying this plan.
    pub name: String,

    /// Ordered stages to apply, validated into the closed stage set
    /// during deserialization.
    pub stages: Vec<Stage>,
}
