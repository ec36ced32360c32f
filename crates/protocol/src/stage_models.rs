//! Refinement stage models.
//!
//! This module defines the closed set of transformation stages a chapter
//! passes through, and the error raised when a stage identifier cannot
//! be resolved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One named transformation pass applied uniformly to every task in a
/// pipeline.
///
/// The stage set is closed: identifiers arriving from configuration files
/// or API payloads are validated into this enum at the boundary, so an
/// unknown identifier fails with [`InvalidStageError`] instead of a silent
/// lookup miss.
///
/// Identifiers are kebab-case on the wire:
///
/// ```json
/// ["remove-ai-flavor", "enhance-tension", "improve-character", "add-techniques"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Strip generative-text tics and flatten formulaic phrasing.
    RemoveAiFlavor,

    /// Heighten dramatic tension and tighten pacing.
    EnhanceTension,

    /// Deepen character voice and interiority.
    ImproveCharacter,

    /// Apply craft techniques such as sensory detail and subtext.
    AddTechniques,
}

impl Stage {
    /// All stages in the default refinement order.
    pub const ALL: [Stage; 4] = [
        Stage::RemoveAiFlavor,
        Stage::EnhanceTension,
        Stage::ImproveCharacter,
        Stage::AddTechniques,
    ];

    /// The kebab-case identifier used in configuration files and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::RemoveAiFlavor => "remove-ai-flavor",
            Stage::EnhanceTension => "enhance-tension",
            Stage::ImproveCharacter => "improve-character",
            Stage::AddTechniques => "add-techniques",
        }
    }

    /// Human-readable name used in reports and exports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::RemoveAiFlavor => "Remove AI Flavor",
            Stage::EnhanceTension => "Enhance Tension",
            Stage::ImproveCharacter => "Improve Characters",
            Stage::AddTechniques => "Add Literary Techniques",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = InvalidStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remove-ai-flavor" => Ok(Stage::RemoveAiFlavor),
            "enhance-tension" => Ok(Stage::EnhanceTension),
            "improve-character" => Ok(Stage::ImproveCharacter),
            "add-techniques" => Ok(Stage::AddTechniques),
            other => Err(InvalidStageError::Unknown(other.to_string())),
        }
    }
}

/// Per-pipeline prompt template overrides, keyed by stage.
pub type PromptOverrides = HashMap<Stage, String>;

/// Raised when a stage identifier cannot be resolved to a usable stage.
///
/// Both variants indicate a configuration or programming mistake rather
/// than a runtime condition; callers should surface them, not swallow them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStageError {
    /// The identifier does not name any known stage.
    #[error("unknown stage '{0}'")]
    Unknown(String),

    /// The stage is known but no prompt template is registered for it.
    #[error("no prompt template for stage '{0}'")]
    MissingTemplate(Stage),
}
