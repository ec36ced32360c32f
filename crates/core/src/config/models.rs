//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings, stage template overrides, and refinement plans into a
//! single configuration object.

use rd_protocol::config_models::{GlobalConfig, RefinePlan, StageTemplate};
use rd_protocol::stage_models::PromptOverrides;

/// Unified application configuration loaded from the `.redraft/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings (provider selection)
/// - `stages/*.md`: Stage prompt template overrides
/// - `plans/*.yaml`: Named stage sequences
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Stage template overrides loaded from `stages/*.md`.
    pub templates: Vec<StageTemplate>,

    /// Refinement plans loaded from `plans/*.yaml`.
    pub plans: Vec<RefinePlan>,
}

impl AppConfig {
    /// Fold the loaded stage templates into a prompt-override map.
    ///
    /// When two files override the same stage the later one in directory
    /// order wins.
    pub fn prompt_overrides(&self) -> PromptOverrides {
        self.templates
            .iter()
            .map(|template| (template.stage, template.template.clone()))
            .collect()
    }

    /// Look up a plan by name.
    pub fn plan(&self, name: &str) -> Option<&RefinePlan> {
        self.plans.iter().find(|plan| plan.name == name)
    }
}
