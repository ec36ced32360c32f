//! Configuration file loader for the `.redraft/` directory structure.
//!
//! This module provides functionality to load and parse all configuration
//! files from the `.redraft/` directory, including:
//! - `config.toml`: Global settings
//! - `stages/*.md`: Stage prompt templates with YAML front matter
//! - `plans/*.yaml`: Named refinement plans

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use rd_protocol::config_models::{GlobalConfig, RefinePlan, StageTemplate};
use std::path::Path;
use walkdir::WalkDir;

/// Loads all configuration from the `.redraft/` directory.
///
/// This function scans the `.redraft/` directory and loads:
/// - Global configuration from `config.toml`
/// - Stage template overrides from `stages/*.md`
/// - Refinement plans from `plans/*.yaml`
///
/// # Arguments
///
/// * `root` - Root directory containing the `.redraft/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or
/// files are missing (but the root exists), returns an empty/default
/// configuration rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - A stage template names an unknown stage
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let rd_dir = root.join(".redraft");

    // If .redraft doesn't exist, return default config
    if !rd_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&rd_dir)?;
    let templates = load_stage_templates(&rd_dir)?;
    let plans = load_plans(&rd_dir)?;

    tracing::debug!(
        templates = templates.len(),
        plans = plans.len(),
        "configuration loaded"
    );

    Ok(AppConfig {
        global,
        templates,
        plans,
    })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(rd_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = rd_dir.join("config.toml");

    // If config.toml doesn't exist, return default
    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path,
            source,
        })?;

    Ok(config)
}

/// Loads all stage template overrides from `stages/*.md`.
///
/// Each file is Markdown with YAML front matter naming the stage; the
/// body after the front matter is the prompt template. An unknown stage
/// id in the front matter fails the load.
fn load_stage_templates(rd_dir: &Path) -> ConfigResult<Vec<StageTemplate>> {
    let stages_dir = rd_dir.join("stages");

    if !stages_dir.exists() {
        return Ok(Vec::new());
    }

    let mut templates = Vec::new();

    for entry in WalkDir::new(&stages_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: stages_dir.clone(),
            source,
        })?;

        let path = entry.path();

        // Only process .md files
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        // Parse Markdown with YAML front matter
        let matter = Matter::<YAML>::new();
        let result = matter.parse(&content);

        let mut template: StageTemplate = result
            .data
            .ok_or_else(|| ConfigError::MarkdownParse {
                path: path.to_path_buf(),
                reason: "Missing YAML front matter".to_string(),
            })?
            .deserialize()
            .map_err(|e| ConfigError::MarkdownParse {
                path: path.to_path_buf(),
                reason: format!("Failed to deserialize front matter: {}", e),
            })?;

        // The template body is the markdown after the front matter.
        template.template = result.content.trim().to_string();

        templates.push(template);
    }

    Ok(templates)
}

/// Loads all refinement plans from `plans/*.yaml`.
fn load_plans(rd_dir: &Path) -> ConfigResult<Vec<RefinePlan>> {
    let plans_dir = rd_dir.join("plans");

    if !plans_dir.exists() {
        return Ok(Vec::new());
    }

    let mut plans = Vec::new();

    for entry in WalkDir::new(&plans_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: plans_dir.clone(),
            source,
        })?;

        let path = entry.path();

        // Only process .yaml and .yml files
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let plan: RefinePlan =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        plans.push(plan);
    }

    Ok(plans)
}
