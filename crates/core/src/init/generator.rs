//! Directory structure and file generation for `.redraft/` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a `.redraft` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where `.redraft` will be created.
    pub target_dir: PathBuf,

    /// Overwrite existing `.redraft` directory if it exists.
    pub force: bool,

    /// Create minimal structure (one stage template, no plans).
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a complete `.redraft` directory structure with templates.
///
/// This function creates the following structure:
/// ```text
/// .redraft/
/// ├── config.toml
/// ├── stages/
/// │   ├── remove-ai-flavor.md
/// │   ├── enhance-tension.md      (unless minimal)
/// │   ├── improve-character.md    (unless minimal)
/// │   └── add-techniques.md       (unless minimal)
/// └── plans/
///     └── full-refine.yaml        (unless minimal)
/// ```
///
/// # Errors
///
/// Returns an `InitError` if:
/// - The `.redraft` directory already exists (without the force flag)
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_redraft_structure(options: InitOptions) -> InitResult<()> {
    let rd_dir = options.target_dir.join(".redraft");

    // Check if directory exists
    if rd_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(rd_dir));
    }

    // Create directory structure
    fs::create_dir_all(rd_dir.join("stages")).map_err(|source| InitError::DirectoryCreate {
        path: rd_dir.join("stages"),
        source,
    })?;

    fs::create_dir_all(rd_dir.join("plans")).map_err(|source| InitError::DirectoryCreate {
        path: rd_dir.join("plans"),
        source,
    })?;

    // Generate config.toml
    write_template_file(&rd_dir, "config.toml")?;

    // Generate stage templates
    if options.minimal {
        write_template_file(&rd_dir, "stages/remove-ai-flavor.md")?;
    } else {
        for stage_path in list_templates("stages/") {
            write_template_file(&rd_dir, &stage_path)?;
        }
    }

    // Generate plans
    if !options.minimal {
        for plan_path in list_templates("plans/") {
            write_template_file(&rd_dir, &plan_path)?;
        }
    }

    tracing::info!(target_dir = %options.target_dir.display(), minimal = options.minimal, ".redraft structure generated");

    Ok(())
}

/// Helper function to write a template file to the target directory.
fn write_template_file(rd_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = rd_dir.join(template_path);

    // Ensure parent directory exists
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })?;

    Ok(())
}
