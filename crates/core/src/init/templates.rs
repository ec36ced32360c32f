//! Embedded template files for `.redraft/` initialization.
//!
//! This module uses `rust-embed` to embed template files from the project
//! root `templates/` directory into the binary at compile time, so
//! `.redraft/` structures can be generated without external file
//! dependencies.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// At compile time, all files in the project root `templates/` directory
/// are embedded into the binary. The path is calculated relative to the
/// crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = project root `templates/`
///
/// During development with the `debug-embed` feature, files are read from
/// the filesystem at runtime, allowing for quick iteration without
/// recompilation.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Arguments
/// * `path` - Relative path from templates root (e.g., "config.toml",
///   "stages/remove-ai-flavor.md")
///
/// # Returns
/// The file content as a String, or None if the file doesn't exist.
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all template files in a directory.
///
/// # Arguments
/// * `prefix` - Directory prefix (e.g., "stages/", "plans/")
pub fn list_templates(prefix: &str) -> Vec<String> {
    TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect()
}
