//! Initialization module for creating `.redraft/` directory structures.
//!
//! This module provides functionality to initialize a new redraft project
//! by generating a `.redraft/` directory with pre-configured templates for:
//! - Global configuration (`config.toml`)
//! - Stage prompt templates (`stages/*.md`)
//! - Refinement plans (`plans/*.yaml`)
//!
//! # Example
//!
//! ```no_run
//! use rd_core::init::{InitOptions, generate_redraft_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_redraft_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

// Re-export commonly used types for convenience
pub use error::{InitError, InitResult};
pub use generator::{generate_redraft_structure, InitOptions};
pub use templates::{get_template, list_templates};
