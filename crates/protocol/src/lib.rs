//! # rd-protocol
//!
//! Core data models and protocol definitions for redraft.
//!
//! This crate defines all shared data structures used for:
//! - Refinement pipeline state (stages, tasks, progress)
//! - Configuration file parsing (TOML config, Markdown stage templates, YAML plans)
//! - Inter-process communication between a front end and the core
//!
//! ## Modules
//!
//! - [`stage_models`]: The closed stage set and stage resolution errors
//! - [`task_models`]: Per-chapter task state and status
//! - [`pipeline_models`]: Pipeline aggregate, progress, creation options
//! - [`config_models`]: Structures for `.redraft/` configuration files
//! - [`export_models`]: Structured export of completed results
//! - [`ipc`]: Operations and Events for front-end/core communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, thiserror, uuid, and chrono
//! - Wire compatibility: exports and IPC payloads use camelCase field
//!   names for JavaScript clients
//! - Independent compilation: No dependencies on other redraft crates

pub mod config_models;
pub mod export_models;
pub mod ipc;
pub mod pipeline_models;
pub mod stage_models;
pub mod task_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use export_models::*;
pub use ipc::*;
pub use pipeline_models::*;
pub use stage_models::*;
pub use task_models::*;
