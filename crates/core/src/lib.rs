//! # rd-core
//!
//! Core refinement engine and pipeline state management for redraft.
//!
//! This crate provides:
//! - The stage catalog with prompt templates
//! - The task and pipeline state machines
//! - The driver engine that pushes chapters through refinement stages
//! - Configuration loading from the `.redraft/` directory
//! - Reporting and export of completed results
//!
//! ## Modules
//!
//! - [`catalog`]: Stage prompt templates and display names
//! - [`config`]: Configuration loading and management
//! - [`engine`]: The refinement driver loop
//! - [`init`]: `.redraft/` directory scaffolding
//! - [`report`]: Plain-text reports and structured exports
//! - [`state`]: Task and pipeline state machines, StateManager
//! - [`transform`]: Content transformer trait and providers

pub mod catalog;
pub mod config;
pub mod engine;
pub mod init;
pub mod report;
pub mod state;
pub mod transform;
