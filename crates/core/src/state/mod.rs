//! State management for refinement pipelines.
//!
//! This module provides:
//! - Task state machine logic
//! - Pipeline construction, progress aggregation, scheduling, lifecycle
//! - StateManager for coordinating multiple pipelines

pub mod manager;
pub mod pipeline;
pub mod task;
