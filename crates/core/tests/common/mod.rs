//! Common test utilities and helpers for E2E tests.
//!
//! This module provides shared functionality across all E2E tests including:
//! - Test fixtures (sample chapters, engines, managers)
//! - Custom assertions
//! - Helper functions

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
