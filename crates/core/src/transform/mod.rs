//! Content transformer abstraction.
//!
//! This module provides:
//! - The [`Transformer`] trait implemented by rewrite providers
//! - [`TransformerManager`] for provider lookup and fallback
//! - Test adapters under [`adapters`]

pub mod adapters;
pub mod base;
pub mod manager;

pub use base::{TransformError, TransformRequest, Transformer};
pub use manager::TransformerManager;
