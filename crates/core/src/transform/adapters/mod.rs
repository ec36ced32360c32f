//! Transformer adapter implementations.

pub mod mock;

pub use mock::MockTransformer;
