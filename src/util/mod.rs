//! Utilities
//!
//! Data-structure helpers used throughout the runtime.

pub mod stack;

pub use stack::{AllocError, GrowableStack};
