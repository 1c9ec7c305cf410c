//! Virtual machine module
//!
//! The VM is the tracing regime: a call stack of frames whose roots decide
//! what survives an explicit collection.

pub mod frame;
pub mod machine;

pub use frame::Frame;
pub use machine::{Vm, VmConfig};
