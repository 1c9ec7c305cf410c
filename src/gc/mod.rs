//! Garbage collector module
//!
//! Snek objects live in a non-moving slot arena. Two regimes reclaim them:
//! - reference counting ([`crate::refcount::RcHeap`]), which frees an object
//!   as soon as its last referencing site goes away but leaks cycles
//! - tracing ([`crate::vm::Vm`]), which frees whatever is unreachable from
//!   the active frames when a collection is requested, cycles included
//!
//! This module holds the parts both share: the arena and the tracing phases.

mod allocator;
mod collector;

pub use allocator::Arena;
pub use collector::{GcStats, mark, sweep, trace, unmark};

#[cfg(any(test, feature = "debug-gc"))]
pub use collector::verify;
