//! Snek runtime - object model and memory management for the Snek language
//!
//! Snek values are heap objects of five kinds: integers, floats, strings,
//! 3-component vectors and fixed-length arrays. Vectors and arrays hold
//! references to other objects, so values form a graph.
//!
//! Two reclamation regimes are provided, each its own object space:
//! - [`RcHeap`]: reference counting, frees eagerly, leaks cycles
//! - [`Vm`]: frames of roots plus an explicit mark/trace/sweep collection
//!
//! # Example
//! ```
//! use snek::{ObjectSpace, Vm};
//!
//! let mut vm = Vm::new();
//! let a = vm.new_integer(2).unwrap();
//! let b = vm.new_integer(3).unwrap();
//! let sum = vm.add(a, b).unwrap();
//! vm.new_frame().unwrap().reference_object(sum).unwrap();
//!
//! let stats = vm.collect_garbage();
//! assert_eq!(stats.freed, 2);
//! assert_eq!(vm.object(sum).unwrap().as_integer(), Some(5));
//! ```

// Object model
pub mod value;

// Arena and tracing phases
pub mod gc;

// Reference-counting regime
pub mod refcount;

// Tracing regime
pub mod vm;

// Operations shared by both regimes
pub mod runtime;

// Utilities
pub mod util;

pub use gc::GcStats;
pub use refcount::RcHeap;
pub use runtime::{ObjectError, ObjectSpace};
pub use util::GrowableStack;
pub use value::{Handle, Object, ObjectData, ObjectKind};
pub use vm::{Frame, Vm, VmConfig};
