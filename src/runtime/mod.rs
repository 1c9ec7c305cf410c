//! Runtime support
//!
//! Object operations shared by both reclamation regimes:
//! - Constructors for every object kind
//! - Array element access
//! - `length` and `add`
//!
//! They are written once against [`ObjectSpace`]. An object space owns an
//! [`Arena`] and decides what a new referencing site means: the refcount
//! heap counts it, the VM ignores it and relies on reachability.

pub mod array;
pub mod object;
pub mod ops;
pub mod string;

use std::fmt;

use crate::gc::Arena;
use crate::util::AllocError;
use crate::value::{Handle, Object, ObjectKind};

/// Error from an object operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectError {
    /// Object or backing storage could not be allocated
    AllocationFailure,
    /// Array index outside `[0, len)`
    InvalidIndex { index: usize, len: usize },
    /// `add` on objects of different kinds
    KindMismatch { left: ObjectKind, right: ObjectKind },
    /// An operand was absent or already freed
    NullInput,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure => write!(f, "allocation failure"),
            Self::InvalidIndex { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
            Self::KindMismatch { left, right } => {
                write!(f, "cannot add {} and {}", left, right)
            }
            Self::NullInput => write!(f, "null input"),
        }
    }
}

impl std::error::Error for ObjectError {}

impl From<AllocError> for ObjectError {
    fn from(_: AllocError) -> Self {
        ObjectError::AllocationFailure
    }
}

/// An arena plus a policy for referencing sites
pub trait ObjectSpace {
    fn arena(&self) -> &Arena;
    fn arena_mut(&mut self) -> &mut Arena;

    /// Record a freshly allocated object
    fn register(&mut self, handle: Handle) -> Result<(), ObjectError>;

    /// A new referencing site now points at `handle`
    fn retain(&mut self, handle: Handle);

    /// A referencing site no longer points at `handle`
    fn release(&mut self, handle: Handle);

    /// Resolve a handle; `None` once the object is gone
    #[inline]
    fn object(&self, handle: Handle) -> Option<&Object> {
        self.arena().get(handle)
    }

    fn new_integer(&mut self, value: i64) -> Result<Handle, ObjectError> {
        object::new_integer(self, value)
    }

    fn new_float(&mut self, value: f64) -> Result<Handle, ObjectError> {
        object::new_float(self, value)
    }

    fn new_string(&mut self, value: &str) -> Result<Handle, ObjectError> {
        object::new_string(self, value)
    }

    /// Fails with `NullInput` if any component is gone; allocates nothing then
    fn new_vector3(&mut self, x: Handle, y: Handle, z: Handle) -> Result<Handle, ObjectError> {
        object::new_vector3(self, x, y, z)
    }

    /// Array of `size` empty slots
    fn new_array(&mut self, size: usize) -> Result<Handle, ObjectError> {
        object::new_array(self, size)
    }

    fn array_get(&self, array: Handle, index: usize) -> Option<Handle> {
        array::get(self, array, index)
    }

    /// Store `value` at `index`; false and no mutation if out of bounds
    fn array_set(&mut self, array: Handle, index: usize, value: Handle) -> bool {
        array::set(self, array, index, value).is_ok()
    }

    fn length(&self, handle: Handle) -> Option<usize> {
        object::length(self, handle)
    }

    fn add(&mut self, a: Handle, b: Handle) -> Result<Handle, ObjectError> {
        ops::add(self, a, b)
    }
}
