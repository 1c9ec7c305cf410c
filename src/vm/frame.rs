//! Call frames
//!
//! A frame is the root set of one call activation: the objects that stay
//! alive while the frame is on the VM's call stack. Referencing an object
//! from a frame does not touch its refcount; liveness comes from
//! reachability alone.

use crate::runtime::ObjectError;
use crate::util::GrowableStack;
use crate::value::Handle;

/// Root capacity of a frame created with [`Frame::new`]
pub const DEFAULT_ROOT_CAPACITY: usize = 8;

/// Root set for one call activation
#[derive(Debug, Default)]
pub struct Frame {
    references: GrowableStack<Handle>,
}

impl Frame {
    pub fn new() -> Self {
        Frame {
            references: GrowableStack::with_capacity(DEFAULT_ROOT_CAPACITY),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ObjectError> {
        Ok(Frame {
            references: GrowableStack::try_with_capacity(capacity)?,
        })
    }

    /// Add `handle` to this frame's roots.
    ///
    /// The same object may be referenced more than once; a handle that has
    /// since been freed is ignored by marking.
    pub fn reference_object(&mut self, handle: Handle) -> Result<(), ObjectError> {
        self.references.push(handle)?;
        Ok(())
    }

    /// Roots in the order they were referenced
    #[inline]
    pub fn roots(&self) -> &[Handle] {
        self.references.as_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
