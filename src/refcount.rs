//! Reference-counted object heap
//!
//! Every object carries the number of sites that reference it: host
//! variables plus container slots. A new object starts at 1, owned by
//! whoever constructed it. When a count drops to zero the object leaves the
//! arena (its handle goes stale) and each of its children loses one
//! reference, which may free them in turn.
//!
//! Cycles are never reclaimed. Two arrays holding each other, or an array
//! holding itself, keep a count of at least 1 after every external owner has
//! released them. Use [`crate::vm::Vm`] when the object graph may be cyclic.
//! Do not mix this heap's handles with a VM's.

use crate::gc::Arena;
use crate::runtime::{ObjectError, ObjectSpace};
use crate::util::GrowableStack;
use crate::value::Handle;

/// Heap whose objects are freed as soon as their count reaches zero
#[derive(Debug, Default)]
pub struct RcHeap {
    arena: Arena,
}

impl RcHeap {
    /// Create an empty heap; storage is allocated on first use
    pub fn new() -> Self {
        RcHeap::default()
    }

    /// Create a heap with room for `capacity` objects before growing
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ObjectError> {
        Ok(RcHeap {
            arena: Arena::try_with_capacity(capacity)?,
        })
    }

    /// Current count; `None` once the object is freed
    pub fn refcount(&self, handle: Handle) -> Option<u32> {
        self.arena.get(handle).map(|o| o.refcount())
    }

    /// Number of objects not yet freed
    pub fn live_objects(&self) -> usize {
        self.arena.len()
    }

    /// Add a reference. No-op on a freed handle.
    pub fn refcount_inc(&mut self, handle: Handle) {
        if let Some(object) = self.arena.get_mut(handle) {
            object.inc_ref();
        }
    }

    /// Drop a reference. No-op on a freed handle.
    ///
    /// Reaching zero frees the object and drops one reference from each of
    /// its slots; duplicates count once per slot. Release cascades through
    /// a worklist, so a long chain does not grow the native stack.
    pub fn refcount_dec(&mut self, handle: Handle) {
        let mut pending: GrowableStack<Handle> = GrowableStack::default();
        let mut next = Some(handle);

        while let Some(handle) = next.take().or_else(|| pending.pop()) {
            let Some(object) = self.arena.get_mut(handle) else {
                continue;
            };
            if object.dec_ref() > 0 {
                continue;
            }

            let Some(object) = self.arena.free(handle) else {
                continue;
            };
            log::debug!("release {:?} ({})", handle, object.kind());

            object.data().visit_edges(|child| {
                if let Err(err) = pending.push(child) {
                    log::trace!("{}; releasing {:?} in place", err, child);
                    self.refcount_dec(child);
                }
            });
        }
    }
}

impl ObjectSpace for RcHeap {
    #[inline]
    fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn register(&mut self, _handle: Handle) -> Result<(), ObjectError> {
        Ok(())
    }

    fn retain(&mut self, handle: Handle) {
        self.refcount_inc(handle);
    }

    fn release(&mut self, handle: Handle) {
        self.refcount_dec(handle);
    }
}
