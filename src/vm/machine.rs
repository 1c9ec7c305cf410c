//! The tracing VM
//!
//! The VM owns a call stack of [`Frame`]s and a registry of every object
//! constructed through it. Nothing is reclaimed until the host asks:
//!
//! ```text
//!   new_frame ─► reference_object ─► ... ─► frame_pop
//!                                              │
//!   collect_garbage: mark (roots) ─► trace (closure) ─► sweep (registry)
//! ```
//!
//! Popping a frame only drops its roots from consideration; the objects it
//! referenced stay in the registry until a later collection finds them
//! unreachable.

use super::frame::{DEFAULT_ROOT_CAPACITY, Frame};
use crate::gc::{self, Arena, GcStats};
use crate::runtime::{ObjectError, ObjectSpace};
use crate::util::GrowableStack;
use crate::value::Handle;

/// Initial capacities for a VM. Every stack grows independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Call stack capacity
    pub frame_capacity: usize,
    /// Object registry capacity
    pub object_capacity: usize,
    /// Root capacity of each new frame
    pub root_capacity: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            frame_capacity: 8,
            object_capacity: 8,
            root_capacity: DEFAULT_ROOT_CAPACITY,
        }
    }
}

/// Tracing virtual machine
pub struct Vm {
    /// Call stack, innermost frame on top
    frames: GrowableStack<Frame>,
    /// Every object constructed through this VM and not yet swept
    objects: GrowableStack<Handle>,
    arena: Arena,
    config: VmConfig,
}

impl Vm {
    /// Create a VM with the default configuration
    pub fn new() -> Self {
        Vm::with_config(VmConfig::default())
    }

    /// Aborts on allocation failure, like `Vec::with_capacity`
    pub fn with_config(config: VmConfig) -> Self {
        Vm {
            frames: GrowableStack::with_capacity(config.frame_capacity),
            objects: GrowableStack::with_capacity(config.object_capacity),
            arena: Arena::with_capacity(config.object_capacity),
            config,
        }
    }

    /// Fallible [`Vm::with_config`]
    pub fn try_with_config(config: VmConfig) -> Result<Self, ObjectError> {
        Ok(Vm {
            frames: GrowableStack::try_with_capacity(config.frame_capacity)?,
            objects: GrowableStack::try_with_capacity(config.object_capacity)?,
            arena: Arena::try_with_capacity(config.object_capacity)?,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Push an empty frame onto the call stack and return it
    pub fn new_frame(&mut self) -> Result<&mut Frame, ObjectError> {
        let frame = Frame::try_with_capacity(self.config.root_capacity)?;
        Ok(self.frames.push_mut(frame)?)
    }

    /// Remove the innermost frame from the call stack.
    ///
    /// The frame's objects are not freed; they become candidates for the
    /// next collection.
    pub fn frame_pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Innermost frame
    pub fn current_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.peek_mut()
    }

    /// Number of frames on the call stack
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Registry count: objects constructed and not yet swept
    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Registry contents in construction order
    pub fn objects(&self) -> &[Handle] {
        self.objects.as_slice()
    }

    /// Mark bit of a live object
    pub fn is_marked(&self, handle: Handle) -> Option<bool> {
        self.arena.get(handle).map(|o| o.is_marked())
    }

    /// Flag every object held directly by a frame on the call stack.
    ///
    /// Children are not visited. Returns the number newly flagged.
    pub fn mark(&mut self) -> usize {
        let Vm { frames, arena, .. } = self;
        frames
            .iter()
            .map(|frame| gc::mark(arena, frame.roots()))
            .sum()
    }

    /// Flag everything reachable from flagged objects.
    ///
    /// Returns the number newly flagged.
    pub fn trace(&mut self) -> usize {
        gc::trace(&mut self.arena, &self.objects)
    }

    /// Mark, trace, then sweep the registry.
    ///
    /// Flags set by an earlier [`Vm::mark`] or [`Vm::trace`] are discarded
    /// first; only frames on the call stack now keep objects alive.
    pub fn collect_garbage(&mut self) -> GcStats {
        let objects_before = self.objects.len();

        let stale = gc::unmark(&mut self.arena, &self.objects);
        if stale > 0 {
            log::trace!("gc: cleared {} stale marks", stale);
        }
        self.mark();
        self.trace();
        let freed = gc::sweep(&mut self.arena, &mut self.objects);

        #[cfg(feature = "debug-gc")]
        gc::verify(&self.arena, &self.objects);

        let stats = GcStats {
            objects_before,
            objects_after: self.objects.len(),
            freed,
        };
        log::debug!(
            "gc: {} -> {} objects, {} freed, {} frames",
            stats.objects_before,
            stats.objects_after,
            stats.freed,
            self.frames.len()
        );

        #[cfg(feature = "dump")]
        self.dump();

        stats
    }

    #[cfg(feature = "dump")]
    fn dump(&self) {
        for &handle in &self.objects {
            if let Some(object) = self.arena.get(handle) {
                log::debug!("  {:?} {} = {}", handle, object.kind(), object.data());
            }
        }
    }

    /// Release every frame and every object, reachable or not
    pub fn free(self) {
        drop(self);
    }

    fn teardown(&mut self) {
        while self.frames.pop().is_some() {}
        self.objects.clear();
        self.arena.clear();
    }
}

impl Default for Vm {
    fn default() -> Self {
        Vm::new()
    }
}

impl Drop for Vm {
    fn drop(&mut self) {
        log::trace!(
            "vm teardown: {} frames, {} objects",
            self.frames.len(),
            self.objects.len()
        );
        self.teardown();
    }
}

impl ObjectSpace for Vm {
    #[inline]
    fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn register(&mut self, handle: Handle) -> Result<(), ObjectError> {
        self.objects.push(handle)?;
        Ok(())
    }

    fn retain(&mut self, _handle: Handle) {}

    fn release(&mut self, _handle: Handle) {}
}
