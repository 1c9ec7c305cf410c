//! Object arena
//!
//! Objects live in a table of slots. A [`Handle`] names a slot index plus the
//! generation the slot had when the object was placed there; freeing a slot
//! drops the object and bumps the generation, so every outstanding handle to
//! it goes stale instead of dangling.
//!
//! ```text
//!  slots:  [ g0: Int ][ g2: free ][ g0: Array ][ g1: String ]
//!  free:   [ 1 ]
//! ```

use crate::util::{AllocError, GrowableStack};
use crate::value::{Handle, Object, ObjectData};

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<Object>,
}

/// Slot table for heap objects
#[derive(Debug, Default)]
pub struct Arena {
    slots: GrowableStack<Slot>,
    /// Indices of empty slots, most recently freed on top
    free_list: GrowableStack<u32>,
    /// Number of occupied slots
    live: usize,
}

impl Arena {
    /// Create an arena with room for `capacity` objects before growing
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: GrowableStack::with_capacity(capacity),
            free_list: GrowableStack::default(),
            live: 0,
        }
    }

    /// Fallible [`Arena::with_capacity`]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Arena {
            slots: GrowableStack::try_with_capacity(capacity)?,
            free_list: GrowableStack::default(),
            live: 0,
        })
    }

    /// Number of live objects
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Place a new object (refcount 1, unmarked) into a free slot
    pub fn alloc(&mut self, data: ObjectData) -> Result<Handle, AllocError> {
        let object = Object::new(data);

        if let Some(index) = self.free_list.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                debug_assert!(slot.object.is_none());
                slot.object = Some(object);
                self.live += 1;
                return Ok(Handle::new(index, slot.generation));
            }
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| AllocError)?;
        self.slots.push(Slot {
            generation: 0,
            object: Some(object),
        })?;
        self.live += 1;
        Ok(Handle::new(index, 0))
    }

    /// Remove the object behind `handle` and return it.
    /// Returns `None` if the handle is stale.
    pub fn free(&mut self, handle: Handle) -> Option<Object> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.live -= 1;

        if self.free_list.push(handle.index() as u32).is_err() {
            // Slot stays empty and is never reused
            log::warn!("free list full; slot {} retired", handle.index());
        }
        Some(object)
    }

    /// Resolve a handle; `None` once the object has been freed
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&Object> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.object.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Object> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.object.as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Iterate over live objects in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Object)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object
                .as_ref()
                .map(|object| (Handle::new(index as u32, slot.generation), object))
        })
    }

    /// Drop every object, keeping the slot table for reuse
    pub fn clear(&mut self) {
        let handles: Vec<Handle> = self.iter().map(|(handle, _)| handle).collect();
        for handle in handles {
            self.free(handle);
        }
    }
}
