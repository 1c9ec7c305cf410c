//! Mark/trace/sweep collector
//!
//! A collection runs in three phases, always in this order:
//! 1. Mark: flag every object held directly by a root set
//! 2. Trace: propagate the flag through container edges until closure
//! 3. Sweep: free every unflagged registry entry, clear flags on survivors
//!
//! A full collection first clears flags left behind by a standalone mark or
//! trace, so only the current roots decide what survives.
//!
//! Objects never move. Trace skips children that are already flagged, which
//! is what makes cyclic graphs terminate.

use super::allocator::Arena;
use crate::util::GrowableStack;
use crate::value::Handle;

/// Gray worklist capacity used before the first growth
const WORKLIST_CAPACITY: usize = 64;

/// Statistics about a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Registry entries before the sweep
    pub objects_before: usize,
    /// Registry entries after the sweep
    pub objects_after: usize,
    /// Objects freed by the sweep
    pub freed: usize,
}

/// Clear the flag on every registry entry.
///
/// Returns the number of objects that were flagged.
pub fn unmark(arena: &mut Arena, registry: &GrowableStack<Handle>) -> usize {
    let mut cleared = 0;
    for &handle in registry {
        if let Some(object) = arena.get_mut(handle) {
            if object.is_marked() {
                object.set_marked(false);
                cleared += 1;
            }
        }
    }
    cleared
}

/// Flag every root. Shallow: children are left for [`trace`].
///
/// Returns the number of objects newly flagged. Stale roots are skipped.
pub fn mark<'a>(arena: &mut Arena, roots: impl IntoIterator<Item = &'a Handle>) -> usize {
    let mut newly_marked = 0;
    for &root in roots {
        if let Some(object) = arena.get_mut(root) {
            if !object.is_marked() {
                object.set_marked(true);
                newly_marked += 1;
                log::trace!("mark root {:?}", root);
            }
        }
    }
    newly_marked
}

/// Flag everything reachable from already-flagged registry entries.
///
/// Returns the number of objects newly flagged.
pub fn trace(arena: &mut Arena, registry: &GrowableStack<Handle>) -> usize {
    let mut gray = GrowableStack::try_with_capacity(WORKLIST_CAPACITY).unwrap_or_default();
    let mut newly_marked = 0;

    loop {
        let mut overflowed = false;

        for &handle in registry {
            if !arena.get(handle).is_some_and(|o| o.is_marked()) {
                continue;
            }
            overflowed |= blacken(arena, &mut gray, handle, &mut newly_marked);
            while let Some(gray_handle) = gray.pop() {
                overflowed |= blacken(arena, &mut gray, gray_handle, &mut newly_marked);
            }
        }

        // A child that did not fit on the worklist is flagged but unscanned;
        // the next pass scans it from the registry.
        if !overflowed {
            break;
        }
        log::debug!("gray worklist overflow; rescanning registry");
    }

    newly_marked
}

/// Flag the unflagged children of `handle` and queue them.
/// Returns true if a queued child was dropped.
fn blacken(
    arena: &mut Arena,
    gray: &mut GrowableStack<Handle>,
    handle: Handle,
    newly_marked: &mut usize,
) -> bool {
    let edge_count = match arena.get(handle) {
        Some(object) => object.data().edge_count(),
        None => return false,
    };

    let mut overflowed = false;
    for i in 0..edge_count {
        let Some(child) = arena.get(handle).and_then(|o| o.data().edge(i)) else {
            continue;
        };
        let Some(child_object) = arena.get_mut(child) else {
            continue;
        };
        if child_object.is_marked() {
            continue;
        }
        child_object.set_marked(true);
        *newly_marked += 1;
        log::trace!("trace {:?} -> {:?}", handle, child);

        if gray.push(child).is_err() {
            overflowed = true;
        }
    }
    overflowed
}

/// Free every unflagged registry entry and clear flags on the rest.
///
/// The registry is compacted to survivors, order preserved. Returns the
/// number of objects freed.
pub fn sweep(arena: &mut Arena, registry: &mut GrowableStack<Handle>) -> usize {
    let mut freed = 0;
    registry.retain(|&handle| match arena.get_mut(handle) {
        Some(object) if object.is_marked() => {
            object.set_marked(false);
            true
        }
        Some(_) => {
            if let Some(object) = arena.free(handle) {
                log::trace!("sweep {:?} ({})", handle, object.kind());
            }
            freed += 1;
            false
        }
        None => false,
    });
    freed
}

/// Check post-sweep invariants: every survivor is unflagged and
/// references only live objects.
#[cfg(any(test, feature = "debug-gc"))]
pub fn verify(arena: &Arena, registry: &GrowableStack<Handle>) {
    for &handle in registry {
        let object = arena.get(handle);
        assert!(object.is_some(), "registry holds stale {:?}", handle);
        if let Some(object) = object {
            assert!(!object.is_marked(), "{:?} still marked after sweep", handle);
            object.data().visit_edges(|child| {
                assert!(
                    arena.contains(child),
                    "{:?} references freed {:?}",
                    handle,
                    child
                );
            });
        }
    }
}
